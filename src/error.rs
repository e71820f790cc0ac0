//! Error model for signature loading.
//!
//! Every fatal failure maps to exactly one `SignaturesError` variant:
//! malformed input (parse kind), missing or unreadable catalog resources
//! (resource kind), and `Unresolvable`, which is only constructed while the
//! fail-on-unresolvable policy is active. Recoverable resolution failures
//! never surface here; they are logged or collected by the registry.

/// Fatal error raised while loading signature text or bundled catalogs.
#[derive(Debug, thiserror::Error)]
pub enum SignaturesError {
    /// A line starting with `@` that is not a recognized directive, or a
    /// directive used where it is not allowed.
    #[error("invalid line in signature file: {0}")]
    InvalidLine(String),

    /// Signature text was empty after trimming.
    #[error("empty signature")]
    EmptySignature,

    /// Member part started with `(` so there is no method name.
    #[error("invalid method signature (method name missing): {0}")]
    MethodNameMissing(String),

    /// Member part looked like a method but did not parse.
    #[error("invalid method signature: {0}")]
    InvalidMethodSignature(String),

    /// Class-level glob patterns cannot carry a method or field suffix.
    #[error("class level glob pattern cannot be combined with methods/fields: {0}")]
    GlobWithMember(String),

    /// Glob pattern did not compile to a matcher.
    #[error("invalid class pattern: {0}")]
    InvalidGlob(String),

    /// Bundled catalog name contains characters outside `[A-Za-z0-9.-]`.
    #[error("invalid bundled signature reference: {0}")]
    InvalidCatalogName(String),

    /// Bundled catalog name carries an unrecognized JDK version token.
    #[error("invalid bundled signature reference (JDK version is invalid): {0}")]
    InvalidJdkVersion(String),

    /// A bundled catalog included itself, directly or transitively.
    #[error("recursive inclusion of bundled signatures: {0}")]
    RecursiveInclusion(String),

    /// Normalized catalog name has no backing resource in the store.
    #[error("bundled signatures resource not found: {0}")]
    CatalogNotFound(String),

    /// Class or member lookup failed while the active policy is FAIL.
    #[error("{message} while parsing signature: {signature}")]
    Unresolvable { message: String, signature: String },

    /// Underlying read of signature text failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SignaturesError {
    pub(crate) fn unresolvable(message: impl Into<String>, signature: impl Into<String>) -> Self {
        SignaturesError::Unresolvable {
            message: message.into(),
            signature: signature.into(),
        }
    }
}
