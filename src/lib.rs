//! forbidden-sigs: registry of forbidden API signatures for bytecode scanning.
//!
//! This crate contains the signature-file side of a forbidden-API checker,
//! with NO class-file loading of its own:
//! - Line grammar for signature files (directives, class/method/field
//!   signatures, inline and default messages)
//! - Symbol resolution against an injected `ClassMetadataProvider`
//! - Bundled-catalog expansion with JDK version normalization
//! - The queryable index the bytecode scanner asks per instruction
//!
//! The scanner itself, build-tool integration and CLI live elsewhere; they
//! only see the query surface of [`SignatureRegistry`].

pub mod catalog;
mod descriptor;
pub mod diagnostics;
pub mod error;
pub mod metadata;
pub mod parser;
mod pattern;
pub mod registry;
mod resolver;

// Re-export commonly used types
pub use catalog::{CatalogStore, StaticCatalogStore, NONPORTABLE_CATALOG};
pub use diagnostics::{DiagnosticSink, TracingSink};
pub use error::SignaturesError;
pub use metadata::{ClassMetadata, ClassMetadataProvider, ClassNotFound, MethodSig};
pub use parser::MethodRef;
pub use registry::{RegistryConfig, RegistryKey, SignatureRegistry};
