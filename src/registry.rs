//! The signature registry: parse loop, directive state machine, index.
//!
//! A registry is populated by one or more load calls (bundled catalogs,
//! reader-backed signature files, inline strings) against one shared index,
//! then queried read-only by the bytecode scanner. Population is
//! single-threaded and synchronous; callers are responsible for a strict
//! build-then-query phase separation.

use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};
use std::io::{BufRead, BufReader, Cursor, Read};

use indexmap::IndexSet;

use crate::catalog::{self, CatalogStore};
use crate::descriptor;
use crate::diagnostics::DiagnosticSink;
use crate::error::SignaturesError;
use crate::metadata::ClassMetadataProvider;
use crate::parser::{self, Directive, Member, MethodRef};
use crate::pattern::ClassPatternRule;
use crate::resolver;

/// Index key for one forbidden signature. Method keys carry parameter-type
/// descriptors but no return type; matching ignores return types, and
/// covariant overrides therefore collapse onto one key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RegistryKey {
    Class {
        class: String,
    },
    Field {
        class: String,
        name: String,
    },
    Method {
        class: String,
        name: String,
        params: Vec<String>,
    },
}

impl RegistryKey {
    pub fn class(class: impl Into<String>) -> Self {
        RegistryKey::Class {
            class: class.into(),
        }
    }

    pub fn field(class: impl Into<String>, name: impl Into<String>) -> Self {
        RegistryKey::Field {
            class: class.into(),
            name: name.into(),
        }
    }

    pub fn method(class: impl Into<String>, name: impl Into<String>, params: Vec<String>) -> Self {
        RegistryKey::Method {
            class: class.into(),
            name: name.into(),
            params,
        }
    }
}

/// Session-wide configuration, passed in explicitly instead of read from
/// ambient state.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryConfig {
    /// Start every parse invocation with the FAIL policy instead of WARN.
    pub fail_on_unresolvable_signatures: bool,
    /// Emit the missing-class summary after each load call.
    pub log_missing_signatures: bool,
}

/// How unresolvable references are handled. Parse-call scoped: every parse
/// invocation starts from the configured default, and `@ignoreUnresolvable`
/// only reaches SILENT inside a bundled catalog (bundled catalogs curate
/// their own gaps; user-supplied text is reset to WARN instead).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnresolvablePolicy {
    Fail,
    Warn,
    Silent,
}

impl UnresolvablePolicy {
    /// Reports a failed member or class resolution through the policy:
    /// fatal under FAIL, one warning under WARN, nothing under SILENT.
    fn parse_failed(
        self,
        sink: &dyn DiagnosticSink,
        message: &str,
        signature: &str,
    ) -> Result<(), SignaturesError> {
        match self {
            UnresolvablePolicy::Fail => Err(SignaturesError::unresolvable(message, signature)),
            UnresolvablePolicy::Warn => {
                sink.warn(&format!(
                    "{message} while parsing signature: {signature} [signature ignored]"
                ));
                Ok(())
            }
            UnresolvablePolicy::Silent => Ok(()),
        }
    }
}

/// Queryable index of forbidden classes, methods and fields.
pub struct SignatureRegistry<'a> {
    lookup: &'a dyn ClassMetadataProvider,
    catalogs: &'a dyn CatalogStore,
    sink: &'a dyn DiagnosticSink,
    config: RegistryConfig,
    signatures: HashMap<RegistryKey, String>,
    class_patterns: IndexSet<ClassPatternRule>,
    forbid_non_portable_runtime: bool,
}

impl<'a> SignatureRegistry<'a> {
    pub fn new(
        lookup: &'a dyn ClassMetadataProvider,
        catalogs: &'a dyn CatalogStore,
        sink: &'a dyn DiagnosticSink,
        config: RegistryConfig,
    ) -> Self {
        Self {
            lookup,
            catalogs,
            sink,
            config,
            signatures: HashMap::new(),
            class_patterns: IndexSet::new(),
            forbid_non_portable_runtime: false,
        }
    }

    // -----------------------------------------------------------------------
    // Population
    // -----------------------------------------------------------------------

    /// Loads a named bundled catalog, following its include directives.
    pub fn add_bundled_signatures(
        &mut self,
        name: &str,
        jdk_target_version: Option<&str>,
    ) -> Result<(), SignaturesError> {
        let mut missing = BTreeSet::new();
        let mut in_progress = Vec::new();
        self.add_bundled(name, jdk_target_version, true, &mut missing, &mut in_progress)?;
        self.report_missing_classes(&missing);
        Ok(())
    }

    /// Loads signature text from an arbitrary byte source.
    pub fn parse_signatures_reader(
        &mut self,
        reader: impl Read,
        name: &str,
    ) -> Result<(), SignaturesError> {
        self.sink.info(&format!("Reading API signatures: {name}"));
        let mut missing = BTreeSet::new();
        let mut in_progress = Vec::new();
        self.parse_lines(
            &mut BufReader::new(reader),
            false,
            &mut missing,
            &mut in_progress,
        )?;
        self.report_missing_classes(&missing);
        Ok(())
    }

    /// Loads signature text from an in-memory string.
    pub fn parse_signatures_string(&mut self, text: &str) -> Result<(), SignaturesError> {
        self.sink.info("Reading inline API signatures...");
        let mut missing = BTreeSet::new();
        let mut in_progress = Vec::new();
        self.parse_lines(
            &mut Cursor::new(text.as_bytes()),
            false,
            &mut missing,
            &mut in_progress,
        )?;
        self.report_missing_classes(&missing);
        Ok(())
    }

    fn add_bundled(
        &mut self,
        name: &str,
        jdk_target_version: Option<&str>,
        logging: bool,
        missing: &mut BTreeSet<String>,
        in_progress: &mut Vec<String>,
    ) -> Result<(), SignaturesError> {
        if !catalog::is_valid_catalog_name(name) {
            return Err(SignaturesError::InvalidCatalogName(name.to_string()));
        }
        if name == catalog::NONPORTABLE_CATALOG {
            if logging {
                self.sink
                    .info(&format!("Reading bundled API signatures: {name}"));
            }
            self.forbid_non_portable_runtime = true;
            return Ok(());
        }
        let store = self.catalogs;
        let mut name = catalog::fix_target_version(name)?;
        let mut stream = store.open(&name);
        // un-versioned jdk-* request: retry with the compiler target appended
        if stream.is_none() && name.starts_with("jdk-") && !catalog::has_version_suffix(&name) {
            if let Some(target) = jdk_target_version {
                name = catalog::fix_target_version(&format!("{name}-{target}"))?;
                stream = store.open(&name);
            }
        }
        let Some(stream) = stream else {
            return Err(SignaturesError::CatalogNotFound(name));
        };
        if in_progress.iter().any(|n| n == &name) {
            return Err(SignaturesError::RecursiveInclusion(name));
        }
        if logging {
            self.sink
                .info(&format!("Reading bundled API signatures: {name}"));
        }
        tracing::debug!(catalog = %name, "parsing bundled catalog");
        in_progress.push(name);
        let result = self.parse_lines(&mut BufReader::new(stream), true, missing, in_progress);
        in_progress.pop();
        result
    }

    /// Line loop and directive state machine for one parse invocation.
    fn parse_lines(
        &mut self,
        reader: &mut dyn BufRead,
        is_bundled: bool,
        missing: &mut BTreeSet<String>,
        in_progress: &mut Vec<String>,
    ) -> Result<(), SignaturesError> {
        let mut default_message: Option<String> = None;
        let mut policy = if self.config.fail_on_unresolvable_signatures {
            UnresolvablePolicy::Fail
        } else {
            UnresolvablePolicy::Warn
        };
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line.starts_with('@') {
                match parser::parse_directive(line)? {
                    Directive::IncludeBundled(name) if is_bundled => {
                        self.add_bundled(&name, None, false, missing, in_progress)?;
                    }
                    Directive::IncludeBundled(_) => {
                        return Err(SignaturesError::InvalidLine(line.to_string()));
                    }
                    Directive::DefaultMessage(message) => default_message = message,
                    Directive::IgnoreUnresolvable => {
                        policy = if is_bundled {
                            UnresolvablePolicy::Silent
                        } else {
                            UnresolvablePolicy::Warn
                        };
                    }
                }
            } else {
                self.add_signature(line, default_message.as_deref(), policy, missing)?;
            }
        }
        Ok(())
    }

    /// Parses one signature line, resolves it and inserts its entries.
    fn add_signature(
        &mut self,
        line: &str,
        default_message: Option<&str>,
        policy: UnresolvablePolicy,
        missing: &mut BTreeSet<String>,
    ) -> Result<(), SignaturesError> {
        let record = parser::parse_signature(line, default_message)?;
        let printout = match &record.message {
            Some(msg) => format!("{} [{}]", record.signature, msg),
            None => record.signature.clone(),
        };

        if descriptor::is_glob(&record.class_name) {
            if record.member.is_some() {
                return Err(SignaturesError::GlobWithMember(record.signature));
            }
            self.class_patterns
                .insert(ClassPatternRule::new(&record.class_name, record.message)?);
            return Ok(());
        }

        let meta = match self.lookup.resolve_class(&record.class_name) {
            Ok(meta) => meta,
            Err(_) => {
                if policy == UnresolvablePolicy::Silent {
                    missing.insert(record.class_name);
                } else {
                    policy.parse_failed(
                        self.sink,
                        &format!("Class '{}' not found on classpath", record.class_name),
                        &record.signature,
                    )?;
                }
                return Ok(());
            }
        };

        match record.member {
            Some(Member::Method(method)) => {
                let keys = resolver::matching_methods(&meta, &method);
                if keys.is_empty() {
                    policy.parse_failed(self.sink, "Method not found", &record.signature)?;
                    return Ok(());
                }
                for key in keys {
                    self.signatures.insert(key, printout.clone());
                }
            }
            Some(Member::Field(field)) => match resolver::matching_field(&meta, &field) {
                Some(key) => {
                    self.signatures.insert(key, printout);
                }
                None => {
                    policy.parse_failed(self.sink, "Field not found", &record.signature)?;
                }
            },
            None => {
                self.signatures
                    .insert(RegistryKey::class(meta.internal_name), printout);
            }
        }
        Ok(())
    }

    /// One capped warning pair listing classes skipped under SILENT.
    fn report_missing_classes(&self, missing: &BTreeSet<String>) {
        if missing.is_empty() || !self.config.log_missing_signatures {
            return;
        }
        self.sink.warn(
            "Some signatures were ignored because the following classes were not found on classpath:",
        );
        let mut list = String::new();
        let mut count = 0;
        for name in missing {
            list.push_str(if count == 0 { "  " } else { ", " });
            list.push_str(name);
            count += 1;
            if list.len() >= 70 {
                let remaining = missing.len() - count;
                if remaining > 0 {
                    list.push_str(&format!(",... (and {remaining} more)."));
                }
                break;
            }
        }
        self.sink.warn(&list);
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Looks up a class reference: exact key first, then the pattern rules in
    /// insertion order, first match wins. Accepts an object descriptor, an
    /// internal name or a dotted binary name; primitive and array references
    /// are never forbidden.
    pub fn check_type(&self, type_ref: &str) -> Option<Cow<'_, str>> {
        let internal = descriptor::class_internal_name(type_ref)?;
        if let Some(printout) = self.signatures.get(&RegistryKey::class(internal.as_str())) {
            return Some(Cow::Borrowed(printout.as_str()));
        }
        let binary = descriptor::binary_name(&internal);
        self.class_patterns
            .iter()
            .find(|rule| rule.matches(&binary))
            .map(|rule| Cow::Owned(rule.printout(&binary)))
    }

    /// Exact lookup of a method by internal class name, method name and
    /// parameter descriptors.
    pub fn check_method(&self, internal_class_name: &str, method: &MethodRef) -> Option<&str> {
        self.signatures
            .get(&RegistryKey::method(
                internal_class_name,
                method.name.as_str(),
                method.params.clone(),
            ))
            .map(String::as_str)
    }

    /// Exact lookup of a field by internal class name and field name.
    pub fn check_field(&self, internal_class_name: &str, field: &str) -> Option<&str> {
        self.signatures
            .get(&RegistryKey::field(internal_class_name, field))
            .map(String::as_str)
    }

    /// True iff the registry holds no entries, no patterns and the
    /// non-portable-runtime flag is unset.
    pub fn has_no_signatures(&self) -> bool {
        self.signatures.is_empty()
            && self.class_patterns.is_empty()
            && !self.forbid_non_portable_runtime
    }

    /// True iff the reserved `jdk-nonportable` catalog was included.
    pub fn is_non_portable_runtime_forbidden(&self) -> bool {
        self.forbid_non_portable_runtime
    }
}
