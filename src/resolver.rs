//! Pure member matching against resolved class metadata.
//!
//! Stateless helpers: the registry decides policy, this module only answers
//! which registry keys a member reference maps to.

use crate::metadata::ClassMetadata;
use crate::parser::MethodRef;
use crate::registry::RegistryKey;

/// Every method of `meta` whose name and parameter descriptors match `m`.
///
/// Deliberately does not stop at the first match: covariant overrides and
/// bridge methods appear as multiple declared methods with the same name and
/// parameter types, and each one must be keyed and disallowed.
pub(crate) fn matching_methods(meta: &ClassMetadata, m: &MethodRef) -> Vec<RegistryKey> {
    meta.methods
        .iter()
        .filter(|cand| cand.name == m.name && cand.params == m.params)
        .map(|cand| {
            RegistryKey::method(
                meta.internal_name.clone(),
                cand.name.clone(),
                cand.params.clone(),
            )
        })
        .collect()
}

/// Key for a field reference, or `None` when the class has no such field.
pub(crate) fn matching_field(meta: &ClassMetadata, field: &str) -> Option<RegistryKey> {
    meta.fields
        .contains(field)
        .then(|| RegistryKey::field(meta.internal_name.clone(), field.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fixture() -> ClassMetadata {
        ClassMetadata::new("java/lang/StringBuilder")
            .with_method("append", &["Ljava/lang/String;"])
            .with_method("append", &["I"])
            // covariant override pair: same name and params, declared twice
            .with_method("reverse", &[])
            .with_method("reverse", &[])
            .with_field("count")
    }

    #[test]
    fn one_key_per_covariant_match() {
        let meta = fixture();
        let keys = matching_methods(&meta, &MethodRef::new("reverse", vec![]));
        assert_eq!(keys.len(), 2);

        let keys = matching_methods(&meta, &MethodRef::new("append", vec!["I".to_string()]));
        assert_eq!(keys.len(), 1);
    }

    #[test]
    fn no_match_for_wrong_parameters() {
        let meta = fixture();
        let keys = matching_methods(&meta, &MethodRef::new("append", vec!["J".to_string()]));
        assert!(keys.is_empty());
    }

    #[test]
    fn field_membership() {
        let meta = fixture();
        assert!(matching_field(&meta, "count").is_some());
        assert!(matching_field(&meta, "missing").is_none());
    }
}
