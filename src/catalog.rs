//! Bundled-catalog naming and storage.
//!
//! Bundled catalogs are named, version-aware signature collections addressed
//! through a `CatalogStore`. Version spellings are normalized so equivalent
//! names (`jdk-unsafe-8`, `jdk-unsafe-1.8`) resolve to one resource identity.

use std::collections::HashMap;
use std::io::{Cursor, Read};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::SignaturesError;

/// Reserved catalog name enabling the non-portable-runtime heuristics.
/// It has no backing resource; including it only flips a registry flag.
pub const NONPORTABLE_CATALOG: &str = "jdk-nonportable";

static CATALOG_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9.\-]+$").expect("static regex"));

static JDK_VERSIONED_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(jdk\-.*?\-)(\d+)(\.\d+)?(\.\d+)*$").expect("static regex"));

static VERSION_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\-\d+(\.\d+)*$").expect("static regex"));

/// Catalog resource collaborator: `open` yields the catalog text for a
/// normalized name, or `None` when the store has no such catalog.
pub trait CatalogStore {
    fn open(&self, name: &str) -> Option<Box<dyn Read + '_>>;
}

/// In-memory store, keyed by normalized catalog name.
#[derive(Debug, Default)]
pub struct StaticCatalogStore {
    catalogs: HashMap<String, String>,
}

impl StaticCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(mut self, name: &str, text: &str) -> Self {
        self.catalogs.insert(name.to_string(), text.to_string());
        self
    }
}

impl CatalogStore for StaticCatalogStore {
    fn open(&self, name: &str) -> Option<Box<dyn Read + '_>> {
        self.catalogs
            .get(name)
            .map(|text| Box::new(Cursor::new(text.as_bytes())) as Box<dyn Read + '_>)
    }
}

/// True if `name` stays within the restricted catalog-name character set.
pub(crate) fn is_valid_catalog_name(name: &str) -> bool {
    CATALOG_NAME.is_match(name)
}

/// True if the name already ends in a version token like `-9` or `-1.8`.
pub(crate) fn has_version_suffix(name: &str) -> bool {
    VERSION_SUFFIX.is_match(name)
}

/// Canonicalizes the JDK version token of a `jdk-*-<version>` catalog name.
///
/// Major versions 1 through 8 collapse to the legacy `1.x` spelling; 9 and
/// later use the bare major, keeping a nonzero minor. Names without a
/// recognizable version token pass through unchanged; a token with extra
/// components or an impossible major/minor combination is an error. The
/// transform is idempotent.
pub(crate) fn fix_target_version(name: &str) -> Result<String, SignaturesError> {
    let Some(caps) = JDK_VERSIONED_NAME.captures(name) else {
        return Ok(name.to_string());
    };
    if caps.get(4).is_none() {
        let prefix = &caps[1];
        let invalid = || SignaturesError::InvalidJdkVersion(name.to_string());
        let major: u32 = caps[2].parse().map_err(|_| invalid())?;
        let minor: u32 = match caps.get(3) {
            Some(m) => m.as_str()[1..].parse().map_err(|_| invalid())?,
            None => 0,
        };
        if major == 1 && (1..9).contains(&minor) {
            return Ok(format!("{prefix}1.{minor}"));
        } else if (2..9).contains(&major) && minor == 0 {
            return Ok(format!("{prefix}1.{major}"));
        } else if major >= 9 && minor > 0 {
            return Ok(format!("{prefix}{major}.{minor}"));
        } else if major >= 9 {
            return Ok(format!("{prefix}{major}"));
        }
    }
    Err(SignaturesError::InvalidJdkVersion(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn legacy_versions_collapse_to_one_x() {
        assert_eq!(fix_target_version("jdk-unsafe-8").unwrap(), "jdk-unsafe-1.8");
        assert_eq!(
            fix_target_version("jdk-unsafe-1.8").unwrap(),
            "jdk-unsafe-1.8"
        );
        assert_eq!(
            fix_target_version("jdk-deprecated-1.1").unwrap(),
            "jdk-deprecated-1.1"
        );
    }

    #[test]
    fn modern_versions_use_bare_major() {
        assert_eq!(fix_target_version("jdk-unsafe-9").unwrap(), "jdk-unsafe-9");
        assert_eq!(
            fix_target_version("jdk-unsafe-9.0").unwrap(),
            "jdk-unsafe-9"
        );
        assert_eq!(
            fix_target_version("jdk-unsafe-11.2").unwrap(),
            "jdk-unsafe-11.2"
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        for name in ["jdk-unsafe-9", "jdk-unsafe-1.8", "jdk-system-out"] {
            let once = fix_target_version(name).unwrap();
            assert_eq!(fix_target_version(&once).unwrap(), once);
        }
    }

    #[test]
    fn invalid_version_tokens_are_rejected() {
        assert!(matches!(
            fix_target_version("jdk-unsafe-1.0"),
            Err(SignaturesError::InvalidJdkVersion(_))
        ));
        assert!(matches!(
            fix_target_version("jdk-unsafe-1"),
            Err(SignaturesError::InvalidJdkVersion(_))
        ));
        assert!(matches!(
            fix_target_version("jdk-unsafe-7.1"),
            Err(SignaturesError::InvalidJdkVersion(_))
        ));
        assert!(matches!(
            fix_target_version("jdk-unsafe-9.0.1"),
            Err(SignaturesError::InvalidJdkVersion(_))
        ));
    }

    #[test]
    fn unversioned_names_pass_through() {
        assert_eq!(
            fix_target_version("commons-io-unsafe-2.5").unwrap(),
            "commons-io-unsafe-2.5"
        );
        assert!(!has_version_suffix("jdk-unsafe"));
        assert!(has_version_suffix("jdk-unsafe-1.8"));
    }

    #[test]
    fn name_charset() {
        assert!(is_valid_catalog_name("jdk-unsafe-1.8"));
        assert!(!is_valid_catalog_name("jdk unsafe"));
        assert!(!is_valid_catalog_name("../etc/passwd"));
    }
}
