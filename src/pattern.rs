//! Class-level glob pattern rules.

use std::hash::{Hash, Hasher};

use regex::Regex;

use crate::descriptor;
use crate::error::SignaturesError;

/// One forbidden-class pattern: original glob text, compiled matcher and the
/// optional message. Identity (for the ordered, duplicate-free rule set) is
/// the (glob, message) pair; the compiled matcher is derived state.
#[derive(Debug, Clone)]
pub(crate) struct ClassPatternRule {
    glob: String,
    matcher: Regex,
    message: Option<String>,
}

impl ClassPatternRule {
    pub fn new(glob: &str, message: Option<String>) -> Result<Self, SignaturesError> {
        Ok(Self {
            glob: glob.to_string(),
            matcher: descriptor::glob_to_regex(glob)?,
            message,
        })
    }

    /// Matches against a class name in any spelling (dotted or slashed).
    pub fn matches(&self, class_name: &str) -> bool {
        self.matcher.is_match(&descriptor::internal_name(class_name))
    }

    /// Display string for a matched class: the class name itself, message
    /// suffixed when present.
    pub fn printout(&self, class_name: &str) -> String {
        match &self.message {
            Some(msg) => format!("{class_name} [{msg}]"),
            None => class_name.to_string(),
        }
    }
}

impl PartialEq for ClassPatternRule {
    fn eq(&self, other: &Self) -> bool {
        self.glob == other.glob && self.message == other.message
    }
}

impl Eq for ClassPatternRule {}

impl Hash for ClassPatternRule {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.glob.hash(state);
        self.message.hash(state);
    }
}
