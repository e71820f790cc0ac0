//! JVM type-descriptor and class-name helpers.
//!
//! Signature files spell types the Java-source way (`java.lang.String`,
//! `int`, `byte[]`); the index keys and scanner queries use JVM descriptors
//! (`Ljava/lang/String;`, `I`, `[B`). This module converts between the two
//! and hosts the glob syntax used by class-level pattern rules.

use crate::error::SignaturesError;

/// Converts a Java source-style type name (dotted, optional trailing `[]`
/// pairs already stripped by the caller into `dims`) to a JVM descriptor.
pub(crate) fn descriptor_for(base: &str, dims: usize) -> String {
    let elem = match base {
        "void" => "V".to_string(),
        "boolean" => "Z".to_string(),
        "byte" => "B".to_string(),
        "char" => "C".to_string(),
        "short" => "S".to_string(),
        "int" => "I".to_string(),
        "long" => "J".to_string(),
        "float" => "F".to_string(),
        "double" => "D".to_string(),
        name => format!("L{};", name.replace('.', "/")),
    };
    let mut out = String::with_capacity(dims + elem.len());
    for _ in 0..dims {
        out.push('[');
    }
    out.push_str(&elem);
    out
}

/// Canonical slash-separated form of a class name in any spelling.
pub(crate) fn internal_name(name: &str) -> String {
    name.replace('.', "/")
}

/// Dotted binary form, used for pattern matching and pattern printouts.
pub(crate) fn binary_name(internal: &str) -> String {
    internal.replace('/', ".")
}

/// Extracts the internal class name from a scanner-side type reference.
///
/// Accepts an object descriptor (`Lfoo/Bar;`), an internal name, or a dotted
/// binary name. Primitive and array types return `None`; the scanner passes
/// them through unflagged.
pub(crate) fn class_internal_name(type_ref: &str) -> Option<String> {
    if type_ref.starts_with('[') {
        return None;
    }
    if let Some(inner) = type_ref.strip_prefix('L').and_then(|s| s.strip_suffix(';')) {
        return Some(internal_name(inner));
    }
    if type_ref.len() == 1 && "VZBCSIJFD".contains(type_ref) {
        return None;
    }
    if type_ref.is_empty() {
        return None;
    }
    Some(internal_name(type_ref))
}

/// True if the class part of a signature is a pattern rather than a name.
pub(crate) fn is_glob(class_name: &str) -> bool {
    class_name.contains('*') || class_name.contains('?')
}

/// Compiles a class glob to an anchored regex over slash-separated names.
///
/// Dialect: `**` matches any run of characters, `*` any run without the
/// package separator, `?` one non-separator character. Both `.` and `/` in
/// the pattern are treated as the separator.
pub(crate) fn glob_to_regex(glob: &str) -> Result<regex::Regex, SignaturesError> {
    let canonical = internal_name(glob);
    let mut pattern = String::with_capacity(canonical.len() + 8);
    pattern.push('^');
    let mut chars = canonical.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    pattern.push_str(".*");
                } else {
                    pattern.push_str("[^/]*");
                }
            }
            '?' => pattern.push_str("[^/]"),
            c => {
                if regex_syntax_char(c) {
                    pattern.push('\\');
                }
                pattern.push(c);
            }
        }
    }
    pattern.push('$');
    regex::Regex::new(&pattern).map_err(|_| SignaturesError::InvalidGlob(glob.to_string()))
}

fn regex_syntax_char(c: char) -> bool {
    matches!(
        c,
        '.' | '^' | '$' | '+' | '{' | '}' | '[' | ']' | '|' | '(' | ')' | '\\'
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn primitive_and_reference_descriptors() {
        assert_eq!(descriptor_for("int", 0), "I");
        assert_eq!(descriptor_for("byte", 1), "[B");
        assert_eq!(descriptor_for("java.lang.String", 0), "Ljava/lang/String;");
        assert_eq!(
            descriptor_for("java.lang.Object", 2),
            "[[Ljava/lang/Object;"
        );
    }

    #[test]
    fn class_references_in_any_spelling() {
        assert_eq!(
            class_internal_name("Ljava/lang/String;").as_deref(),
            Some("java/lang/String")
        );
        assert_eq!(
            class_internal_name("java.lang.String").as_deref(),
            Some("java/lang/String")
        );
        assert_eq!(
            class_internal_name("java/lang/String").as_deref(),
            Some("java/lang/String")
        );
        assert_eq!(class_internal_name("I"), None);
        assert_eq!(class_internal_name("[Ljava/lang/String;"), None);
    }

    #[test]
    fn glob_dialect() {
        let single = glob_to_regex("java.util.*").unwrap();
        assert!(single.is_match("java/util/ArrayList"));
        assert!(!single.is_match("java/util/concurrent/Future"));

        let double = glob_to_regex("sun.**").unwrap();
        assert!(double.is_match("sun/misc/Unsafe"));

        let question = glob_to_regex("x.A?").unwrap();
        assert!(question.is_match("x/Ab"));
        assert!(!question.is_match("x/A/"));
    }

    #[test]
    fn glob_escapes_regex_metacharacters() {
        let r = glob_to_regex("a.b$C*").unwrap();
        assert!(r.is_match("a/b$Cxx"));
        assert!(!r.is_match("a/bXC"));
    }
}
