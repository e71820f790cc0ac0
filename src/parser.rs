//! Line grammar for signature files.
//!
//! ```text
//! line        := blank | comment | directive | signature
//! directive   := "@includeBundled " NAME | "@defaultMessage " TEXT | "@ignoreUnresolvable"
//! signature   := CLASS [ "#" MEMBER ] [ "@" MESSAGE ]
//! MEMBER      := FIELD_NAME | METHOD_NAME "(" PARAM_TYPES ")"
//! ```
//!
//! The message split is on the *last* unescaped `@` (`\@` spells a literal
//! `@`), the member split on the first `#`. Method parameter lists use Java
//! source-style type names and are lowered to JVM descriptors; the return
//! type never participates in matching.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, multispace0},
    combinator::{all_consuming, map, recognize},
    multi::{many0_count, separated_list0, separated_list1},
    sequence::{delimited, pair, preceded},
    IResult,
};

use crate::descriptor;
use crate::error::SignaturesError;

/// Directive line, already stripped of the leading `@`-marker syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Directive {
    IncludeBundled(String),
    /// `None` clears the current default message.
    DefaultMessage(Option<String>),
    IgnoreUnresolvable,
}

/// A method reference by name and parameter-type descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodRef {
    pub name: String,
    pub params: Vec<String>,
}

impl MethodRef {
    pub fn new(name: impl Into<String>, params: Vec<String>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }
}

impl std::str::FromStr for MethodRef {
    type Err = SignaturesError;

    /// Parses `name(type, type)` with Java source-style parameter types.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_method_member(s)
    }
}

/// Member suffix of a signature (`Class#member`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Member {
    Field(String),
    Method(MethodRef),
}

/// One fully split signature line, message already resolved against the
/// contextual default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SignatureRecord {
    /// Unescaped signature text without the message part; used verbatim in
    /// printouts and diagnostics.
    pub signature: String,
    pub class_name: String,
    pub member: Option<Member>,
    pub message: Option<String>,
}

/// Recognizes and splits a `@`-marker line. The caller guarantees the line
/// is trimmed and starts with `@`.
pub(crate) fn parse_directive(line: &str) -> Result<Directive, SignaturesError> {
    if let Some(rest) = line.strip_prefix("@includeBundled ") {
        return Ok(Directive::IncludeBundled(rest.trim().to_string()));
    }
    if let Some(rest) = line.strip_prefix("@defaultMessage") {
        if rest.is_empty() {
            return Ok(Directive::DefaultMessage(None));
        }
        if rest.starts_with(char::is_whitespace) {
            let text = rest.trim();
            return Ok(Directive::DefaultMessage(if text.is_empty() {
                None
            } else {
                Some(text.to_string())
            }));
        }
    }
    if line == "@ignoreUnresolvable" {
        return Ok(Directive::IgnoreUnresolvable);
    }
    Err(SignaturesError::InvalidLine(line.to_string()))
}

/// Splits one signature line into class, optional member and message.
///
/// `default_message` applies only when the line carries no `@` message
/// segment at all; an empty inline message removes any message.
pub(crate) fn parse_signature(
    line: &str,
    default_message: Option<&str>,
) -> Result<SignatureRecord, SignaturesError> {
    let (raw_signature, message) = match last_unescaped_at(line) {
        Some(pos) => {
            let inline = unescape_at(line[pos + 1..].trim());
            (&line[..pos], (!inline.is_empty()).then_some(inline))
        }
        None => (line, default_message.map(|m| m.to_string())),
    };
    let signature = unescape_at(raw_signature.trim());
    if signature.is_empty() {
        return Err(SignaturesError::EmptySignature);
    }

    let (class_name, member) = match signature.split_once('#') {
        Some((class, member_text)) => {
            let member = if member_text.contains('(') {
                if member_text.starts_with('(') {
                    return Err(SignaturesError::MethodNameMissing(signature));
                }
                Member::Method(
                    parse_method_member(member_text)
                        .map_err(|_| SignaturesError::InvalidMethodSignature(signature.clone()))?,
                )
            } else {
                Member::Field(member_text.to_string())
            };
            (class.to_string(), Some(member))
        }
        None => (signature.clone(), None),
    };

    Ok(SignatureRecord {
        signature,
        class_name,
        member,
        message,
    })
}

/// Index of the last `@` not preceded by a backslash.
fn last_unescaped_at(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    (0..bytes.len())
        .rev()
        .find(|&i| bytes[i] == b'@' && (i == 0 || bytes[i - 1] != b'\\'))
}

fn unescape_at(text: &str) -> String {
    text.replace("\\@", "@")
}

// ---------------------------------------------------------------------------
// Method member grammar (nom)
// ---------------------------------------------------------------------------

fn parse_method_member(input: &str) -> Result<MethodRef, SignaturesError> {
    match all_consuming(method_member)(input.trim()) {
        Ok((_, m)) => Ok(m),
        Err(_) => Err(SignaturesError::InvalidMethodSignature(input.to_string())),
    }
}

fn method_member(input: &str) -> IResult<&str, MethodRef> {
    map(
        pair(
            method_name,
            delimited(
                preceded(multispace0, char('(')),
                delimited(multispace0, param_list, multispace0),
                char(')'),
            ),
        ),
        |(name, params)| MethodRef::new(name, params),
    )(input)
}

fn method_name(input: &str) -> IResult<&str, &str> {
    alt((tag("<init>"), tag("<clinit>"), identifier))(input)
}

fn param_list(input: &str) -> IResult<&str, Vec<String>> {
    separated_list0(delimited(multispace0, char(','), multispace0), type_name)(input)
}

/// Java source-style type: dotted reference or primitive name, with any
/// number of trailing `[]` pairs.
fn type_name(input: &str) -> IResult<&str, String> {
    map(
        pair(
            recognize(separated_list1(char('.'), identifier)),
            many0_count(preceded(multispace0, tag("[]"))),
        ),
        |(base, dims)| descriptor::descriptor_for(base, dims),
    )(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '$')(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sig(line: &str) -> SignatureRecord {
        parse_signature(line, None).unwrap()
    }

    #[test]
    fn class_only_signature() {
        let r = sig("java.lang.Thread");
        assert_eq!(r.class_name, "java.lang.Thread");
        assert_eq!(r.member, None);
        assert_eq!(r.message, None);
        assert_eq!(r.signature, "java.lang.Thread");
    }

    #[test]
    fn field_signature() {
        let r = sig("java.lang.System#out");
        assert_eq!(r.class_name, "java.lang.System");
        assert_eq!(r.member, Some(Member::Field("out".to_string())));
    }

    #[test]
    fn method_signature_with_parameters() {
        let r = sig("java.lang.String#format(java.util.Locale, java.lang.Object[])");
        let Some(Member::Method(m)) = r.member else {
            panic!("expected method member");
        };
        assert_eq!(m.name, "format");
        assert_eq!(
            m.params,
            vec![
                "Ljava/util/Locale;".to_string(),
                "[Ljava/lang/Object;".to_string()
            ]
        );
    }

    #[test]
    fn method_signature_with_primitives_and_constructor() {
        let r = sig("java.lang.String#<init>(byte[], int)");
        let Some(Member::Method(m)) = r.member else {
            panic!("expected method member");
        };
        assert_eq!(m.name, "<init>");
        assert_eq!(m.params, vec!["[B".to_string(), "I".to_string()]);
    }

    #[test]
    fn inline_message_overrides_default() {
        let r = parse_signature("x.Y#f() @ use Z instead", Some("default")).unwrap();
        assert_eq!(r.message.as_deref(), Some("use Z instead"));
        assert_eq!(r.signature, "x.Y#f()");
    }

    #[test]
    fn empty_inline_message_suppresses_default() {
        let r = parse_signature("x.Y@", Some("default")).unwrap();
        assert_eq!(r.message, None);
    }

    #[test]
    fn default_message_applies_without_inline_message() {
        let r = parse_signature("x.Y", Some("default")).unwrap();
        assert_eq!(r.message.as_deref(), Some("default"));
    }

    #[test]
    fn message_split_uses_last_unescaped_at() {
        let r = sig(r"x.Ya@first @ second");
        assert_eq!(r.signature, "x.Ya@first");
        assert_eq!(r.message.as_deref(), Some("second"));

        let r = sig(r"x\@y.Z@msg");
        assert_eq!(r.class_name, "x@y.Z");
        assert_eq!(r.message.as_deref(), Some("msg"));
    }

    #[test]
    fn escaped_at_in_message_is_unescaped() {
        let r = sig(r"x.Y@mail \@dev about this");
        assert_eq!(r.signature, "x.Y");
        assert_eq!(r.message.as_deref(), Some("mail @dev about this"));
    }

    #[test]
    fn method_name_missing() {
        assert!(matches!(
            parse_signature("x.Y#(int)", None),
            Err(SignaturesError::MethodNameMissing(_))
        ));
    }

    #[test]
    fn malformed_method_member() {
        assert!(matches!(
            parse_signature("x.Y#f(int", None),
            Err(SignaturesError::InvalidMethodSignature(_))
        ));
        assert!(matches!(
            parse_signature("x.Y#f()junk", None),
            Err(SignaturesError::InvalidMethodSignature(_))
        ));
    }

    #[test]
    fn empty_signature_is_rejected() {
        assert!(matches!(
            parse_signature("@only a message", None),
            Err(SignaturesError::EmptySignature)
        ));
    }

    #[test]
    fn directives() {
        assert_eq!(
            parse_directive("@includeBundled jdk-unsafe-8").unwrap(),
            Directive::IncludeBundled("jdk-unsafe-8".to_string())
        );
        assert_eq!(
            parse_directive("@defaultMessage use the replacement").unwrap(),
            Directive::DefaultMessage(Some("use the replacement".to_string()))
        );
        assert_eq!(
            parse_directive("@defaultMessage").unwrap(),
            Directive::DefaultMessage(None)
        );
        assert_eq!(
            parse_directive("@ignoreUnresolvable").unwrap(),
            Directive::IgnoreUnresolvable
        );
        assert!(matches!(
            parse_directive("@bogusDirective"),
            Err(SignaturesError::InvalidLine(_))
        ));
    }

    #[test]
    fn method_ref_from_str() {
        let m: MethodRef = "length()".parse().unwrap();
        assert_eq!(m, MethodRef::new("length", vec![]));
    }
}
