//! Text patterns and whitespace normalization.

use regex::{Regex, RegexBuilder};
use std::fmt;

use crate::result::{QueryError, QueryResult};

/// Trim and collapse every whitespace run to a single space.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A pattern matched against normalized text
#[derive(Debug, Clone)]
pub enum TextMatch {
    /// Whole-string, case-sensitive equality
    Exact(String),
    /// Substring match
    Partial {
        /// Needle
        text: String,
        /// Compare case-insensitively
        ignore_case: bool,
    },
    /// Regular expression, searched anywhere in the text
    Regex {
        /// Pattern as written, e.g. `/terms and conditions/i`
        source: String,
        /// Compiled expression
        regex: Regex,
    },
}

impl TextMatch {
    /// Exact match
    #[must_use]
    pub fn exact(text: impl Into<String>) -> Self {
        Self::Exact(text.into())
    }

    /// Case-sensitive substring match
    #[must_use]
    pub fn partial(text: impl Into<String>) -> Self {
        Self::Partial {
            text: text.into(),
            ignore_case: false,
        }
    }

    /// Case-insensitive substring match
    #[must_use]
    pub fn partial_ignore_case(text: impl Into<String>) -> Self {
        Self::Partial {
            text: text.into(),
            ignore_case: true,
        }
    }

    /// Compile a regular expression.
    ///
    /// Accepts either a bare pattern (`terms.*conditions`) or a literal with
    /// flags (`/terms and conditions/i`). Supported flags are `i`, `m` and
    /// `s`; `g`, `u` and `y` are accepted and have no effect.
    pub fn regex(source: impl Into<String>) -> QueryResult<Self> {
        let source = source.into();
        let (body, flags) = split_literal(&source);

        let mut builder = RegexBuilder::new(body);
        for flag in flags.chars() {
            match flag {
                'i' => {
                    builder.case_insensitive(true);
                }
                'm' => {
                    builder.multi_line(true);
                }
                's' => {
                    builder.dot_matches_new_line(true);
                }
                'g' | 'u' | 'y' => {}
                other => {
                    return Err(QueryError::invalid_pattern(
                        &source,
                        format!("unsupported flag '{other}'"),
                    ))
                }
            }
        }

        let regex = builder
            .build()
            .map_err(|e| QueryError::invalid_pattern(&source, e.to_string()))?;
        Ok(Self::Regex { source, regex })
    }

    /// Test already-normalized text against this pattern
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Self::Exact(expected) => text == expected,
            Self::Partial {
                text: needle,
                ignore_case: false,
            } => text.contains(needle.as_str()),
            Self::Partial {
                text: needle,
                ignore_case: true,
            } => text.to_lowercase().contains(&needle.to_lowercase()),
            Self::Regex { regex, .. } => regex.is_match(text),
        }
    }
}

/// Split `/body/flags` into its parts; anything else is a bare body.
fn split_literal(source: &str) -> (&str, &str) {
    if let Some(rest) = source.strip_prefix('/') {
        if let Some(end) = rest.rfind('/') {
            return (&rest[..end], &rest[end + 1..]);
        }
    }
    (source, "")
}

impl PartialEq for TextMatch {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Exact(a), Self::Exact(b)) => a == b,
            (
                Self::Partial {
                    text: a,
                    ignore_case: ia,
                },
                Self::Partial {
                    text: b,
                    ignore_case: ib,
                },
            ) => a == b && ia == ib,
            (Self::Regex { source: a, .. }, Self::Regex { source: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl Eq for TextMatch {}

impl From<&str> for TextMatch {
    fn from(text: &str) -> Self {
        Self::Exact(text.to_string())
    }
}

impl From<String> for TextMatch {
    fn from(text: String) -> Self {
        Self::Exact(text)
    }
}

impl From<&String> for TextMatch {
    fn from(text: &String) -> Self {
        Self::Exact(text.clone())
    }
}

impl From<&Self> for TextMatch {
    fn from(pattern: &Self) -> Self {
        pattern.clone()
    }
}

impl fmt::Display for TextMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(text) => write!(f, "{text:?}"),
            Self::Partial {
                text,
                ignore_case: false,
            } => write!(f, "containing {text:?}"),
            Self::Partial {
                text,
                ignore_case: true,
            } => write!(f, "containing {text:?} (ignoring case)"),
            Self::Regex { source, .. } if source.starts_with('/') => f.write_str(source),
            Self::Regex { source, .. } => write!(f, "/{source}/"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod normalize_tests {
        use super::*;

        #[test]
        fn test_collapses_and_trims() {
            assert_eq!(
                normalize("  I agree to the terms and\n      conditions "),
                "I agree to the terms and conditions"
            );
        }

        #[test]
        fn test_empty_and_blank() {
            assert_eq!(normalize(""), "");
            assert_eq!(normalize(" \t\n "), "");
        }
    }

    mod matching_tests {
        use super::*;

        #[test]
        fn test_exact_is_case_sensitive_whole_string() {
            let m = TextMatch::exact("Hello");
            assert!(m.matches("Hello"));
            assert!(!m.matches("hello"));
            assert!(!m.matches("Hello Manish"));
        }

        #[test]
        fn test_partial() {
            assert!(TextMatch::partial("terms").matches("the terms and conditions"));
            assert!(!TextMatch::partial("Terms").matches("the terms and conditions"));
            assert!(TextMatch::partial_ignore_case("TERMS").matches("the terms"));
        }

        #[test]
        fn test_regex_literal_with_flag() {
            let m = TextMatch::regex("/terms and conditions/i").unwrap();
            assert!(m.matches("I agree to the Terms and Conditions"));
        }

        #[test]
        fn test_regex_bare_pattern_is_case_sensitive() {
            let m = TextMatch::regex(r"^Hello \w+$").unwrap();
            assert!(m.matches("Hello Manish"));
            assert!(!m.matches("hello Manish"));
        }

        #[test]
        fn test_ignored_flags_are_accepted() {
            assert!(TextMatch::regex("/a/gu").is_ok());
        }

        #[test]
        fn test_unknown_flag_is_invalid() {
            let err = TextMatch::regex("/a/q").unwrap_err();
            assert!(matches!(err, QueryError::InvalidPattern { .. }));
        }

        #[test]
        fn test_malformed_regex_is_invalid() {
            let err = TextMatch::regex("/(unclosed/").unwrap_err();
            match err {
                QueryError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "/(unclosed/"),
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    mod display_tests {
        use super::*;

        #[test]
        fn test_display_forms() {
            assert_eq!(TextMatch::exact("Name").to_string(), "\"Name\"");
            assert_eq!(
                TextMatch::regex("/terms/i").unwrap().to_string(),
                "/terms/i"
            );
            assert_eq!(TextMatch::regex("terms").unwrap().to_string(), "/terms/");
        }

        #[test]
        fn test_equality_uses_source() {
            assert_eq!(
                TextMatch::regex("/a/i").unwrap(),
                TextMatch::regex("/a/i").unwrap()
            );
            assert_ne!(TextMatch::regex("/a/i").unwrap(), TextMatch::regex("/a/").unwrap());
            assert_ne!(TextMatch::exact("a"), TextMatch::partial("a"));
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_normalize_is_idempotent(s in "[ a-zA-Z\t\n]{0,40}") {
                let once = normalize(&s);
                prop_assert_eq!(normalize(&once), once.clone());
                prop_assert!(!once.starts_with(' '));
                prop_assert!(!once.ends_with(' '));
                prop_assert!(!once.contains("  "));
            }

            #[test]
            fn prop_exact_matches_itself(s in "[a-zA-Z ]{1,20}") {
                let text = normalize(&s);
                prop_assert!(TextMatch::exact(text.clone()).matches(&text));
                prop_assert!(TextMatch::partial_ignore_case(text.to_uppercase()).matches(&text));
            }
        }
    }
}
