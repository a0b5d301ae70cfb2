//! Compiled path patterns.

use regex::Regex;

use crate::error::PatternError;
use crate::params::Params;
use crate::token::{tokenize, Modifier, Token};

/// Default capture for a parameter: one non-empty segment.
const SEGMENT: &str = "[^/]+?";

/// A parameter key declared by a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    name: String,
    modifier: Modifier,
}

impl Key {
    /// Returns the parameter name (numeric for anonymous captures).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parameter modifier.
    #[must_use]
    pub const fn modifier(&self) -> Modifier {
        self.modifier
    }
}

/// A path template compiled into an anchored matcher.
///
/// The matcher and its keys are computed once by [`PathPattern::compile`]
/// and never change afterwards.
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    regex: Regex,
    keys: Vec<Key>,
}

impl PathPattern {
    /// Compiles an Express-style template.
    ///
    /// # Example
    ///
    /// ```rust
    /// use folio_router::PathPattern;
    ///
    /// let pattern = PathPattern::compile("/:id(\\d+)").unwrap();
    /// assert!(pattern.is_match("/42"));
    /// assert!(!pattern.is_match("/forty-two"));
    /// ```
    pub fn compile(source: &str) -> Result<Self, PatternError> {
        let tokens = tokenize(source)?;
        let mut body = String::new();
        let mut keys: Vec<Key> = Vec::new();

        for token in tokens {
            match token {
                Token::Literal(text) => body.push_str(&regex::escape(&text)),
                Token::Param {
                    name,
                    capture,
                    modifier,
                    prefixed,
                } => {
                    if keys.iter().any(|k| k.name == name) {
                        return Err(PatternError::DuplicateParam {
                            pattern: source.to_string(),
                            name,
                        });
                    }
                    let group = format!("p{}", keys.len());
                    let capture = capture.as_deref().unwrap_or(SEGMENT);
                    let prefix = if prefixed { "/" } else { "" };
                    let fragment = match modifier {
                        Modifier::One => format!("{prefix}(?P<{group}>{capture})"),
                        Modifier::Optional => format!("(?:{prefix}(?P<{group}>{capture}))?"),
                        Modifier::OneOrMore => {
                            format!("{prefix}(?P<{group}>(?:{capture})(?:/(?:{capture}))*)")
                        }
                        Modifier::ZeroOrMore => {
                            format!("(?:{prefix}(?P<{group}>(?:{capture})(?:/(?:{capture}))*))?")
                        }
                    };
                    body.push_str(&fragment);
                    keys.push(Key { name, modifier });
                }
                Token::Wildcard { name } => {
                    let group = format!("p{}", keys.len());
                    body.push_str(&format!("(?P<{group}>.*)"));
                    keys.push(Key {
                        name,
                        modifier: Modifier::ZeroOrMore,
                    });
                }
            }
        }

        // Non-strict: tolerate one trailing slash.
        let tail = if body.ends_with('/') { "" } else { "(?:/)?" };
        let regex = Regex::new(&format!("(?i)^{body}{tail}$")).map_err(|source_err| {
            PatternError::InvalidRegex {
                pattern: source.to_string(),
                source: source_err,
            }
        })?;

        Ok(Self {
            source: source.to_string(),
            regex,
            keys,
        })
    }

    /// Returns the template this pattern was compiled from.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns the declared keys in template order.
    #[must_use]
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Returns true if `path` matches.
    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Matches `path` and extracts its parameters.
    ///
    /// Optional parameters that did not participate in the match are left
    /// out of the result. Values are returned exactly as they appear in the
    /// path, without percent-decoding.
    #[must_use]
    pub fn captures(&self, path: &str) -> Option<Params> {
        let caps = self.regex.captures(path)?;
        let mut params = Params::new();
        for (index, key) in self.keys.iter().enumerate() {
            if let Some(m) = caps.name(&format!("p{index}")) {
                params.push(key.name.clone(), m.as_str());
            }
        }
        Some(params)
    }
}

impl std::fmt::Display for PathPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}
