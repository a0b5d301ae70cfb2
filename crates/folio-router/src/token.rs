//! Tokenizer for Express-style path templates.

use crate::error::PatternError;

/// How many segments a parameter may consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    /// Exactly one segment (`:name`).
    One,
    /// Zero or one segment (`:name?`).
    Optional,
    /// Zero or more segments (`:name*`, bare `*`).
    ZeroOrMore,
    /// One or more segments (`:name+`).
    OneOrMore,
}

impl Modifier {
    /// Returns true if the parameter may be absent from a match.
    #[must_use]
    pub const fn is_optional(self) -> bool {
        matches!(self, Self::Optional | Self::ZeroOrMore)
    }

    /// Returns true if the parameter may span several segments.
    #[must_use]
    pub const fn is_repeated(self) -> bool {
        matches!(self, Self::ZeroOrMore | Self::OneOrMore)
    }
}

/// One piece of a tokenized template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// Text matched verbatim.
    Literal(String),
    /// A capturing parameter.
    Param {
        name: String,
        /// Custom capture, `None` for the default single-segment capture.
        capture: Option<String>,
        modifier: Modifier,
        /// Whether the parameter swallowed a leading `/`.
        prefixed: bool,
    },
    /// Bare `*`.
    Wildcard { name: String },
}

/// Splits `pattern` into literal and parameter tokens.
pub(crate) fn tokenize(pattern: &str) -> Result<Vec<Token>, PatternError> {
    let chars: Vec<(usize, char)> = pattern.char_indices().collect();
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut anonymous = 0usize;
    let mut i = 0;

    while i < chars.len() {
        let (offset, c) = chars[i];
        match c {
            '\\' => {
                if let Some(&(_, escaped)) = chars.get(i + 1) {
                    literal.push(escaped);
                    i += 2;
                } else {
                    literal.push('\\');
                    i += 1;
                }
            }
            ':' => {
                let mut j = i + 1;
                let mut name = String::new();
                while let Some(&(_, ch)) = chars.get(j) {
                    if ch.is_ascii_alphanumeric() || ch == '_' {
                        name.push(ch);
                        j += 1;
                    } else {
                        break;
                    }
                }
                if name.is_empty() {
                    return Err(PatternError::MissingParamName {
                        pattern: pattern.to_string(),
                        offset,
                    });
                }
                let (capture, j) = read_group(pattern, &chars, j)?;
                let (modifier, j) = read_modifier(&chars, j);
                let prefixed = flush_literal(&mut tokens, &mut literal);
                tokens.push(Token::Param {
                    name,
                    capture,
                    modifier,
                    prefixed,
                });
                i = j;
            }
            '(' => {
                let (capture, j) = read_group(pattern, &chars, i)?;
                let (modifier, j) = read_modifier(&chars, j);
                let prefixed = flush_literal(&mut tokens, &mut literal);
                tokens.push(Token::Param {
                    name: anonymous.to_string(),
                    capture,
                    modifier,
                    prefixed,
                });
                anonymous += 1;
                i = j;
            }
            ')' => {
                return Err(PatternError::UnbalancedGroup {
                    pattern: pattern.to_string(),
                });
            }
            '*' => {
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(Token::Wildcard {
                    name: anonymous.to_string(),
                });
                anonymous += 1;
                i += 1;
            }
            _ => {
                literal.push(c);
                i += 1;
            }
        }
    }

    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    Ok(tokens)
}

/// Pushes pending literal text, detaching a trailing `/` as the prefix of
/// the parameter that follows. Returns whether a prefix was detached.
fn flush_literal(tokens: &mut Vec<Token>, literal: &mut String) -> bool {
    let prefixed = literal.ends_with('/');
    if prefixed {
        literal.pop();
    }
    if !literal.is_empty() {
        tokens.push(Token::Literal(std::mem::take(literal)));
    }
    prefixed
}

/// Reads a parenthesized custom capture starting at `start`, if any.
fn read_group(
    pattern: &str,
    chars: &[(usize, char)],
    start: usize,
) -> Result<(Option<String>, usize), PatternError> {
    if !matches!(chars.get(start), Some(&(_, '('))) {
        return Ok((None, start));
    }

    let mut depth = 0usize;
    let mut group = String::new();
    let mut j = start;
    while let Some(&(_, ch)) = chars.get(j) {
        match ch {
            '\\' => {
                group.push(ch);
                if let Some(&(_, escaped)) = chars.get(j + 1) {
                    group.push(escaped);
                    j += 1;
                }
            }
            '(' => {
                if depth > 0 {
                    group.push(ch);
                }
                depth += 1;
            }
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((Some(group), j + 1));
                }
                group.push(ch);
            }
            _ => group.push(ch),
        }
        j += 1;
    }

    Err(PatternError::UnbalancedGroup {
        pattern: pattern.to_string(),
    })
}

fn read_modifier(chars: &[(usize, char)], at: usize) -> (Modifier, usize) {
    match chars.get(at) {
        Some(&(_, '?')) => (Modifier::Optional, at + 1),
        Some(&(_, '*')) => (Modifier::ZeroOrMore, at + 1),
        Some(&(_, '+')) => (Modifier::OneOrMore, at + 1),
        _ => (Modifier::One, at),
    }
}
