//! Whitespace-insensitive comparison with identifier placeholders
//!
//! Expected texts may spell an identifier as `_name_`. The placeholder matches
//! the longest alphanumeric run at that point of the translation and binds
//! `name` to it; every later `_name_` must then see the same identifier, and no
//! other placeholder may bind it. `__` matches any identifier without binding.
//! Whitespace is skipped on both sides, so layout differences never fail a
//! comparison.

use rustc_hash::FxHashMap;
use thiserror::Error;

/// Placeholder name → the identifier it matched
pub type Bindings = FxHashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Mismatch {
    #[error("Expected '{expected}' at line {line}, column {column}, found '{found}'")]
    Differs {
        expected: char,
        found: char,
        line: usize,
        column: usize,
    },

    #[error("Translation ends early; expected text continues at line {line}, column {column}")]
    MissingText { line: usize, column: usize },

    #[error("Translation continues past the end of the expected text with '{found}'")]
    ExtraText { found: char },

    #[error("Unterminated placeholder at line {line}, column {column}")]
    UnterminatedPlaceholder { line: usize, column: usize },

    #[error("Placeholder _{token}_ is bound to '{bound}' but matched '{found}'")]
    Rebound {
        token: String,
        bound: String,
        found: String,
    },

    #[error("Placeholders _{token}_ and _{other}_ both matched '{identifier}'")]
    Shared {
        token: String,
        other: String,
        identifier: String,
    },
}

/// True when `translated` matches `expected`
pub fn validate(translated: &str, expected: &str) -> bool {
    check(translated, expected).is_ok()
}

/// Match `translated` against `expected`, returning the placeholder bindings
pub fn check(translated: &str, expected: &str) -> Result<Bindings, Mismatch> {
    let translated: Vec<char> = translated.chars().collect();
    let expected: Vec<char> = expected.chars().collect();
    let mut bindings = Bindings::default();
    let (mut i, mut j) = (0, 0);

    loop {
        while i < translated.len() && translated[i].is_whitespace() {
            i += 1;
        }
        while j < expected.len() && expected[j].is_whitespace() {
            j += 1;
        }

        match (translated.get(i), expected.get(j)) {
            (None, None) => return Ok(bindings),
            (None, Some(_)) => {
                let (line, column) = position(&expected, j);
                return Err(Mismatch::MissingText { line, column });
            }
            (Some(&found), None) => return Err(Mismatch::ExtraText { found }),
            (Some(found), Some(wanted)) if found == wanted => {
                i += 1;
                j += 1;
            }
            (Some(_), Some('_')) => {
                let Some(close) = expected[j + 1..].iter().position(|&c| c == '_') else {
                    let (line, column) = position(&expected, j);
                    return Err(Mismatch::UnterminatedPlaceholder { line, column });
                };
                let token: String = expected[j + 1..j + 1 + close].iter().collect();
                j += close + 2;

                let start = i;
                while i < translated.len() && translated[i].is_alphanumeric() {
                    i += 1;
                }
                let identifier: String = translated[start..i].iter().collect();
                if !token.is_empty() {
                    bind(&mut bindings, token, identifier)?;
                }
            }
            (Some(&found), Some(&wanted)) => {
                let (line, column) = position(&expected, j);
                return Err(Mismatch::Differs {
                    expected: wanted,
                    found,
                    line,
                    column,
                });
            }
        }
    }
}

fn bind(bindings: &mut Bindings, token: String, identifier: String) -> Result<(), Mismatch> {
    if let Some(bound) = bindings.get(&token) {
        if *bound != identifier {
            return Err(Mismatch::Rebound {
                token,
                bound: bound.clone(),
                found: identifier,
            });
        }
        return Ok(());
    }

    if let Some((other, _)) = bindings.iter().find(|(_, bound)| **bound == identifier) {
        return Err(Mismatch::Shared {
            token,
            other: other.clone(),
            identifier,
        });
    }
    bindings.insert(token, identifier);
    Ok(())
}

/// 1-based line and column of a character index
fn position(text: &[char], index: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for &c in &text[..index.min(text.len())] {
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_is_ignored() {
        assert!(validate("int  X = 1;\n", "int X=1;"));
        assert!(validate("public static class Crate\n{\n}\n", "public static class Crate { }"));
        assert!(!validate("int X = 1;", "int X = 2;"));
    }

    #[test]
    fn test_placeholders_bind_consistently() {
        let bindings = check("var Temp0 = 3; return Temp0;", "var _t_ = 3; return _t_;").unwrap();
        assert_eq!(bindings.get("t").map(String::as_str), Some("Temp0"));

        let err = check("var Temp0 = 3; return Temp1;", "var _t_ = 3; return _t_;").unwrap_err();
        assert!(matches!(err, Mismatch::Rebound { ref bound, ref found, .. } if bound == "Temp0" && found == "Temp1"));
    }

    #[test]
    fn test_distinct_placeholders_need_distinct_identifiers() {
        assert!(validate("(A, B)", "(_x_, _y_)"));
        let err = check("(A, A)", "(_x_, _y_)").unwrap_err();
        assert!(matches!(err, Mismatch::Shared { ref token, ref other, .. } if token == "y" && other == "x"));
    }

    #[test]
    fn test_wildcard_placeholder() {
        assert!(validate("goto Temp3Break;", "goto __;"));
        assert!(validate("A + A", "__ + __"));
    }

    #[test]
    fn test_length_mismatches() {
        assert!(matches!(check("int X;", "int X; int Y;"), Err(Mismatch::MissingText { line: 1, column: 8 })));
        assert!(matches!(check("int X; int Y;", "int X;"), Err(Mismatch::ExtraText { found: 'i' })));
        assert!(matches!(
            check("X", "_x"),
            Err(Mismatch::UnterminatedPlaceholder { line: 1, column: 1 })
        ));
    }

    #[test]
    fn test_difference_position() {
        let err = check("a\nbc", "a\nbd").unwrap_err();
        assert_eq!(
            err,
            Mismatch::Differs {
                expected: 'd',
                found: 'c',
                line: 2,
                column: 2,
            }
        );
        assert_eq!(err.to_string(), "Expected 'd' at line 2, column 2, found 'c'");
    }
}
