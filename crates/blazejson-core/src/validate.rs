//! Structural validation
//!
//! A separate pass checking the structural shape the minifier relies on:
//! strings terminate, escapes are paired, and brackets balance and match.
//! This is not a full grammar validator; token-level syntax (numbers,
//! literals, value placement) is out of scope. The minify path never
//! calls this; callers opt in when they want the check.

use thiserror::Error;

/// Structural defects reported by [`validate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidateError {
    #[error("unterminated string starting at byte {opened_at}")]
    UnterminatedString { opened_at: usize },

    #[error("escape at byte {offset} has nothing to escape")]
    DanglingEscape { offset: usize },

    #[error("closing '{found}' at byte {offset} without a matching opener")]
    UnexpectedClose { offset: usize, found: char },

    #[error("closing '{found}' at byte {offset}, expected '{expected}'")]
    MismatchedClose {
        offset: usize,
        expected: char,
        found: char,
    },

    #[error("bracket opened at byte {opened_at} is never closed")]
    UnclosedBracket { opened_at: usize },
}

/// Check the structural shape of a JSON document.
pub fn validate(input: &[u8]) -> Result<(), ValidateError> {
    let mut stack: Vec<(u8, usize)> = Vec::new();
    let mut in_string = false;
    let mut string_start = 0usize;
    let mut escape_active = false;

    for (i, &byte) in input.iter().enumerate() {
        if escape_active {
            escape_active = false;
            continue;
        }
        if in_string {
            match byte {
                b'\\' => escape_active = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => {
                in_string = true;
                string_start = i;
            }
            b'{' | b'[' => stack.push((byte, i)),
            b'}' | b']' => {
                let expected_open = if byte == b'}' { b'{' } else { b'[' };
                match stack.pop() {
                    None => {
                        return Err(ValidateError::UnexpectedClose {
                            offset: i,
                            found: byte as char,
                        })
                    }
                    Some((open, _)) if open != expected_open => {
                        let expected = if open == b'{' { '}' } else { ']' };
                        return Err(ValidateError::MismatchedClose {
                            offset: i,
                            expected,
                            found: byte as char,
                        });
                    }
                    Some(_) => {}
                }
            }
            _ => {}
        }
    }

    if escape_active {
        return Err(ValidateError::DanglingEscape {
            offset: input.len() - 1,
        });
    }
    if in_string {
        return Err(ValidateError::UnterminatedString {
            opened_at: string_start,
        });
    }
    if let Some(&(_, opened_at)) = stack.last() {
        return Err(ValidateError::UnclosedBracket { opened_at });
    }

    Ok(())
}
