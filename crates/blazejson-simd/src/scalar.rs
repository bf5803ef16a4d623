//! Scalar JSON minification kernel
//!
//! Byte-at-a-time state machine that drops ASCII whitespace outside string
//! literals and copies everything else unchanged. This is the correctness
//! baseline: every SIMD kernel must produce byte-identical output.

use thiserror::Error;

/// Output slice exhausted before the input was fully consumed.
///
/// Callers avoid this entirely by sizing the output to at least the input
/// length; minification never expands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("output buffer too small: need at least {needed} bytes, have {available}")]
pub struct BufferTooSmall {
    pub needed: usize,
    pub available: usize,
}

/// Minify `input` into `output`, returning the number of bytes written.
///
/// State machine: `in_string` tracks whether the cursor is inside a string
/// literal, `escape_active` whether the previous byte was an unescaped
/// backslash inside one. Bytes inside strings are copied verbatim,
/// including whitespace; space/tab/CR/LF outside strings are dropped.
pub fn minify_scalar(input: &[u8], output: &mut [u8]) -> Result<usize, BufferTooSmall> {
    let mut written = 0usize;
    let mut in_string = false;
    let mut escape_active = false;

    for &byte in input {
        let keep = if escape_active {
            escape_active = false;
            true
        } else if in_string {
            match byte {
                b'\\' => escape_active = true,
                b'"' => in_string = false,
                _ => {}
            }
            true
        } else {
            match byte {
                b'"' => {
                    in_string = true;
                    true
                }
                b' ' | b'\t' | b'\n' | b'\r' => false,
                _ => true,
            }
        };

        if keep {
            if written == output.len() {
                return Err(BufferTooSmall {
                    needed: input.len(),
                    available: output.len(),
                });
            }
            output[written] = byte;
            written += 1;
        }
    }

    Ok(written)
}

/// Copy bytes starting at a structural character (`"` or `\`) until the
/// cursor is back outside any string literal.
///
/// Used by the SIMD kernels to hand off string and escape content: lane
/// processing resumes at the returned input offset, which is guaranteed to
/// be at in-string/escape state zero. Bytes covered by the span are copied
/// unchanged, so in-string whitespace survives.
pub(crate) fn copy_structural_span(
    input: &[u8],
    start: usize,
    output: &mut [u8],
    written: &mut usize,
) -> Result<usize, BufferTooSmall> {
    let mut in_string = false;
    let mut escape_active = false;
    let mut i = start;

    while i < input.len() {
        let byte = input[i];
        if *written == output.len() {
            return Err(BufferTooSmall {
                needed: input.len(),
                available: output.len(),
            });
        }
        output[*written] = byte;
        *written += 1;

        if escape_active {
            escape_active = false;
        } else if in_string {
            match byte {
                b'\\' => escape_active = true,
                b'"' => in_string = false,
                _ => {}
            }
        } else if byte == b'"' {
            in_string = true;
        }

        i += 1;
        if !in_string && !escape_active {
            break;
        }
    }

    Ok(i)
}
