//! Single-pass input analysis
//!
//! One linear scan computing the byte-level shape of an input document.
//! The result only steers strategy selection; correctness never depends
//! on it.

/// Byte-level characteristics of one input buffer.
///
/// Computed once per call, owned by the call stack, never shared across
/// threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputCharacteristics {
    /// Input size in bytes
    pub size: u64,
    /// Fraction of bytes that are ASCII whitespace (space/tab/CR/LF),
    /// counted everywhere including string interiors
    pub whitespace_ratio: f32,
    /// Fraction of bytes that are JSON structural characters
    /// (braces, brackets, comma, colon, quote)
    pub structural_density: f32,
    /// Deepest container nesting observed outside string literals
    pub max_nesting_depth: u16,
    /// Heuristic blend of density and depth in `[0, 1]`
    pub complexity_score: f32,
}

impl InputCharacteristics {
    /// Neutral characteristics for an empty input
    pub fn empty() -> Self {
        Self {
            size: 0,
            whitespace_ratio: 0.0,
            structural_density: 0.0,
            max_nesting_depth: 0,
            complexity_score: 0.0,
        }
    }
}

/// Analyze an input buffer in a single pass.
///
/// No allocation, no failure mode; empty input yields neutral
/// characteristics. Depth tracking is string-aware so brackets inside
/// literals do not count.
pub fn analyze(input: &[u8]) -> InputCharacteristics {
    if input.is_empty() {
        return InputCharacteristics::empty();
    }

    let mut whitespace = 0usize;
    let mut structural = 0usize;
    let mut depth = 0i32;
    let mut max_depth = 0i32;
    let mut in_string = false;
    let mut escape_active = false;

    for &byte in input {
        match byte {
            b' ' | b'\t' | b'\n' | b'\r' => whitespace += 1,
            b'{' | b'}' | b'[' | b']' | b',' | b':' | b'"' => structural += 1,
            _ => {}
        }

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
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                max_depth = max_depth.max(depth);
            }
            b'}' | b']' => depth -= 1,
            _ => {}
        }
    }

    let len = input.len() as f32;
    let structural_density = structural as f32 / len;
    let depth_component = (max_depth.max(0) as f32 / 32.0).min(1.0);
    let complexity_score = (structural_density + depth_component).min(1.0);

    InputCharacteristics {
        size: input.len() as u64,
        whitespace_ratio: whitespace as f32 / len,
        structural_density,
        max_nesting_depth: max_depth.clamp(0, i32::from(u16::MAX)) as u16,
        complexity_score,
    }
}
