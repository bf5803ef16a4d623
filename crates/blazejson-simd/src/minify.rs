//! SIMD-accelerated JSON minification
//!
//! Lane-based kernels (AVX2, SSE4.2, NEON). Each lane gets two masks from
//! lane-wide comparisons: a whitespace mask (space/tab/LF/CR) and a
//! structural mask (`"` or `\`). Lanes with an empty structural mask take
//! the fast path, compacting non-whitespace bytes straight into the
//! output. A structural hit hands the cursor to the scalar span copier
//! until the string (and any escapes) is fully consumed, then lane
//! processing resumes. The final partial lane always runs scalar.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

use crate::scalar::{copy_structural_span, minify_scalar, BufferTooSmall};

#[inline]
fn overflow(input_len: usize, available: usize) -> BufferTooSmall {
    BufferTooSmall {
        needed: input_len,
        available,
    }
}

/// Write the lane bytes selected by `keep` (bit n set = keep byte n).
#[cfg(target_arch = "x86_64")]
#[inline]
fn push_masked(
    input: &[u8],
    lane_start: usize,
    mut keep: u32,
    output: &mut [u8],
    written: &mut usize,
) -> Result<(), BufferTooSmall> {
    while keep != 0 {
        let pos = keep.trailing_zeros() as usize;
        if *written == output.len() {
            return Err(overflow(input.len(), output.len()));
        }
        output[*written] = input[lane_start + pos];
        *written += 1;
        keep &= keep - 1; // Clear lowest set bit
    }
    Ok(())
}

/// Minify using the best available SIMD backend (auto-detects)
#[allow(unreachable_code)]
pub fn minify_simd(input: &[u8], output: &mut [u8]) -> Result<usize, BufferTooSmall> {
    #[cfg(target_arch = "x86_64")]
    {
        if std::arch::is_x86_feature_detected!("avx2") {
            return unsafe { minify_avx2(input, output) };
        }
        if std::arch::is_x86_feature_detected!("sse4.2") {
            return unsafe { minify_sse42(input, output) };
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        return unsafe { minify_neon(input, output) };
    }

    // Scalar fallback
    minify_scalar(input, output)
}

/// AVX2 implementation (32-byte lanes)
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn minify_avx2(input: &[u8], output: &mut [u8]) -> Result<usize, BufferTooSmall> {
    let len = input.len();
    let mut written = 0usize;

    let space = _mm256_set1_epi8(b' ' as i8);
    let tab = _mm256_set1_epi8(b'\t' as i8);
    let newline = _mm256_set1_epi8(b'\n' as i8);
    let carriage = _mm256_set1_epi8(b'\r' as i8);
    let quote = _mm256_set1_epi8(b'"' as i8);
    let backslash = _mm256_set1_epi8(b'\\' as i8);

    let mut i = 0usize;
    while i + 32 <= len {
        let chunk = _mm256_loadu_si256(input.as_ptr().add(i) as *const __m256i);

        // Whitespace and structural masks for the whole lane
        let ws1 = _mm256_or_si256(
            _mm256_cmpeq_epi8(chunk, space),
            _mm256_cmpeq_epi8(chunk, tab),
        );
        let ws2 = _mm256_or_si256(
            _mm256_cmpeq_epi8(chunk, newline),
            _mm256_cmpeq_epi8(chunk, carriage),
        );
        let ws = _mm256_movemask_epi8(_mm256_or_si256(ws1, ws2)) as u32;

        let structural = _mm256_movemask_epi8(_mm256_or_si256(
            _mm256_cmpeq_epi8(chunk, quote),
            _mm256_cmpeq_epi8(chunk, backslash),
        )) as u32;

        if structural == 0 {
            let keep = !ws;
            if keep == u32::MAX {
                // Clean lane: bulk copy
                if written + 32 > output.len() {
                    return Err(overflow(len, output.len()));
                }
                output[written..written + 32].copy_from_slice(&input[i..i + 32]);
                written += 32;
            } else {
                push_masked(input, i, keep, output, &mut written)?;
            }
            i += 32;
        } else {
            // Compact the clean prefix, then hand the structural byte and
            // the string behind it to the scalar span copier
            let first = structural.trailing_zeros() as usize;
            let prefix = !ws & ((1u32 << first) - 1);
            push_masked(input, i, prefix, output, &mut written)?;
            i = copy_structural_span(input, i + first, output, &mut written)?;
        }
    }

    // Handle remaining bytes with scalar
    written += minify_scalar(&input[i..], &mut output[written..])?;
    Ok(written)
}

/// SSE4.2 implementation (16-byte lanes)
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse4.2")]
pub(crate) unsafe fn minify_sse42(input: &[u8], output: &mut [u8]) -> Result<usize, BufferTooSmall> {
    let len = input.len();
    let mut written = 0usize;

    let space = _mm_set1_epi8(b' ' as i8);
    let tab = _mm_set1_epi8(b'\t' as i8);
    let newline = _mm_set1_epi8(b'\n' as i8);
    let carriage = _mm_set1_epi8(b'\r' as i8);
    let quote = _mm_set1_epi8(b'"' as i8);
    let backslash = _mm_set1_epi8(b'\\' as i8);

    let mut i = 0usize;
    while i + 16 <= len {
        let chunk = _mm_loadu_si128(input.as_ptr().add(i) as *const __m128i);

        let ws1 = _mm_or_si128(_mm_cmpeq_epi8(chunk, space), _mm_cmpeq_epi8(chunk, tab));
        let ws2 = _mm_or_si128(
            _mm_cmpeq_epi8(chunk, newline),
            _mm_cmpeq_epi8(chunk, carriage),
        );
        let ws = _mm_movemask_epi8(_mm_or_si128(ws1, ws2)) as u32;

        let structural = _mm_movemask_epi8(_mm_or_si128(
            _mm_cmpeq_epi8(chunk, quote),
            _mm_cmpeq_epi8(chunk, backslash),
        )) as u32;

        if structural == 0 {
            let keep = !ws & 0xFFFF;
            if keep == 0xFFFF {
                if written + 16 > output.len() {
                    return Err(overflow(len, output.len()));
                }
                output[written..written + 16].copy_from_slice(&input[i..i + 16]);
                written += 16;
            } else {
                push_masked(input, i, keep, output, &mut written)?;
            }
            i += 16;
        } else {
            let first = structural.trailing_zeros() as usize;
            let prefix = !ws & ((1u32 << first) - 1);
            push_masked(input, i, prefix, output, &mut written)?;
            i = copy_structural_span(input, i + first, output, &mut written)?;
        }
    }

    written += minify_scalar(&input[i..], &mut output[written..])?;
    Ok(written)
}

/// NEON implementation (16-byte lanes)
#[cfg(target_arch = "aarch64")]
pub(crate) unsafe fn minify_neon(input: &[u8], output: &mut [u8]) -> Result<usize, BufferTooSmall> {
    let len = input.len();
    let mut written = 0usize;

    let space = vdupq_n_u8(b' ');
    let tab = vdupq_n_u8(b'\t');
    let newline = vdupq_n_u8(b'\n');
    let carriage = vdupq_n_u8(b'\r');
    let quote = vdupq_n_u8(b'"');
    let backslash = vdupq_n_u8(b'\\');

    let mut i = 0usize;
    while i + 16 <= len {
        let chunk = vld1q_u8(input.as_ptr().add(i));

        let ws1 = vorrq_u8(vceqq_u8(chunk, space), vceqq_u8(chunk, tab));
        let ws2 = vorrq_u8(vceqq_u8(chunk, newline), vceqq_u8(chunk, carriage));
        let ws = vorrq_u8(ws1, ws2);

        let structural = vorrq_u8(vceqq_u8(chunk, quote), vceqq_u8(chunk, backslash));

        if vmaxvq_u8(structural) == 0 {
            if vmaxvq_u8(ws) == 0 {
                // Clean lane: bulk copy
                if written + 16 > output.len() {
                    return Err(overflow(len, output.len()));
                }
                output[written..written + 16].copy_from_slice(&input[i..i + 16]);
                written += 16;
            } else {
                let mut ws_bytes = [0u8; 16];
                vst1q_u8(ws_bytes.as_mut_ptr(), ws);
                for (j, &m) in ws_bytes.iter().enumerate() {
                    if m == 0 {
                        if written == output.len() {
                            return Err(overflow(len, output.len()));
                        }
                        output[written] = input[i + j];
                        written += 1;
                    }
                }
            }
            i += 16;
        } else {
            let mut st_bytes = [0u8; 16];
            let mut ws_bytes = [0u8; 16];
            vst1q_u8(st_bytes.as_mut_ptr(), structural);
            vst1q_u8(ws_bytes.as_mut_ptr(), ws);

            let mut first = 0usize;
            while first < 16 && st_bytes[first] == 0 {
                first += 1;
            }
            for j in 0..first {
                if ws_bytes[j] == 0 {
                    if written == output.len() {
                        return Err(overflow(len, output.len()));
                    }
                    output[written] = input[i + j];
                    written += 1;
                }
            }
            if first < 16 {
                i = copy_structural_span(input, i + first, output, &mut written)?;
            } else {
                i += 16;
            }
        }
    }

    written += minify_scalar(&input[i..], &mut output[written..])?;
    Ok(written)
}
