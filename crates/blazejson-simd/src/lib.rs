//! BlazeJson SIMD - Hardware-accelerated JSON minification kernels
//!
//! This crate provides the byte-level kernels behind the BlazeJson engine:
//! - Scalar minification (the correctness baseline)
//! - SIMD minification with lane-wide whitespace/structural masks
//! - Runtime CPU feature detection and backend dispatch
//!
//! # Architecture Support
//!
//! - **x86_64**: AVX2, SSE4.2 (AVX-512 machines run the AVX2 kernel)
//! - **ARM**: NEON
//!
//! # Example
//!
//! ```rust,ignore
//! use blazejson_simd::SimdBackend;
//!
//! let backend = SimdBackend::auto_detect();
//! let input = br#"{ "a" : 1 }"#;
//! let mut output = vec![0u8; input.len()];
//! let written = backend.minify(input, &mut output)?;
//! assert_eq!(&output[..written], br#"{"a":1}"#);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod backend;
pub mod detect;
pub mod minify;
pub mod scalar;

pub use backend::{SimdBackend, SimdCapabilities};
pub use detect::{CpuFeatures, SimdBackendType};
pub use scalar::{minify_scalar, BufferTooSmall};

/// Runtime CPU feature detection
pub fn detect_capabilities() -> SimdCapabilities {
    SimdCapabilities::detect()
}
