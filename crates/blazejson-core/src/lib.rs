//! BlazeJson Core - Adaptive high-throughput JSON minification
//!
//! This crate implements the adaptive minification engine:
//! - Single-pass input analysis (size, whitespace ratio, nesting)
//! - Strategy selection across scalar, vectorized, and parallel paths
//! - Safe-boundary chunk partitioning of large documents
//! - A persistent worker pool with deterministic in-order merging
//!
//! Whitespace outside string literals is dropped; every byte inside a
//! string survives unchanged. Output is byte-identical regardless of the
//! strategy, thread count, or chunk size a call runs with.
//!
//! # Example
//!
//! ```rust,ignore
//! use blazejson_core::{EngineConfig, MinifyEngine};
//!
//! let engine = MinifyEngine::new(EngineConfig::default())?;
//! let output = engine.minify(br#"{ "a" : [ 1 , 2 ] }"#)?;
//! assert_eq!(output, br#"{"a":[1,2]}"#);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod analyzer;
pub mod chunk;
pub mod config;
pub mod engine;
pub mod error;
pub mod executor;
pub mod merger;
pub mod stats;
pub mod strategy;
pub mod validate;

pub use analyzer::{analyze, InputCharacteristics};
pub use config::{EngineConfig, EngineConfigBuilder, OptimizationLevel};
pub use engine::{minify, minify_into, MinifyEngine};
pub use error::{MinifyError, Result};
pub use stats::MinifyStats;
pub use strategy::ProcessingStrategy;
pub use validate::{validate, ValidateError};

// Re-exported so callers can inspect what the engine detected
pub use blazejson_simd::{SimdBackend, SimdBackendType, SimdCapabilities};
