//! Execution strategy selection

use blazejson_simd::{SimdBackendType, SimdCapabilities};
use tracing::debug;

use crate::analyzer::InputCharacteristics;
use crate::config::{EngineConfig, OptimizationLevel};

/// How one minification call is executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStrategy {
    /// Byte-at-a-time scalar kernel
    Scalar,
    /// 128-bit lane kernel (SSE4.2 / NEON)
    VectorizedBasic,
    /// 256-bit or wider lane kernel (AVX2 / AVX-512)
    VectorizedAdvanced,
    /// Chunked execution across the worker pool, each chunk on the best
    /// available vector kernel
    Parallel,
    /// Defer to per-input selection on every call
    Hybrid,
}

impl ProcessingStrategy {
    /// Static strategy implied by a configured optimization level before
    /// any input has been seen. `Automatic` maps to `Hybrid`, which
    /// resolves to a concrete strategy per input via [`select`].
    pub fn from_level(level: OptimizationLevel) -> Self {
        match level {
            OptimizationLevel::None => ProcessingStrategy::Scalar,
            OptimizationLevel::Basic => ProcessingStrategy::VectorizedBasic,
            OptimizationLevel::Aggressive => ProcessingStrategy::VectorizedAdvanced,
            OptimizationLevel::Extreme => ProcessingStrategy::Parallel,
            OptimizationLevel::Automatic => ProcessingStrategy::Hybrid,
        }
    }
}

fn vectorized_for(backend: SimdBackendType) -> ProcessingStrategy {
    match backend {
        SimdBackendType::Avx512 | SimdBackendType::Avx2 => ProcessingStrategy::VectorizedAdvanced,
        SimdBackendType::Sse42 | SimdBackendType::Neon => ProcessingStrategy::VectorizedBasic,
        SimdBackendType::Scalar => ProcessingStrategy::Scalar,
    }
}

/// Pick the execution strategy for one input.
///
/// Pure decision function over the analysis, the capability snapshot, and
/// the (already normalized) config; no error conditions. Priority order:
/// scalar pin, vector availability, parallel size gate, vector tier,
/// structural density.
pub fn select(
    characteristics: &InputCharacteristics,
    capabilities: &SimdCapabilities,
    config: &EngineConfig,
) -> ProcessingStrategy {
    let strategy = select_inner(characteristics, capabilities, config);
    debug!(
        size = characteristics.size,
        whitespace_ratio = characteristics.whitespace_ratio,
        ?strategy,
        "selected strategy"
    );
    strategy
}

fn select_inner(
    characteristics: &InputCharacteristics,
    capabilities: &SimdCapabilities,
    config: &EngineConfig,
) -> ProcessingStrategy {
    if config.optimization_level == OptimizationLevel::None {
        return ProcessingStrategy::Scalar;
    }

    if !config.enable_simd || !capabilities.backend_type.is_vector() {
        return ProcessingStrategy::Scalar;
    }

    // Basic stays single-threaded on the 128-bit tier regardless of input
    if config.optimization_level == OptimizationLevel::Basic {
        return match capabilities.backend_type {
            SimdBackendType::Scalar => ProcessingStrategy::Scalar,
            _ => ProcessingStrategy::VectorizedBasic,
        };
    }

    let parallel_allowed = matches!(
        config.optimization_level,
        OptimizationLevel::Extreme | OptimizationLevel::Automatic
    );
    if parallel_allowed && characteristics.size >= config.parallel_threshold as u64 {
        return ProcessingStrategy::Parallel;
    }

    if characteristics.whitespace_ratio > 0.4 || capabilities.backend_type.is_vector() {
        return vectorized_for(capabilities.backend_type);
    }

    // Whatever remains is dense structural content with little
    // whitespace; the scalar kernel handles it without lane overhead
    ProcessingStrategy::Scalar
}
