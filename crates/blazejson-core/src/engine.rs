//! Adaptive minification engine
//!
//! Ties the pieces together: analyze the input, pick a strategy, run the
//! scalar or vector kernel directly, or partition and fan out across the
//! worker pool and merge in order. Capabilities and config are
//! snapshotted at construction and immutable for the engine's lifetime;
//! every call re-derives its own state from them.

use std::time::Instant;

use tracing::debug;

use blazejson_simd::{minify_scalar, SimdBackend, SimdCapabilities};

use crate::analyzer::analyze;
use crate::chunk::partition;
use crate::config::EngineConfig;
use crate::error::{MinifyError, Result};
use crate::executor::{KernelChoice, WorkerPool};
use crate::merger;
use crate::stats::MinifyStats;
use crate::strategy::{select, ProcessingStrategy};

/// JSON minification engine with a persistent worker pool
pub struct MinifyEngine {
    config: EngineConfig,
    capabilities: SimdCapabilities,
    backend: SimdBackend,
    pool: WorkerPool,
}

impl MinifyEngine {
    /// Create an engine from a configuration.
    ///
    /// The config is normalized (out-of-range values clamp) and the
    /// worker pool is spawned here; a spawn failure is fatal to
    /// construction and surfaces as [`MinifyError::ThreadSpawnFailed`].
    pub fn new(config: EngineConfig) -> Result<Self> {
        let config = config.normalized();
        let capabilities = if config.enable_simd {
            SimdCapabilities::detect()
        } else {
            SimdCapabilities::scalar_only()
        };
        let backend = SimdBackend::with_capabilities(capabilities.clone());
        let pool = WorkerPool::new(config.resolved_workers())?;

        debug!(
            backend = ?capabilities.backend_type,
            workers = pool.worker_count(),
            "engine initialized"
        );

        Ok(Self {
            config,
            capabilities,
            backend,
            pool,
        })
    }

    /// Create an engine with the default configuration
    pub fn with_defaults() -> Result<Self> {
        Self::new(EngineConfig::default())
    }

    /// The normalized configuration this engine runs with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Capability snapshot taken at construction
    pub fn capabilities(&self) -> &SimdCapabilities {
        &self.capabilities
    }

    /// Number of pool workers
    pub fn worker_count(&self) -> usize {
        self.pool.worker_count()
    }

    /// Strategy implied by the configured level before seeing any input.
    /// `Automatic` reports [`ProcessingStrategy::Hybrid`]; concrete
    /// strategies are picked per input.
    pub fn strategy_hint(&self) -> ProcessingStrategy {
        ProcessingStrategy::from_level(self.config.optimization_level)
    }

    /// Minify into a freshly allocated buffer.
    pub fn minify(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output = vec![0u8; input.len()];
        let (written, _, _) = self.run(input, &mut output)?;
        output.truncate(written);
        Ok(output)
    }

    /// Minify into a caller-owned buffer, returning the bytes written.
    ///
    /// The output must be at least as long as the input (minification
    /// never expands); otherwise [`MinifyError::BufferTooSmall`] is
    /// returned before anything is written.
    pub fn minify_into(&self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        if output.len() < input.len() {
            return Err(MinifyError::BufferTooSmall {
                needed: input.len(),
                available: output.len(),
            });
        }
        let (written, _, _) = self.run(input, output)?;
        Ok(written)
    }

    /// Minify and report what the call did.
    pub fn minify_with_stats(&self, input: &[u8]) -> Result<(Vec<u8>, MinifyStats)> {
        let start = Instant::now();
        let mut output = vec![0u8; input.len()];
        let (written, strategy, chunks) = self.run(input, &mut output)?;
        output.truncate(written);

        let stats = MinifyStats {
            input_bytes: input.len() as u64,
            output_bytes: written as u64,
            strategy,
            chunks,
            duration: start.elapsed(),
        };
        Ok((output, stats))
    }

    fn run(&self, input: &[u8], output: &mut [u8]) -> Result<(usize, ProcessingStrategy, u32)> {
        if input.is_empty() {
            return Ok((0, ProcessingStrategy::Scalar, 1));
        }

        let characteristics = analyze(input);
        let strategy = select(&characteristics, &self.capabilities, &self.config);

        match strategy {
            ProcessingStrategy::Scalar => {
                let written = minify_scalar(input, output)?;
                Ok((written, strategy, 1))
            }
            ProcessingStrategy::VectorizedBasic
            | ProcessingStrategy::VectorizedAdvanced
            | ProcessingStrategy::Hybrid => {
                let written = self.backend.minify(input, output)?;
                Ok((written, strategy, 1))
            }
            ProcessingStrategy::Parallel => self.run_parallel(input, output),
        }
    }

    fn run_parallel(&self, input: &[u8], output: &mut [u8]) -> Result<(usize, ProcessingStrategy, u32)> {
        let target = self.config.resolved_chunk_target(self.pool.worker_count());
        let chunks = partition(input, target, self.config.min_chunk_size);

        if chunks.len() == 1 {
            // Nothing to fan out; run the best kernel in place
            let written = self.backend.minify(input, output)?;
            return Ok((written, ProcessingStrategy::Parallel, 1));
        }

        let kernel = if self.capabilities.backend_type.is_vector() {
            KernelChoice::Simd
        } else {
            KernelChoice::Scalar
        };

        let items = self.pool.execute(chunks, input, kernel, &self.backend)?;
        let chunk_count = items.len() as u32;
        let written = merger::merge_into(&items, output)?;
        Ok((written, ProcessingStrategy::Parallel, chunk_count))
    }
}

/// One-shot minification into a fresh buffer.
///
/// Builds a throwaway engine; construct a [`MinifyEngine`] once and reuse
/// it when minifying more than one document.
pub fn minify(input: &[u8], config: EngineConfig) -> Result<Vec<u8>> {
    MinifyEngine::new(config)?.minify(input)
}

/// One-shot minification into a caller-owned buffer.
pub fn minify_into(input: &[u8], output: &mut [u8], config: EngineConfig) -> Result<usize> {
    MinifyEngine::new(config)?.minify_into(input, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OptimizationLevel;

    fn spaced_document(elements: usize) -> Vec<u8> {
        let mut input = Vec::from(&b"{\n  \"items\" : [\n"[..]);
        for i in 0..elements {
            if i > 0 {
                input.extend_from_slice(b" ,\n");
            }
            input.extend_from_slice(format!("    {{ \"id\" : {i} , \"name\" : \"item {i}\" }}").as_bytes());
        }
        input.extend_from_slice(b"\n  ]\n}\n");
        input
    }

    #[test]
    fn test_minify_simple() {
        let engine = MinifyEngine::with_defaults().unwrap();
        let output = engine.minify(br#"{ "a" : 1 , "b" : [ 1 , 2 , 3 ] }"#).unwrap();
        assert_eq!(output, br#"{"a":1,"b":[1,2,3]}"#);
    }

    #[test]
    fn test_minify_empty() {
        let engine = MinifyEngine::with_defaults().unwrap();
        assert_eq!(engine.minify(b"").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_minify_into_undersized_buffer() {
        let engine = MinifyEngine::with_defaults().unwrap();
        let input = br#"{ "a" : 1 }"#;
        let mut output = vec![0xAAu8; input.len() - 1];
        match engine.minify_into(input, &mut output) {
            Err(MinifyError::BufferTooSmall { needed, available }) => {
                assert_eq!(needed, input.len());
                assert_eq!(available, input.len() - 1);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        // Nothing observable was written
        assert!(output.iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn test_minify_into_exact_buffer() {
        let engine = MinifyEngine::with_defaults().unwrap();
        let input = br#"{ "a" : 1 }"#;
        let mut output = vec![0u8; input.len()];
        let written = engine.minify_into(input, &mut output).unwrap();
        assert_eq!(&output[..written], br#"{"a":1}"#);
    }

    #[test]
    fn test_large_input_parallel_matches_scalar() {
        let input = spaced_document(20_000);
        assert!(input.len() > 64 * 1024);

        let parallel = MinifyEngine::new(
            EngineConfig::builder()
                .optimization_level(OptimizationLevel::Extreme)
                .worker_threads(4)
                .build(),
        )
        .unwrap();
        let scalar = MinifyEngine::new(
            EngineConfig::builder()
                .optimization_level(OptimizationLevel::None)
                .worker_threads(1)
                .build(),
        )
        .unwrap();

        assert_eq!(parallel.minify(&input).unwrap(), scalar.minify(&input).unwrap());
    }

    #[test]
    fn test_stats_reflect_call() {
        let input = spaced_document(50);
        let engine = MinifyEngine::with_defaults().unwrap();
        let (output, stats) = engine.minify_with_stats(&input).unwrap();

        assert_eq!(stats.input_bytes, input.len() as u64);
        assert_eq!(stats.output_bytes, output.len() as u64);
        assert!(stats.output_bytes <= stats.input_bytes);
        assert!(stats.chunks >= 1);
    }

    #[test]
    fn test_strategy_hint() {
        let engine = MinifyEngine::with_defaults().unwrap();
        assert_eq!(engine.strategy_hint(), ProcessingStrategy::Hybrid);

        let engine = MinifyEngine::new(
            EngineConfig::builder()
                .optimization_level(OptimizationLevel::None)
                .build(),
        )
        .unwrap();
        assert_eq!(engine.strategy_hint(), ProcessingStrategy::Scalar);
    }

    #[test]
    fn test_one_shot_helpers() {
        let output = super::minify(br#"[ 1 , 2 ]"#, EngineConfig::default()).unwrap();
        assert_eq!(output, b"[1,2]");

        let input = br#"{ "a" : 1 }"#;
        let mut buffer = vec![0u8; input.len()];
        let written = super::minify_into(input, &mut buffer, EngineConfig::default()).unwrap();
        assert_eq!(&buffer[..written], br#"{"a":1}"#);
    }

    #[test]
    fn test_engine_reuse_across_calls() {
        let engine = MinifyEngine::new(
            EngineConfig::builder()
                .optimization_level(OptimizationLevel::Extreme)
                .parallel_threshold(4 * 1024)
                .worker_threads(2)
                .build(),
        )
        .unwrap();

        let small = br#"[ 1 , 2 ]"#.to_vec();
        let large = spaced_document(5_000);
        for _ in 0..3 {
            assert_eq!(engine.minify(&small).unwrap(), b"[1,2]");
            let out = engine.minify(&large).unwrap();
            assert!(out.len() < large.len());
        }
    }
}
