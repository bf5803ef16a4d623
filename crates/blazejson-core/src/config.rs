//! Engine configuration

use serde::{Deserialize, Serialize};

/// How hard the engine works at selecting fast paths.
///
/// `None` pins every call to the scalar kernel. `Basic` allows 128-bit
/// vectorization on a single thread. `Aggressive` allows the widest
/// available vector kernel, still single-threaded. `Extreme` additionally
/// enables chunked parallel execution for large inputs. `Automatic`
/// re-evaluates the full decision policy on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OptimizationLevel {
    None,
    Basic,
    Aggressive,
    Extreme,
    #[default]
    Automatic,
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Optimization level
    pub optimization_level: OptimizationLevel,
    /// Inputs at or above this size are eligible for parallel execution
    pub parallel_threshold: usize,
    /// Number of chunks to aim for when partitioning (0 = worker count)
    pub chunk_target_count: usize,
    /// Inputs below this size are never partitioned
    pub min_chunk_size: usize,
    /// Worker pool size (0 = detected logical cores)
    pub worker_threads: usize,
    /// Use vector kernels when the CPU supports them
    pub enable_simd: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            optimization_level: OptimizationLevel::Automatic,
            parallel_threshold: 64 * 1024,
            chunk_target_count: 0,
            min_chunk_size: 1024,
            worker_threads: 0,
            enable_simd: true,
        }
    }
}

/// Clamp bounds applied by [`EngineConfig::normalized`]
pub mod limits {
    pub const MIN_PARALLEL_THRESHOLD: usize = 4 * 1024;
    pub const MIN_CHUNK_SIZE_FLOOR: usize = 256;
    pub const MAX_CHUNK_TARGET: usize = 1024;
    pub const MAX_WORKERS: usize = 256;
}

impl EngineConfig {
    /// Create a builder for engine configuration
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }

    /// Return a copy with every field clamped into its valid range.
    ///
    /// Out-of-range values never error; they snap to the nearest valid
    /// value. The engine snapshots the normalized config at construction
    /// and treats it as immutable afterwards.
    pub fn normalized(&self) -> Self {
        Self {
            optimization_level: self.optimization_level,
            parallel_threshold: self.parallel_threshold.max(limits::MIN_PARALLEL_THRESHOLD),
            chunk_target_count: self.chunk_target_count.min(limits::MAX_CHUNK_TARGET),
            min_chunk_size: self.min_chunk_size.max(limits::MIN_CHUNK_SIZE_FLOOR),
            worker_threads: self.worker_threads.min(limits::MAX_WORKERS),
            enable_simd: self.enable_simd,
        }
    }

    /// Worker count with the `0 = auto` default resolved
    pub fn resolved_workers(&self) -> usize {
        if self.worker_threads == 0 {
            num_cpus::get().clamp(1, limits::MAX_WORKERS)
        } else {
            self.worker_threads
        }
    }

    /// Chunk target with the `0 = worker count` default resolved
    pub fn resolved_chunk_target(&self, workers: usize) -> usize {
        if self.chunk_target_count == 0 {
            workers.max(1)
        } else {
            self.chunk_target_count.max(1)
        }
    }
}

/// Builder for engine configuration
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Set the optimization level
    pub fn optimization_level(mut self, level: OptimizationLevel) -> Self {
        self.config.optimization_level = level;
        self
    }

    /// Set the parallel execution threshold in bytes
    pub fn parallel_threshold(mut self, bytes: usize) -> Self {
        self.config.parallel_threshold = bytes;
        self
    }

    /// Set the target chunk count (0 = worker count)
    pub fn chunk_target_count(mut self, count: usize) -> Self {
        self.config.chunk_target_count = count;
        self
    }

    /// Set the minimum chunk size in bytes
    pub fn min_chunk_size(mut self, bytes: usize) -> Self {
        self.config.min_chunk_size = bytes;
        self
    }

    /// Set the worker pool size (0 = detected logical cores)
    pub fn worker_threads(mut self, count: usize) -> Self {
        self.config.worker_threads = count;
        self
    }

    /// Enable/disable vector kernels
    pub fn enable_simd(mut self, enabled: bool) -> Self {
        self.config.enable_simd = enabled;
        self
    }

    /// Build the configuration
    pub fn build(self) -> EngineConfig {
        self.config
    }
}

impl Default for EngineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
