//! Per-call statistics
//!
//! Stats are an explicit value returned from a call, never accumulated
//! into global or thread-local state.

use std::time::Duration;

use crate::strategy::ProcessingStrategy;

/// What one minification call did and what it cost
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinifyStats {
    /// Input size in bytes
    pub input_bytes: u64,
    /// Minified output size in bytes
    pub output_bytes: u64,
    /// Strategy the call executed with
    pub strategy: ProcessingStrategy,
    /// Number of chunks processed (1 for single-kernel strategies)
    pub chunks: u32,
    /// Wall-clock duration of the call
    pub duration: Duration,
}

impl MinifyStats {
    /// Bytes removed by minification
    pub fn bytes_saved(&self) -> u64 {
        self.input_bytes.saturating_sub(self.output_bytes)
    }

    /// Output size as a fraction of input size (1.0 for empty input)
    pub fn compression_ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            1.0
        } else {
            self.output_bytes as f64 / self.input_bytes as f64
        }
    }

    /// Throughput in megabytes of input per second
    pub fn throughput_mbps(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.input_bytes as f64 / (1024.0 * 1024.0) / secs
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_values() {
        let stats = MinifyStats {
            input_bytes: 1000,
            output_bytes: 600,
            strategy: ProcessingStrategy::Scalar,
            chunks: 1,
            duration: Duration::from_millis(10),
        };
        assert_eq!(stats.bytes_saved(), 400);
        assert!((stats.compression_ratio() - 0.6).abs() < 1e-9);
        assert!(stats.throughput_mbps() > 0.0);
    }

    #[test]
    fn test_empty_input_ratio() {
        let stats = MinifyStats {
            input_bytes: 0,
            output_bytes: 0,
            strategy: ProcessingStrategy::Scalar,
            chunks: 1,
            duration: Duration::ZERO,
        };
        assert!((stats.compression_ratio() - 1.0).abs() < 1e-9);
        assert_eq!(stats.bytes_saved(), 0);
        assert!(stats.throughput_mbps().abs() < 1e-9);
    }
}
