//! SIMD backend abstraction

use crate::detect::{CpuFeatures, SimdBackendType};
use crate::scalar::{minify_scalar, BufferTooSmall};

/// SIMD capabilities
#[derive(Debug, Clone)]
pub struct SimdCapabilities {
    pub features: CpuFeatures,
    pub backend_type: SimdBackendType,
}

impl SimdCapabilities {
    /// Detect SIMD capabilities at runtime
    pub fn detect() -> Self {
        let features = CpuFeatures::detect();
        let backend_type = features.best_backend();
        Self {
            features,
            backend_type,
        }
    }

    /// Capabilities with vector support disabled
    pub fn scalar_only() -> Self {
        Self {
            features: CpuFeatures::default(),
            backend_type: SimdBackendType::Scalar,
        }
    }

    /// Check if AVX-512 is available
    pub fn has_avx512(&self) -> bool {
        self.features.avx512f && self.features.avx512bw
    }

    /// Check if AVX2 is available
    pub fn has_avx2(&self) -> bool {
        self.features.avx2
    }

    /// Check if NEON is available
    pub fn has_neon(&self) -> bool {
        self.features.neon
    }

    /// Lane width of the selected backend in bytes (0 for scalar)
    pub fn lane_width(&self) -> usize {
        self.backend_type.lane_width()
    }
}

/// SIMD backend for JSON minification
#[derive(Debug, Clone)]
pub struct SimdBackend {
    capabilities: SimdCapabilities,
}

impl SimdBackend {
    /// Create a new SIMD backend with auto-detection
    pub fn auto_detect() -> Self {
        Self {
            capabilities: SimdCapabilities::detect(),
        }
    }

    /// Create a backend with specific capabilities.
    ///
    /// The backend type must describe an ISA the host actually supports;
    /// build it from [`SimdCapabilities::detect`] or
    /// [`SimdCapabilities::scalar_only`].
    pub fn with_capabilities(capabilities: SimdCapabilities) -> Self {
        Self { capabilities }
    }

    /// Backend that always runs the scalar kernel
    pub fn scalar() -> Self {
        Self {
            capabilities: SimdCapabilities::scalar_only(),
        }
    }

    /// Get the backend type
    pub fn backend_type(&self) -> SimdBackendType {
        self.capabilities.backend_type
    }

    /// Get the detected capabilities
    pub fn capabilities(&self) -> &SimdCapabilities {
        &self.capabilities
    }

    /// Minify `input` into `output` using the selected kernel.
    ///
    /// Output is byte-identical to [`minify_scalar`] for every backend.
    pub fn minify(&self, input: &[u8], output: &mut [u8]) -> Result<usize, BufferTooSmall> {
        match self.capabilities.backend_type {
            // TODO: dedicated AVX-512 kernel (needs avx512bw compress-store);
            // the 512-bit tier currently runs the 256-bit kernel
            SimdBackendType::Avx512 | SimdBackendType::Avx2 => self.minify_avx2(input, output),
            SimdBackendType::Sse42 => self.minify_sse42(input, output),
            SimdBackendType::Neon => self.minify_neon(input, output),
            SimdBackendType::Scalar => minify_scalar(input, output),
        }
    }

    fn minify_avx2(&self, input: &[u8], output: &mut [u8]) -> Result<usize, BufferTooSmall> {
        #[cfg(target_arch = "x86_64")]
        {
            return unsafe { crate::minify::minify_avx2(input, output) };
        }
        #[cfg(not(target_arch = "x86_64"))]
        {
            minify_scalar(input, output)
        }
    }

    fn minify_sse42(&self, input: &[u8], output: &mut [u8]) -> Result<usize, BufferTooSmall> {
        #[cfg(target_arch = "x86_64")]
        {
            return unsafe { crate::minify::minify_sse42(input, output) };
        }
        #[cfg(not(target_arch = "x86_64"))]
        {
            minify_scalar(input, output)
        }
    }

    fn minify_neon(&self, input: &[u8], output: &mut [u8]) -> Result<usize, BufferTooSmall> {
        #[cfg(target_arch = "aarch64")]
        {
            return unsafe { crate::minify::minify_neon(input, output) };
        }
        #[cfg(not(target_arch = "aarch64"))]
        {
            minify_scalar(input, output)
        }
    }
}
