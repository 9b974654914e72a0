//! Compile-time SIMD width table.
//!
//! The widest vector extension enabled for the build target decides the
//! alignment of [`DVec`](crate::DVec) storage. Widths are in bits.
//! Enabling wider extensions (e.g. `-C target-cpu=native`) changes
//! [`SIMD_ALIGNMENT`] and therefore the `DVec` pool identity.

/// AVX-512 register width in bits.
pub const SIMD_AVX512: usize = 512;

/// AVX2 register width in bits.
pub const SIMD_AVX2: usize = 256;

/// SSE2 register width in bits.
pub const SIMD_SSE2: usize = 128;

/// Register width of the widest extension the target enables, or 0.
pub const fn simd_level() -> usize {
    if cfg!(target_feature = "avx512f") {
        SIMD_AVX512
    } else if cfg!(target_feature = "avx2") {
        SIMD_AVX2
    } else if cfg!(target_feature = "sse2") {
        SIMD_SSE2
    } else {
        0
    }
}

/// Byte alignment of one SIMD register of doubles, or `f64`'s natural
/// alignment when no extension is enabled.
pub const SIMD_ALIGNMENT: usize = match simd_level() {
    0 => std::mem::align_of::<f64>(),
    bits => bits / 8,
};

/// Number of `f64` lanes in one register (1 without SIMD).
pub const SIMD_LANES: usize = SIMD_ALIGNMENT / std::mem::size_of::<f64>();
