//! Crate-wide constants and tuning parameters.
//!
//! Piece-length defaults follow the sizing table mktorrent ships with;
//! everything here is a build-time constant.

// ============================================================================
// Generator identification
// ============================================================================

/// Value of the `created by` field in emitted metainfo files.
pub const CREATED_BY: &str = concat!("mktor ", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Piece hashing
// ============================================================================

/// Length in bytes of one piece digest (SHA-1).
pub const DIGEST_LENGTH: usize = 20;

/// Upper bound on the hashing worker pool size.
pub const MAX_HASH_WORKERS: usize = 20;

/// Worker count used when the CPU count cannot be determined.
pub const FALLBACK_HASH_WORKERS: usize = 2;

// ============================================================================
// Piece length selection
// ============================================================================

/// One mebibyte.
pub const ONE_MIB: u64 = 1 << 20;

/// Smallest piece-length exponent accepted from the user (2^15 = 32 KiB).
pub const MIN_PIECE_LENGTH_EXP: u32 = 15;

/// Largest piece-length exponent accepted from the user (2^28 = 256 MiB).
pub const MAX_PIECE_LENGTH_EXP: u32 = 28;

/// Automatic piece-length selection table.
///
/// Each entry maps a piece-length exponent to the largest total content size
/// it is chosen for: the smallest exponent whose ceiling is not exceeded
/// wins. Sizes at exactly a ceiling still select that bucket.
pub const PIECE_LENGTH_BUCKETS: [(u32, u64); 8] = [
    (15, 50 * ONE_MIB),
    (16, 100 * ONE_MIB),
    (17, 200 * ONE_MIB),
    (18, 400 * ONE_MIB),
    (19, 800 * ONE_MIB),
    (20, 1600 * ONE_MIB),
    (21, 3200 * ONE_MIB),
    (22, 6400 * ONE_MIB),
];

/// Exponent used when the total size exceeds every bucket ceiling.
pub const PIECE_LENGTH_FALLBACK_EXP: u32 = 23;
