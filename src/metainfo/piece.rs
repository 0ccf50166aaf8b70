use crate::constants::{PIECE_LENGTH_BUCKETS, PIECE_LENGTH_FALLBACK_EXP};

/// Piece length and count derived from the total content size.
///
/// Computed once after the manifest is complete and never mutated.
///
/// # Examples
///
/// ```
/// use mktor::metainfo::PiecePlan;
///
/// // automatic selection: small torrents get 32 KiB pieces
/// let plan = PiecePlan::from_total_size(1_000_000, None);
/// assert_eq!(plan.piece_length, 32768);
/// assert_eq!(plan.piece_count, 31);
///
/// // explicit exponent overrides the table
/// let plan = PiecePlan::from_total_size(1_000_000, Some(20));
/// assert_eq!(plan.piece_length, 1 << 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PiecePlan {
    /// Piece size in bytes, always a power of two.
    pub piece_length: u64,
    /// `ceil(total_size / piece_length)`; zero for empty content.
    pub piece_count: u64,
}

impl PiecePlan {
    /// Derives the plan for `total_size` bytes of content.
    ///
    /// With no override the smallest bucket whose ceiling covers the size is
    /// chosen, falling back to one exponent past the table for anything
    /// bigger. `exponent` is the user's `2^n` override, already range
    /// checked at the CLI.
    pub fn from_total_size(total_size: u64, exponent: Option<u32>) -> Self {
        let exp = exponent.unwrap_or_else(|| auto_exponent(total_size));
        let piece_length = 1u64 << exp;
        Self {
            piece_length,
            piece_count: total_size.div_ceil(piece_length),
        }
    }
}

fn auto_exponent(total_size: u64) -> u32 {
    PIECE_LENGTH_BUCKETS
        .iter()
        .find(|(_, max_size)| total_size <= *max_size)
        .map(|(exp, _)| *exp)
        .unwrap_or(PIECE_LENGTH_FALLBACK_EXP)
}
