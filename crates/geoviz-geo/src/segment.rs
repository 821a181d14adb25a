//! Splitting of NaN-delimited coordinate arrays into parts.
//!
//! A sentinel row is any row with a NaN in its first two columns. Splitting
//! drops every sentinel row, so two consecutive sentinels (or a trailing one)
//! produce an empty part which the builders later discard.

/// Row used to separate parts when flattening geometries
pub const SENTINEL_ROW: [f64; 2] = [f64::NAN, f64::NAN];

/// Whether `row` marks a part boundary
pub fn is_sentinel<R: AsRef<[f64]>>(row: &R) -> bool {
    row.as_ref().iter().take(2).any(|v| v.is_nan())
}

/// Lazily split `rows` into the runs between sentinel rows.
///
/// An array without sentinels yields exactly one part equal to the input.
pub fn split_on_sentinels<R: AsRef<[f64]>>(rows: &[R]) -> impl Iterator<Item = &[R]> + '_ {
    rows.split(|row| is_sentinel(row))
}

/// Number of sentinel rows in `rows`
pub fn sentinel_count<R: AsRef<[f64]>>(rows: &[R]) -> usize {
    rows.iter().filter(|row| is_sentinel(*row)).count()
}
