use thiserror::Error;

/// Failure of the indicator engine for one symbol in one cycle.
///
/// A window-length failure in any required computation fails the whole
/// engine for that symbol; a partial indicator set is never published as a
/// success. Numeric edge cases (zero variance, zero average volume) are not
/// errors — they resolve locally to defined sentinel values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndicatorError {
    #[error("{indicator}: window too short (need {needed} points, got {got})")]
    InsufficientWindow {
        indicator: &'static str,
        needed: usize,
        got: usize,
    },
}
