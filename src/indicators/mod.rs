// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators exported by the
// sampler.  Every public function either returns `Option<T>` (None on an
// insufficient window) or resolves its numeric edge cases to a documented
// sentinel, so callers never have to catch a panic.

pub mod bollinger;
pub mod ema;
pub mod engine;
pub mod macd;
pub mod returns;
pub mod rsi;
pub mod volatility;
pub mod volume;
