//! Candle combustion lab
//!
//! Two candles burn under inverted beakers. Only the one fed by the oxygen
//! supply keeps burning; the other goes out once its air is used up.

pub mod experiment;
pub mod layout;

pub use experiment::{CandleExperiment, CandleTuning};
pub use layout::Part;
