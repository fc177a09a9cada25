//! Sugar dissolution lab

pub mod dissolve;

pub use dissolve::{SugarExperiment, SugarPart, SugarTuning};
