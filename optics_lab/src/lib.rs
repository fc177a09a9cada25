//! Optics bench
//!
//! - `trace`: rays followed through mirrors and thin lenses
//! - `bench`: the three demonstrations and their drawing

pub mod bench;
pub mod trace;

pub use bench::{Mode, OpticsBench, OpticsTuning};
pub use trace::{LensKind, Surface};
