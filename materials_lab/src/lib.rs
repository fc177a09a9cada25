//! Materials labs
//!
//! - `sieve`: grains of two sizes dropped onto interchangeable sieves
//! - `heat`: a pan heated step by step, viewed as is or in thermal colors

pub mod heat;
pub mod sieve;

pub use heat::{HeatLab, HeatMode, HeatTuning};
pub use sieve::{
    declare_sieve, floor_cells, wall_segments, BoxCollider, ColliderSink, Grain, GrainBed, GrainTuning,
    SieveBench, SieveLevel, SieveTuning,
};
