//! Anatomy and everyday-science viewers
//!
//! - `tour`: labelled spots in a room, each with its own camera viewpoint
//! - `arm`: an arm that folds and extends, with muscle captions following it

pub mod arm;
pub mod tour;

pub use arm::{ArmAction, ArmMotion, ArmTuning, Muscle};
pub use tour::{Destination, Tour, TourStop, TourTuning};
