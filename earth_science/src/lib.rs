//! Earth science viewers
//!
//! - `fossil`: five stages of fossil formation with a rising lake
//! - `explorer`: four seasonal earths around the sun, with surface landings

pub mod explorer;
pub mod fossil;

pub use explorer::{ExplorerTuning, Season, SolarExplorer, Target, View};
pub use fossil::{FossilTuning, FossilViewer, Stage, STAGES};
