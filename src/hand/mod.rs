//! Hand model — landmark geometry and finger extension classification.

pub mod fingers;
pub mod landmark;

pub use fingers::FingerState;
pub use landmark::{HandLandmark, Handedness, Landmark, LandmarkSet, LANDMARK_COUNT};
