pub mod color;
pub mod error;
pub mod geometry;
pub mod trial;

pub use color::{Color, Palette};
pub use error::DesignError;
pub use geometry::Location;
pub use trial::{Condition, KeyAssignment, Response, Trial, TrialRecord, TrialSpec};
