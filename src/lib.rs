pub mod annealing;
pub mod contact;
pub mod error;
pub mod field;
pub mod geometry;
pub mod optimizer;
pub mod output;
pub mod progress;
pub mod relaxation;
pub mod spine;

pub use contact::{ContactGraph, SpineId};
pub use error::SpineError;
pub use geometry::{Point, EPS};
pub use optimizer::{run, Optimizer, Outcome, RunConfig, Termination};
pub use spine::Spine;
