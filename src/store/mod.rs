mod markers;
mod mode;
mod points;

pub use markers::{MarkerEntry, MarkerRegistry};
pub use mode::ModeController;
pub use points::{Pairs, PointStore};
