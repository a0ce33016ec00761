//! Photo organization module.
//!
//! Plans where each file goes in the year/month library and copies it there.

mod copier;
mod planner;
mod types;

pub use copier::FileCopier;
pub use planner::PlacementPlanner;
pub use types::*;
