//! Data-access seam toward the hosted backend.
//!
//! The backend client itself lives outside this crate; [`TableQuery`] is
//! the slice of it the feeds need.

pub mod table;

pub use table::{Direction, Filter, FilterOp, TableFetcher, TableQuery, TableRequest};

/// Table names as constants.
pub mod collections {
    pub const MEAL_LOGS: &str = "meal_logs";
    pub const WORKOUT_LOGS: &str = "workout_logs";
}
