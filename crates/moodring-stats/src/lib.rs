//! # moodring-stats
//!
//! The post-session analytics pass. Runs once, at session end, over the
//! accumulated logs and final user list, and produces the summary report
//! broadcast to the group. Pure functions only — no clocks beyond the
//! report's end timestamp, no I/O, no shared state.

pub mod aggregate;
pub mod format;
pub mod report;

pub use aggregate::calculate;
pub use report::SessionReport;
