//! # moodring-worker
//!
//! Background maintenance: the cron-scheduled sweep that purges expired
//! sessions.

pub mod scheduler;

pub use scheduler::CronScheduler;
