//! Weekly usage quota pace calculation and a timer-driven condition poller.

pub mod cli;
pub mod core;
