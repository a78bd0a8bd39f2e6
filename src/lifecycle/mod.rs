//! Startup, wiring and shutdown.

pub mod dashboard;
pub mod tracing;

pub use dashboard::Dashboard;
