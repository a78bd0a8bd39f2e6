//! Transient user-facing notifications.
//!
//! Producers publish through an [`AlertBus`]; each mounted [`AlertRegion`]
//! subscribes to one channel and applies the rendering rules (auto-close,
//! fade-out, clear on route change).

pub mod bus;
pub mod region;

pub use bus::*;
pub use region::*;
