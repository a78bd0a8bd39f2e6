//! Session state and the authorization redirect guard.

pub mod context;
pub mod guard;

pub use context::*;
pub use guard::*;
