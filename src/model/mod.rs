//! Serde mirrors of the JSON the remote API serves.

pub mod account;
pub mod insights;
pub mod network;
pub mod user;

pub use account::*;
pub use insights::*;
pub use network::*;
pub use user::*;
