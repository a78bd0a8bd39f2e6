//! Type-safe wrappers around [`ResourceClient`](crate::framework::ResourceClient).

pub mod account_client;
pub mod collection;
pub mod network_client;
pub mod node_client;
pub mod user_client;

pub use account_client::*;
pub use collection::*;
pub use network_client::*;
pub use node_client::*;
pub use user_client::*;
