//! Data-access layer.
//!
//! This module provides the building blocks every view reads and writes through.
//!
//! # Main Components
//!
//! - [`ResourceCache`] - Actor owning the process-wide cache of remote reads
//! - [`ResourceClient`] - Handle for cached reads, subscriptions and invalidation
//! - [`MutationHandle`] - Uncached write bound to one endpoint and method
//! - [`Transport`] - Seam to the remote API ([`HttpTransport`] in production)
//!
//! # Testing
//!
//! See [`mock`] module for a transport that answers from expectations.

pub mod core;
pub mod mock;
pub mod mutation;
pub mod transport;

pub use self::core::*;
pub use mutation::*;
pub use transport::*;
