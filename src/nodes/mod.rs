//! Nodes: hosts joined to a network.

pub mod error;
pub mod form;
pub mod scope;
pub mod view;

pub use error::*;
pub use form::{NodeField, NodeRegistration};
pub use scope::NodeScope;
pub use view::*;
