//! Networks: virtual network definitions and their sessions.

pub mod error;
pub mod form;
pub mod view;

pub use error::*;
pub use form::NetworkField;
pub use view::*;
