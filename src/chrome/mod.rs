//! Page frame and presentation helpers shared by every view.

pub mod images;
pub mod nav;

pub use images::*;
pub use nav::*;
