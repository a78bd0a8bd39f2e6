//! Accounts: social-media logins the server acts with.

pub mod error;
pub mod form;
pub mod insights;
pub mod view;

pub use error::*;
pub use form::AccountField;
pub use insights::{chart_series, ChartSeries, InsightsView};
pub use view::*;
