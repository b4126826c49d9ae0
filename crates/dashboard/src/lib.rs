//! Crop yield dashboard
//!
//! HTML views, a JSON API and operational endpoints over the dataset and
//! the regression model prepared at startup.

pub mod api;
pub mod config;
pub mod render;
pub mod session;

pub use api::{create_router, serve, AppState};
pub use config::DashboardConfig;
pub use session::Session;
