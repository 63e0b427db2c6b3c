#![forbid(unsafe_code)]

pub mod backend;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod http;
pub mod local;
pub mod state;
pub mod views;

pub use study_core::Clock;

pub use backend::{DashboardBackend, ProgressSnapshot};
pub use config::DashboardConfig;
pub use dashboard::{DashboardService, PendingToggle};
pub use error::{ServiceError, TransportError};
pub use http::HttpBackend;
pub use local::LocalBackend;
pub use state::AppState;
