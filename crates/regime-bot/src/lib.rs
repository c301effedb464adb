//! Market regime monitor application.
//!
//! Orchestrates the components:
//! - Market data feeds over HTTP
//! - Indicator monitor with TTL cache
//! - Conservative/bull mode switching

pub mod app;
pub mod config;
pub mod error;
pub mod mode;

pub use app::Application;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use mode::{ModeSwitcher, ModeTransition};
