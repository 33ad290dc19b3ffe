pub mod api;
pub mod auth;
pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod metrics;
pub mod utils;

pub use error::GaError;
pub use input::GoogleAnalyticsInput;
