pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod password;
pub mod store;
pub mod tokens;

pub use app::AppState;
