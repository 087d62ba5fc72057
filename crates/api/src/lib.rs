pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod gql;
pub mod services;
pub mod state;

pub use config::AppConfig;
pub use state::AppState;
