pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod market;
pub mod middleware;
pub mod server;
pub mod state;
pub mod types;
pub mod validation;

pub use server::app;
pub use state::AppState;
