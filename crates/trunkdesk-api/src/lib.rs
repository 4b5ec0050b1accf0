// trunkdesk-api: Async Rust client for the trunkdesk inventory REST API

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod resources;
pub mod transport;

pub use auth::TokenProvider;
pub use client::ApiClient;
pub use error::Error;
pub use transport::TransportConfig;
