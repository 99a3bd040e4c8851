pub mod auth;
pub mod client;
pub mod error;
pub mod manager;
pub mod types;
