//! HTTP access to the study backend.

pub mod client;
pub mod config;
pub mod remote;

pub use client::ApiClient;
pub use config::ApiConfig;
pub use remote::RemoteRepository;
