//! KYC Verification Gateway
//!
//! Routes PAN and Aadhaar link requests and KYC onboarding sessions to their
//! verification services, each backed by its own Postgres database, behind
//! bearer-token authentication.

pub mod api;
pub mod config;
pub mod crypto;
pub mod domain;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod migration;
pub mod openapi;
pub mod otp;
pub mod repository;
pub mod server;
pub mod service;
pub mod state;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
