//! # chatrelay-core
//!
//! Core crate for ChatRelay. Contains the configuration schemas and the
//! unified error system shared by the realtime engine, the HTTP layer and
//! the server binary.
//!
//! This crate has **no** internal dependencies on other ChatRelay crates.

pub mod config;
pub mod error;
pub mod result;

pub use config::AppConfig;
pub use error::AppError;
pub use result::AppResult;
