//! Shared utilities for the strategy workspace
//!
//! This crate provides common functionality used by the engine and the CLI,
//! including logging setup and typed environment lookups.

pub mod config;
pub mod logging;

pub use config::{EnvError, env_parse, env_string};
pub use logging::{LogFormat, init_tracing, init_tracing_with};
