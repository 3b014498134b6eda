//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, ServerConfig, ListenConfig)
//! - [`limits`]: Buffer, queue and timeout limits (LimitsConfig)
//! - [`validation`]: Startup checks over a merged configuration

mod limits;
mod types;
pub mod validation;

pub use limits::LimitsConfig;
pub use types::{Config, ConfigError, ListenConfig, LogFormat, ServerConfig};
pub use validation::{ValidationError, validate};
