//! Configuration validation.
//!
//! Runs once at startup, after command-line overrides have been merged,
//! so that every problem is reported together.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("server.name is required")]
    MissingServerName,
    #[error("server.name must not contain spaces, got '{0}'")]
    InvalidServerName(String),
    #[error("a server password is required")]
    MissingPassword,
    #[error("the server password must not contain whitespace")]
    InvalidPassword,
    #[error("listen.port must be between 1 and 65535")]
    InvalidPort,
    #[error("limits.{0} must be greater than zero")]
    ZeroLimit(&'static str),
    #[error("limits.idle_timeout_secs ({idle}) is shorter than sweep_interval_secs ({sweep})")]
    IdleShorterThanSweep { idle: u64, sweep: u64 },
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let name = &config.server.name;
    if name.is_empty() {
        errors.push(ValidationError::MissingServerName);
    } else if name.contains(char::is_whitespace) {
        errors.push(ValidationError::InvalidServerName(name.clone()));
    }

    match config.server.password.as_deref() {
        None | Some("") => errors.push(ValidationError::MissingPassword),
        Some(password) if password.contains(char::is_whitespace) => {
            errors.push(ValidationError::InvalidPassword)
        }
        Some(_) => {}
    }

    if config.listen.port == 0 {
        errors.push(ValidationError::InvalidPort);
    }

    let limits = &config.limits;
    let sizes = [
        ("idle_timeout_secs", limits.idle_timeout_secs as usize),
        ("sweep_interval_secs", limits.sweep_interval_secs as usize),
        ("max_buffer", limits.max_buffer),
        ("read_chunk", limits.read_chunk),
        ("send_queue", limits.send_queue),
        ("event_queue", limits.event_queue),
        ("max_channel_name", limits.max_channel_name),
    ];
    for (field, value) in sizes {
        if value == 0 {
            errors.push(ValidationError::ZeroLimit(field));
        }
    }

    if limits.sweep_interval_secs > 0 && limits.idle_timeout_secs < limits.sweep_interval_secs {
        errors.push(ValidationError::IdleShorterThanSweep {
            idle: limits.idle_timeout_secs,
            sweep: limits.sweep_interval_secs,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
