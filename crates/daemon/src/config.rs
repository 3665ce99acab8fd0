// SPDX-License-Identifier: MIT

//! Process-wide configuration, read once at startup from environment
//! variables and immutable for the process lifetime. Variable names are
//! part of the external contract and reproduced verbatim.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_PORT: &str = ":8080";
const DEFAULT_JOBS_DIR: &str = "./examples/";
const DEFAULT_LOGS_DIR: &str = "/tmp/repeater/";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub jobs_dir: PathBuf,
    pub password: String,
    pub notify_program: String,
    pub logs_dir: Option<PathBuf>,
}

impl Config {
    /// Load from environment, applying the documented defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let port = std::env::var("REPEATER_PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string());
        let addr = parse_addr(&port)?;

        let jobs_dir = std::env::var("REPEATER_JOBS_DIRECTORY").unwrap_or_else(|_| DEFAULT_JOBS_DIR.to_string());
        let password = std::env::var("REPEATER_PASSWORD").unwrap_or_default();
        let notify_program = std::env::var("REPEATER_NOTIFY").unwrap_or_default();

        let logs_dir = match std::env::var("REPEATER_LOGS_DIRECTORY") {
            Ok(s) if s.is_empty() => None,
            Ok(s) => Some(PathBuf::from(s)),
            Err(_) => Some(PathBuf::from(DEFAULT_LOGS_DIR)),
        };

        Ok(Self {
            addr,
            jobs_dir: PathBuf::from(jobs_dir),
            password,
            notify_program,
            logs_dir,
        })
    }

    pub fn auth_required(&self) -> bool {
        !self.password.is_empty()
    }
}

/// Accepts either a bare `:PORT` shorthand (bound on all interfaces) or a
/// full `host:port` address.
fn parse_addr(raw: &str) -> Result<SocketAddr, ConfigError> {
    let full = if let Some(port) = raw.strip_prefix(':') {
        format!("0.0.0.0:{port}")
    } else {
        raw.to_string()
    };
    full.parse().map_err(|e| ConfigError::Invalid { var: "REPEATER_PORT", reason: format!("{e}") })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
