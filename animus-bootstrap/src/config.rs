// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Bootstrap-Phase Configuration
//!
//! Holds the handful of settings the bootstrap layer itself needs before the
//! composition root can build the full, `config`-crate-backed
//! `animus::infrastructure::config::AppConfig` (layered defaults → config
//! file → environment). This struct only carries what CLI parsing already
//! produced: an optional config file override, log verbosity, and the
//! shutdown grace period.
//!
//! ## Immutability
//!
//! Built once from [`crate::ValidatedCli`] and never mutated afterward, so it
//! can be shared across async tasks without synchronization.

use std::path::PathBuf;
use std::time::Duration;

/// Log level requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl LogLevel {
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Bootstrap-phase settings, immutable after construction.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Optional path to a config file overriding `ANIMUS_CONFIG_FILE`.
    config_file: Option<PathBuf>,
    log_level: LogLevel,
    verbose: bool,
    shutdown_grace_period: Duration,
}

impl BootstrapConfig {
    pub fn builder() -> BootstrapConfigBuilder {
        BootstrapConfigBuilder::default()
    }

    pub fn config_file(&self) -> Option<&PathBuf> {
        self.config_file.as_ref()
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn shutdown_grace_period(&self) -> Duration {
        self.shutdown_grace_period
    }
}

/// Builder for [`BootstrapConfig`].
#[derive(Debug, Default)]
pub struct BootstrapConfigBuilder {
    config_file: Option<PathBuf>,
    log_level: Option<LogLevel>,
    verbose: bool,
    shutdown_grace_period: Option<Duration>,
}

impl BootstrapConfigBuilder {
    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = Some(level);
        self
    }

    pub fn verbose(mut self, enabled: bool) -> Self {
        self.verbose = enabled;
        self
    }

    pub fn shutdown_grace_period(mut self, period: Duration) -> Self {
        self.shutdown_grace_period = Some(period);
        self
    }

    pub fn build(self) -> BootstrapConfig {
        BootstrapConfig {
            config_file: self.config_file,
            log_level: self.log_level.unwrap_or_default(),
            verbose: self.verbose,
            shutdown_grace_period: self
                .shutdown_grace_period
                .unwrap_or(Duration::from_secs(crate::shutdown::DEFAULT_GRACE_PERIOD_SECS)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let config = BootstrapConfig::builder().build();
        assert_eq!(config.log_level(), LogLevel::Info);
        assert!(!config.is_verbose());
        assert!(config.config_file().is_none());
    }

    #[test]
    fn builder_overrides() {
        let config = BootstrapConfig::builder()
            .config_file("/etc/animus/config.toml")
            .log_level(LogLevel::Debug)
            .verbose(true)
            .shutdown_grace_period(Duration::from_secs(30))
            .build();

        assert_eq!(config.log_level(), LogLevel::Debug);
        assert!(config.is_verbose());
        assert_eq!(config.config_file(), Some(&PathBuf::from("/etc/animus/config.toml")));
        assert_eq!(config.shutdown_grace_period(), Duration::from_secs(30));
    }

    #[test]
    fn log_level_maps_to_tracing() {
        assert_eq!(LogLevel::Error.to_tracing_level(), tracing::Level::ERROR);
        assert_eq!(LogLevel::Trace.to_tracing_level(), tracing::Level::TRACE);
    }
}
