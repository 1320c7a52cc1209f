// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Structured Logging
//!
//! Installs a global `tracing` subscriber: an `EnvFilter` (defaulting to
//! `info`, overridable via `RUST_LOG`) feeding either a JSON or a
//! human-readable formatter, selected by [`LogFormat`](super::config::LogFormat).
//!
//! Every request-scoped use case wraps its work in a span carrying
//! `request_id`, `project_id`, and `actor`, following the request-context
//! fields spec.md §6 requires on every audited operation. State
//! transitions log at `info`, denials at `warn`, unexpected failures at
//! `error`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::config::LogFormat;

/// Install the global `tracing` subscriber. Call once, at process start.
pub fn init(log_level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => {
            registry.with(fmt::layer().json().with_current_span(true).with_span_list(true)).init();
        }
        LogFormat::Pretty => {
            registry.with(fmt::layer().pretty()).init();
        }
    }
}

/// Open a request-scoped span carrying the attribution fields every
/// audited operation needs. Use cases enter this span for the duration of
/// their work; entries logged inside it automatically carry these fields.
#[macro_export]
macro_rules! request_span {
    ($request_id:expr, $project_id:expr, $actor:expr) => {
        tracing::info_span!(
            "request",
            request_id = %$request_id,
            project_id = %$project_id,
            actor = %$actor,
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_filter_falls_back_to_given_level_without_rust_log() {
        std::env::remove_var("RUST_LOG");
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        assert_eq!(filter.to_string(), "debug");
    }
}
