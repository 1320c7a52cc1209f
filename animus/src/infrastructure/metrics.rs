// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Metrics
//!
//! Prometheus counters and histograms for control-plane concerns: mutation
//! counts per resource type, audit-write failures, quality-gate
//! allow/block counts, and object-store operation latencies. Carried even
//! though spec.md's Non-goals exclude a concrete policy language and TLS
//! termination — metrics are ambient infrastructure, not a named feature.

use prometheus::{Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry};

/// Process-wide metric handles, constructed once and shared behind `Arc`.
pub struct Metrics {
    /// Mutations committed, labeled by resource type (`project`, `dataset`,
    /// `dataset_version`, `quality_rule`, `quality_evaluation`,
    /// `experiment`, `experiment_run`, `run`, `step_execution`).
    pub mutations_total: IntCounterVec,
    /// Audit-event writes that failed after the governing mutation
    /// committed, labeled by resource type.
    pub audit_write_failures_total: IntCounterVec,
    /// Quality-gate evaluations, labeled by outcome (`allow`, `block`).
    pub gate_decisions_total: IntCounterVec,
    /// Use-case latency in seconds, labeled by use case name.
    pub use_case_latency_seconds: HistogramVec,
    /// Object-store request latency in seconds, labeled by operation
    /// (`put`, `get`, `presign`).
    pub object_store_latency_seconds: HistogramVec,
    /// Run tokens minted.
    pub run_tokens_minted_total: IntCounter,
}

impl Metrics {
    /// Construct and register every metric against a fresh [`Registry`].
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        Self::new_with_registry(&registry)
    }

    /// Construct and register every metric against a caller-supplied
    /// registry (so the binary can expose one `/metrics` endpoint backed
    /// by a single shared registry).
    pub fn new_with_registry(registry: &Registry) -> Result<Self, prometheus::Error> {
        let mutations_total = IntCounterVec::new(
            Opts::new("animus_mutations_total", "Mutations committed, by resource type"),
            &["resource_type"],
        )?;
        let audit_write_failures_total = IntCounterVec::new(
            Opts::new(
                "animus_audit_write_failures_total",
                "Audit-event writes that failed after their governing mutation committed",
            ),
            &["resource_type"],
        )?;
        let gate_decisions_total = IntCounterVec::new(
            Opts::new("animus_gate_decisions_total", "Quality-gate evaluations, by outcome"),
            &["outcome"],
        )?;
        let use_case_latency_seconds = HistogramVec::new(
            HistogramOpts::new("animus_use_case_latency_seconds", "Use-case latency in seconds"),
            &["use_case"],
        )?;
        let object_store_latency_seconds = HistogramVec::new(
            HistogramOpts::new("animus_object_store_latency_seconds", "Object-store request latency in seconds"),
            &["operation"],
        )?;
        let run_tokens_minted_total =
            IntCounter::new("animus_run_tokens_minted_total", "Run tokens minted")?;

        registry.register(Box::new(mutations_total.clone()))?;
        registry.register(Box::new(audit_write_failures_total.clone()))?;
        registry.register(Box::new(gate_decisions_total.clone()))?;
        registry.register(Box::new(use_case_latency_seconds.clone()))?;
        registry.register(Box::new(object_store_latency_seconds.clone()))?;
        registry.register(Box::new(run_tokens_minted_total.clone()))?;

        Ok(Self {
            mutations_total,
            audit_write_failures_total,
            gate_decisions_total,
            use_case_latency_seconds,
            object_store_latency_seconds,
            run_tokens_minted_total,
        })
    }

    /// Record a use case's wall-clock latency under its name.
    pub fn observe_use_case(&self, use_case: &str, seconds: f64) {
        self.use_case_latency_seconds.with_label_values(&[use_case]).observe(seconds);
    }

    /// Start a timer for an object-store operation, recorded on drop.
    pub fn start_object_store_timer(&self, operation: &str) -> prometheus::HistogramTimer {
        self.object_store_latency_seconds.with_label_values(&[operation]).start_timer()
    }
}

/// Build a single-sample histogram for tests without wiring a full
/// [`Metrics`] instance.
#[cfg(test)]
fn lone_histogram(name: &str) -> Histogram {
    Histogram::with_opts(HistogramOpts::new(name, "test histogram")).expect("valid histogram opts")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_all_metrics_without_collision() {
        let metrics = Metrics::new().expect("metrics register cleanly");
        metrics.mutations_total.with_label_values(&["dataset"]).inc();
        metrics.gate_decisions_total.with_label_values(&["block"]).inc();
        metrics.observe_use_case("create_project", 0.01);
        assert_eq!(metrics.mutations_total.with_label_values(&["dataset"]).get(), 1);
    }

    #[test]
    fn lone_histogram_observes() {
        let histogram = lone_histogram("animus_test_histogram");
        histogram.observe(1.5);
        assert_eq!(histogram.get_sample_count(), 1);
    }
}
