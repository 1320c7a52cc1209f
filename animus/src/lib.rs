// /////////////////////////////////////////////////////////////////////////////
// Animus
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

// Production code safety enforced via CI and `make lint-strict`
// (lib/bins checked separately from tests - tests may use unwrap/expect)

//! # Animus
//!
//! Animus is the control plane of a governed ML-datalab: a system of record
//! for projects, datasets, quality gates, experiments, and pipeline runs,
//! plus the admission checks that decide whether a run is allowed to touch
//! a dataset version before any Data Plane workload executes.
//!
//! This crate is the application and infrastructure home for that control
//! plane. It owns nothing about HTTP or gRPC framing — that surface is out
//! of scope for this workspace (see `SPEC_FULL.md` §1) — and instead exposes
//! governed execution as a library of project-scoped application services
//! plus the `animusd` administrative CLI (driven by the `animus-bootstrap`
//! crate) that calls them directly.
//!
//! ## Architecture
//!
//! The crate follows the same Clean Architecture / DDD layering as
//! [`animus_domain`], one layer up:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Application Layer                          │
//! │  (Commands, Use Cases)                                      │
//! └───────────────────────────┬───────────────────────────────────┘
//!                             │ depends on repository ports from
//! ┌───────────────────────────┴───────────────────────────────────┐
//! │                    Domain Layer (animus-domain)              │
//! │  (Entities, Value Objects, Domain Services, Repository Ports)│
//! └───────────────────────────┬───────────────────────────────────┘
//!                             │ implemented by
//! ┌───────────────────────────┴───────────────────────────────────┐
//! │                Infrastructure Layer                          │
//! │  (Postgres repositories, S3-compatible object store, auth,   │
//! │   audit, config, logging, metrics, runtime context)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Core Concepts
//!
//! ### Project
//! The tenancy boundary: every dataset, experiment, quality rule, and run
//! belongs to exactly one project.
//!
//! ### Dataset and dataset version
//! A dataset is a named, append-only series of immutable versions. Each
//! version's content lives in object storage; the row in Postgres records
//! its content hash, size, and quality-gate status.
//!
//! ### Quality rules and gates
//! A quality rule describes an automated check against a dataset version.
//! The gate for a version is `allow` only when every rule bound to it has
//! evaluated to `pass`.
//!
//! ### Experiments and runs
//! An experiment groups related experiment runs, each an attempt to
//! reproduce a result against a specific dataset version and code
//! reference. A pipeline run is a single admission-checked execution of a
//! pipeline spec, tracked step by step via its step-execution ledger.
//!
//! ### Run tokens
//! Short-lived, narrowly scoped credentials minted for a single run so a
//! Data Plane workload can read exactly the dataset version(s) the run was
//! admitted against, and nothing else.
//!
//! ## Error Handling
//!
//! Every application and infrastructure operation returns
//! `Result<T, animus_domain::GovernanceError>`. The bootstrap layer is the
//! only place that converts that error into a process exit code (see
//! `animus_bootstrap::exit_code`).
//!
//! ## Observability
//!
//! Structured logging via `tracing`, with `tracing-subscriber`'s
//! `EnvFilter` and JSON formatter selected by configuration, and Prometheus
//! counters/histograms for use-case latency and gate allow/block counts
//! (see [`infrastructure::logging`] and [`infrastructure::metrics`]).

pub mod application;
pub mod infrastructure;

// Tests are organized as:
// - Unit tests: #[cfg(test)] modules within each source file
// - Integration tests: separate files in tests/ directory

pub use animus_domain::error::GovernanceError;
