//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Binaries call once at startup:
//!     → logging.rs (tracing subscriber, EnvFilter)
//!     → metrics.rs (Prometheus listener, optional)
//!
//! Gateway and ledger calls produce:
//!     → tracing events with transaction name and outcome
//!     → metrics.rs (per-transaction counters and latency)
//! ```
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level
//! - Metric updates are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
