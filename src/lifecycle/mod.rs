//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Log parameters → InitLedger (non-fatal) → CreateAsset → ReadAsset
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → stop the REST server
//! ```
//!
//! # Design Decisions
//! - Steps run strictly in order, one call at a time
//! - Only InitLedger failure is tolerated; everything else ends the run

pub mod signals;
pub mod startup;

pub use signals::shutdown_signal;
pub use startup::{run, StartupReport};
