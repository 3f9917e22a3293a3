//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional TOML file ($QR_GATEWAY_CONFIG)
//!     → loader.rs (parse & deserialize)
//!     → schema.rs (environment overlay: CHANNEL_NAME, PEER_ENDPOINT, ...)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → passed by reference to identity, net, gateway and startup
//! ```
//!
//! # Design Decisions
//! - Config is built once at startup and never mutated afterwards
//! - Precedence: defaults < file < environment
//! - Credential and TLS paths derive from `crypto_path` unless set explicitly
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_effective_config, ConfigError};
pub use schema::{GatewayConfig, ObservabilityConfig, TimeoutConfig};
