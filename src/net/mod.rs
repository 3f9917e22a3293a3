//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! configured TLS path ──exists?──▶ use it
//!        │ no
//!        ▼
//! walk crypto path: "ca.crt" under the peer alias, then any "*ca.crt"
//!        │
//!        ▼
//! tls.rs (PEM trust anchor, rejected early if it holds no certificate)
//!        │
//!        ▼
//! channel.rs (TLS gRPC dial, server-name override, startup deadline)
//! ```
//!
//! # Design Decisions
//! - Path resolution is a pure function of the filesystem, no ambient state
//! - The trust anchor is validated before any network activity
//! - One channel per process, dropped at exit

pub mod channel;
pub mod tls;

pub use channel::{connect, connect_from_config, install_crypto_provider};
pub use tls::{load_trust_anchor, resolve_tls_cert_path};
