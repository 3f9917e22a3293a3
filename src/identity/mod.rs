//! Signing identity subsystem.
//!
//! # Data Flow
//! ```text
//! cert directory ──first file──▶ x509.rs (PEM → X.509, MSP binding)
//!                                        │
//! key directory ──first file──▶ signer.rs (PKCS#8 → SEC1 → PKCS#1)
//!                                        │
//!                                        ▼
//!                         credentials.rs → SigningIdentity
//! ```
//!
//! # Security Constraints
//! - Key material is read once at startup and held only in memory
//! - Never log private keys or sensitive data

pub mod credentials;
pub mod signer;
pub mod x509;

pub use credentials::{first_file_in, load_signing_identity, SigningIdentity};
pub use signer::PrivateKeySigner;
pub use x509::X509Identity;
