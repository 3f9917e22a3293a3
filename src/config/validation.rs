//! Configuration validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before any file or network access

use crate::config::schema::GatewayConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a configuration for semantic errors.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let required = [
        ("channel_name", &config.channel_name),
        ("chaincode_name", &config.chaincode_name),
        ("msp_id", &config.msp_id),
        ("peer_host_alias", &config.peer_host_alias),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            errors.push(ValidationError {
                field,
                message: "must not be empty".to_string(),
            });
        }
    }

    if let Err(message) = check_endpoint(&config.peer_endpoint) {
        errors.push(ValidationError {
            field: "peer_endpoint",
            message,
        });
    }

    let timeouts = &config.timeouts;
    let deadlines = [
        ("timeouts.connect_secs", timeouts.connect_secs),
        ("timeouts.evaluate_secs", timeouts.evaluate_secs),
        ("timeouts.endorse_secs", timeouts.endorse_secs),
        ("timeouts.submit_secs", timeouts.submit_secs),
        ("timeouts.commit_status_secs", timeouts.commit_status_secs),
    ];
    for (field, secs) in deadlines {
        if secs == 0 {
            errors.push(ValidationError {
                field,
                message: "must be greater than zero".to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_endpoint(endpoint: &str) -> Result<(), String> {
    let (host, port) = endpoint
        .rsplit_once(':')
        .ok_or_else(|| format!("'{}' is not in host:port form", endpoint))?;
    if host.is_empty() {
        return Err(format!("'{}' has no host", endpoint));
    }
    port.parse::<u16>()
        .map(|_| ())
        .map_err(|_| format!("'{}' has an invalid port", endpoint))
}
