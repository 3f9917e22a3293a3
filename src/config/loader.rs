//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable naming an optional TOML configuration file.
pub const CONFIG_PATH_ENV_VAR: &str = "QR_GATEWAY_CONFIG";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse a TOML file without semantic validation.
pub fn parse_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let config = parse_config(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Build the configuration the binaries run with.
///
/// Starts from the file named by `QR_GATEWAY_CONFIG` (or defaults), overlays
/// the process environment, then validates the result.
pub fn load_effective_config() -> Result<GatewayConfig, ConfigError> {
    let mut config = match std::env::var(CONFIG_PATH_ENV_VAR) {
        Ok(path) if !path.is_empty() => parse_config(Path::new(&path))?,
        _ => GatewayConfig::default(),
    };
    config.apply_env(|key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
channel_name = "qrchannel"
peer_endpoint = "peer0:7051"

[timeouts]
evaluate_secs = 2
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.channel_name, "qrchannel");
        assert_eq!(config.chaincode_name, "livestock");
        assert_eq!(config.timeouts.evaluate_secs, 2);
        assert_eq!(config.timeouts.endorse_secs, 15);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "peer_endpoint = \"no-port\"\nchannel_name = \"\"").unwrap();

        match load_config(file.path()) {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config(Path::new("/nonexistent/qr.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_load_malformed_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "channel_name = ").unwrap();
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().starts_with("Parse error"));
    }
}
