//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::AirdropConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML (or `.json`) file.
pub fn load_config(path: &Path) -> Result<AirdropConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config = parse_config(path, &content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn parse_config(path: &Path, content: &str) -> Result<AirdropConfig, ConfigError> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    } else {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const VALID_TOML: &str = r#"
rpc_url = "http://127.0.0.1:8899"
sender_wallet_path = "sender.json"
token_address = "So11111111111111111111111111111111111111112"
token_decimals = 6
input_csv_path = "airdrop.csv"
output_csv_path = "results.csv"

[retry]
max_retries = 3
"#;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_toml() {
        let file = write_temp(".toml", VALID_TOML);
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.retry.initial_backoff_ms, 1_000);
    }

    #[test]
    fn test_load_json() {
        let file = write_temp(
            ".json",
            r#"{"rpcUrl":"http://127.0.0.1:8899","senderWalletPath":"k.json",
                "tokenAddress":"So11111111111111111111111111111111111111112",
                "tokenDecimals":2,"inputCsvPath":"in.csv","outputCsvPath":"out.csv"}"#,
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.token_decimals, 2);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Path::new("/nonexistent/airdrop.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_missing_field_is_parse_error() {
        let file = write_temp(".toml", "rpc_url = \"http://127.0.0.1:8899\"\n");
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let file = write_temp(".toml", &VALID_TOML.replace("max_retries = 3", "max_retries = 0"));
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("max_retries"));
    }
}
