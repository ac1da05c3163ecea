//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::DirectoryConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Overrides `upstream.base_url` when set.
pub const BASE_URL_ENV: &str = "EMPLOYEE_DIRECTORY_BASE_URL";

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
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration from an optional TOML file, apply environment
/// overrides, then validate.
pub fn load_config(path: Option<&Path>) -> Result<DirectoryConfig, ConfigError> {
    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => DirectoryConfig::default(),
    };

    finish(config, std::env::var(BASE_URL_ENV).ok())
}

fn finish(mut config: DirectoryConfig, base_url: Option<String>) -> Result<DirectoryConfig, ConfigError> {
    if let Some(base_url) = base_url.filter(|v| !v.trim().is_empty()) {
        config.upstream.base_url = base_url;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[listener]\nbind_address = \"127.0.0.1:9000\"\n[cache]\nenabled = false"
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.max_search_entries, 512);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[upstream\nbase_url = ").unwrap();
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_base_url_override() {
        let config = finish(DirectoryConfig::default(), Some("http://127.0.0.1:4000/api/v1".into())).unwrap();
        assert_eq!(config.upstream.base_url, "http://127.0.0.1:4000/api/v1");

        let config = finish(DirectoryConfig::default(), Some("  ".into())).unwrap();
        assert_eq!(config.upstream.base_url, crate::config::schema::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_invalid_override_fails_validation() {
        let err = finish(DirectoryConfig::default(), Some("not a url".into())).unwrap_err();
        assert!(err.to_string().starts_with("Validation failed: upstream.base_url"));
    }
}
