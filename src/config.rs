//! Compiler configuration, loaded from YAML with environment overrides.
//!
//! ```yaml
//! ip_pool: 10.0.0.0/22
//! format: python
//! log_level: warn
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::codegen::OutputFormat;
use crate::error::{MidoriError, Result};
use crate::topology::IpPool;

/// Environment variable overriding [`CompilerConfig::ip_pool`].
pub const ENV_IP_POOL: &str = "MIDORI_IP_POOL";
/// Environment variable overriding [`CompilerConfig::format`].
pub const ENV_FORMAT: &str = "MIDORI_FORMAT";
/// Environment variable overriding [`CompilerConfig::log_level`].
pub const ENV_LOG_LEVEL: &str = "MIDORI_LOG_LEVEL";

/// Settings shared by every compile a [`crate::Compiler`] performs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    /// Block that generated host addresses are drawn from.
    pub ip_pool: IpPool,
    /// Output language.
    pub format: OutputFormat,
    /// Log filter used by the CLI when `RUST_LOG` is unset.
    pub log_level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            ip_pool: IpPool::default(),
            format: OutputFormat::default(),
            log_level: default_log_level(),
        }
    }
}

impl CompilerConfig {
    /// Parse a YAML document.
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| MidoriError::config(e.to_string()))
    }

    /// Load a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| MidoriError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml(&text)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| MidoriError::config(e.to_string()))
    }

    /// Overlay `MIDORI_*` environment variables.
    pub fn apply_env(self) -> Result<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay values from `lookup`, keyed by the `MIDORI_*` variable names.
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(pool) = lookup(ENV_IP_POOL) {
            self.ip_pool = pool.parse()?;
        }
        if let Some(format) = lookup(ENV_FORMAT) {
            self.format = format.parse()?;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = level;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CompilerConfig::default();
        assert_eq!(config.ip_pool.to_string(), "10.0.0.0/22");
        assert_eq!(config.format, OutputFormat::Python);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_serialize_deserialize() {
        let config = CompilerConfig {
            ip_pool: "172.20.0.0/16".parse().unwrap(),
            format: OutputFormat::Json,
            log_level: "debug".into(),
        };
        let yaml = config.to_yaml().unwrap();
        assert_eq!(CompilerConfig::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = CompilerConfig::from_yaml("format: json\n").unwrap();
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.ip_pool, IpPool::default());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(CompilerConfig::from_yaml("ip_pool: 10.0.0.3/22\n").is_err());
        assert!(CompilerConfig::from_yaml("format: xml\n").is_err());
        assert!(CompilerConfig::from_yaml("pool: 10.0.0.0/8\n").is_err());
    }

    #[test]
    fn test_overrides_win() {
        let config = CompilerConfig::default()
            .apply_overrides(|key| match key {
                ENV_IP_POOL => Some("192.168.0.0/24".into()),
                ENV_LOG_LEVEL => Some("trace".into()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.ip_pool.to_string(), "192.168.0.0/24");
        assert_eq!(config.format, OutputFormat::Python);
        assert_eq!(config.log_level, "trace");
    }

    #[test]
    fn test_bad_override_is_an_error() {
        let result = CompilerConfig::default().apply_overrides(|key| {
            (key == ENV_FORMAT).then(|| "cobol".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = CompilerConfig::load(Path::new("/nonexistent/midori.yaml")).unwrap_err();
        assert!(matches!(err, MidoriError::FileReadError { .. }));
    }
}
