use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::generate::GenerationEndpoint;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    #[serde(default)]
    pub endpoints: Vec<GenerationEndpoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Cutoff depths scored per query
    pub depths: Vec<usize>,
    /// Documents fed to prompt assembly from the winning method
    pub top_n: usize,
    /// Query log CSV location
    pub query_log: PathBuf,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            depths: vec![1, 2, 3],
            top_n: 1,
            query_log: PathBuf::from("queries.csv"),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Config::default();
            config.save()?;
            return Ok(config);
        }

        let contents = fs::read_to_string(&config_path)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents)
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let toml_string = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        fs::write(&config_path, toml_string)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .context("Could not determine home directory")?;

        Ok(home.join(".chartjudge").join("config.toml"))
    }

    /// Endpoint entry by name
    pub fn endpoint(&self, name: &str) -> Option<&GenerationEndpoint> {
        self.endpoints.iter().find(|e| e.name == name)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            evaluation: EvaluationConfig::default(),
            endpoints: vec![
                GenerationEndpoint {
                    name: "openai".to_string(),
                    base_url: "https://api.openai.com/v1".to_string(),
                    api_key: None,
                },
                GenerationEndpoint {
                    name: "deepinfra".to_string(),
                    base_url: "https://api.deepinfra.com/v1/openai".to_string(),
                    api_key: None,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_depths() {
        let config = Config::default();
        assert_eq!(config.evaluation.depths, vec![1, 2, 3]);
        assert_eq!(config.evaluation.top_n, 1);
    }

    #[test]
    fn test_default_endpoints_present() {
        let config = Config::default();
        assert!(config.endpoint("openai").is_some());
        assert!(config.endpoint("deepinfra").is_some());
        assert!(config.endpoint("missing").is_none());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();

        let toml_string = toml::to_string(&config).unwrap();
        assert!(toml_string.contains("depths"));

        let deserialized: Config = toml::from_str(&toml_string).unwrap();
        assert_eq!(deserialized.evaluation.depths, vec![1, 2, 3]);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.evaluation.depths, vec![1, 2, 3]);
        assert!(config.endpoints.is_empty());
    }
}
