//! Configuration management with file persistence

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Folio configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseSection,
    pub media: MediaSection,
    pub notify: NotifySection,
    pub seed: SeedSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSection {
    /// Database file path; empty means the platform default location
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaSection {
    /// Root directory for uploaded media; empty means the platform default
    pub root: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifySection {
    /// HTTP endpoint the lead notification is posted to.
    /// When unset, notifications are logged instead of sent.
    pub endpoint: Option<String>,
    /// Operator address that receives lead notifications
    pub operator_email: String,
    /// Request timeout for the notification endpoint
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedSection {
    /// Default number of sample projects created by `folio seed`
    pub count: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseSection { path: None },
            media: MediaSection { root: None },
            notify: NotifySection {
                endpoint: None,
                operator_email: "operator@example.com".to_string(),
                timeout_secs: 10,
            },
            seed: SeedSection { count: 10 },
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("FOLIO_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("folio")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, or create default if it doesn't exist
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            Ok(config)
        } else {
            // Return default config without creating file
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> anyhow::Result<()> {
        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let path = Self::config_path()?;
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Resolved database path (configured or platform default)
    pub fn database_path(&self) -> PathBuf {
        self.database
            .path
            .clone()
            .unwrap_or_else(crate::storage::default_database_path)
    }

    /// Resolved media root (configured or platform default)
    pub fn media_root(&self) -> PathBuf {
        self.media.root.clone().unwrap_or_else(default_media_root)
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        match key {
            "database.path" => Ok(self.database_path().display().to_string()),
            "media.root" => Ok(self.media_root().display().to_string()),
            "notify.endpoint" => Ok(self
                .notify
                .endpoint
                .clone()
                .unwrap_or_else(|| "(not set - notifications are logged)".to_string())),
            "notify.operator_email" => Ok(self.notify.operator_email.clone()),
            "notify.timeout_secs" => Ok(self.notify.timeout_secs.to_string()),
            "seed.count" => Ok(self.seed.count.to_string()),
            _ => Err(anyhow!(
                "Unknown configuration key: {}. Use `folio config list` to see available keys.",
                key
            )),
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "database.path" => {
                self.database.path = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            "media.root" => {
                self.media.root = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            "notify.endpoint" => {
                self.notify.endpoint = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            "notify.operator_email" => {
                if !value.contains('@') {
                    return Err(anyhow!("Invalid operator address: {}", value));
                }
                self.notify.operator_email = value.to_string();
            }
            "notify.timeout_secs" => {
                self.notify.timeout_secs = value
                    .parse()
                    .with_context(|| format!("Invalid timeout_secs value: {}", value))?;
            }
            "seed.count" => {
                let count: usize = value
                    .parse()
                    .with_context(|| format!("Invalid seed count value: {}", value))?;
                if count == 0 {
                    return Err(anyhow!("Seed count must be at least 1"));
                }
                self.seed.count = count;
            }
            _ => {
                return Err(anyhow!(
                    "Unknown configuration key: {}. Use `folio config list` to see available keys.",
                    key
                ));
            }
        }
        Ok(())
    }

    /// List all configuration keys and their values
    pub fn list(&self) -> anyhow::Result<Vec<(String, String)>> {
        let keys = vec![
            "database.path",
            "media.root",
            "notify.endpoint",
            "notify.operator_email",
            "notify.timeout_secs",
            "seed.count",
        ];

        keys.into_iter()
            .map(|key| {
                let value = self.get(key)?;
                Ok((key.to_string(), value))
            })
            .collect()
    }

    /// Reset configuration to defaults
    pub fn reset() -> anyhow::Result<()> {
        let path = Self::config_path()?;
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove config file: {}", path.display()))?;
        }
        Ok(())
    }
}

/// Get the default media root
pub fn default_media_root() -> PathBuf {
    if let Some(data_dir) = dirs::data_dir() {
        data_dir.join("folio").join("media")
    } else {
        PathBuf::from("media")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.notify.operator_email, "operator@example.com");
        assert!(config.notify.endpoint.is_none());
        assert_eq!(config.seed.count, 10);
    }

    #[test]
    fn test_set_and_get_keys() {
        let mut config = Config::default();

        config.set("notify.operator_email", "ops@folio.dev").unwrap();
        assert_eq!(config.get("notify.operator_email").unwrap(), "ops@folio.dev");

        config
            .set("notify.endpoint", "https://mail.example.com/send")
            .unwrap();
        assert_eq!(
            config.get("notify.endpoint").unwrap(),
            "https://mail.example.com/send"
        );

        config.set("seed.count", "25").unwrap();
        assert_eq!(config.seed.count, 25);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();

        assert!(config.set("notify.operator_email", "not-an-address").is_err());
        assert!(config.set("seed.count", "0").is_err());
        assert!(config.set("unknown.key", "x").is_err());
    }

    #[test]
    fn test_list_covers_all_keys() {
        let config = Config::default();
        let listed = config.list().unwrap();
        assert_eq!(listed.len(), 6);
    }
}
