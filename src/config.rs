use std::path::Path;

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

const CONFIG_PATH: &str = ".chatcal/config.toml";

/// Generator endpoint and prompt settings from `.chatcal/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// API root; requests go to `<base_url>generate`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// IANA timezone name used for the reference date and in the prompt.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_base_url() -> String {
    "http://localhost:11434/api/".to_string()
}

fn default_model() -> String {
    "llama2".to_string()
}

fn default_timezone() -> String {
    "Europe/Berlin".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timezone: default_timezone(),
        }
    }
}

impl Config {
    /// Full URL of the streaming generate endpoint.
    pub fn generate_url(&self) -> String {
        if self.base_url.ends_with('/') {
            format!("{}generate", self.base_url)
        } else {
            format!("{}/generate", self.base_url)
        }
    }

    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("invalid timezone '{}': {e}", self.timezone))
    }

    /// Override fields from `CHATCAL_*` variables, using `lookup` to read them.
    fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("CHATCAL_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = lookup("CHATCAL_MODEL") {
            self.model = v;
        }
        if let Some(v) = lookup("CHATCAL_TIMEZONE") {
            self.timezone = v;
        }
    }
}

/// Load configuration from `.chatcal/config.toml` under `dir`.
///
/// Falls back to defaults if the file is missing. Environment overrides are
/// applied last, and the timezone is validated.
pub fn load(dir: &Path) -> Result<Config> {
    let mut config = load_file(dir)?;
    config.apply_env_with(|key| std::env::var(key).ok());
    config.tz()?;
    Ok(config)
}

fn load_file(dir: &Path) -> Result<Config> {
    let path = dir.join(CONFIG_PATH);
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let config: Config = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config: {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, contents: &str) {
        let path = dir.path().join(CONFIG_PATH);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_file(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.generate_url(), "http://localhost:11434/api/generate");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "model = \"llama3\"\n");
        let config = load_file(dir.path()).unwrap();
        assert_eq!(config.model, "llama3");
        assert_eq!(config.timezone, "Europe/Berlin");
    }

    #[test]
    fn bad_toml_is_error() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "model = [");
        assert!(load_file(dir.path()).is_err());
    }

    #[test]
    fn env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("CHATCAL_BASE_URL", "http://gpu-box:11434/api"),
            ("CHATCAL_TIMEZONE", "America/New_York"),
        ]
        .into();
        let mut config = Config::default();
        config.apply_env_with(|k| vars.get(k).map(ToString::to_string));
        assert_eq!(config.generate_url(), "http://gpu-box:11434/api/generate");
        assert_eq!(config.model, "llama2");
        assert_eq!(config.tz().unwrap(), chrono_tz::America::New_York);
    }

    #[test]
    fn invalid_timezone() {
        let config = Config {
            timezone: "Mars/Olympus".into(),
            ..Config::default()
        };
        assert!(config.tz().is_err());
    }
}
