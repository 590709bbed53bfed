use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "deckview";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_slide: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windowed: Option<bool>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `deckview config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# deckview configuration\n{yaml}");
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "defaults.start_slide" => {
                let n: usize = value.parse().map_err(|_| {
                    anyhow::anyhow!("Invalid start_slide: {value}. Must be a slide number.")
                })?;
                if n == 0 {
                    anyhow::bail!("Invalid start_slide: {value}. Slide numbers start at 1.");
                }
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .start_slide = Some(n);
            }
            "defaults.windowed" => {
                let windowed = match value {
                    "true" => true,
                    "false" => false,
                    _ => anyhow::bail!("Invalid windowed: {value}. Must be 'true' or 'false'."),
                };
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .windowed = Some(windowed);
            }
            _ => anyhow::bail!(
                "Unknown config key: {key}. Valid keys: defaults.start_slide, defaults.windowed"
            ),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_start_slide() {
        let mut config = Config::default();
        config.set("defaults.start_slide", "3").unwrap();
        assert_eq!(config.defaults.unwrap().start_slide, Some(3));
    }

    #[test]
    fn test_set_rejects_zero_start_slide() {
        let mut config = Config::default();
        assert!(config.set("defaults.start_slide", "0").is_err());
    }

    #[test]
    fn test_set_windowed() {
        let mut config = Config::default();
        config.set("defaults.windowed", "true").unwrap();
        assert_eq!(config.defaults.unwrap().windowed, Some(true));
    }

    #[test]
    fn test_set_rejects_unknown_key() {
        let mut config = Config::default();
        assert!(config.set("defaults.theme", "dark").is_err());
    }

    #[test]
    fn test_roundtrip_yaml() {
        let mut config = Config::default();
        config.set("defaults.windowed", "true").unwrap();
        config.set("defaults.start_slide", "2").unwrap();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        let defaults = parsed.defaults.unwrap();
        assert_eq!(defaults.windowed, Some(true));
        assert_eq!(defaults.start_slide, Some(2));
    }
}
