use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    APP_NAME, DEFAULT_ANALYSIS_DELAY_MS, DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CACHE_TTL_MINUTES,
    DEFAULT_CLASSIFIER_URL, ENV_PREFIX, HTTP_REQUEST_TIMEOUT_SECS, LOCAL_CONFIG_PATH,
};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Classifier service connection
    #[serde(default)]
    pub classifier: ClassifierSettings,

    /// Inline annotation and hover behaviour
    #[serde(default)]
    pub annotations: AnnotationSettings,

    /// Verdict cache bounds
    #[serde(default)]
    pub cache: CacheSettings,
}

/// Classifier service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierSettings {
    /// Base URL of the classifier
    pub endpoint: String,
    /// Bearer credential, if the service requires one
    #[serde(default)]
    pub api_key: Option<String>,
    /// Per-request timeout enforced by the HTTP client
    pub timeout_secs: u64,
}

impl ClassifierSettings {
    /// Credential with blank values treated as absent
    pub fn credential(&self) -> Option<String> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
    }
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_CLASSIFIER_URL.to_string(),
            api_key: None,
            timeout_secs: HTTP_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Annotation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationSettings {
    /// Render inline markers
    pub enabled: bool,
    /// Include raw metrics in hover and notifications
    pub show_metrics: bool,
    /// Settle delay before a hover issues a classifier request
    pub analysis_delay_ms: u64,
}

impl AnnotationSettings {
    pub fn analysis_delay(&self) -> Duration {
        Duration::from_millis(self.analysis_delay_ms)
    }
}

impl Default for AnnotationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            show_metrics: true,
            analysis_delay_ms: DEFAULT_ANALYSIS_DELAY_MS,
        }
    }
}

/// Cache settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Minutes a verdict stays fresh
    pub ttl_minutes: u64,
    /// Upper bound on stored verdicts
    pub max_entries: usize,
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_minutes * 60)
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_minutes: DEFAULT_CACHE_TTL_MINUTES,
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
        }
    }
}

/// Load configuration from multiple sources
pub fn load_config() -> Result<Config> {
    let global_config = get_config_dir()?.join("config.toml");
    let local_config = PathBuf::from(LOCAL_CONFIG_PATH);

    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if global_config.exists() {
        figment = figment.merge(Toml::file(&global_config));
    }

    if local_config.exists() {
        figment = figment.merge(Toml::file(&local_config));
    }

    extract(figment)
}

/// Load an explicit config file, still honouring environment overrides
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!("Config file not found: {}", path.display());
    }

    let figment = Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(path));
    extract(figment)
}

fn extract(figment: Figment) -> Result<Config> {
    // LENS_CLASSIFIER__API_KEY -> classifier.api_key
    figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .context("Failed to load configuration")
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", APP_NAME) {
        let config_dir = proj_dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;
        Ok(config_dir.to_path_buf())
    } else {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        let config_dir = PathBuf::from(home).join(".config").join(APP_NAME);
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }
}

/// Save configuration to file
pub fn save_config(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path = if let Some(p) = path {
        p
    } else {
        get_config_dir()?.join("config.toml")
    };

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

/// Create a default configuration file if it doesn't exist
pub fn init_config() -> Result<PathBuf> {
    let config_file = get_config_dir()?.join("config.toml");

    if !config_file.exists() {
        save_config(&Config::default(), Some(config_file.clone()))?;
    }

    Ok(config_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.cache.ttl(), Duration::from_secs(300));
        assert_eq!(config.annotations.analysis_delay(), Duration::from_millis(300));
        assert!(config.annotations.enabled);
        assert_eq!(config.classifier.credential(), None);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lens.toml");
        std::fs::write(
            &path,
            "[classifier]\nendpoint = \"http://classifier:9000\"\napi_key = \"sk-test\"\ntimeout_secs = 5\n\n[cache]\nttl_minutes = 10\nmax_entries = 50\n",
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.classifier.endpoint, "http://classifier:9000");
        assert_eq!(config.classifier.credential(), Some("sk-test".to_string()));
        assert_eq!(config.cache.ttl(), Duration::from_secs(600));
        assert_eq!(config.annotations, AnnotationSettings::default());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(load_config_from(&dir.path().join("absent.toml")).is_err());
    }

    #[test]
    fn test_save_round_trips_through_loader() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.annotations.show_metrics = false;

        save_config(&config, Some(path.clone())).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), config);
    }

    #[test]
    fn test_blank_credential_is_absent() {
        let settings = ClassifierSettings {
            api_key: Some("   ".to_string()),
            ..ClassifierSettings::default()
        };
        assert_eq!(settings.credential(), None);
    }
}
