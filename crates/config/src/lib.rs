use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use scribe_core::UiLanguage;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const CURRENT_SCHEMA_VERSION: u32 = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    pub base_url: String,
    pub model: String,
    /// Environment variable holding the API key. Read on every request.
    pub api_key_env: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            api_key_env: "API_KEY".to_string(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

const fn default_request_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub database_file: String,
    pub notes_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_file: "scribe.db".to_string(),
            notes_key: "scribe_ai_notes".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    pub language: String,
    #[serde(default = "default_true")]
    pub continuous: bool,
    #[serde(default = "default_true")]
    pub interim_results: bool,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            language: UiLanguage::EnUs.tag().to_string(),
            continuous: true,
            interim_results: true,
        }
    }
}

const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub schema_version: u32,
    pub language: UiLanguage,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default = "default_notice_ttl_ms")]
    pub notice_ttl_ms: u64,
}

const fn default_notice_ttl_ms() -> u64 {
    3000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            language: UiLanguage::EnUs,
            ai: AiConfig::default(),
            storage: StorageConfig::default(),
            speech: SpeechConfig::default(),
            notice_ttl_ms: default_notice_ttl_ms(),
        }
    }
}

pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join("config.json"),
        }
    }

    pub fn from_default_location() -> Result<Self> {
        let mut dir = dirs::config_dir().context("failed to resolve config_dir")?;
        dir.push("scribe");
        Ok(Self::from_dir(dir))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_or_init(&self) -> Result<AppConfig> {
        if !self.path.exists() {
            let config = AppConfig::default();
            self.save(&config)?;
            return Ok(config);
        }

        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let mut config: AppConfig =
            serde_json::from_str(&raw).context("failed to parse app config json")?;
        self.migrate(&mut config);
        self.save(&config)?;
        Ok(config)
    }

    pub fn save(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let text = serde_json::to_string_pretty(config).context("failed to serialize config")?;
        fs::write(&self.path, text)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }

    fn migrate(&self, config: &mut AppConfig) {
        if config.schema_version >= CURRENT_SCHEMA_VERSION {
            return;
        }

        warn!(
            from = config.schema_version,
            to = CURRENT_SCHEMA_VERSION,
            "migrating app config schema"
        );

        // v1 kept the recognizer language implicit in the UI language.
        if config.schema_version < 2 && config.speech.language.trim().is_empty() {
            config.speech.language = config.language.tag().to_string();
        }
        config.schema_version = CURRENT_SCHEMA_VERSION;
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn default_location_is_under_platform_config_dir() {
        let Some(base) = dirs::config_dir() else {
            assert!(ConfigStore::from_default_location().is_err());
            return;
        };
        let store = ConfigStore::from_default_location().expect("default location");
        assert_eq!(store.path(), base.join("scribe").join("config.json"));
    }

    #[test]
    fn creates_default_config_when_missing() {
        let dir = tempdir().expect("tempdir");
        let store = ConfigStore::from_dir(dir.path());
        let config = store.load_or_init().expect("load default");
        assert_eq!(config.schema_version, CURRENT_SCHEMA_VERSION);
        assert_eq!(config.storage.notes_key, "scribe_ai_notes");
        assert_eq!(config.notice_ttl_ms, 3000);
        assert!(store.path().exists());
    }

    #[test]
    fn migrates_old_schema_and_fills_defaults() {
        let dir = tempdir().expect("tempdir");
        let store = ConfigStore::from_dir(dir.path());
        fs::write(
            store.path(),
            r#"{"schema_version":1,"language":"zh_cn","speech":{"language":""}}"#,
        )
        .expect("write legacy config");

        let config = store.load_or_init().expect("load legacy");
        assert_eq!(config.schema_version, CURRENT_SCHEMA_VERSION);
        assert_eq!(config.speech.language, "zh-CN");
        assert!(config.speech.continuous);
        assert_eq!(config.ai.api_key_env, "API_KEY");

        let reloaded = store.load_or_init().expect("reload");
        assert_eq!(reloaded.schema_version, CURRENT_SCHEMA_VERSION);
    }
}
