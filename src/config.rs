//! Client configuration
//!
//! Defaults are built in; a TOML file and a couple of environment variables
//! can override them.

use crate::{ChatError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable pointing at an explicit config file
pub const CONFIG_PATH_ENV: &str = "MILKWIZARD_CONFIG";
/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "MILKWIZARD_API_URL";

/// Remote API settings
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the assistant server, without a trailing slash
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
        }
    }
}

impl ApiConfig {
    /// Join an endpoint path onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Microphone capture settings
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Longest recording kept, in seconds; older samples are dropped
    pub max_recording_secs: u32,
    /// Bounded channel size between the capture callback and the UI
    pub channel_buffer_size: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            max_recording_secs: 120,
            channel_buffer_size: 1024,
        }
    }
}

/// User-facing strings
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct UiTexts {
    pub assistant_name: String,
    pub welcome_title: String,
    pub welcome_subtitle: String,
    pub input_placeholder: String,
    pub thinking: String,
    /// Shown when a successful reply carries neither `answer` nor `response`
    pub fallback_answer: String,
    /// Chat notice after a failed text query
    pub text_error: String,
    /// Chat notice after a failed voice query (transcription or answer)
    pub voice_error: String,
    pub alert_title: String,
    pub alert_recording_failed: String,
    pub alert_voice_failed: String,
}

impl Default for UiTexts {
    fn default() -> Self {
        Self {
            assistant_name: "Süt Sihirbazı".to_string(),
            welcome_title: "Merhaba, Çiftçi Dostum!".to_string(),
            welcome_subtitle:
                "Bugün çiftliğin verimi veya ineklerin sağlığı hakkında ne öğrenmek istersin?"
                    .to_string(),
            input_placeholder: "Sihirbaza sorun...".to_string(),
            thinking: "Süt Sihirbazı düşünüyor...".to_string(),
            fallback_answer: "Yanıt yok.".to_string(),
            text_error: "Bağlantı hatası oluştu.".to_string(),
            voice_error: "Üzgünüm, sizi anlayamadım veya bir bağlantı sorunu var.".to_string(),
            alert_title: "Hata".to_string(),
            alert_recording_failed: "Kayıt başlatılamadı.".to_string(),
            alert_voice_failed: "İşlem sırasında bir sorun oluştu.".to_string(),
        }
    }
}

/// Complete client configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub audio: AudioConfig,
    pub texts: UiTexts,
}

impl ClientConfig {
    /// Set the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api.base_url = base_url.into();
        self
    }

    /// Set the maximum recording length
    pub fn with_max_recording_secs(mut self, secs: u32) -> Self {
        self.audio.max_recording_secs = secs;
        self
    }

    /// Replace the user-facing strings
    pub fn with_texts(mut self, texts: UiTexts) -> Self {
        self.texts = texts;
        self
    }

    /// Parse a configuration from TOML text; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ChatError::Config(e.to_string()))
    }

    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ChatError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
            .map_err(|e| ChatError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load defaults, then the config file if one exists, then env overrides
    pub fn load() -> Result<Self> {
        let mut config = match config_path() {
            Some(path) if path.exists() => {
                info!("Loading configuration from {}", path.display());
                Self::from_file(&path)?
            }
            Some(path) => {
                debug!("No configuration file at {}, using defaults", path.display());
                Self::default()
            }
            None => Self::default(),
        };

        if let Ok(url) = std::env::var(API_URL_ENV) {
            config.api.base_url = url;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let url = &self.api.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ChatError::Config(format!(
                "API base URL must start with http:// or https://, got {:?}",
                url
            )));
        }

        if self.audio.max_recording_secs == 0 {
            return Err(ChatError::Config(
                "max_recording_secs must be greater than zero".to_string(),
            ));
        }

        if self.audio.channel_buffer_size == 0 {
            return Err(ChatError::Config(
                "channel_buffer_size must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Location of the configuration file, if one can be determined
pub fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("milkwizard").join("config.toml"))
}
