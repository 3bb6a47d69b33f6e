use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::content::{ContentType, GenerationRequest};
use crate::core::personality::{InterestSet, SliderSet};

/// Floor for `request_timeout_secs`; zero would cancel every call at once.
pub const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceConfig,
    pub logging: LoggingConfig,
    pub personality: PersonalityDefaults,
    pub content: ContentDefaults,
}

/// Where the content service lives and how long to wait for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    /// Upper bound on a single service call, in seconds. Values below
    /// [`MIN_REQUEST_TIMEOUT_SECS`] are raised to it.
    pub request_timeout_secs: u64,
}

/// Log level and file location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set.
    pub level: String,
    /// Override the default log directory.
    pub log_dir: Option<PathBuf>,
}

/// Starting point for the personality editor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalityDefaults {
    pub sliders: SliderSet,
    pub interests: Vec<String>,
}

/// Defaults for the content generation form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentDefaults {
    pub content_type: ContentType,
    pub tone: String,
    pub word_count: u32,
    pub include_hashtags: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl ServiceConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(MIN_REQUEST_TIMEOUT_SECS))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl LoggingConfig {
    /// Resolved log directory (override or XDG data default).
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("persona-console").join("logs"))
                .unwrap_or_else(|| PathBuf::from("logs"))
        })
    }
}

impl Default for PersonalityDefaults {
    fn default() -> Self {
        Self {
            sliders: SliderSet::default(),
            interests: vec![
                "conservative politics".to_string(),
                "lifestyle".to_string(),
                "family".to_string(),
            ],
        }
    }
}

impl PersonalityDefaults {
    pub fn interest_set(&self) -> InterestSet {
        self.interests.iter().cloned().collect()
    }
}

impl Default for ContentDefaults {
    fn default() -> Self {
        Self {
            content_type: ContentType::Post,
            tone: "casual".to_string(),
            word_count: 150,
            include_hashtags: false,
        }
    }
}

impl ContentDefaults {
    /// A generation request for `topic` using these defaults.
    pub fn request(&self, topic: impl Into<String>) -> GenerationRequest {
        GenerationRequest::new(topic, self.content_type, self.tone.clone(), self.word_count)
            .with_hashtags(self.include_hashtags)
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/persona-console/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &Path) -> Self {
        match std::fs::read_to_string(config_path) {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", config_path.display());
                    if config.service.request_timeout_secs < MIN_REQUEST_TIMEOUT_SECS {
                        log::warn!(
                            "service.request_timeout_secs = {} is too small, using {}s",
                            config.service.request_timeout_secs,
                            MIN_REQUEST_TIMEOUT_SECS
                        );
                    }
                    config
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse config at {}: {e}, using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                log::debug!(
                    "No config file at {}, using defaults",
                    config_path.display()
                );
                Self::default()
            }
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("persona-console").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
