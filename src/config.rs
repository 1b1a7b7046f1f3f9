use crate::catalog::{MoodCatalog, MoodDefinition, MoodSet};
use crate::controller::DEFAULT_TRUSTED_ORIGIN;
use crate::embed::EmbedSize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// User-editable configuration, stored in `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub mood_set: MoodSet,
    /// Mood selected at startup. Empty = start with nothing selected.
    #[serde(default = "default_mood")]
    pub default_mood: String,
    #[serde(default = "default_origin")]
    pub trusted_origin: String,
    #[serde(default)]
    pub embed: EmbedSize,
    /// Replaces the preset entirely when non-empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub moods: Vec<MoodDefinition>,
}

fn default_mood() -> String {
    "happy".to_string()
}

fn default_origin() -> String {
    DEFAULT_TRUSTED_ORIGIN.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mood_set: MoodSet::default(),
            default_mood: default_mood(),
            trusted_origin: default_origin(),
            embed: EmbedSize::default(),
            moods: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn get_config_dir() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("moodwheel");
        std::fs::create_dir_all(&path).ok();
        path
    }

    pub fn get_config_path() -> PathBuf {
        Self::get_config_dir().join("config.toml")
    }

    pub fn get_log_dir() -> PathBuf {
        Self::get_config_dir().join("logs")
    }

    pub fn load() -> Self {
        Self::load_from(&Self::get_config_path())
    }

    /// Missing file: write defaults. Unreadable or unparsable: defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            let config = Self::default();
            if let Ok(content) = config.to_toml() {
                let _ = fs::write(path, content);
            }
            return config;
        }

        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                Self::default()
            }),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read config");
                Self::default()
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Custom moods if valid, otherwise the configured preset.
    pub fn catalog(&self) -> MoodCatalog {
        if self.moods.is_empty() {
            return MoodCatalog::preset(self.mood_set);
        }
        MoodCatalog::new(self.moods.clone()).unwrap_or_else(|e| {
            warn!(error = %e, "custom moods rejected, falling back to preset");
            MoodCatalog::preset(self.mood_set)
        })
    }

    pub fn initial_mood(&self) -> Option<&str> {
        let id = self.default_mood.trim();
        (!id.is_empty()).then_some(id)
    }
}
