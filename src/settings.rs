//! Persistent display settings
//!
//! Settings live in a JSON object on disk. Every known key is read on its
//! own: a missing or mistyped key falls back to its default without
//! affecting the others, and keys this version doesn't know about are kept
//! and written back untouched.

use crate::{ReadAloudError, Result};
use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// File name used for the settings file
pub const SETTINGS_FILE: &str = "tts_settings.json";

/// Whether highlighting advances per word or per line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightMode {
    #[default]
    Word,
    Line,
}

/// Reader display settings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub font_family: String,
    pub font_size: u32,
    pub word_spacing: i32,
    pub letter_spacing: i32,
    pub bg_color: String,
    pub fg_color: String,
    pub highlight_color: String,
    pub highlight_mode: HighlightMode,

    /// Keys not known to this version, preserved as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            font_size: 14,
            word_spacing: 1,
            letter_spacing: 0,
            bg_color: "#ffffff".to_string(),
            fg_color: "#000000".to_string(),
            highlight_color: "#ffe599".to_string(),
            highlight_mode: HighlightMode::Word,
            extra: Map::new(),
        }
    }
}

/// Take `key` out of `map`, falling back to `default` when absent or invalid
fn take_or_default<T: DeserializeOwned>(map: &mut Map<String, Value>, key: &str, default: T) -> T {
    match map.remove(key) {
        None => default,
        Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
            warn!("Ignoring invalid value for setting '{}': {}", key, e);
            default
        }),
    }
}

fn parse_value<T: DeserializeOwned>(key: &str, value: Value) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| ReadAloudError::Config(format!("Invalid value for '{}': {}", key, e)))
}

impl Settings {
    /// Build settings from a JSON object, defaulting field by field
    pub fn from_map(mut map: Map<String, Value>) -> Self {
        let defaults = Self::default();

        Self {
            font_family: take_or_default(&mut map, "font_family", defaults.font_family),
            font_size: take_or_default(&mut map, "font_size", defaults.font_size),
            word_spacing: take_or_default(&mut map, "word_spacing", defaults.word_spacing),
            letter_spacing: take_or_default(&mut map, "letter_spacing", defaults.letter_spacing),
            bg_color: take_or_default(&mut map, "bg_color", defaults.bg_color),
            fg_color: take_or_default(&mut map, "fg_color", defaults.fg_color),
            highlight_color: take_or_default(&mut map, "highlight_color", defaults.highlight_color),
            highlight_mode: take_or_default(&mut map, "highlight_mode", defaults.highlight_mode),
            extra: map,
        }
    }

    /// Look up a single setting by its JSON key
    pub fn get(&self, key: &str) -> Option<Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(mut map)) => map.remove(key),
            _ => None,
        }
    }

    /// Set a single setting by its JSON key
    ///
    /// Known keys must carry a value of the right type; unknown keys are
    /// stored verbatim.
    pub fn set(&mut self, key: &str, value: Value) -> Result<()> {
        match key {
            "font_family" => self.font_family = parse_value(key, value)?,
            "font_size" => self.font_size = parse_value(key, value)?,
            "word_spacing" => self.word_spacing = parse_value(key, value)?,
            "letter_spacing" => self.letter_spacing = parse_value(key, value)?,
            "bg_color" => self.bg_color = parse_value(key, value)?,
            "fg_color" => self.fg_color = parse_value(key, value)?,
            "highlight_color" => self.highlight_color = parse_value(key, value)?,
            "highlight_mode" => self.highlight_mode = parse_value(key, value)?,
            _ => {
                self.extra.insert(key.to_string(), value);
            }
        }
        Ok(())
    }
}

impl<'de> Deserialize<'de> for Settings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let map = Map::deserialize(deserializer)?;
        Ok(Self::from_map(map))
    }
}

/// Settings file on disk
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Store backed by an explicit file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the per-user default location
    ///
    /// `<config dir>/readaloud/tts_settings.json`, or the working directory
    /// when the platform has no config directory.
    pub fn default_location() -> Self {
        let path = dirs::config_dir()
            .map(|dir| dir.join(crate::APP_NAME).join(SETTINGS_FILE))
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE));
        Self::new(path)
    }

    /// Expose the settings file path for display
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, or defaults if the file is missing or unreadable
    pub fn load(&self) -> Settings {
        debug!("Loading settings from {:?}", self.path);

        if !self.path.exists() {
            debug!("Settings file not found, using defaults");
            return Settings::default();
        }

        match self.read() {
            Ok(settings) => settings,
            Err(e) => {
                error!("Error loading settings: {}", e);
                Settings::default()
            }
        }
    }

    fn read(&self) -> Result<Settings> {
        let contents = fs::read_to_string(&self.path)?;
        match serde_json::from_str::<Value>(&contents)? {
            Value::Object(map) => Ok(Settings::from_map(map)),
            other => Err(ReadAloudError::Config(format!(
                "Expected a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Save settings to disk
    pub fn save(&self, settings: &Settings) -> Result<()> {
        debug!("Saving settings to {:?}", self.path);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, json)?;
        info!("Settings saved to {:?}", self.path);
        Ok(())
    }

    /// Reset to defaults and persist them
    ///
    /// Always returns the defaults; a failed write is logged.
    pub fn reset(&self) -> Settings {
        let defaults = Settings::default();
        if let Err(e) = self.save(&defaults) {
            error!("Error saving settings: {}", e);
        }
        defaults
    }

    /// Change one setting and save
    pub fn update(&self, key: &str, value: Value) -> Result<Settings> {
        let mut settings = self.load();
        settings.set(key, value)?;
        self.save(&settings)?;
        Ok(settings)
    }

    /// Read one setting from disk
    pub fn get(&self, key: &str) -> Option<Value> {
        self.load().get(key)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
