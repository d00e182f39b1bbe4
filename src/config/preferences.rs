use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use log::warn;
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{NarrationStyle, Tone};

/// Persisted user preferences: a flat JSON document.
///
/// Missing keys take their defaults, so documents written by older versions
/// keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub voice_id: String,
    #[serde(default, deserialize_with = "style_from_name")]
    pub narration_style: NarrationStyle,
    #[serde(default = "default_output_format")]
    pub output_format: String,
    #[serde(default, deserialize_with = "tone_from_name")]
    pub tone: Tone,
    #[serde(default = "default_pitch")]
    pub pitch: String,
}

fn default_output_format() -> String {
    "mp3_44100_128".to_string()
}

fn default_pitch() -> String {
    "low".to_string()
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            voice_id: String::new(),
            narration_style: NarrationStyle::default(),
            output_format: default_output_format(),
            tone: Tone::default(),
            pitch: default_pitch(),
        }
    }
}

// Незнакомое имя стиля приводим к значению по умолчанию, а не к ошибке разбора
fn style_from_name<'de, D>(deserializer: D) -> Result<NarrationStyle, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    Ok(NarrationStyle::from_name(&name))
}

fn tone_from_name<'de, D>(deserializer: D) -> Result<Tone, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    Ok(Tone::from_name(&name))
}

/// Loads and saves the preferences document. Neither operation ever fails
/// the caller: a broken document falls back to defaults, a failed save is
/// logged and swallowed.
#[derive(Debug, Clone)]
pub struct PreferencesStore {
    path: PathBuf,
}

impl PreferencesStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Preferences {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Preferences::default(),
            Err(e) => {
                warn!(
                    "Error loading preferences from {}: {}",
                    self.path.display(),
                    e
                );
                return Preferences::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(prefs) => prefs,
            Err(e) => {
                warn!("Corrupt preferences document, using defaults: {}", e);
                Preferences::default()
            }
        }
    }

    pub fn save(&self, prefs: &Preferences) {
        match serde_json::to_string_pretty(prefs) {
            Ok(json) => {
                if let Err(e) = fs::write(&self.path, json) {
                    warn!("Error saving preferences to {}: {}", self.path.display(), e);
                }
            }
            Err(e) => warn!("Error serializing preferences: {}", e),
        }
    }
}
