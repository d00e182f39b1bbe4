// Configuration module
// Centralized management of application configuration

use std::env;
use std::path::PathBuf;

pub mod preferences;

/// Fixed filesystem layout of the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub output_root: PathBuf,
    pub preferences_path: PathBuf,
    pub error_log_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("narrations"),
            preferences_path: PathBuf::from("preferences.json"),
            error_log_path: PathBuf::from("error_log.txt"),
        }
    }
}

/// API keys read from the environment once at startup.
/// A missing key disables the feature that needs it, never startup itself.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub xai_api_key: Option<String>,
    pub elevenlabs_api_key: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self {
            xai_api_key: read_key("XAI_API_KEY"),
            elevenlabs_api_key: read_key("ELEVENLABS_API_KEY"),
        }
    }
}

// Пустое значение переменной равнозначно её отсутствию
fn read_key(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}
