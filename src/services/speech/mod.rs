//! Speech synthesizer backed by the ElevenLabs API.
//!
//! Unlike the narrative transformer, failures here are propagated: audio
//! generation cannot degrade gracefully to placeholder output.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::StreamExt;
use log::{debug, error, info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::errors::{AppError, AppResult};
use crate::models::{Tone, Voice};

const ELEVENLABS_API_BASE: &str = "https://api.elevenlabs.io/v1";
const SPEECH_MODEL_ID: &str = "eleven_turbo_v2";
const SYNTHESIS_TIMEOUT: Duration = Duration::from_secs(120);
const VOICES_TIMEOUT: Duration = Duration::from_secs(30);

/// Fixed audio filename inside an artifact folder.
pub const AUDIO_FILENAME: &str = "gothic_audio.mp3";

// Настройки голоса для ElevenLabs
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
    style: f32,
    use_speaker_boost: bool,
}

impl VoiceSettings {
    /// Tone drives stability and style intensity; the other parameters are
    /// fixed.
    fn for_tone(tone: Tone) -> Self {
        Self {
            stability: if tone == Tone::Mysterious { 0.2 } else { 0.4 },
            similarity_boost: 0.6,
            style: if tone == Tone::Somber { 0.8 } else { 1.0 },
            use_speaker_boost: true,
        }
    }
}

// Synthesis request body
#[derive(Debug, Serialize)]
struct SynthesisRequest {
    text: String,
    model_id: String,
    voice_settings: VoiceSettings,
}

// Voice catalog response
#[derive(Debug, Deserialize)]
struct VoicesResponse {
    voices: Vec<VoiceEntry>,
}

#[derive(Debug, Deserialize)]
struct VoiceEntry {
    voice_id: String,
    name: String,
}

/// Client for the speech-synthesis service.
#[derive(Debug, Clone)]
pub struct SpeechClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SpeechClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, ELEVENLABS_API_BASE.to_string())
    }

    /// Client pointed at a custom endpoint; used by tests with a mock server.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
        }
    }

    /// Synthesizes `text` and streams the audio bytes to `gothic_audio.mp3`
    /// inside `folder`, overwriting any existing file.
    ///
    /// `pitch` is accepted for parity with the persisted preferences but is
    /// not mapped to any voice setting.
    pub async fn synthesize_to_file(
        &self,
        text: &str,
        voice_id: &str,
        output_format: &str,
        tone: Tone,
        pitch: &str,
        folder: &Path,
    ) -> AppResult<PathBuf> {
        let request = SynthesisRequest {
            text: text.to_string(),
            model_id: SPEECH_MODEL_ID.to_string(),
            voice_settings: VoiceSettings::for_tone(tone),
        };

        debug!(
            "Synthesizing speech: voice {}, tone {}, pitch {} (pitch is not mapped)",
            voice_id,
            tone.name(),
            pitch
        );

        let response = self
            .client
            .post(format!("{}/text-to-speech/{}", self.base_url, voice_id))
            .query(&[
                ("output_format", output_format),
                ("optimize_streaming_latency", "0"),
            ])
            .header("xi-api-key", &self.api_key)
            .json(&request)
            .timeout(SYNTHESIS_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                error!("Speech synthesis request failed: {}", e);
                AppError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Speech API error: HTTP {}, body: {}", status, body);
            return Err(AppError::ApiError(format!("HTTP {}: {}", status, body)));
        }

        let audio_path = folder.join(AUDIO_FILENAME);
        let mut file = File::create(&audio_path).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| {
                error!("Error reading audio stream: {}", e);
                AppError::from(e)
            })?;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        info!("Audio written to {}", audio_path.display());
        Ok(audio_path)
    }

    /// Fetches the voice catalog.
    pub async fn list_voices(&self) -> AppResult<Vec<Voice>> {
        let response = self
            .client
            .get(format!("{}/voices", self.base_url))
            .header("xi-api-key", &self.api_key)
            .timeout(VOICES_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::ApiError(format!(
                "Failed to fetch voices: HTTP {}",
                status
            )));
        }

        let data: VoicesResponse = response.json().await?;
        Ok(data
            .voices
            .into_iter()
            .map(|entry| Voice {
                display_name: entry.name,
                voice_id: entry.voice_id,
            })
            .collect())
    }
}

/// Loads the startup voice catalog with placeholder fallbacks: a missing
/// credential or a failed fetch leaves the app usable.
pub async fn load_voice_catalog(client: Option<&SpeechClient>) -> Vec<Voice> {
    let Some(client) = client else {
        return vec![Voice {
            display_name: "API Key Missing".to_string(),
            voice_id: "missing_key".to_string(),
        }];
    };

    match client.list_voices().await {
        Ok(voices) => voices,
        Err(e) => {
            warn!("Error getting available voices: {}", e);
            vec![Voice {
                display_name: "Default Voice".to_string(),
                voice_id: "default_voice_id".to_string(),
            }]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mysterious_tone_lowers_stability() {
        let settings = VoiceSettings::for_tone(Tone::Mysterious);
        assert_eq!(settings.stability, 0.2);
        assert_eq!(settings.style, 1.0);
    }

    #[test]
    fn somber_tone_lowers_style_intensity() {
        let settings = VoiceSettings::for_tone(Tone::Somber);
        assert_eq!(settings.stability, 0.4);
        assert_eq!(settings.style, 0.8);
    }

    #[test]
    fn menacing_tone_uses_the_higher_defaults() {
        let settings = VoiceSettings::for_tone(Tone::Menacing);
        assert_eq!(settings.stability, 0.4);
        assert_eq!(settings.style, 1.0);
        assert_eq!(settings.similarity_boost, 0.6);
        assert!(settings.use_speaker_boost);
    }

    #[tokio::test]
    async fn missing_credential_yields_placeholder_voice() {
        let voices = load_voice_catalog(None).await;
        assert_eq!(voices.len(), 1);
        assert_eq!(voices[0].display_name, "API Key Missing");
        assert_eq!(voices[0].voice_id, "missing_key");
    }
}
