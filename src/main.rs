use anyhow::Context;
use log::{info, warn};

use deep_narrator::config::preferences::PreferencesStore;
use deep_narrator::config::{AppConfig, Credentials};
use deep_narrator::services::narrative::NarrativeClient;
use deep_narrator::services::playback::rodio::RodioEngine;
use deep_narrator::services::playback::PlaybackController;
use deep_narrator::services::speech::{self, SpeechClient};
use deep_narrator::services::storage::ArtifactStore;
use deep_narrator::ui::{self, App};
use deep_narrator::utils;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::default();

    // Логгер инициализируется первым: все остальные сбои должны попасть в лог
    utils::logger::init_logger(&config.error_log_path)
        .context("failed to initialize logging")?;

    let credentials = Credentials::from_env();
    if credentials.xai_api_key.is_none() {
        warn!("XAI_API_KEY is not set; narrative generation will be unavailable");
    }
    if credentials.elevenlabs_api_key.is_none() {
        warn!("ELEVENLABS_API_KEY is not set; speech synthesis will be unavailable");
    }

    std::fs::create_dir_all(&config.output_root).with_context(|| {
        format!(
            "failed to create output directory {}",
            config.output_root.display()
        )
    })?;

    let prefs_store = PreferencesStore::new(config.preferences_path.clone());
    let preferences = prefs_store.load();

    let narrative_client = credentials.xai_api_key.clone().map(NarrativeClient::new);
    let speech_client = credentials.elevenlabs_api_key.clone().map(SpeechClient::new);

    // Каталог голосов запрашивается один раз при старте и заодно служит
    // проверкой доступности сервиса
    let voices = speech::load_voice_catalog(speech_client.as_ref()).await;
    info!("Loaded {} voice(s)", voices.len());

    let controller = match RodioEngine::new() {
        Ok(engine) => Some(PlaybackController::new(Box::new(engine))),
        Err(e) => {
            warn!("Audio output unavailable, playback disabled: {}", e);
            None
        }
    };

    let artifact_store = ArtifactStore::new(config.output_root.clone());

    let app = App::new(
        config,
        preferences,
        prefs_store,
        narrative_client,
        speech_client,
        artifact_store,
        controller,
        voices,
    );

    ui::run(app).await
}
