//! Integration tests for the API clients and the narration pipeline,
//! backed by wiremock so no real service is ever hit.

use tempfile::tempdir;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use deep_narrator::models::{NarrationRequest, NarrationStyle, Tone};
use deep_narrator::pipeline::{run_narration, PipelineEvent};
use deep_narrator::services::catalog;
use deep_narrator::services::narrative::{
    NarrativeClient, NarrativeOutcome, EMPTY_RESPONSE_FALLBACK,
};
use deep_narrator::services::speech::{load_voice_catalog, SpeechClient};
use deep_narrator::services::storage::ArtifactStore;

const GOTHIC_PROSE: &str = "The ancient woods whispered secrets. (a low wind moans) Beneath the boughs, shadows gathered.";

fn chat_response(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "cmpl-1",
        "choices": [
            { "message": { "role": "assistant", "content": content } }
        ]
    })
}

async fn mount_chat(server: &MockServer, content: &str) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer chat-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response(content)))
        .mount(server)
        .await;
}

async fn mount_speech(server: &MockServer, voice_id: &str, audio: &[u8]) {
    Mock::given(method("POST"))
        .and(path(format!("/text-to-speech/{}", voice_id)))
        .and(header("xi-api-key", "speech-key"))
        .and(query_param("output_format", "mp3_44100_128"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(audio.to_vec()))
        .mount(server)
        .await;
}

fn narrative_client(server: &MockServer) -> NarrativeClient {
    NarrativeClient::with_base_url("chat-key".to_string(), server.uri())
}

fn speech_client(server: &MockServer) -> SpeechClient {
    SpeechClient::with_base_url("speech-key".to_string(), server.uri())
}

#[tokio::test]
async fn transformer_returns_generated_prose() {
    let server = MockServer::start().await;
    mount_chat(&server, GOTHIC_PROSE).await;

    let outcome = narrative_client(&server)
        .transform("A walk in the woods", NarrationStyle::ClassicGothic)
        .await;

    assert_eq!(
        outcome,
        NarrativeOutcome::Generated(GOTHIC_PROSE.to_string())
    );
}

#[tokio::test]
async fn transformer_sends_style_specific_system_prompt() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({
            "model": "grok-beta"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response("prose")))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = narrative_client(&server)
        .transform("some text", NarrationStyle::CosmicHorror)
        .await;
    assert!(!outcome.is_degraded());

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let system = body["messages"][0]["content"].as_str().unwrap();
    assert!(system.contains("cosmic horror"));
    let user = body["messages"][1]["content"].as_str().unwrap();
    assert!(user.contains("some text"));
}

#[tokio::test]
async fn transformer_empty_content_yields_fixed_placeholder() {
    let server = MockServer::start().await;
    mount_chat(&server, "").await;

    let outcome = narrative_client(&server)
        .transform("anything", NarrationStyle::ClassicGothic)
        .await;

    assert_eq!(
        outcome,
        NarrativeOutcome::Degraded(EMPTY_RESPONSE_FALLBACK.to_string())
    );
    assert!(!outcome.text().is_empty());
}

#[tokio::test]
async fn transformer_http_error_degrades_instead_of_failing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream on fire"))
        .mount(&server)
        .await;

    let outcome = narrative_client(&server)
        .transform("anything", NarrationStyle::FolkHorror)
        .await;

    assert!(outcome.is_degraded());
    assert!(outcome.text().starts_with("The dark powers have failed."));
}

#[tokio::test]
async fn speech_synthesis_streams_bytes_to_file() {
    let server = MockServer::start().await;
    mount_speech(&server, "voice-1", b"ID3 fake mp3 payload").await;

    let dir = tempdir().unwrap();
    let audio_path = speech_client(&server)
        .synthesize_to_file(
            "a narrated tale",
            "voice-1",
            "mp3_44100_128",
            Tone::Mysterious,
            "low",
            dir.path(),
        )
        .await
        .unwrap();

    assert_eq!(audio_path.file_name().unwrap(), "gothic_audio.mp3");
    assert_eq!(
        std::fs::read(&audio_path).unwrap(),
        b"ID3 fake mp3 payload"
    );
}

#[tokio::test]
async fn speech_synthesis_propagates_http_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/text-to-speech/voice-1"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let result = speech_client(&server)
        .synthesize_to_file(
            "a narrated tale",
            "voice-1",
            "mp3_44100_128",
            Tone::Somber,
            "low",
            dir.path(),
        )
        .await;

    assert!(result.is_err(), "synthesis must not degrade gracefully");
    assert!(!dir.path().join("gothic_audio.mp3").exists());
}

#[tokio::test]
async fn voice_catalog_parses_the_voices_listing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/voices"))
        .and(header("xi-api-key", "speech-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "voices": [
                { "voice_id": "v1", "name": "Edgar" },
                { "voice_id": "v2", "name": "Lenore" }
            ]
        })))
        .mount(&server)
        .await;

    let voices = speech_client(&server).list_voices().await.unwrap();
    assert_eq!(voices.len(), 2);
    assert_eq!(voices[0].display_name, "Edgar");
    assert_eq!(voices[1].voice_id, "v2");
}

#[tokio::test]
async fn voice_catalog_falls_back_to_default_voice_on_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/voices"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = speech_client(&server);
    let voices = load_voice_catalog(Some(&client)).await;

    assert_eq!(voices.len(), 1);
    assert_eq!(voices[0].display_name, "Default Voice");
    assert_eq!(voices[0].voice_id, "default_voice_id");
}

/// End-to-end: "A walk in the woods" through transform, sanitize, storage,
/// synthesis, and a catalog refresh that lists the new artifact first.
#[tokio::test]
async fn end_to_end_narration_produces_artifact_and_catalog_entry() {
    let server = MockServer::start().await;
    mount_chat(&server, GOTHIC_PROSE).await;
    mount_speech(&server, "voice-1", b"fake audio bytes").await;

    let dir = tempdir().unwrap();
    let store = ArtifactStore::new(dir.path().to_path_buf());
    let (tx, mut rx) = tokio::sync::mpsc::channel(16);

    let request = NarrationRequest {
        text: "A walk in the woods".to_string(),
        style: NarrationStyle::ClassicGothic,
        tone: Tone::Mysterious,
        pitch: "low".to_string(),
        voice_id: "voice-1".to_string(),
        output_format: "mp3_44100_128".to_string(),
    };

    let artifact = run_narration(
        request,
        &narrative_client(&server),
        &speech_client(&server),
        &store,
        Some(tx),
    )
    .await
    .unwrap();

    assert!(!artifact.degraded);

    // Folder named from the sanitized narrative's opening, cut at the period
    assert_eq!(
        artifact.folder.file_name().unwrap(),
        "The ancient woods whispered secrets"
    );

    // Narrative on disk has the stage direction stripped
    let narrative = std::fs::read_to_string(&artifact.narrative_path).unwrap();
    assert!(!narrative.contains("(a low wind moans)"));
    assert!(narrative.contains("The ancient woods whispered secrets."));

    // Non-empty audio next to it
    let audio = std::fs::read(&artifact.audio_path).unwrap();
    assert!(!audio.is_empty());
    assert_eq!(artifact.audio_path.parent(), artifact.narrative_path.parent());

    // Catalog refresh lists the new entry first
    let entries = catalog::refresh(dir.path());
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, artifact.audio_path);
    assert_eq!(
        entries[0].display_name,
        "The ancient woods whispered secrets - gothic_audio.mp3"
    );

    // Progress events arrive in pipeline order, ending with Completed
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    assert!(matches!(events.first(), Some(PipelineEvent::Started)));
    assert!(matches!(events.last(), Some(PipelineEvent::Completed(_))));
}

/// A degraded transform still narrates the fallback text and flags the artifact.
#[tokio::test]
async fn degraded_transform_is_narrated_and_flagged() {
    let server = MockServer::start().await;
    mount_chat(&server, "").await;
    mount_speech(&server, "voice-1", b"fallback audio").await;

    let dir = tempdir().unwrap();
    let store = ArtifactStore::new(dir.path().to_path_buf());

    let request = NarrationRequest {
        text: "anything".to_string(),
        style: NarrationStyle::ClassicGothic,
        tone: Tone::Menacing,
        pitch: "low".to_string(),
        voice_id: "voice-1".to_string(),
        output_format: "mp3_44100_128".to_string(),
    };

    let artifact = run_narration(
        request,
        &narrative_client(&server),
        &speech_client(&server),
        &store,
        None,
    )
    .await
    .unwrap();

    assert!(artifact.degraded);
    let narrative = std::fs::read_to_string(&artifact.narrative_path).unwrap();
    assert_eq!(narrative, EMPTY_RESPONSE_FALLBACK);
}

/// Speech failure aborts the job with a Failed event after the narrative was
/// already written.
#[tokio::test]
async fn speech_failure_fails_the_pipeline() {
    let server = MockServer::start().await;
    mount_chat(&server, GOTHIC_PROSE).await;

    Mock::given(method("POST"))
        .and(path("/text-to-speech/voice-1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("voice lost"))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let store = ArtifactStore::new(dir.path().to_path_buf());
    let (tx, mut rx) = tokio::sync::mpsc::channel(16);

    let request = NarrationRequest {
        text: "A walk in the woods".to_string(),
        style: NarrationStyle::ClassicGothic,
        tone: Tone::Mysterious,
        pitch: "low".to_string(),
        voice_id: "voice-1".to_string(),
        output_format: "mp3_44100_128".to_string(),
    };

    let result = run_narration(
        request,
        &narrative_client(&server),
        &speech_client(&server),
        &store,
        Some(tx),
    )
    .await;

    assert!(result.is_err());

    let mut saw_failed = false;
    while let Ok(event) = rx.try_recv() {
        if let PipelineEvent::Failed(message) = event {
            saw_failed = true;
            assert!(message.contains("500"));
        }
    }
    assert!(saw_failed);

    // The narrative was written before synthesis failed; no audio exists
    let folder = dir.path().join("The ancient woods whispered secrets");
    assert!(folder.join("gothic_narrative.txt").exists());
    assert!(!folder.join("gothic_audio.mp3").exists());
}
