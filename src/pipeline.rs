//! The narration pipeline: transform, sanitize, persist, synthesize.

use log::{error, info};
use tokio::sync::mpsc::Sender;

use crate::errors::AppResult;
use crate::models::{NarrationArtifact, NarrationRequest};
use crate::services::narrative::{sanitize, NarrativeClient};
use crate::services::speech::SpeechClient;
use crate::services::storage::ArtifactStore;

/// Progress of a single narration job, reported to the UI.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    Started,
    TransformingNarrative,
    WritingNarrative,
    SynthesizingSpeech,
    Completed(NarrationArtifact),
    Failed(String),
}

/// Runs one narration job end to end.
///
/// A degraded transform does not abort the job: the fallback text is
/// narrated and the artifact records the degradation. Speech synthesis
/// failures abort the job and are reported as `Failed`.
pub async fn run_narration(
    request: NarrationRequest,
    narrative_client: &NarrativeClient,
    speech_client: &SpeechClient,
    store: &ArtifactStore,
    events: Option<Sender<PipelineEvent>>,
) -> AppResult<NarrationArtifact> {
    emit(&events, PipelineEvent::Started).await;

    match run_steps(&request, narrative_client, speech_client, store, &events).await {
        Ok(artifact) => {
            info!("Narration completed: {}", artifact.folder.display());
            emit(&events, PipelineEvent::Completed(artifact.clone())).await;
            Ok(artifact)
        }
        Err(e) => {
            error!("Narration failed: {}", e);
            emit(&events, PipelineEvent::Failed(e.to_string())).await;
            Err(e)
        }
    }
}

async fn run_steps(
    request: &NarrationRequest,
    narrative_client: &NarrativeClient,
    speech_client: &SpeechClient,
    store: &ArtifactStore,
    events: &Option<Sender<PipelineEvent>>,
) -> AppResult<NarrationArtifact> {
    emit(events, PipelineEvent::TransformingNarrative).await;
    let outcome = narrative_client
        .transform(&request.text, request.style)
        .await;
    let narrative = sanitize::clean(outcome.text());

    emit(events, PipelineEvent::WritingNarrative).await;
    let folder = store.create_artifact_folder(&narrative).await?;
    let narrative_path = store.write_narrative(&folder, &narrative).await?;

    emit(events, PipelineEvent::SynthesizingSpeech).await;
    let audio_path = speech_client
        .synthesize_to_file(
            &narrative,
            &request.voice_id,
            &request.output_format,
            request.tone,
            &request.pitch,
            &folder,
        )
        .await?;

    Ok(NarrationArtifact {
        folder,
        narrative_path,
        audio_path,
        degraded: outcome.is_degraded(),
    })
}

// Получатель может уйти при завершении приложения; потерянные события не ошибка
async fn emit(events: &Option<Sender<PipelineEvent>>, event: PipelineEvent) {
    if let Some(sender) = events {
        let _ = sender.send(event).await;
    }
}
