//! Rodio-backed audio engine.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::debug;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

use super::AudioEngine;
use crate::errors::{AppError, AppResult};

/// Plays audio through the default output device. The `OutputStream` must
/// stay alive for the sink to keep producing sound.
pub struct RodioEngine {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sink: Option<Sink>,
}

impl RodioEngine {
    /// Opens the default output device. Fails on headless hosts, which
    /// disables playback for the session.
    pub fn new() -> AppResult<Self> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| AppError::PlaybackError(format!("no audio output device: {}", e)))?;
        Ok(Self {
            _stream: stream,
            handle,
            sink: None,
        })
    }
}

impl AudioEngine for RodioEngine {
    fn load(&mut self, path: &Path) -> AppResult<()> {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }

        let file = File::open(path)?;
        let source = Decoder::new(BufReader::new(file))
            .map_err(|e| AppError::PlaybackError(format!("cannot decode {}: {}", path.display(), e)))?;
        let sink = Sink::try_new(&self.handle)
            .map_err(|e| AppError::PlaybackError(e.to_string()))?;

        // Дорожка ставится в паузу сразу: запуск только по play()
        sink.pause();
        sink.append(source);
        self.sink = Some(sink);

        debug!("Loaded {}", path.display());
        Ok(())
    }

    fn play(&mut self) -> AppResult<()> {
        match &self.sink {
            Some(sink) => {
                sink.play();
                Ok(())
            }
            None => Err(AppError::PlaybackError("no source loaded".to_string())),
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    fn is_busy(&self) -> bool {
        self.sink.as_ref().map(|sink| !sink.empty()).unwrap_or(false)
    }
}
