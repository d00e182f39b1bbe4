//! Playback controller: a small state machine over an audio engine.

pub mod rodio;

use std::path::{Path, PathBuf};

use log::debug;

use crate::errors::{AppError, AppResult};

/// Minimal transport contract the controller drives. Implemented by the
/// rodio engine and by a scripted fake in tests, so the state machine is
/// testable without a sound device.
pub trait AudioEngine {
    fn load(&mut self, path: &Path) -> AppResult<()>;
    fn play(&mut self) -> AppResult<()>;
    fn pause(&mut self);
    fn stop(&mut self);
    /// True while the engine still has audio queued.
    fn is_busy(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Loaded,
    Playing,
    Paused,
    Finished,
}

/// Snapshot of the player, polled by the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackStatus {
    pub state: PlayerState,
    pub current_path: Option<PathBuf>,
}

pub struct PlaybackController {
    engine: Box<dyn AudioEngine>,
    state: PlayerState,
    current_path: Option<PathBuf>,
}

impl PlaybackController {
    pub fn new(engine: Box<dyn AudioEngine>) -> Self {
        Self {
            engine,
            state: PlayerState::Idle,
            current_path: None,
        }
    }

    /// Stops any current playback and loads a new track without starting it.
    pub fn load(&mut self, path: &Path) -> AppResult<()> {
        self.engine.stop();
        self.engine.load(path)?;
        self.state = PlayerState::Loaded;
        self.current_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Starts or resumes playback. With no track loaded this is a signaled
    /// condition, not a silent no-op.
    pub fn play(&mut self) -> AppResult<()> {
        match self.state {
            PlayerState::Idle => Err(AppError::NothingSelected),
            PlayerState::Playing => Ok(()),
            PlayerState::Paused => {
                self.engine.play()?;
                self.state = PlayerState::Playing;
                Ok(())
            }
            PlayerState::Loaded | PlayerState::Finished => {
                // A drained engine has to re-read the track from the start
                if self.state == PlayerState::Finished {
                    let path = self.current_path.clone().ok_or(AppError::NothingSelected)?;
                    self.engine.load(&path)?;
                }
                self.engine.play()?;
                self.state = PlayerState::Playing;
                Ok(())
            }
        }
    }

    /// Only valid while playing; otherwise a no-op.
    pub fn pause(&mut self) {
        if self.state == PlayerState::Playing {
            self.engine.pause();
            self.state = PlayerState::Paused;
        }
    }

    /// Halts playback unconditionally and clears the current track.
    pub fn stop(&mut self) {
        self.engine.stop();
        self.state = PlayerState::Idle;
        self.current_path = None;
    }

    /// Polled periodically by the UI; detects the natural end of a track.
    pub fn poll_status(&mut self) -> PlaybackStatus {
        if self.state == PlayerState::Playing && !self.engine.is_busy() {
            debug!("Track finished: {:?}", self.current_path);
            self.state = PlayerState::Finished;
        }
        self.status()
    }

    pub fn status(&self) -> PlaybackStatus {
        PlaybackStatus {
            state: self.state,
            current_path: self.current_path.clone(),
        }
    }
}
