//! Terminal UI: a three-pane dark layout with voice/style/tone selectors,
//! a text input and the generated-tracks list with transport controls.

mod draw;

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use log::error;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::config::preferences::{Preferences, PreferencesStore};
use crate::config::AppConfig;
use crate::models::{NarrationRequest, NarrationStyle, Tone, Voice};
use crate::pipeline::{self, PipelineEvent};
use crate::services::catalog::{self, CatalogEntry};
use crate::services::narrative::NarrativeClient;
use crate::services::playback::{PlaybackController, PlayerState};
use crate::services::speech::SpeechClient;
use crate::services::storage::ArtifactStore;

/// Drives `poll_status` and the natural-end detection.
const PLAYER_POLL_INTERVAL: Duration = Duration::from_millis(500);
/// Redraw/input cadence of the event loop.
const UI_TICK_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pane {
    Voices,
    Styles,
    Tones,
    Input,
    Tracks,
}

impl Pane {
    fn next(self) -> Self {
        match self {
            Pane::Voices => Pane::Styles,
            Pane::Styles => Pane::Tones,
            Pane::Tones => Pane::Input,
            Pane::Input => Pane::Tracks,
            Pane::Tracks => Pane::Voices,
        }
    }
}

pub struct App {
    config: AppConfig,
    preferences: Preferences,
    prefs_store: PreferencesStore,
    narrative_client: Option<NarrativeClient>,
    speech_client: Option<SpeechClient>,
    artifact_store: ArtifactStore,
    controller: Option<PlaybackController>,

    pub(crate) voices: Vec<Voice>,
    pub(crate) focus: Pane,
    pub(crate) voice_index: usize,
    pub(crate) style_index: usize,
    pub(crate) tone_index: usize,
    pub(crate) input: String,
    pub(crate) tracks: Vec<CatalogEntry>,
    pub(crate) track_index: usize,
    pub(crate) now_playing: String,
    pub(crate) status: String,
    pub(crate) is_generating: bool,
}

impl App {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: AppConfig,
        preferences: Preferences,
        prefs_store: PreferencesStore,
        narrative_client: Option<NarrativeClient>,
        speech_client: Option<SpeechClient>,
        artifact_store: ArtifactStore,
        controller: Option<PlaybackController>,
        voices: Vec<Voice>,
    ) -> Self {
        let voice_index = voices
            .iter()
            .position(|v| v.voice_id == preferences.voice_id)
            .unwrap_or(0);
        let style_index = NarrationStyle::ALL
            .iter()
            .position(|s| *s == preferences.narration_style)
            .unwrap_or(0);
        let tone_index = Tone::ALL
            .iter()
            .position(|t| *t == preferences.tone)
            .unwrap_or(0);
        let tracks = catalog::refresh(&config.output_root);

        Self {
            config,
            preferences,
            prefs_store,
            narrative_client,
            speech_client,
            artifact_store,
            controller,
            voices,
            focus: Pane::Input,
            voice_index,
            style_index,
            tone_index,
            input: String::new(),
            tracks,
            track_index: 0,
            now_playing: "No file selected".to_string(),
            status: "Scribe thy words, then press Ctrl+G to awaken the abyss.".to_string(),
            is_generating: false,
        }
    }

    /// Handles one key event; returns true when the app should quit.
    fn handle_key(&mut self, key: KeyEvent, events: &mpsc::Sender<PipelineEvent>) -> bool {
        // Ctrl+G запускает генерацию из любой панели
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('g') {
            self.generate(events);
            return false;
        }

        match key.code {
            KeyCode::Esc => return true,
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return false;
            }
            _ => {}
        }

        if self.focus == Pane::Input {
            match key.code {
                KeyCode::Char(c) => self.input.push(c),
                KeyCode::Backspace => {
                    self.input.pop();
                }
                KeyCode::Enter => self.input.push('\n'),
                _ => {}
            }
            return false;
        }

        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Enter => {
                if self.focus == Pane::Tracks {
                    self.play_selected_track();
                }
            }
            KeyCode::Char(' ') => self.toggle_pause(),
            KeyCode::Char('s') => self.stop_playback(),
            KeyCode::Char('r') => {
                self.refresh_tracks();
                self.status = "Track list refreshed.".to_string();
            }
            _ => {}
        }
        false
    }

    fn move_selection(&mut self, delta: isize) {
        fn step(index: usize, delta: isize, len: usize) -> usize {
            if len == 0 {
                return 0;
            }
            index
                .saturating_add_signed(delta)
                .min(len - 1)
        }

        match self.focus {
            Pane::Voices => self.voice_index = step(self.voice_index, delta, self.voices.len()),
            Pane::Styles => {
                self.style_index = step(self.style_index, delta, NarrationStyle::ALL.len())
            }
            Pane::Tones => self.tone_index = step(self.tone_index, delta, Tone::ALL.len()),
            Pane::Tracks => self.track_index = step(self.track_index, delta, self.tracks.len()),
            Pane::Input => {}
        }
    }

    /// Validates input and credentials, persists the current selections and
    /// spawns the narration job. The action stays disabled until the job
    /// finishes: one narration at a time.
    fn generate(&mut self, events: &mpsc::Sender<PipelineEvent>) {
        if self.is_generating {
            return;
        }

        let text = self.input.trim().to_string();
        if text.is_empty() {
            self.status = "The abyss demands a tale. Scribe thy words.".to_string();
            self.focus = Pane::Input;
            return;
        }

        let Some(narrative_client) = self.narrative_client.clone() else {
            self.status =
                "The xAI API key is missing. Set XAI_API_KEY to transform text.".to_string();
            return;
        };
        let Some(speech_client) = self.speech_client.clone() else {
            self.status =
                "The ElevenLabs API key is missing. Set ELEVENLABS_API_KEY to narrate.".to_string();
            return;
        };
        let Some(voice) = self.voices.get(self.voice_index) else {
            self.status = "Please select a voice from the list.".to_string();
            return;
        };

        let style = NarrationStyle::ALL[self.style_index];
        let tone = Tone::ALL[self.tone_index];

        // Текущий выбор сохраняется сразу после запуска генерации
        self.preferences.voice_id = voice.voice_id.clone();
        self.preferences.narration_style = style;
        self.preferences.tone = tone;
        self.prefs_store.save(&self.preferences);

        let request = NarrationRequest {
            text,
            style,
            tone,
            pitch: self.preferences.pitch.clone(),
            voice_id: voice.voice_id.clone(),
            output_format: self.preferences.output_format.clone(),
        };
        let store = self.artifact_store.clone();
        let events = events.clone();

        self.is_generating = true;
        self.status = "Summoning...".to_string();

        tokio::spawn(async move {
            // Ошибки доходят до интерфейса событием Failed
            let _ = pipeline::run_narration(
                request,
                &narrative_client,
                &speech_client,
                &store,
                Some(events),
            )
            .await;
        });
    }

    fn handle_pipeline_event(&mut self, event: PipelineEvent) {
        match event {
            PipelineEvent::Started | PipelineEvent::TransformingNarrative => {
                self.status = "Summoning the narrative...".to_string();
            }
            PipelineEvent::WritingNarrative => {
                self.status = "Binding the tale to parchment...".to_string();
            }
            PipelineEvent::SynthesizingSpeech => {
                self.status = "Giving the darkness a voice...".to_string();
            }
            PipelineEvent::Completed(artifact) => {
                self.is_generating = false;
                self.refresh_tracks();
                // Новый файл оказывается первым в списке
                self.track_index = 0;
                self.focus = Pane::Tracks;
                self.status = if artifact.degraded {
                    "The abyss answered with a warning; fallback text was narrated. Press Enter to listen.".to_string()
                } else {
                    "The abyss hath spoken. Press Enter to hear the darkness speak.".to_string()
                };
            }
            PipelineEvent::Failed(message) => {
                self.is_generating = false;
                self.status = format!("An error hath plagued the darkness: {}", message);
            }
        }
    }

    fn play_selected_track(&mut self) {
        let Some(controller) = self.controller.as_mut() else {
            self.status = "Audio output is unavailable on this system.".to_string();
            return;
        };
        let Some(entry) = self.tracks.get(self.track_index) else {
            self.status = "Please select an audio file to play.".to_string();
            return;
        };

        match controller
            .load(&entry.path)
            .and_then(|_| controller.play())
        {
            Ok(()) => {
                self.now_playing = format!("Playing: {}", entry.display_name);
            }
            Err(e) => {
                error!("Playback error: {}", e);
                self.status = format!("Could not play the audio file: {}", e);
            }
        }
    }

    fn toggle_pause(&mut self) {
        let Some(controller) = self.controller.as_mut() else {
            self.status = "Audio output is unavailable on this system.".to_string();
            return;
        };

        if controller.status().state == PlayerState::Playing {
            controller.pause();
            self.now_playing = "Paused".to_string();
            return;
        }

        match controller.play() {
            Ok(()) => {
                if let Some(path) = controller.status().current_path {
                    self.now_playing = format!("Playing: {}", path.display());
                }
            }
            Err(e) => self.status = e.to_string(),
        }
    }

    fn stop_playback(&mut self) {
        if let Some(controller) = self.controller.as_mut() {
            controller.stop();
            self.now_playing = "No file selected".to_string();
        }
    }

    fn refresh_tracks(&mut self) {
        self.tracks = catalog::refresh(&self.config.output_root);
        if self.track_index >= self.tracks.len() {
            self.track_index = self.tracks.len().saturating_sub(1);
        }
    }

    /// Invoked every 500 ms: natural end-of-track detection.
    fn poll_player(&mut self) {
        if let Some(controller) = self.controller.as_mut() {
            let status = controller.poll_status();
            if status.state == PlayerState::Finished
                && self.now_playing.starts_with("Playing")
            {
                self.now_playing = "Playback finished".to_string();
            }
        }
    }
}

/// Runs the TUI until the user quits.
pub async fn run(mut app: App) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result.map_err(Into::into)
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    let (pipeline_tx, mut pipeline_rx) = mpsc::channel::<PipelineEvent>(16);
    let mut ui_tick = tokio::time::interval(UI_TICK_INTERVAL);
    let mut player_poll = tokio::time::interval(PLAYER_POLL_INTERVAL);

    loop {
        terminal.draw(|f| draw::draw_ui(f, app))?;

        tokio::select! {
            Some(event) = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    event::read().ok()
                } else {
                    None
                }
            } => {
                if let Event::Key(key) = event {
                    if app.handle_key(key, &pipeline_tx) {
                        return Ok(());
                    }
                }
            }
            Some(event) = pipeline_rx.recv() => {
                app.handle_pipeline_event(event);
            }
            _ = player_poll.tick() => {
                app.poll_player();
            }
            _ = ui_tick.tick() => {}
        }
    }
}
