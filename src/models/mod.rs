// Domain models module
// Core data structures shared by the services and the UI

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Narration styles offered to the user. Wire names are snake_case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrationStyle {
    #[default]
    ClassicGothic,
    CosmicHorror,
    SouthernGothic,
    PsychologicalHorror,
    FolkHorror,
}

impl NarrationStyle {
    pub const ALL: [NarrationStyle; 5] = [
        NarrationStyle::ClassicGothic,
        NarrationStyle::CosmicHorror,
        NarrationStyle::SouthernGothic,
        NarrationStyle::PsychologicalHorror,
        NarrationStyle::FolkHorror,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NarrationStyle::ClassicGothic => "classic_gothic",
            NarrationStyle::CosmicHorror => "cosmic_horror",
            NarrationStyle::SouthernGothic => "southern_gothic",
            NarrationStyle::PsychologicalHorror => "psychological_horror",
            NarrationStyle::FolkHorror => "folk_horror",
        }
    }

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            NarrationStyle::ClassicGothic => "Classic Gothic",
            NarrationStyle::CosmicHorror => "Cosmic Horror",
            NarrationStyle::SouthernGothic => "Southern Gothic",
            NarrationStyle::PsychologicalHorror => "Psychological Horror",
            NarrationStyle::FolkHorror => "Folk Horror",
        }
    }

    /// Parses a persisted name; unrecognized names fall back to classic gothic.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|style| style.name() == name)
            .unwrap_or_default()
    }

    /// Style-specific instruction embedded in the chat-completion system prompt.
    pub fn prompt(self) -> &'static str {
        match self {
            NarrationStyle::ClassicGothic => {
                "Transform this text into a classic gothic horror narrative with brooding atmosphere, dark romance, and supernatural elements."
            }
            NarrationStyle::CosmicHorror => {
                "Reimagine this text as a cosmic horror tale filled with unknowable entities and existential dread."
            }
            NarrationStyle::SouthernGothic => {
                "Convert this text into a Southern gothic story with decayed settings, grotesque characters, and moral ambiguity."
            }
            NarrationStyle::PsychologicalHorror => {
                "Rewrite this text as a psychological horror narrative, emphasizing inner torment and creeping madness."
            }
            NarrationStyle::FolkHorror => {
                "Adapt this text into a folk horror story with ancient rituals, rural isolation, and pagan undertones."
            }
        }
    }
}

/// Narration tone, mapped to voice settings by the speech synthesizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    #[default]
    Mysterious,
    Somber,
    Menacing,
}

impl Tone {
    pub const ALL: [Tone; 3] = [Tone::Mysterious, Tone::Somber, Tone::Menacing];

    pub fn name(self) -> &'static str {
        match self {
            Tone::Mysterious => "mysterious",
            Tone::Somber => "somber",
            Tone::Menacing => "menacing",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tone::Mysterious => "Mysterious",
            Tone::Somber => "Somber",
            Tone::Menacing => "Menacing",
        }
    }

    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|tone| tone.name() == name)
            .unwrap_or_default()
    }
}

/// A voice from the speech service's catalog; read-only for the session.
#[derive(Debug, Clone, PartialEq)]
pub struct Voice {
    pub display_name: String,
    pub voice_id: String,
}

/// One user-triggered narration job. Built fresh per request, never persisted.
#[derive(Debug, Clone)]
pub struct NarrationRequest {
    pub text: String,
    pub style: NarrationStyle,
    pub tone: Tone,
    pub pitch: String,
    pub voice_id: String,
    pub output_format: String,
}

/// The pair of output files produced by one narration job.
#[derive(Debug, Clone, PartialEq)]
pub struct NarrationArtifact {
    pub folder: PathBuf,
    pub narrative_path: PathBuf,
    pub audio_path: PathBuf,
    /// True when the narrative is fallback text rather than generated prose.
    pub degraded: bool,
}
