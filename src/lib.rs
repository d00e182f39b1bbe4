// Deep Narrator core
// Gothic narration pipeline: chat-completion transform, speech synthesis,
// artifact storage and playback.

pub mod config;
pub mod errors;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod ui;
pub mod utils;
