//! Artifact store: derives folder names and writes narration outputs.

use std::path::{Path, PathBuf};

use log::info;
use tokio::fs;

use crate::errors::AppResult;

/// Fixed narrative filename inside an artifact folder.
pub const NARRATIVE_FILENAME: &str = "gothic_narrative.txt";

/// Used when the derived name sanitizes down to nothing.
const FALLBACK_FOLDER_NAME: &str = "untitled_narration";

/// Derives a filesystem-safe folder name from the opening of a narrative:
/// the first 50 characters, cut at the first period, trimmed, with every
/// character outside `[A-Za-z0-9_.\- ]` replaced by an underscore.
pub fn derive_folder_name(narrative: &str) -> String {
    let prefix: String = narrative.chars().take(50).collect();
    let head = prefix.split('.').next().unwrap_or("").trim();
    let name: String = head
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if name.is_empty() {
        FALLBACK_FOLDER_NAME.to_string()
    } else {
        name
    }
}

/// Creates artifact folders under the output root and writes narrative text
/// into them.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    output_root: PathBuf,
}

impl ArtifactStore {
    pub fn new(output_root: PathBuf) -> Self {
        Self { output_root }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Creates the artifact folder for a narrative. An existing folder with
    /// the same derived name gets a numeric suffix instead of being reused,
    /// so two narrations never overwrite each other.
    pub async fn create_artifact_folder(&self, narrative: &str) -> AppResult<PathBuf> {
        let base = derive_folder_name(narrative);
        let mut folder = self.output_root.join(&base);
        let mut counter = 2;
        while fs::try_exists(&folder).await? {
            folder = self.output_root.join(format!("{}_{}", base, counter));
            counter += 1;
        }

        fs::create_dir_all(&folder).await?;
        Ok(folder)
    }

    /// Writes the narrative text, overwriting any previous file.
    pub async fn write_narrative(&self, folder: &Path, text: &str) -> AppResult<PathBuf> {
        let path = folder.join(NARRATIVE_FILENAME);
        fs::write(&path, text).await?;
        info!("Narrative written to {}", path.display());
        Ok(path)
    }
}
