//! Audio catalog: on-demand scan of the output directory.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::warn;
use walkdir::WalkDir;

const AUDIO_EXTENSION: &str = "mp3";

/// One playable file found under the output root.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub display_name: String,
    pub path: PathBuf,
    pub created: SystemTime,
}

/// Re-scans `output_root` for audio files, newest first.
///
/// Always reads the current disk state; nothing is cached between calls.
/// Ordering is descending by creation time (modified time where the
/// filesystem does not report birth time); ties keep walk order.
pub fn refresh(output_root: &Path) -> Vec<CatalogEntry> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(output_root).into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(AUDIO_EXTENSION) {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().to_string();
        let parent = path
            .parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let created = match entry.metadata() {
            Ok(meta) => meta
                .created()
                .or_else(|_| meta.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH),
            Err(e) => {
                warn!("Failed to read metadata for {}: {}", path.display(), e);
                SystemTime::UNIX_EPOCH
            }
        };

        entries.push(CatalogEntry {
            display_name: format!("{} - {}", parent, file_name),
            path: path.to_path_buf(),
            created,
        });
    }

    // Stable sort keeps ties in walk order
    entries.sort_by(|a, b| b.created.cmp(&a.created));
    entries
}
