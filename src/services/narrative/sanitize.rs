//! Text sanitizer for generated narratives.

use once_cell::sync::Lazy;
use regex::Regex;

static PARENTHETICAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^)]*\)").unwrap());
static BRACKETED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]*\]").unwrap());

/// Strips stage directions and blank lines from generated prose.
///
/// Every `(...)` and `[...]` span is removed (single level, non-nested),
/// blank lines are dropped and each remaining line is trimmed, preserving
/// line order. Pure function, idempotent on properly paired input.
pub fn clean(text: &str) -> String {
    let stripped = PARENTHETICAL.replace_all(text, "");
    let stripped = BRACKETED.replace_all(&stripped, "");
    stripped
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
