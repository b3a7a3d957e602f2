//! Shared helper functions for CLI commands

use std::path::Path;

use crate::entities::cinematic::{Cinematic, Side};

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Escape a field for tab-separated output
pub fn escape_tsv(s: &str) -> String {
    s.replace('\t', " ").replace('\n', " ")
}

/// Comma-separated camera types of every shot, in order
pub fn camera_summary(cinematic: &Cinematic) -> String {
    cinematic
        .shots
        .iter()
        .map(|shot| {
            shot.shot_setup
                .as_ref()
                .map(|s| s.camera().to_string())
                .unwrap_or_else(|| "dual".to_string())
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// `left / right` characters of a cinematic's first shot
pub fn cast_summary(cinematic: &Cinematic) -> String {
    let Some(setup) = cinematic.shots.first().and_then(|s| s.shot_setup.as_ref()) else {
        return "-".to_string();
    };
    let show = |side| {
        setup
            .character(side)
            .map(|c| c.kind.to_string())
            .unwrap_or_else(|| "-".to_string())
    };
    format!("{} / {}", show(Side::Left), show(Side::Right))
}

/// Path relative to `base` when possible
pub fn display_path(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}
