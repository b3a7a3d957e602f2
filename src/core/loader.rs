//! Entity loading utilities
//!
//! Cinematic documents live in files named `<slug>.cine.yaml` (or `.cine.yml`,
//! `.cine.json`). These helpers find, parse and load them.

use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::entity::Entity;
use crate::schema::registry::CINEMATIC;
use crate::yaml::{YamlError, YamlSyntaxError};

/// File name suffixes recognised as cinematic documents
pub const CINEMATIC_EXTENSIONS: &[&str] = &[".cine.yaml", ".cine.yml", ".cine.json"];

/// Suffix used for newly created files
pub const DEFAULT_EXTENSION: &str = ".cine.yaml";

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

pub fn is_cinematic_file(path: &Path) -> bool {
    let name = file_name(path);
    CINEMATIC_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// Registry schema that applies to a file, decided by its name
pub fn schema_for_path(path: &Path) -> Option<&'static str> {
    is_cinematic_file(path).then_some(CINEMATIC)
}

/// The slug part of a cinematic file name (`intro.cine.yaml` -> `intro`)
pub fn slug_from_path(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy().to_string();
    let lower = name.to_lowercase();
    CINEMATIC_EXTENSIONS
        .iter()
        .find(|ext| lower.ends_with(*ext))
        .map(|ext| name[..name.len() - ext.len()].to_string())
}

/// Parse a single document, with a source-located diagnostic on failure
pub fn parse_file<T: Entity + 'static>(path: &Path) -> std::result::Result<T, YamlError> {
    let content = fs::read_to_string(path)?;
    let filename = path.file_name().unwrap_or_default().to_string_lossy();
    serde_yml::from_str(&content)
        .map_err(|e| YamlSyntaxError::from_serde_error(&e, &content, &filename).into())
}

/// Load all entities of type T from a directory
///
/// Files that fail to parse are skipped with a warning; `cine validate`
/// reports them in detail.
pub fn load_all<T: Entity + 'static>(dir: &Path) -> Result<Vec<(PathBuf, T)>> {
    let mut entities = Vec::new();

    if !dir.exists() {
        return Ok(entities);
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .into_diagnostic()?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_cinematic_file(path))
        .collect();
    paths.sort();

    for path in paths {
        match parse_file::<T>(&path) {
            Ok(entity) => entities.push((path, entity)),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unparsable file"),
        }
    }

    tracing::debug!(dir = %dir.display(), count = entities.len(), "loaded entities");
    Ok(entities)
}

/// Find an entity file by slug
///
/// An exact slug match wins; otherwise the first file whose slug starts with
/// the given text is returned.
pub fn find_entity_file(dir: &Path, slug: &str) -> Option<PathBuf> {
    let mut candidates: Vec<(PathBuf, String)> = fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter_map(|path| slug_from_path(&path).map(|s| (path, s)))
        .collect();
    candidates.sort();

    candidates
        .iter()
        .find(|(_, s)| s == slug)
        .or_else(|| candidates.iter().find(|(_, s)| s.starts_with(slug)))
        .map(|(path, _)| path.clone())
}

/// Load a single entity by slug
pub fn load_entity<T: Entity + 'static>(dir: &Path, slug: &str) -> Result<Option<(PathBuf, T)>> {
    if let Some(path) = find_entity_file(dir, slug) {
        let entity = parse_file::<T>(&path)?;
        return Ok(Some((path, entity)));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Cinematic;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_cinematic_file_detection() {
        assert!(is_cinematic_file(Path::new("cinematics/intro.cine.yaml")));
        assert!(is_cinematic_file(Path::new("INTRO.CINE.JSON")));
        assert!(!is_cinematic_file(Path::new("intro.yaml")));
        assert_eq!(schema_for_path(Path::new("a.cine.yml")), Some(CINEMATIC));
        assert_eq!(schema_for_path(Path::new("a.txt")), None);
    }

    #[test]
    fn test_slug_from_path() {
        assert_eq!(
            slug_from_path(Path::new("x/ogre-ambush.cine.yaml")).as_deref(),
            Some("ogre-ambush")
        );
        assert_eq!(slug_from_path(Path::new("readme.md")), None);
    }

    #[test]
    fn test_load_all_skips_broken_files() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("intro.cine.yaml"), "name: Intro\nslug: intro\n").unwrap();
        fs::write(tmp.path().join("broken.cine.yaml"), "name: [oops\n").unwrap();
        fs::write(tmp.path().join("notes.txt"), "ignored").unwrap();

        let loaded: Vec<(PathBuf, Cinematic)> = load_all(tmp.path()).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].1.name, "Intro");
    }

    #[test]
    fn test_find_prefers_exact_slug() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("intro-part-2.cine.yaml"), "name: B\n").unwrap();
        fs::write(tmp.path().join("intro.cine.yaml"), "name: A\n").unwrap();

        let found = find_entity_file(tmp.path(), "intro").unwrap();
        assert!(found.ends_with("intro.cine.yaml"));

        let (_, cinematic) = load_entity::<Cinematic>(tmp.path(), "intro-part").unwrap().unwrap();
        assert_eq!(cinematic.name, "B");
    }

    #[test]
    fn test_load_missing_entity() {
        let tmp = tempdir().unwrap();
        let result = load_entity::<Cinematic>(tmp.path(), "nope").unwrap();
        assert!(result.is_none());
    }
}
