//! Project discovery and structure
//!
//! A project is a directory containing `.cine/` (configuration) and
//! `cinematics/` (one document per file).

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::loader::{is_cinematic_file, DEFAULT_EXTENSION};

/// Name of the project marker/config directory
pub const PROJECT_DIR: &str = ".cine";

/// Directory holding cinematic documents, relative to the root
pub const CINEMATICS_DIR: &str = "cinematics";

/// Represents a cinematic authoring project
#[derive(Debug)]
pub struct Project {
    /// Root directory of the project (parent of .cine/)
    root: PathBuf,
}

impl Project {
    /// Find project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current = std::env::current_dir().map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            if current.join(PROJECT_DIR).is_dir() {
                tracing::debug!(root = %current.display(), "found project");
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Use `--project` when given, otherwise discover from the working directory
    pub fn locate(explicit: Option<&Path>) -> Result<Self, ProjectError> {
        match explicit {
            Some(path) => Self::discover_from(path),
            None => Self::discover(),
        }
    }

    /// Create a new project structure at the given path
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        if root.join(PROJECT_DIR).exists() {
            return Err(ProjectError::AlreadyExists(root));
        }

        Self::create_structure(root)
    }

    /// Initialize even if .cine/ exists, rewriting the default config
    pub fn init_force(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self::create_structure(root)
    }

    fn create_structure(root: PathBuf) -> Result<Self, ProjectError> {
        let config_dir = root.join(PROJECT_DIR);
        std::fs::create_dir_all(&config_dir).map_err(|e| ProjectError::IoError(e.to_string()))?;
        std::fs::write(config_dir.join("config.yaml"), Self::default_config())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;
        std::fs::create_dir_all(root.join(CINEMATICS_DIR))
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        tracing::info!(root = %root.display(), "initialized project");
        Ok(Self { root })
    }

    fn default_config() -> &'static str {
        r#"# Cinematic project configuration

# Default author recorded in new cinematic files (default: git user.name)
# author: ""

# Editor used by `cine edit` and `cine new` (default: $EDITOR)
# editor: ""

# Default output format for list/show (auto, yaml, json, tsv, id)
# default_format: auto
"#
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .cine configuration directory
    pub fn config_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR)
    }

    /// Directory holding cinematic documents
    pub fn cinematics_dir(&self) -> PathBuf {
        self.root.join(CINEMATICS_DIR)
    }

    /// Path for a cinematic file with the given slug
    pub fn cinematic_path(&self, slug: &str) -> PathBuf {
        self.cinematics_dir()
            .join(format!("{}{}", slug, DEFAULT_EXTENSION))
    }

    /// Iterate every cinematic file in the project, at any depth
    pub fn iter_cinematic_files(&self) -> impl Iterator<Item = PathBuf> {
        walkdir::WalkDir::new(self.cinematics_dir())
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && is_cinematic_file(e.path()))
            .map(|e| e.path().to_path_buf())
    }
}

/// Errors that can occur during project operations
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not a cinematic project (searched from {searched_from:?}). Run 'cine init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("cinematic project already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_project_init_creates_structure() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();

        assert!(project.config_dir().join("config.yaml").exists());
        assert!(project.cinematics_dir().is_dir());
    }

    #[test]
    fn test_project_init_fails_if_exists() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path()).unwrap();

        let err = Project::init(tmp.path()).unwrap_err();
        assert!(matches!(err, ProjectError::AlreadyExists(_)));
        assert!(Project::init_force(tmp.path()).is_ok());
    }

    #[test]
    fn test_project_discover_from_subdirectory() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path()).unwrap();

        let subdir = tmp.path().join("cinematics/act-1");
        std::fs::create_dir_all(&subdir).unwrap();

        let project = Project::discover_from(&subdir).unwrap();
        assert_eq!(
            project.root().canonicalize().unwrap(),
            tmp.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_project_discover_fails_without_marker() {
        let tmp = tempdir().unwrap();
        let err = Project::discover_from(tmp.path()).unwrap_err();
        assert!(matches!(err, ProjectError::NotFound { .. }));
    }

    #[test]
    fn test_iter_cinematic_files_recurses() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();
        let nested = project.cinematics_dir().join("act-1");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("intro.cine.yaml"), "name: Intro\n").unwrap();
        std::fs::write(project.cinematic_path("outro"), "name: Outro\n").unwrap();
        std::fs::write(project.cinematics_dir().join("notes.md"), "").unwrap();

        let files: Vec<_> = project.iter_cinematic_files().collect();
        assert_eq!(files.len(), 2);
    }
}
