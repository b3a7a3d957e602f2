//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::project::{Project, PROJECT_DIR};

/// Tool configuration, merged from defaults, user, project and environment
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default author for new cinematics
    pub author: Option<String>,

    /// Editor command for `cine edit`
    pub editor: Option<String>,

    /// Default output format
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let project_root = Project::discover().ok().map(|p| p.root().to_path_buf());
        Self::load_for(project_root.as_deref())
    }

    /// Load configuration for a specific project root
    pub fn load_for(project_root: Option<&Path>) -> Self {
        let mut config = Config::default();

        // Global user config (~/.config/cine/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // Project config (.cine/config.yaml)
        if let Some(root) = project_root {
            if let Some(project_config) = Self::read_file(&root.join(PROJECT_DIR).join("config.yaml")) {
                config.merge(project_config);
            }
        }

        if let Ok(author) = std::env::var("CINE_AUTHOR") {
            config.author = Some(author);
        }
        if let Ok(editor) = std::env::var("CINE_EDITOR") {
            config.editor = Some(editor);
        }

        config
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config file");
                None
            }
        }
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "cine")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.author.is_some() {
            self.author = other.author;
        }
        if other.editor.is_some() {
            self.editor = other.editor;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    /// Get the author name, falling back to git config or username
    pub fn author(&self) -> String {
        if let Some(ref author) = self.author {
            return author.clone();
        }

        if let Ok(output) = std::process::Command::new("git")
            .args(["config", "user.name"])
            .output()
        {
            if output.status.success() {
                let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !name.is_empty() {
                    return name;
                }
            }
        }

        std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "unknown".to_string())
    }

    /// Get the editor command
    pub fn editor(&self) -> String {
        self.editor
            .clone()
            .or_else(|| std::env::var("EDITOR").ok())
            .or_else(|| std::env::var("VISUAL").ok())
            .unwrap_or_else(|| "vi".to_string())
    }

    /// Run the editor on a file. The command may carry arguments ("code --wait").
    pub fn run_editor(&self, file_path: &Path) -> std::io::Result<std::process::ExitStatus> {
        let editor = self.editor();
        let mut parts = editor.split_whitespace();
        let cmd = parts.next().unwrap_or("vi");

        std::process::Command::new(cmd)
            .args(parts)
            .arg(file_path)
            .status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_merge_prefers_other() {
        let mut base = Config {
            author: Some("a".into()),
            editor: Some("vi".into()),
            default_format: None,
        };
        base.merge(Config {
            author: Some("b".into()),
            editor: None,
            default_format: Some("json".into()),
        });
        assert_eq!(base.author.as_deref(), Some("b"));
        assert_eq!(base.editor.as_deref(), Some("vi"));
        assert_eq!(base.default_format.as_deref(), Some("json"));
    }

    #[test]
    fn test_project_config_is_read() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();
        std::fs::write(
            project.config_dir().join("config.yaml"),
            "default_format: json\n",
        )
        .unwrap();

        let config = Config::load_for(Some(project.root()));
        assert_eq!(config.default_format.as_deref(), Some("json"));
    }

    #[test]
    fn test_explicit_author_wins() {
        let config = Config {
            author: Some("Nick".into()),
            ..Default::default()
        };
        assert_eq!(config.author(), "Nick");
    }
}
