//! YAML error diagnostics for cinematic documents

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// A document that could not be read into the typed model
#[derive(Debug, Error, Diagnostic)]
#[error("Could not read {filename}: {message}")]
#[diagnostic(code(cine::yaml::syntax))]
pub struct YamlSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    filename: String,
    message: String,
}

impl YamlSyntaxError {
    /// Build from a serde_yml error, pointing at its reported location
    pub fn from_serde_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let offset = err
            .location()
            .map(|loc| line_col_to_offset(source, loc.line(), loc.column()))
            .unwrap_or(0);
        let message = err.to_string();

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1).min(source.len().max(1))),
            help: generate_help(&message),
            filename: filename.to_string(),
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum YamlError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convert a 1-based line/column to a byte offset, clamped to the source
pub(crate) fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let mut line_start = 0;
    for (i, text) in source.split('\n').enumerate() {
        if i + 1 == line {
            let col = column.saturating_sub(1);
            let within = text
                .char_indices()
                .nth(col)
                .map(|(byte, _)| byte)
                .unwrap_or(text.len());
            return line_start + within;
        }
        line_start += text.len() + 1;
    }
    source.len()
}

/// Suggest a fix for common mistakes in hand-written cinematic files
fn generate_help(message: &str) -> Option<String> {
    let msg = message.to_lowercase();

    if msg.contains("tab") {
        return Some("YAML requires spaces for indentation, not tabs.".to_string());
    }
    if msg.contains("duplicate") {
        return Some("Each key can only appear once per object.".to_string());
    }
    if msg.contains("missing field `dialogclear`") {
        return Some("Every dialog node needs 'dialogClear: true' or 'dialogClear: false'.".to_string());
    }
    if msg.contains("character type") {
        return Some("Use 'type: hero' or 'type: {slug: <thangType slug>}'.".to_string());
    }
    if msg.contains("unknown variant") {
        return Some("Check the spelling against 'cine schema show <name>'.".to_string());
    }
    if msg.contains("mapping values are not allowed") {
        return Some("You may be missing a space after ':' or have incorrect indentation.".to_string());
    }
    if msg.contains("did not find expected") {
        return Some("Check for an unclosed bracket or quote.".to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Cinematic;

    #[test]
    fn test_line_col_to_offset() {
        let source = "line1\nline2\nline3";
        assert_eq!(line_col_to_offset(source, 1, 1), 0);
        assert_eq!(line_col_to_offset(source, 2, 1), 6);
        assert_eq!(line_col_to_offset(source, 3, 3), 14);
        assert_eq!(line_col_to_offset(source, 9, 1), source.len());
    }

    #[test]
    fn test_help_generation() {
        assert!(generate_help("found tab character").is_some());
        assert!(generate_help("missing field `dialogClear`").is_some());
        assert!(generate_help("some random error").is_none());
    }

    #[test]
    fn test_from_serde_error_keeps_message() {
        let source = "shots:\n  - dialogNodes:\n      - speaker: left\n";
        let err = serde_yml::from_str::<Cinematic>(source).unwrap_err();
        let diag = YamlSyntaxError::from_serde_error(&err, source, "intro.cine.yaml");
        assert!(diag.message().contains("dialogClear"));
        assert!(diag.help.is_some());
    }
}
