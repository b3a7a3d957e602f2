//! Schema validation with detailed error reporting

use jsonschema::{error::ValidationErrorKind, validator_for, ValidationError as JsonSchemaError, Validator as JsonValidator};
use miette::{Diagnostic, NamedSource, SourceSpan};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::loader::schema_for_path;
use crate::schema::registry::{normalize, SchemaRegistry};
use crate::yaml::diagnostics::line_col_to_offset;

/// Validation error with source location information
#[derive(Debug, Error, Diagnostic)]
#[error("Schema validation failed: {summary}")]
#[diagnostic(code(cine::schema::validation_error))]
pub struct ValidationError {
    summary: String,

    #[source_code]
    src: NamedSource<String>,

    #[related]
    violations: Vec<SchemaViolation>,
}

/// A single schema violation
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
pub struct SchemaViolation {
    #[label("{}", self.hint)]
    span: SourceSpan,

    message: String,
    hint: String,

    #[help]
    help: Option<String>,
}

impl SchemaViolation {
    pub fn new(message: String, hint: String, span: SourceSpan, help: Option<String>) -> Self {
        Self {
            span,
            message,
            hint,
            help,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn span(&self) -> SourceSpan {
        self.span
    }
}

impl ValidationError {
    pub fn new(filename: &str, source: &str, violations: Vec<SchemaViolation>) -> Self {
        let count = violations.len();
        let summary = if count == 1 {
            "1 error".to_string()
        } else {
            format!("{} errors", count)
        };
        Self {
            summary,
            src: NamedSource::new(filename, source.to_string()),
            violations,
        }
    }

    /// Get the number of violations
    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    pub fn violations(&self) -> &[SchemaViolation] {
        &self.violations
    }
}

/// Failure to validate a file on disk
#[derive(Debug, Error, Diagnostic)]
pub enum FileValidationError {
    #[error("Failed to read {}: {source}", path.display())]
    #[diagnostic(code(cine::schema::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Invalid(#[from] ValidationError),
}

/// Result of validation
#[derive(Debug)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn has_issues(&self) -> bool {
        !self.errors.is_empty() || !self.warnings.is_empty()
    }
}

/// A validation issue (error or warning) located by JSON pointer
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "{}: {}", path, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({})", suggestion)?;
        }
        Ok(())
    }
}

/// Schema validator with compiled schemas
pub struct Validator {
    /// Compiled JSON schemas by registry name
    compiled: HashMap<&'static str, JsonValidator>,
}

impl Validator {
    /// Create a new validator with schemas from the registry
    pub fn new(registry: &SchemaRegistry) -> Self {
        let mut compiled = HashMap::new();

        for (name, schema) in registry.entries() {
            match validator_for(schema) {
                Ok(validator) => {
                    compiled.insert(name, validator);
                }
                Err(e) => tracing::warn!(schema = name, error = %e, "schema failed to compile"),
            }
        }

        tracing::debug!(count = compiled.len(), "compiled schemas");
        Self { compiled }
    }

    pub fn has_schema(&self, name: &str) -> bool {
        self.compiled.contains_key(normalize(name).as_str())
    }

    /// Validate YAML content, reporting only the first violation
    pub fn validate(
        &self,
        content: &str,
        filename: &str,
        schema_name: &str,
    ) -> Result<ValidationResult, ValidationError> {
        let (schema, json_value) = self.prepare(content, filename, schema_name)?;

        match schema.validate(&json_value) {
            Ok(()) => Ok(ValidationResult::success()),
            Err(error) => {
                let violation = error_to_violation(content, &error);
                Err(ValidationError::new(filename, content, vec![violation]))
            }
        }
    }

    /// Validate YAML content, reporting every violation
    pub fn iter_errors(
        &self,
        content: &str,
        filename: &str,
        schema_name: &str,
    ) -> Result<ValidationResult, ValidationError> {
        let (schema, json_value) = self.prepare(content, filename, schema_name)?;

        let violations: Vec<SchemaViolation> = schema
            .iter_errors(&json_value)
            .map(|e| error_to_violation(content, &e))
            .collect();

        if violations.is_empty() {
            Ok(ValidationResult::success())
        } else {
            tracing::debug!(file = filename, count = violations.len(), "schema violations");
            Err(ValidationError::new(filename, content, violations))
        }
    }

    /// Validate an already-parsed value. Issues carry JSON pointers, not spans.
    pub fn validate_value(&self, value: &JsonValue, schema_name: &str) -> Vec<ValidationIssue> {
        let Some(schema) = self.compiled.get(normalize(schema_name).as_str()) else {
            return vec![ValidationIssue::new("", format!("Unknown schema: {}", schema_name))];
        };

        schema
            .iter_errors(value)
            .map(|e| ValidationIssue {
                path: e.instance_path.to_string(),
                message: format_schema_error(&e),
                suggestion: generate_help_message(&e),
            })
            .collect()
    }

    /// Validate a file directly, choosing the schema from its name
    pub fn validate_file(&self, path: &Path) -> Result<ValidationResult, FileValidationError> {
        let Some(schema_name) = schema_for_path(path) else {
            tracing::debug!(path = %path.display(), "not a cinematic file, skipped");
            return Ok(ValidationResult::success());
        };

        let content = std::fs::read_to_string(path).map_err(|source| FileValidationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let filename = path.file_name().unwrap_or_default().to_string_lossy();

        Ok(self.iter_errors(&content, &filename, schema_name)?)
    }

    /// Parse YAML into JSON and find the compiled schema
    fn prepare(
        &self,
        content: &str,
        filename: &str,
        schema_name: &str,
    ) -> Result<(&JsonValidator, JsonValue), ValidationError> {
        let yaml_value: serde_yml::Value = match serde_yml::from_str(content) {
            Ok(v) => v,
            Err(e) => {
                let span = find_error_span(content, e.location());
                let violation = SchemaViolation::new(
                    format!("YAML parse error: {}", e),
                    "invalid YAML".to_string(),
                    span,
                    Some("Check YAML syntax - proper indentation, colons, quotes".to_string()),
                );
                return Err(ValidationError::new(filename, content, vec![violation]));
            }
        };

        let json_value: JsonValue = match serde_json::to_value(&yaml_value) {
            Ok(v) => v,
            Err(e) => {
                let violation = SchemaViolation::new(
                    format!("Failed to convert YAML to JSON: {}", e),
                    "conversion error".to_string(),
                    (0, content.len()).into(),
                    None,
                );
                return Err(ValidationError::new(filename, content, vec![violation]));
            }
        };

        let Some(schema) = self.compiled.get(normalize(schema_name).as_str()) else {
            let violation = SchemaViolation::new(
                format!("Unknown schema: {}", schema_name),
                "no schema".to_string(),
                first_line_span(content),
                Some("Run 'cine schema list' to see available schemas".to_string()),
            );
            return Err(ValidationError::new(filename, content, vec![violation]));
        };

        Ok((schema, json_value))
    }
}

impl Default for Validator {
    fn default() -> Self {
        let registry = SchemaRegistry::default();
        Self::new(&registry)
    }
}

/// Convert a JSON Schema validation error to our violation format
fn error_to_violation(content: &str, error: &JsonSchemaError) -> SchemaViolation {
    let path = error.instance_path.to_string();
    let message = format_schema_error(error);
    let hint = format_error_hint(error);
    let help = generate_help_message(error);

    let span = find_path_span(content, &path);

    SchemaViolation::new(message, hint, span, help)
}

/// Format a JSON Schema error into a user-friendly message
fn format_schema_error(error: &JsonSchemaError) -> String {
    let path = if error.instance_path.as_str().is_empty() {
        "document root".to_string()
    } else {
        format!("'{}'", error.instance_path)
    };

    match &error.kind {
        ValidationErrorKind::Required { property } => {
            let prop_str = property
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| property.to_string());
            format!("Missing required field: {} at {}", prop_str, path)
        }
        ValidationErrorKind::Type { kind } => {
            format!("Wrong type at {}: expected {:?}", path, kind)
        }
        ValidationErrorKind::Enum { options } => {
            let opts = format_enum_options(options);
            format!("Invalid value at {}: must be one of: {}", path, opts)
        }
        ValidationErrorKind::MinLength { limit } => {
            format!("Value at {} is too short: minimum {} characters", path, limit)
        }
        ValidationErrorKind::MaxLength { limit } => {
            format!("Value at {} is too long: maximum {} characters", path, limit)
        }
        ValidationErrorKind::AdditionalProperties { unexpected } => {
            format!("Unknown field(s) at {}: {}", path, unexpected.join(", "))
        }
        ValidationErrorKind::OneOfNotValid { .. } => {
            format!("Value at {} matches none of the allowed shapes", path)
        }
        _ => {
            format!("Validation error at {}: {}", path, error)
        }
    }
}

/// Format enum options as a string
fn format_enum_options(options: &JsonValue) -> String {
    if let Some(arr) = options.as_array() {
        arr.iter()
            .map(|v| v.as_str().map(|s| s.to_string()).unwrap_or_else(|| v.to_string()))
            .collect::<Vec<_>>()
            .join(", ")
    } else {
        options.to_string()
    }
}

/// Generate a short hint for the error label
fn format_error_hint(error: &JsonSchemaError) -> String {
    match &error.kind {
        ValidationErrorKind::Required { .. } => "required field missing".to_string(),
        ValidationErrorKind::Type { .. } => "wrong type".to_string(),
        ValidationErrorKind::Enum { .. } => "invalid value".to_string(),
        ValidationErrorKind::MinLength { .. } => "too short".to_string(),
        ValidationErrorKind::MaxLength { .. } => "too long".to_string(),
        ValidationErrorKind::AdditionalProperties { .. } => "unknown field".to_string(),
        ValidationErrorKind::OneOfNotValid { .. } => "no matching shape".to_string(),
        _ => "validation error".to_string(),
    }
}

/// Generate a help message with suggestions for fixing the error
fn generate_help_message(error: &JsonSchemaError) -> Option<String> {
    match &error.kind {
        ValidationErrorKind::Required { property } => {
            let prop_str = property
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| property.to_string());
            Some(format!("Add the '{}' field", prop_str))
        }
        ValidationErrorKind::Enum { options } => {
            let opts = format_enum_options(options);
            Some(format!("Valid values: {}", opts))
        }
        ValidationErrorKind::Type { kind } => Some(format!("Expected value of type: {:?}", kind)),
        ValidationErrorKind::MaxLength { limit } => {
            Some(format!("Shorten the text to at most {} characters", limit))
        }
        ValidationErrorKind::AdditionalProperties { unexpected } => {
            if unexpected.len() == 1 {
                Some(format!("Remove the '{}' field or check spelling", unexpected[0]))
            } else {
                Some("Remove unknown fields or check spelling".to_string())
            }
        }
        ValidationErrorKind::OneOfNotValid { .. } if error.instance_path.as_str().ends_with("/type") => {
            Some("Use 'hero' or an object with a non-empty 'slug'".to_string())
        }
        _ => None,
    }
}

fn first_line_span(content: &str) -> SourceSpan {
    let len = content.find('\n').unwrap_or(content.len()).max(1);
    (0, len).into()
}

/// Find the span (byte offset, length) for an error location
fn find_error_span(content: &str, location: Option<serde_yml::Location>) -> SourceSpan {
    let Some(loc) = location else {
        return first_line_span(content);
    };

    let offset = line_col_to_offset(content, loc.line(), loc.column()).min(content.len());

    let rest_of_content = &content[offset..];
    let len = rest_of_content
        .find('\n')
        .unwrap_or(rest_of_content.len())
        .max(1);

    (offset, len).into()
}

/// One line of YAML with the pieces needed for path lookup
struct YamlLine<'a> {
    offset: usize,
    indent: usize,
    /// Line is a sequence entry (`- ...`)
    item: bool,
    /// Indent of the text after any `- ` marker
    content_indent: usize,
    content: &'a str,
}

fn yaml_lines(content: &str) -> Vec<Option<YamlLine<'_>>> {
    let mut lines = Vec::new();
    let mut offset = 0;
    for raw in content.split('\n') {
        let line = raw.trim_end_matches('\r');
        let body = line.trim_start_matches(' ');
        let indent = line.len() - body.len();
        let body = body.trim_end();

        if body.is_empty() || body.starts_with('#') {
            lines.push(None);
        } else if body == "-" || body.starts_with("- ") {
            let rest = body[1..].trim_start_matches(' ');
            let content_indent = indent + (body.len() - rest.len());
            lines.push(Some(YamlLine {
                offset,
                indent,
                item: true,
                content_indent,
                content: rest,
            }));
        } else {
            lines.push(Some(YamlLine {
                offset,
                indent,
                item: false,
                content_indent: indent,
                content: body,
            }));
        }
        offset += raw.len() + 1;
    }
    lines
}

/// Region of lines that belong to one YAML node
#[derive(Clone, Copy)]
struct Scope {
    first: usize,
    /// Line `first` is a sequence entry whose inline content belongs to the scope
    inline_first: bool,
    min_indent: usize,
    /// Sequence markers may sit at the parent key's own indent
    dash_indent: Option<usize>,
}

impl Scope {
    fn root() -> Self {
        Self {
            first: 0,
            inline_first: false,
            min_indent: 0,
            dash_indent: None,
        }
    }

    fn ends_at(&self, index: usize, line: &YamlLine<'_>) -> bool {
        if self.inline_first && index == self.first {
            return false;
        }
        line.indent < self.min_indent && !(line.item && Some(line.indent) == self.dash_indent)
    }
}

fn find_key(lines: &[Option<YamlLine<'_>>], scope: Scope, key: &str) -> Option<usize> {
    let pattern = format!("{}:", key);
    let mut key_indent = None;
    for (i, line) in lines.iter().enumerate().skip(scope.first) {
        let Some(line) = line else { continue };
        if scope.ends_at(i, line) {
            break;
        }
        // Only keys at the scope's own level count, not keys nested deeper
        let level = *key_indent.get_or_insert(line.content_indent);
        if line.content_indent == level && line.content.starts_with(&pattern) {
            return Some(i);
        }
    }
    None
}

fn find_item(lines: &[Option<YamlLine<'_>>], scope: Scope, index: usize) -> Option<usize> {
    let mut item_indent = None;
    let mut seen = 0;
    for (i, line) in lines.iter().enumerate().skip(scope.first) {
        let Some(line) = line else { continue };
        if scope.ends_at(i, line) {
            break;
        }
        if !line.item {
            continue;
        }
        if *item_indent.get_or_insert(line.indent) != line.indent {
            continue;
        }
        if seen == index {
            return Some(i);
        }
        seen += 1;
    }
    None
}

/// Find the span for a JSON pointer in YAML content.
///
/// Walks the pointer segment by segment through the indentation structure and
/// returns the deepest line reached.
fn find_path_span(content: &str, json_path: &str) -> SourceSpan {
    let parts: Vec<&str> = json_path.split('/').filter(|s| !s.is_empty()).collect();
    let lines = yaml_lines(content);

    let mut scope = Scope::root();
    let mut found: Option<usize> = None;

    for part in parts {
        let next = match part.parse::<usize>() {
            Ok(index) => find_item(&lines, scope, index),
            Err(_) => find_key(&lines, scope, part),
        };
        let Some(i) = next else { break };
        let Some(line) = &lines[i] else { break };

        scope = if part.parse::<usize>().is_ok() {
            Scope {
                first: i,
                inline_first: true,
                min_indent: line.content_indent,
                dash_indent: None,
            }
        } else {
            Scope {
                first: i + 1,
                inline_first: false,
                min_indent: line.content_indent + 1,
                dash_indent: Some(line.content_indent),
            }
        };
        found = Some(i);
    }

    match found.and_then(|i| lines[i].as_ref()) {
        Some(line) => {
            let start = line.offset + line.content_indent;
            (start, line.content.len().max(1)).into()
        }
        None => first_line_span(content),
    }
}
