//! Schema-driven interactive wizard
//!
//! Reads a registry schema and prompts for each of its scalar fields. Nested
//! objects, arrays and hidden fields are left to the caller.

use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use miette::{IntoDiagnostic, Result};
use serde_json::Value;
use std::collections::HashMap;

use crate::schema::registry::SchemaRegistry;

/// A schema-driven wizard
pub struct SchemaWizard {
    registry: SchemaRegistry,
    theme: ColorfulTheme,
}

/// Result of running the wizard - collected field values
#[derive(Debug, Default)]
pub struct WizardResult {
    pub values: HashMap<String, Value>,
}

impl WizardResult {
    /// Get a string value
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(|v| v.as_str())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.values.get(key).and_then(|v| v.as_bool())
    }
}

/// Field information extracted from schema
#[derive(Debug, PartialEq)]
struct FieldInfo {
    name: String,
    title: Option<String>,
    description: Option<String>,
    field_type: FieldType,
    required: bool,
    default: Option<Value>,
}

#[derive(Debug, PartialEq)]
enum FieldType {
    String { max_length: Option<u64> },
    Enum { values: Vec<String> },
    Integer,
    Number,
    Boolean,
}

impl SchemaWizard {
    /// Create a new wizard with the default schema registry
    pub fn new() -> Self {
        Self {
            registry: SchemaRegistry::default(),
            theme: ColorfulTheme::default(),
        }
    }

    /// Run the wizard for a registry schema
    pub fn run(&self, schema_name: &str) -> Result<WizardResult> {
        let schema = self
            .registry
            .get(schema_name)
            .ok_or_else(|| miette::miette!("No schema named '{}'", schema_name))?;

        let title = schema["title"].as_str().unwrap_or(schema_name);
        println!();
        println!("{} {}", style("◆").cyan(), style(title).bold());
        println!("{}", style("─".repeat(50)).dim());

        let mut result = WizardResult::default();
        for field in extract_fields(schema) {
            if let Some(value) = self.prompt_field(&field)? {
                result.values.insert(field.name, value);
            }
        }

        Ok(result)
    }

    /// Prompt the user for a field value
    fn prompt_field(&self, field: &FieldInfo) -> Result<Option<Value>> {
        let prompt = format_prompt(field);

        match &field.field_type {
            FieldType::Enum { values } => {
                let mut items: Vec<String> = values.clone();
                if !field.required {
                    items.push("(none)".to_string());
                }
                let default_idx = field
                    .default
                    .as_ref()
                    .and_then(|d| d.as_str())
                    .and_then(|d| values.iter().position(|v| v == d))
                    .unwrap_or(0);

                let selection = Select::with_theme(&self.theme)
                    .with_prompt(&prompt)
                    .items(&items)
                    .default(default_idx)
                    .interact()
                    .into_diagnostic()?;

                Ok(values.get(selection).map(|v| Value::String(v.clone())))
            }

            FieldType::String { max_length } => {
                let default_str = field
                    .default
                    .as_ref()
                    .and_then(|d| d.as_str())
                    .unwrap_or("")
                    .to_string();
                let limit = max_length.unwrap_or(u64::MAX) as usize;

                let mut input = Input::<String>::with_theme(&self.theme)
                    .with_prompt(&prompt)
                    .allow_empty(!field.required)
                    .validate_with(move |s: &String| -> std::result::Result<(), String> {
                        if s.chars().count() > limit {
                            Err(format!("at most {} characters", limit))
                        } else {
                            Ok(())
                        }
                    });
                if !default_str.is_empty() {
                    input = input.default(default_str);
                }
                let value = input.interact_text().into_diagnostic()?;

                if value.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(Value::String(value)))
                }
            }

            FieldType::Integer => {
                let value: String = Input::with_theme(&self.theme)
                    .with_prompt(&prompt)
                    .allow_empty(true)
                    .validate_with(|s: &String| -> std::result::Result<(), &str> {
                        if s.is_empty() || s.parse::<i64>().is_ok() {
                            Ok(())
                        } else {
                            Err("enter a whole number")
                        }
                    })
                    .interact_text()
                    .into_diagnostic()?;
                Ok(value.parse::<i64>().ok().map(Value::from))
            }

            FieldType::Number => {
                let value: String = Input::with_theme(&self.theme)
                    .with_prompt(&prompt)
                    .allow_empty(true)
                    .validate_with(|s: &String| -> std::result::Result<(), &str> {
                        if s.is_empty() || s.parse::<f64>().is_ok() {
                            Ok(())
                        } else {
                            Err("enter a number")
                        }
                    })
                    .interact_text()
                    .into_diagnostic()?;
                Ok(value.parse::<f64>().ok().map(Value::from))
            }

            FieldType::Boolean => {
                let default_val = field.default.as_ref().and_then(|d| d.as_bool()).unwrap_or(false);
                let items = &["Yes", "No"];
                let selection = Select::with_theme(&self.theme)
                    .with_prompt(&prompt)
                    .items(items)
                    .default(if default_val { 0 } else { 1 })
                    .interact()
                    .into_diagnostic()?;
                Ok(Some(Value::Bool(selection == 0)))
            }
        }
    }
}

impl Default for SchemaWizard {
    fn default() -> Self {
        Self::new()
    }
}

/// Scalar, visible fields of an object schema; required fields first
fn extract_fields(schema: &Value) -> Vec<FieldInfo> {
    let required: Vec<&str> = schema["required"]
        .as_array()
        .map(|arr| arr.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();

    let Some(props) = schema["properties"].as_object() else {
        return Vec::new();
    };

    let mut fields: Vec<FieldInfo> = props
        .iter()
        .filter(|(_, prop)| prop["format"].as_str() != Some("hidden"))
        .filter_map(|(name, prop)| parse_field(name, prop, required.contains(&name.as_str())))
        .collect();
    fields.sort_by_key(|f| !f.required);
    fields
}

/// Parse a single field from its schema; `None` for anything non-scalar
fn parse_field(name: &str, schema: &Value, required: bool) -> Option<FieldInfo> {
    let field_type = if let Some(values) = schema["enum"].as_array() {
        FieldType::Enum {
            values: values.iter().filter_map(|v| v.as_str()).map(String::from).collect(),
        }
    } else {
        match schema["type"].as_str()? {
            "string" => FieldType::String {
                max_length: schema["maxLength"].as_u64(),
            },
            "integer" => FieldType::Integer,
            "number" => FieldType::Number,
            "boolean" => FieldType::Boolean,
            _ => return None,
        }
    };

    Some(FieldInfo {
        name: name.to_string(),
        title: schema["title"].as_str().map(String::from),
        description: schema["description"].as_str().map(String::from),
        field_type,
        required,
        default: schema.get("default").cloned(),
    })
}

/// Format the prompt for a field: its title plus a shortened description
fn format_prompt(field: &FieldInfo) -> String {
    let name = field.title.clone().unwrap_or_else(|| field.name.clone());

    match field.description {
        Some(ref desc) => {
            let short_desc = if desc.chars().count() > 50 {
                format!("{}...", desc.chars().take(47).collect::<String>())
            } else {
                desc.clone()
            };
            format!("{} ({})", name, style(short_desc).dim())
        }
        None => name,
    }
}
