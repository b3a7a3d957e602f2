//! Schema introspection
//!
//! Lists the generated cinematic schemas, shows their fields, and exports
//! them as JSON files for editors and other tooling.

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::cli::helpers::truncate_str;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::schema::registry::SchemaRegistry;

#[derive(Subcommand, Debug)]
pub enum SchemaCommands {
    /// List all available schemas
    List,

    /// Show detailed schema for a type
    Show(ShowArgs),

    /// Write every schema to `<name>.schema.json`
    Export(ExportArgs),
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Schema name (cinematic, shot, shot-setup, dialog-node, character, thang-type)
    pub name: String,

    /// Show raw JSON schema instead of formatted summary
    #[arg(long)]
    pub raw: bool,
}

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Output directory
    #[arg(long, short = 'o', default_value = "schemas")]
    pub out: PathBuf,
}

pub fn run(cmd: SchemaCommands, global: &GlobalOpts) -> Result<()> {
    let registry = SchemaRegistry::default();
    match cmd {
        SchemaCommands::List => list_schemas(&registry, global),
        SchemaCommands::Show(args) => show_schema(&registry, args, global),
        SchemaCommands::Export(args) => export_schemas(&registry, args, global),
    }
}

fn list_schemas(registry: &SchemaRegistry, global: &GlobalOpts) -> Result<()> {
    if global.format == OutputFormat::Id {
        for name in registry.names() {
            println!("{}", name);
        }
        return Ok(());
    }

    println!("Available schemas:\n");
    println!("{:<12} {:<20} {}", "NAME", "TITLE", "DESCRIPTION");
    println!("{}", "-".repeat(70));

    for (name, schema) in registry.entries() {
        let title = schema["title"].as_str().unwrap_or(name);
        let desc = schema["description"].as_str().unwrap_or("");
        println!("{:<12} {:<20} {}", name, title, truncate_str(desc, 40));
    }

    println!("\nUse 'cine schema show <name>' for field details");
    Ok(())
}

fn show_schema(registry: &SchemaRegistry, args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let Some(schema) = registry.get(&args.name) else {
        let available: Vec<&str> = registry.names().collect();
        return Err(miette::miette!(
            help = format!("Available schemas: {}", available.join(", ")),
            "Unknown schema: {}",
            args.name
        ));
    };

    if args.raw || global.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(schema).into_diagnostic()?);
        return Ok(());
    }

    let title = schema["title"].as_str().unwrap_or(&args.name);
    let desc = schema["description"].as_str().unwrap_or("");
    println!("{}", style(title).bold());
    println!("{}", "=".repeat(title.chars().count()));
    if !desc.is_empty() {
        println!("{}\n", desc);
    }

    let required: Vec<&str> = schema["required"]
        .as_array()
        .map(|arr| arr.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();

    if let Some(props) = schema["properties"].as_object() {
        println!("Fields:");
        println!("{:<20} {:<14} {:<5} {}", "NAME", "TYPE", "REQ", "DESCRIPTION");
        println!("{}", "-".repeat(80));

        let sorted: BTreeMap<_, _> = props.iter().collect();

        for (name, prop) in &sorted {
            if prop["format"].as_str() == Some("hidden") {
                continue;
            }
            let is_required = if required.contains(&name.as_str()) {
                "yes"
            } else {
                ""
            };
            let prop_desc = prop["description"].as_str().unwrap_or("");
            println!(
                "{:<20} {:<14} {:<5} {}",
                name,
                get_type_str(prop),
                is_required,
                truncate_str(prop_desc, 38)
            );
        }

        let enums: Vec<_> = sorted
            .iter()
            .filter_map(|(name, prop)| prop["enum"].as_array().map(|vals| (name, vals)))
            .collect();
        if !enums.is_empty() {
            println!("\nEnum Values:");
            for (name, vals) in enums {
                let vals: Vec<&str> = vals.iter().filter_map(|v| v.as_str()).collect();
                println!("  {}: {}", name, vals.join(", "));
            }
        }
    }

    println!("\nUse --raw for full JSON schema");
    Ok(())
}

fn export_schemas(registry: &SchemaRegistry, args: ExportArgs, global: &GlobalOpts) -> Result<()> {
    std::fs::create_dir_all(&args.out).into_diagnostic()?;

    for name in registry.names() {
        let Some(json) = registry.to_pretty_json(name) else {
            continue;
        };
        let path = args.out.join(format!("{}.schema.json", name));
        std::fs::write(&path, json + "\n").into_diagnostic()?;
        tracing::debug!(schema = name, path = %path.display(), "exported schema");

        if !global.quiet {
            println!("{} {}", style("✓").green(), path.display());
        }
    }

    Ok(())
}

fn get_type_str(prop: &Value) -> String {
    if prop.get("oneOf").is_some() {
        return "oneOf".to_string();
    }
    match &prop["type"] {
        Value::String(t) if t == "array" => match prop["items"]["type"].as_str() {
            Some(items_type) => format!("{}[]", items_type),
            None => "array".to_string(),
        },
        Value::String(t) => t.clone(),
        Value::Array(types) => types
            .iter()
            .filter_map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join("|"),
        _ => "any".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_type_str() {
        assert_eq!(get_type_str(&json!({"type": "string"})), "string");
        assert_eq!(
            get_type_str(&json!({"type": "array", "items": {"type": "object"}})),
            "object[]"
        );
        assert_eq!(get_type_str(&json!({"type": ["object", "string"]})), "object|string");
        assert_eq!(get_type_str(&json!({"oneOf": []})), "oneOf");
        assert_eq!(get_type_str(&json!({})), "any");
    }
}
