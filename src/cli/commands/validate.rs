//! `cine validate` command - Validate cinematic files against the schema

use console::style;
use miette::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::cli::helpers::display_path;
use crate::cli::GlobalOpts;
use crate::core::loader::{is_cinematic_file, schema_for_path};
use crate::core::project::Project;
use crate::entities::cinematic::Cinematic;
use crate::schema::lint::lint;
use crate::schema::registry::SchemaRegistry;
use crate::schema::validator::{ValidationIssue, Validator};
use crate::yaml::YamlSyntaxError;

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Paths to validate (default: entire project)
    #[arg()]
    pub paths: Vec<PathBuf>,

    /// Strict mode - warnings become errors
    #[arg(long)]
    pub strict: bool,

    /// Continue validation after first error
    #[arg(long)]
    pub keep_going: bool,

    /// Show summary only, don't show individual errors
    #[arg(long)]
    pub summary: bool,
}

/// Validation statistics
#[derive(Default)]
struct ValidationStats {
    files_checked: usize,
    files_passed: usize,
    files_failed: usize,
    total_errors: usize,
    total_warnings: usize,
}

/// Outcome of checking a single file
enum FileOutcome {
    Passed,
    Warned(Vec<ValidationIssue>),
    Failed { count: usize, report: miette::Report },
}

pub fn run(args: ValidateArgs, global: &GlobalOpts) -> Result<()> {
    let registry = SchemaRegistry::default();
    let validator = Validator::new(&registry);

    let (files_to_validate, base) = if args.paths.is_empty() {
        let project =
            Project::locate(global.project.as_deref()).map_err(|e| miette::miette!("{}", e))?;
        let files: Vec<PathBuf> = project.iter_cinematic_files().collect();
        (files, project.root().to_path_buf())
    } else {
        let base = std::env::current_dir().unwrap_or_default();
        (expand_paths(&args.paths), base)
    };

    let mut stats = ValidationStats::default();
    let mut had_error = false;

    if !global.quiet {
        println!(
            "{} Validating {} file(s)...\n",
            style("→").blue(),
            files_to_validate.len()
        );
    }

    for path in &files_to_validate {
        let shown = display_path(path, &base);
        stats.files_checked += 1;

        match check_file(&validator, path) {
            FileOutcome::Passed => {
                stats.files_passed += 1;
                if !args.summary && !global.quiet {
                    println!("{} {}", style("✓").green(), shown);
                }
            }
            FileOutcome::Warned(warnings) => {
                stats.total_warnings += warnings.len();
                if !args.summary {
                    println!(
                        "{} {} - {} warning(s)",
                        style("!").yellow(),
                        shown,
                        warnings.len()
                    );
                    for warning in &warnings {
                        println!("    {}", style(warning).yellow());
                    }
                }
                if args.strict {
                    stats.files_failed += 1;
                    had_error = true;
                    if !args.keep_going {
                        break;
                    }
                } else {
                    stats.files_passed += 1;
                }
            }
            FileOutcome::Failed { count, report } => {
                stats.files_failed += 1;
                stats.total_errors += count;
                had_error = true;
                if !args.summary {
                    println!("{} {} - {} error(s)", style("✗").red(), shown, count);
                    println!("{:?}", report);
                }
                if !args.keep_going {
                    break;
                }
            }
        }
    }

    tracing::debug!(
        checked = stats.files_checked,
        failed = stats.files_failed,
        warnings = stats.total_warnings,
        "validation finished"
    );

    if !global.quiet {
        print_summary(&stats);
    }

    if had_error {
        if stats.files_failed == 1 {
            Err(miette::miette!("Validation failed: 1 file has errors"))
        } else {
            Err(miette::miette!(
                "Validation failed: {} files have errors",
                stats.files_failed
            ))
        }
    } else {
        if !global.quiet {
            println!("{} All files passed validation!", style("✓").green().bold());
        }
        Ok(())
    }
}

/// Schema check first; lint only documents the schema accepts
fn check_file(validator: &Validator, path: &Path) -> FileOutcome {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            return FileOutcome::Failed {
                count: 1,
                report: miette::miette!("Failed to read {}: {}", path.display(), e),
            }
        }
    };
    let filename = path.file_name().unwrap_or_default().to_string_lossy();
    let schema_name = schema_for_path(path).unwrap_or(crate::schema::registry::CINEMATIC);

    if let Err(e) = validator.iter_errors(&content, &filename, schema_name) {
        return FileOutcome::Failed {
            count: e.violation_count(),
            report: miette::Report::new(e),
        };
    }

    let cinematic: Cinematic = match serde_yml::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            return FileOutcome::Failed {
                count: 1,
                report: miette::Report::new(YamlSyntaxError::from_serde_error(
                    &e, &content, &filename,
                )),
            }
        }
    };

    let warnings = lint(&cinematic);
    if warnings.is_empty() {
        FileOutcome::Passed
    } else {
        FileOutcome::Warned(warnings)
    }
}

fn print_summary(stats: &ValidationStats) {
    println!();
    println!("{}", style("─".repeat(60)).dim());
    println!("{}", style("Validation Summary").bold());
    println!("{}", style("─".repeat(60)).dim());
    println!("  Files checked:  {}", style(stats.files_checked).cyan());
    println!("  Files passed:   {}", style(stats.files_passed).green());
    println!("  Files failed:   {}", style(stats.files_failed).red());
    println!("  Total errors:   {}", style(stats.total_errors).red());
    if stats.total_warnings > 0 {
        println!("  Total warnings: {}", style(stats.total_warnings).yellow());
    }
    println!();
}

/// Expand paths - if a directory is given, find all cinematic files in it
fn expand_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
            {
                if is_cinematic_file(entry.path()) {
                    files.push(entry.path().to_path_buf());
                }
            }
        } else {
            // Named files are checked whatever their extension; missing ones fail to read
            files.push(path.clone());
        }
    }

    files.sort();
    files
}
