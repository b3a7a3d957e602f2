//! `cine new|list|show|edit` - cinematic document commands

use console::style;
use dialoguer::{theme::ColorfulTheme, Input};
use miette::{IntoDiagnostic, Result};
use std::fs;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{
    camera_summary, cast_summary, display_path, escape_tsv, truncate_str,
};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::loader::{load_all, load_entity};
use crate::core::{slugify, Config, Project};
use crate::entities::cinematic::{CameraType, CharacterType, Cinematic, Side};
use crate::schema::template::{TemplateContext, TemplateGenerator};
use crate::schema::wizard::SchemaWizard;

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Display name of the cinematic
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// File slug (default: derived from the name)
    #[arg(long)]
    pub slug: Option<String>,

    /// Camera type of the first shot
    #[arg(long, short = 'c', default_value = "dual")]
    pub camera: CameraType,

    /// Character on the left: `hero` or a ThangType slug
    #[arg(long)]
    pub left: Option<CharacterType>,

    /// Character on the right: `hero` or a ThangType slug
    #[arg(long)]
    pub right: Option<CharacterType>,

    /// Background art ThangType slug
    #[arg(long)]
    pub background: Option<String>,

    /// Use interactive wizard to fill in fields
    #[arg(long, short = 'i')]
    pub interactive: bool,

    /// Open in editor after creation
    #[arg(long, short = 'e')]
    pub edit: bool,

    /// Don't open in editor after creation
    #[arg(long)]
    pub no_edit: bool,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only list cinematics whose name or slug contains this text
    #[arg(long)]
    pub search: Option<String>,

    /// Only list cinematics with a shot using this camera type
    #[arg(long)]
    pub camera: Option<CameraType>,

    /// Show count only, not the items
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Cinematic slug (or a unique prefix)
    pub slug: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Cinematic slug (or a unique prefix)
    pub slug: String,
}

pub fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::locate(global.project.as_deref()).map_err(|e| miette::miette!("{}", e))?;
    let config = Config::load_for(Some(project.root()));

    let mut name = args.name.clone();
    let mut camera = args.camera;
    let mut left = args.left.clone();
    let mut right = args.right.clone();
    let mut background = args.background.clone();

    if args.interactive {
        let wizard = SchemaWizard::new();
        let result = wizard.run("cinematic")?;
        name = result.get_string("name").map(String::from).or(name);

        let setup = wizard.run("shot-setup")?;
        if let Some(value) = setup.get_string("cameraType") {
            camera = value.parse::<CameraType>().map_err(|e: String| miette::miette!("{}", e))?;
        }

        // Characters and background are nested objects the wizard skips
        let theme = ColorfulTheme::default();
        println!();
        println!("{}", style("Characters:").bold());
        left = prompt_character(&theme, "Left character (hero or ThangType slug, blank for none)")?.or(left);
        right = prompt_character(&theme, "Right character (hero or ThangType slug, blank for none)")?.or(right);

        let art: String = Input::with_theme(&theme)
            .with_prompt("Background art slug (blank for none)")
            .allow_empty(true)
            .interact_text()
            .into_diagnostic()?;
        if !art.trim().is_empty() {
            background = Some(art.trim().to_string());
        }
    }

    let name = name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| miette::miette!("Name is required (use --name or -i for interactive)"))?;
    let slug = args.slug.clone().unwrap_or_else(|| slugify(&name));
    if slug.is_empty() {
        return Err(miette::miette!(
            "Cannot derive a slug from '{}'; pass one with --slug",
            name
        ));
    }

    let mut ctx = TemplateContext::new(&name, config.author())
        .with_slug(&slug)
        .with_camera_type(camera);
    if let Some(kind) = left {
        ctx = ctx.with_left(kind);
    }
    if let Some(kind) = right {
        ctx = ctx.with_right(kind);
    }
    if let Some(art) = background {
        ctx = ctx.with_background(art);
    }

    let generator = TemplateGenerator::new().map_err(|e| miette::miette!("{}", e))?;
    let yaml_content = generator
        .generate_cinematic(&ctx)
        .map_err(|e| miette::miette!("{}", e))?;

    let file_path = project.cinematic_path(&slug);
    if file_path.exists() {
        return Err(miette::miette!(
            "Cinematic '{}' already exists at {}",
            slug,
            file_path.display()
        ));
    }
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).into_diagnostic()?;
    }
    fs::write(&file_path, &yaml_content).into_diagnostic()?;
    tracing::info!(slug = %slug, path = %file_path.display(), "created cinematic");

    match global.format {
        OutputFormat::Id => println!("{}", slug),
        OutputFormat::Json => {
            let out = serde_json::json!({
                "slug": slug,
                "name": name,
                "path": file_path.display().to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&out).into_diagnostic()?);
        }
        _ if global.quiet => {}
        _ => {
            println!(
                "{} Created cinematic {}",
                style("✓").green(),
                style(&slug).cyan()
            );
            println!(
                "   {} | Camera: {}",
                style(display_path(&file_path, project.root())).dim(),
                style(camera).yellow()
            );
        }
    }

    if args.edit || (!args.no_edit && !args.interactive) {
        println!();
        println!("Opening in {}...", style(config.editor()).yellow());
        config.run_editor(&file_path).into_diagnostic()?;
    }

    Ok(())
}

fn prompt_character(theme: &ColorfulTheme, prompt: &str) -> Result<Option<CharacterType>> {
    let value: String = Input::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .into_diagnostic()?;
    if value.trim().is_empty() {
        return Ok(None);
    }
    value
        .parse::<CharacterType>()
        .map(Some)
        .map_err(|e: String| miette::miette!("{}", e))
}

pub fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::locate(global.project.as_deref()).map_err(|e| miette::miette!("{}", e))?;
    let config = Config::load_for(Some(project.root()));
    let format = global.format.or_configured(config.default_format.as_deref());

    let mut cinematics = load_all::<Cinematic>(&project.cinematics_dir())?;

    if let Some(ref search) = args.search {
        let needle = search.to_lowercase();
        cinematics.retain(|(_, c)| {
            c.name.to_lowercase().contains(&needle) || c.slug.to_lowercase().contains(&needle)
        });
    }
    if let Some(camera) = args.camera {
        cinematics.retain(|(_, c)| {
            c.shots.iter().any(|shot| {
                shot.shot_setup.as_ref().map(|s| s.camera()).unwrap_or_default() == camera
            })
        });
    }

    if args.count {
        println!("{}", cinematics.len());
        return Ok(());
    }

    match format {
        OutputFormat::Id => {
            for (_, c) in &cinematics {
                println!("{}", c.slug);
            }
        }
        OutputFormat::Json => {
            let rows: Vec<serde_json::Value> = cinematics
                .iter()
                .map(|(path, c)| {
                    serde_json::json!({
                        "slug": c.slug,
                        "name": c.name,
                        "shots": c.shots.len(),
                        "dialog_nodes": c.dialog_node_count(),
                        "path": display_path(path, project.root()),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            let docs: Vec<&Cinematic> = cinematics.iter().map(|(_, c)| c).collect();
            print!("{}", serde_yml::to_string(&docs).into_diagnostic()?);
        }
        OutputFormat::Tsv => {
            println!("SLUG\tNAME\tSHOTS\tNODES\tCAMERAS\tCAST");
            for (_, c) in &cinematics {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    c.slug,
                    escape_tsv(&c.name),
                    c.shots.len(),
                    c.dialog_node_count(),
                    camera_summary(c),
                    cast_summary(c)
                );
            }
        }
        OutputFormat::Auto => {
            if cinematics.is_empty() {
                if !global.quiet {
                    println!("No cinematics found.");
                    println!();
                    println!("Create one with: {}", style("cine new --name <name>").yellow());
                }
                return Ok(());
            }

            let mut builder = Builder::default();
            builder.push_record(["SLUG", "NAME", "SHOTS", "NODES", "CAMERAS", "CAST"]);
            for (_, c) in &cinematics {
                builder.push_record([
                    truncate_str(&c.slug, 24),
                    truncate_str(&c.name, 32),
                    c.shots.len().to_string(),
                    c.dialog_node_count().to_string(),
                    truncate_str(&camera_summary(c), 30),
                    cast_summary(c),
                ]);
            }
            println!("{}", builder.build().with(Style::rounded()));

            if !global.quiet {
                println!();
                println!(
                    "{} cinematic(s) found",
                    style(cinematics.len()).cyan()
                );
            }
        }
    }

    Ok(())
}

pub fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::locate(global.project.as_deref()).map_err(|e| miette::miette!("{}", e))?;
    let config = Config::load_for(Some(project.root()));

    let (path, cinematic) = load_entity::<Cinematic>(&project.cinematics_dir(), &args.slug)?
        .ok_or_else(|| miette::miette!("No cinematic found matching '{}'", args.slug))?;

    match global.format.or_configured(config.default_format.as_deref()) {
        OutputFormat::Yaml => {
            let content = fs::read_to_string(&path).into_diagnostic()?;
            print!("{}", content);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&cinematic).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Id => println!("{}", cinematic.slug),
        OutputFormat::Tsv | OutputFormat::Auto => print_pretty(&cinematic),
    }

    Ok(())
}

fn print_pretty(cinematic: &Cinematic) {
    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("Name").bold(), style(&cinematic.name).yellow());
    println!("{}: {}", style("Slug").bold(), style(&cinematic.slug).cyan());
    println!(
        "{}: {} shot(s), {} dialog node(s)",
        style("Shots").bold(),
        cinematic.shots.len(),
        cinematic.dialog_node_count()
    );
    println!("{}", style("─".repeat(60)).dim());

    for (i, shot) in cinematic.shots.iter().enumerate() {
        println!();
        let camera = shot.shot_setup.as_ref().map(|s| s.camera()).unwrap_or_default();
        println!(
            "{} {}  camera: {}",
            style("Shot").bold(),
            style(i + 1).bold(),
            style(camera).yellow()
        );

        if let Some(ref setup) = shot.shot_setup {
            for side in [Side::Left, Side::Right] {
                if let Some(character) = setup.character(side) {
                    let entering = if character.enter_on_start == Some(true) {
                        " (enters)"
                    } else {
                        ""
                    };
                    println!("  {}: {}{}", side, style(&character.kind).cyan(), entering);
                }
            }
            if let Some(ref art) = setup.background_art {
                println!("  background: {}", style(&art.slug).cyan());
            }
        }

        for node in &shot.dialog_nodes {
            let speaker = node
                .speaker
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string());
            let text = node.text.as_deref().unwrap_or("");
            let mut line = format!("  {:>5} │ {}", speaker, truncate_str(text, 60));
            if let Some(ref filters) = node.filters {
                if let Some(language) = filters.language {
                    line.push_str(&format!(" [{}]", language));
                }
            }
            if node.dialog_clear {
                println!("{}", line);
            } else {
                println!("{} {}", line, style("(keeps text)").dim());
            }
        }
    }
}

pub fn run_edit(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::locate(global.project.as_deref()).map_err(|e| miette::miette!("{}", e))?;
    let config = Config::load_for(Some(project.root()));

    let path = crate::core::loader::find_entity_file(&project.cinematics_dir(), &args.slug)
        .ok_or_else(|| miette::miette!("No cinematic found matching '{}'", args.slug))?;

    println!(
        "Opening {} in {}...",
        style(display_path(&path, project.root())).cyan(),
        style(config.editor()).yellow()
    );
    let status = config.run_editor(&path).into_diagnostic()?;
    if !status.success() {
        return Err(miette::miette!("Editor exited with {}", status));
    }

    Ok(())
}
