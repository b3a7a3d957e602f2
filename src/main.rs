use clap::Parser;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cine::cli::{Cli, Commands, GlobalOpts};

/// Environment variable holding a tracing filter (e.g. `cine=debug`)
const LOG_ENV: &str = "CINE_LOG";

fn main() -> Result<()> {
    // Reset SIGPIPE so piping into `head` terminates quietly instead of panicking
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    init_logging(&global);

    match cli.command {
        Commands::Init(args) => cine::cli::commands::init::run(args),
        Commands::New(args) => cine::cli::commands::cinematic::run_new(args, &global),
        Commands::List(args) => cine::cli::commands::cinematic::run_list(args, &global),
        Commands::Show(args) => cine::cli::commands::cinematic::run_show(args, &global),
        Commands::Edit(args) => cine::cli::commands::cinematic::run_edit(args, &global),
        Commands::Validate(args) => cine::cli::commands::validate::run(args, &global),
        Commands::Schema(cmd) => cine::cli::commands::schema::run(cmd, &global),
        Commands::Completions(args) => cine::cli::commands::completions::run(args),
    }
}

/// Log to stderr so stdout stays pipeable
fn init_logging(global: &GlobalOpts) {
    let fallback = if global.verbose {
        "cine=debug"
    } else if global.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
