use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

use vsc::cli::{Cli, Commands, ConfigCommands};

fn main() {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Segment {
            input,
            output,
            json,
        } => commands::segment::handle(&input, output.as_deref(), json),
        Commands::Show { input, json } => commands::show::handle(&input, json),
        Commands::Batch {
            input_dir,
            output_dir,
        } => commands::batch::handle(&input_dir, output_dir),
        Commands::Config(ConfigCommands::Show) => commands::config::handle_show(),
        Commands::Config(ConfigCommands::Path) => commands::config::handle_path(),
        Commands::Config(ConfigCommands::Init { force }) => commands::config::handle_init(force),
        Commands::Completions { shell } => commands::completions::handle(shell),
    }
}
