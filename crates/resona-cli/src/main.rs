//! Resona CLI - offline audition tool for the resona reverberator.

mod commands;
mod preset;
mod wav;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "resona")]
#[command(author, version, about = "Feedback delay network reverb, offline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the reverberator's stereo impulse response to a WAV file
    Render(commands::render::RenderArgs),

    /// Process a WAV file through the reverberator
    Process(commands::process::ProcessArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Process(args) => commands::process::run(args),
    }
}
