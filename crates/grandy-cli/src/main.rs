//! Grandy CLI - offline renderer for the Grandy stochastic synthesis engine.

mod commands;
mod wav;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "grandy")]
#[command(author, version, about = "Granular dynamic stochastic synthesis renderer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a single breakpoint oscillator to a WAV file
    Render(commands::render::RenderArgs),

    /// Render several stitched oscillators with crossfaded hand-offs
    Stitch(commands::stitch::StitchArgs),

    /// Granularly mangle a recorded WAV loop
    Echo(commands::echo::EchoArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Stitch(args) => commands::stitch::run(args),
        Commands::Echo(args) => commands::echo::run(args),
    }
}
