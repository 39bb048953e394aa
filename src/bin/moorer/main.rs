//! moorer - offline renderer and live control surface for the reverb
//!
//! Run with: cargo run -- render in.wav out.wav --preset hall
//!       or: cargo run -- live

mod cli;
mod devices;
mod live;
mod render;
mod ui;

use clap::Parser;

use cli::{Cli, Command};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Render(args) => render::run(&args),
        Command::Live(args) => live::run(&args),
        Command::Devices => devices::list(),
    }
}
