use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod completions;
mod handlers;
mod render;

#[cfg(test)]
mod tests;

#[derive(Parser, Debug)]
#[command(name = "extpack")]
#[command(about = "Namespace-aware extension manager planning tool", long_about = None)]
struct Cli {
    #[arg(long, default_value = "installed.toml")]
    state: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Plan {
        #[arg(required = true)]
        specs: Vec<String>,
        #[arg(long = "namespace")]
        namespaces: Vec<String>,
        #[arg(long)]
        verbose: bool,
        #[arg(long)]
        json: bool,
    },
    List,
    Completions {
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    commands::run(cli)
}
