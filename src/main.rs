use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use jbprojects::app::{run, Action};

#[derive(Debug, Parser)]
#[command(
    name = "jbprojects",
    version,
    about = "Fuzzy launcher for recent JetBrains IDE projects"
)]
struct Cli {
    #[arg(long, help = "Enable verbose debug logs")]
    debug: bool,
    #[arg(long, help = "Config file (default ~/.config/jbprojects/config.toml)")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the ranked projects for a query, e.g. `search py shop`
    Search {
        #[arg(long, help = "Print JSON instead of a text list")]
        json: bool,
        #[arg(long, help = "Maximum number of results")]
        limit: Option<usize>,
        #[arg(long, help = "Minimum fuzzy score (0-100) when a query is given")]
        min_score: Option<u32>,
        query: Vec<String>,
    },
    /// Open the best match in its IDE
    Open { query: Vec<String> },
    /// Copy the best match's path to the clipboard
    Copy { query: Vec<String> },
    /// List known IDEs and their recent projects files
    Ides,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let action = match cli.command {
        None => Action::Interactive,
        Some(Command::Search {
            json,
            limit,
            min_score,
            query,
        }) => Action::Search {
            input: query.join(" "),
            json,
            limit,
            min_score,
        },
        Some(Command::Open { query }) => Action::Open {
            input: query.join(" "),
        },
        Some(Command::Copy { query }) => Action::Copy {
            input: query.join(" "),
        },
        Some(Command::Ides) => Action::Ides,
    };
    run(cli.debug, cli.config, action)
}
