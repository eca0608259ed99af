//! CLI frontend for the Spielleiter game master.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{OracleArgs, PipelineArgs};

#[derive(Parser)]
#[command(
    name = "sl",
    about = "Spielleiter: a rules-enforcing game master for solo tabletop play",
    version,
    propagate_version = true
)]
struct Cli {
    /// Path of the game state record
    #[arg(
        long,
        global = true,
        env = "SL_STATE",
        default_value = "memory/game_state.json"
    )]
    state: PathBuf,

    /// Template used to seed and reset the game (default: next to the record)
    #[arg(long, global = true)]
    template: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new game directory with a starter template and prompts
    Init {
        /// Directory to create
        dir: PathBuf,
    },

    /// Play interactively, one action per line
    Play {
        #[command(flatten)]
        oracle: OracleArgs,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Run a single action and print the response as JSON
    Turn {
        /// What the character does
        action: String,

        /// Confirm a reset request
        #[arg(long)]
        confirm_reset: bool,

        #[command(flatten)]
        oracle: OracleArgs,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Reset the game from the template
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Import a rules or scenario document into the game
    Import {
        /// Kind of document: rules or scenario
        #[arg(short, long)]
        kind: String,

        /// Source file (.txt, .md, or .pdf)
        #[arg(short, long)]
        source: PathBuf,

        /// Title to store (default: the file stem)
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Show what the character can currently observe
    Show {
        /// Print the projection as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that the oracle server is reachable
    Ping {
        #[command(flatten)]
        oracle: OracleArgs,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let store = commands::open_store(&cli.state, cli.template.as_deref());

    let result = match cli.command {
        Commands::Init { dir } => commands::init::run(&dir),
        Commands::Play { oracle, pipeline } => commands::play::run(store, &oracle, &pipeline),
        Commands::Turn {
            action,
            confirm_reset,
            oracle,
            pipeline,
        } => commands::turn::run(store, &action, confirm_reset, &oracle, &pipeline),
        Commands::Reset { force } => commands::reset::run(&store, force),
        Commands::Import {
            kind,
            source,
            title,
        } => commands::import::run(&store, &kind, &source, title.as_deref()),
        Commands::Show { json } => commands::show::run(&store, json),
        Commands::Ping { oracle } => commands::ping::run(&oracle),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
