//! canvasfs command-line client.
//!
//! Drives the canvasfs engine one operation at a time, the same calls a
//! kernel filesystem bridge would make.
//!
//! Usage:
//!   # Browse the seeded in-memory store
//!   canvasfs --demo ls /
//!   canvasfs --demo walk --rounds 3
//!
//!   # Against a Canvas instance (token read from ./token.txt by default)
//!   canvasfs ls "/CS101/Lecture Slides"
//!   canvasfs cat "/CS101/Lecture Slides/week1.pdf" > week1.pdf
//!   canvasfs --api-url https://school.instructure.com --token-file ~/.canvas-token statfs

mod commands;
mod config;
mod demo;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use canvasfs_canvas::CanvasClient;
use canvasfs_kernel::{AttrOptions, CanvasFs, FsError, RemoteApi};

use crate::config::{Environment, Overrides};

/// Browse Canvas course files as a filesystem.
#[derive(Parser, Debug)]
#[command(name = "canvasfs")]
#[command(about = "Browse Canvas course files as a filesystem")]
struct Args {
    /// Config file (default: $XDG_CONFIG_HOME/canvasfs/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Canvas instance URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// File holding the access token
    #[arg(long, global = true)]
    token_file: Option<String>,

    /// Use a seeded in-memory store instead of Canvas
    #[arg(long, global = true)]
    demo: bool,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List a directory
    Ls {
        #[arg(default_value = "/")]
        path: String,
    },
    /// Show attributes of a file or directory
    Stat { path: String },
    /// Write a file's content to stdout
    Cat { path: String },
    /// Create a folder
    Mkdir { path: String },
    /// Remove an empty folder
    Rmdir { path: String },
    /// Show filesystem statistics
    Statfs,
    /// Traverse a tree repeatedly, timing each pass
    Walk {
        #[arg(default_value = "/")]
        path: String,

        /// Number of traversals
        #[arg(long, default_value_t = 2)]
        rounds: u32,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; stdout carries command output.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Args) -> Result<()> {
    let remote: Arc<dyn RemoteApi> = if args.demo {
        tracing::info!("using in-memory demo store");
        Arc::new(demo::demo_remote())
    } else {
        let overrides = Overrides {
            config: args.config.clone(),
            api_url: args.api_url.clone(),
            token_file: args.token_file.clone(),
        };
        let settings = config::load(&overrides, &Environment::from_process())?;
        tracing::info!(api_url = %settings.api_url, "connecting to Canvas");
        Arc::new(CanvasClient::new(settings.canvas_config()).context("invalid Canvas settings")?)
    };

    let fs = CanvasFs::mount(remote, AttrOptions::default())
        .await
        .context("failed to list courses")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Ls { path } => commands::ls(&fs, &path, &mut out).await,
        Command::Stat { path } => commands::stat(&fs, &path, &mut out).await,
        Command::Cat { path } => commands::cat(&fs, &path, &mut out).await.map(|_| ()),
        Command::Mkdir { path } => commands::mkdir(&fs, &path).await,
        Command::Rmdir { path } => commands::rmdir(&fs, &path).await,
        Command::Statfs => commands::statfs(&fs, &mut out).await,
        Command::Walk { path, rounds } => {
            commands::walk(&fs, &path, rounds, &mut out).await.map(|_| ())
        }
    }
}

/// `error: <msg> (errno N)` for filesystem failures, the context chain otherwise.
fn report(err: &anyhow::Error) {
    match err.chain().find_map(|e| e.downcast_ref::<FsError>()) {
        Some(fs_err) => eprintln!("error: {err:#} (errno {})", fs_err.errno()),
        None => eprintln!("error: {err:#}"),
    }
}
