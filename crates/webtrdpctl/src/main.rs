//! webTRDP Control - monitoring client for the webTRDP simulator backend
//!
//! Polls process data telegram state, lists and loads XML configurations,
//! and drives individual telegrams, either one command at a time or through
//! the interactive monitor.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::time::Duration;
use webtrdp_common::ClientConfig;
use webtrdpctl::errors::EXIT_SUCCESS;
use webtrdpctl::{commands, logging, tui, Workbench};

#[derive(Parser)]
#[command(name = "webtrdpctl")]
#[command(about = "webTRDP simulator monitoring client", long_about = None)]
#[command(version)]
struct Cli {
    /// Backend base address (overrides config and WEBTRDP_BACKEND_URL)
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Host identity sent with config loads (overrides TRDP_HOST_NAME)
    #[arg(long, global = true)]
    host: Option<String>,

    /// Initially selected configuration path (overrides TRDP_XML_PATH)
    #[arg(long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive monitor (default)
    Monitor,

    /// Fetch and print the telegram snapshot
    Telegrams {
        /// Print the raw JSON array
        #[arg(long)]
        json: bool,
    },

    /// List configurations offered by the backend
    Configs,

    /// Load a configuration (defaults to the selected or first listed one)
    Load {
        /// Backend-side path of the XML configuration
        path: Option<String>,
    },

    /// Enable or disable transmission of a telegram
    Enable {
        com_id: u32,

        /// Disable instead of enable
        #[arg(long)]
        off: bool,
    },

    /// Set dataset field values of a telegram
    Set {
        com_id: u32,

        /// Assignments in NAME=VALUE form
        #[arg(required = true)]
        fields: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Monitor);

    let log_path = if matches!(command, Commands::Monitor) {
        logging::init_file()
    } else {
        logging::init_stderr();
        None
    };

    let mut config = ClientConfig::load().context("Failed to load webtrdpctl configuration")?;
    if let Some(url) = cli.backend {
        config.backend.url = url;
    }
    if let Some(host) = cli.host {
        config.session.host_name = host;
    }
    if let Some(path) = cli.config_path {
        config.session.config_path = path;
    }

    let workbench =
        Workbench::from_config(&config).context("Failed to create backend client")?;

    let code = match command {
        Commands::Monitor => {
            let auto_refresh = config
                .monitor
                .auto_refresh_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs);
            tui::run(workbench, auto_refresh, log_path).await?;
            EXIT_SUCCESS
        }
        Commands::Telegrams { json } => commands::telegrams(&workbench, json).await?,
        Commands::Configs => commands::configs(&workbench).await?,
        Commands::Load { path } => commands::load(&workbench, path).await?,
        Commands::Enable { com_id, off } => commands::enable(&workbench, com_id, !off).await?,
        Commands::Set { com_id, fields } => {
            commands::set_values(&workbench, com_id, &fields).await?
        }
    };

    if code != EXIT_SUCCESS {
        std::process::exit(code);
    }
    Ok(())
}
