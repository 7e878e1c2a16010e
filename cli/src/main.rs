use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use roadnet_cli::config::{OutputFormat, Overrides, Settings};
use roadnet_cli::load::load_graph;
use roadnet_cli::logging;
use roadnet_cli::path::{emit, run_route};
use roadnet_cli::sink::{JsonSink, ResultSink, TextSink};
use roadnet_cli::status::StatusReport;
use roadnet_core::{DelayModel, NodeId};

#[derive(Parser)]
#[command(name = "roadnet")]
#[command(version, about = "Earliest-arrival routing over weighted road networks", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log filter, e.g. `debug` or `roadnet_core=trace`
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// TOML settings file
    #[arg(long, global = true, env = "ROADNET_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the earliest arrival between two nodes
    Route {
        /// Road network file
        input: PathBuf,
        /// Start node [default: 0]
        #[arg(long)]
        from: Option<NodeId>,
        /// Destination node [default: last node]
        #[arg(long)]
        to: Option<NodeId>,
        /// Arrival delay: none, constant[:SECONDS], random[:SCALE[@SEED]]
        #[arg(long, env = "ROADNET_DELAY")]
        delay: Option<DelayModel>,
        #[arg(long, value_enum, env = "ROADNET_FORMAT")]
        format: Option<OutputFormat>,
        #[arg(long, env = "ROADNET_MAX_MEMORY_MB")]
        max_memory_mb: Option<u32>,
        /// Also report search counters
        #[arg(long)]
        stats: bool,
    },
    /// Load a road network and describe it
    Stats {
        /// Road network file
        input: PathBuf,
        #[arg(long, value_enum, env = "ROADNET_FORMAT")]
        format: Option<OutputFormat>,
        #[arg(long, env = "ROADNET_MAX_MEMORY_MB")]
        max_memory_mb: Option<u32>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init_tracing(cli.verbose, cli.log_level.as_deref(), cli.log_json) {
        eprintln!("warning: failed to initialize logging: {e}");
    }

    match cli.command {
        Commands::Route {
            input,
            from,
            to,
            delay,
            format,
            max_memory_mb,
            stats,
        } => {
            let settings = Settings::resolve(
                cli.config.as_deref(),
                Overrides {
                    source: from,
                    destination: to,
                    delay,
                    format,
                    max_memory_mb,
                },
            )?;

            let loaded = load_graph(&input, settings.max_memory_mb)
                .with_context(|| format!("failed to load {}", input.display()))?;
            let report = run_route(&loaded, &settings)?;

            let stdout = io::stdout().lock();
            let mut sink: Box<dyn ResultSink> = match settings.format {
                OutputFormat::Text => Box::new(TextSink::new(stdout)),
                OutputFormat::Json => Box::new(JsonSink::new(stdout)),
            };
            emit(&report, sink.as_mut(), stats).context("failed to write result")?;
        }
        Commands::Stats {
            input,
            format,
            max_memory_mb,
        } => {
            let settings = Settings::resolve(
                cli.config.as_deref(),
                Overrides {
                    format,
                    max_memory_mb,
                    ..Overrides::default()
                },
            )?;

            let loaded = load_graph(&input, settings.max_memory_mb)
                .with_context(|| format!("failed to load {}", input.display()))?;
            StatusReport::from_loaded(&loaded)
                .write(&mut io::stdout().lock(), settings.format)
                .context("failed to write status")?;
        }
    }

    Ok(())
}
