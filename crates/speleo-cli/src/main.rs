mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use speleo_lib::Color;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use commands::colors::{handle_colors, ColorModeArg, ColorsCommandArgs, DistanceArg};
use commands::cycles::handle_cycles;
use commands::resolve::handle_resolve;
use commands::section::handle_section;
use commands::segments::handle_segments;
use speleo_cli::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(author, version, about = "Cave survey station resolution and graph queries")]
struct Cli {
    /// Output format.
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Render configuration file (overrides SPELEO_CONFIG).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve station positions and report orphaned shots and isolated surveys.
    Resolve {
        /// Cave snapshot (.json, .csv or .txt).
        cave: PathBuf,
        /// Include splay leaf stations in the listing.
        #[arg(long)]
        splays: bool,
    },
    /// Shortest connecting path between two stations.
    Section {
        /// Cave snapshot (.json, .csv or .txt).
        cave: PathBuf,
        /// Starting station name.
        #[arg(long = "from")]
        from: String,
        /// Destination station name.
        #[arg(long = "to")]
        to: String,
    },
    /// List the independent loops of the centerline.
    Cycles {
        /// Cave snapshot (.json, .csv or .txt).
        cave: PathBuf,
    },
    /// Per-segment colors for rendering.
    Colors {
        /// Cave snapshot (.json, .csv or .txt).
        cave: PathBuf,
        /// Coloring mode (overrides the configuration file).
        #[arg(long, value_enum)]
        mode: Option<ColorModeArg>,
        /// Gradient start color as #rrggbb.
        #[arg(long)]
        start: Option<Color>,
        /// Gradient end color as #rrggbb.
        #[arg(long)]
        end: Option<Color>,
        /// Reference station for distance gradients.
        #[arg(long)]
        reference: Option<String>,
        /// Distance algorithm for distance gradients.
        #[arg(long, value_enum)]
        distance: Option<DistanceArg>,
    },
    /// Flat centerline and splay segment buffers.
    Segments {
        /// Cave snapshot (.json, .csv or .txt).
        cave: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let format = cli.format;
    match cli.command {
        Command::Resolve { cave, splays } => handle_resolve(&cave, splays, format),
        Command::Section { cave, from, to } => handle_section(&cave, &from, &to, format),
        Command::Cycles { cave } => handle_cycles(&cave, format),
        Command::Colors {
            cave,
            mode,
            start,
            end,
            reference,
            distance,
        } => {
            let args = ColorsCommandArgs {
                mode,
                start,
                end,
                reference,
                distance,
            };
            handle_colors(&cave, cli.config.as_deref(), &args, format)
        }
        Command::Segments { cave } => handle_segments(&cave, format),
    }
}

/// Logs go to stderr so JSON on stdout stays machine-readable.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
