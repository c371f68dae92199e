//! Eddy CLI — headless simulation, benchmarking, and config validation.

use clap::{Parser, Subcommand};

mod commands;
mod terminal;

#[derive(Parser)]
#[command(name = "eddy")]
#[command(version, about = "Eddy — real-time 2-D stable fluids")]
struct Cli {
    /// Log step scheduling at DEBUG level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation headless and draw it in the terminal.
    Run {
        /// Path to simulation config (TOML). Defaults to a seeded preview box.
        #[arg(short, long)]
        config: Option<String>,

        /// Number of 60 Hz frames to drive.
        #[arg(short, long, default_value_t = 120)]
        frames: u32,

        /// Draw every N-th frame (0 draws only the last).
        #[arg(short, long, default_value_t = 30)]
        every: u32,

        /// Field to draw (density, density_source, horizontal_velocity, vertical_velocity).
        #[arg(short, long)]
        select: Option<String>,

        /// Run kernels on the threaded device instead of the CPU fallback.
        #[arg(short, long)]
        threaded: bool,
    },

    /// Run benchmark suite.
    Benchmark {
        /// Which scenario to run (center_impulse, drag_stroke, quiescent, all).
        #[arg(short, long, default_value = "all")]
        scenario: String,

        /// Output CSV file path.
        #[arg(short, long)]
        output: Option<String>,

        /// Run kernels on the threaded device instead of the CPU fallback.
        #[arg(short, long)]
        threaded: bool,
    },

    /// Validate a simulation config.
    Validate {
        /// Path to config file (TOML).
        path: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Run {
            config,
            frames,
            every,
            select,
            threaded,
        } => commands::run(config.as_deref(), frames, every, select.as_deref(), threaded),
        Commands::Benchmark {
            scenario,
            output,
            threaded,
        } => commands::benchmark(&scenario, output.as_deref(), threaded),
        Commands::Validate { path } => commands::validate(&path),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
