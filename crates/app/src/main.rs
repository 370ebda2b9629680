mod terminal;

use std::{
    io::{self, Write},
    path::PathBuf,
    time::Duration,
};

use clap::{Args, Parser, Subcommand};
use rand::{rngs::StdRng, SeedableRng};
use sort_visualiser_core::{
    run_algorithm, sequence, Algorithm, AppConfig, MergeOverlay, Pacer, RunOutcome, Session,
    StepContext, StepEvent, StepObserver,
};
use tracing_subscriber::EnvFilter;

use crate::terminal::{ScreenGuard, TerminalSurface};

#[tokio::main]
async fn main() -> sort_visualiser_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run_animation(args).await,
        Commands::Trace {
            algorithm,
            values,
            size,
            seed,
        } => run_trace(algorithm, values, size, seed).await,
        Commands::Algorithms => {
            list_algorithms();
            Ok(())
        }
    }
}

async fn run_animation(args: RunArgs) -> sort_visualiser_core::Result<()> {
    let config = args.resolve_config()?;
    tracing::info!(
        algorithm = %config.session.algorithm,
        size = config.session.size,
        delay_ms = config.session.delay_ms,
        "starting animation"
    );

    let surface = TerminalSurface::new(config.surface.width, config.surface.height);
    let mut session = Session::new(config, surface)?;

    let outcome = {
        let _screen = ScreenGuard::enter()?;
        session.generate()?;
        let run = session.start_sort()?;
        let outcome = tokio::select! {
            outcome = run.wait() => outcome?,
            _ = tokio::signal::ctrl_c() => {
                session.cancel();
                RunOutcome::Cancelled
            }
        };
        if matches!(outcome, RunOutcome::Completed(_)) {
            hold_final_frame(Duration::from_millis(args.hold_ms)).await;
        }
        outcome
    };

    match outcome {
        RunOutcome::Completed(values) => println!("{}", sequence::listing(&values)),
        RunOutcome::Cancelled | RunOutcome::Superseded => {
            tracing::warn!("sort run did not complete");
        }
    }
    Ok(())
}

/// Keeps the sorted frame on screen until `hold` elapses or Ctrl-C arrives.
async fn hold_final_frame(hold: Duration) {
    tokio::select! {
        _ = tokio::time::sleep(hold) => {}
        _ = tokio::signal::ctrl_c() => {}
    }
}

async fn run_trace(
    algorithm: Algorithm,
    values: Vec<u32>,
    size: usize,
    seed: Option<u64>,
) -> sort_visualiser_core::Result<()> {
    let values = if values.is_empty() {
        let config = AppConfig::default();
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        sequence::generate(size, &config.surface, &mut rng)?
    } else {
        values
    };
    tracing::info!(%algorithm, len = values.len(), "tracing sort steps");

    write_trace(algorithm, values, &mut io::stdout()).await
}

/// Sorts `values` without delays, writing one JSON line per step followed by
/// a `done` line carrying the sorted sequence.
async fn write_trace<W: Write + Send>(
    algorithm: Algorithm,
    values: Vec<u32>,
    out: &mut W,
) -> sort_visualiser_core::Result<()> {
    let mut writer = JsonLines { out };
    let sorted = {
        let mut ctx = StepContext::new(&mut writer, Pacer::fixed(0));
        let sorted = run_algorithm(algorithm, values, &mut ctx).await?;
        tracing::info!(steps = ctx.steps(), "trace finished");
        sorted
    };
    writeln!(writer.out, "{}", serde_json::json!({ "kind": "done", "values": sorted }))?;
    writer.out.flush()?;
    Ok(())
}

fn list_algorithms() {
    for algorithm in Algorithm::ALL {
        let stability = if algorithm.is_stable() {
            "stable"
        } else {
            "unstable"
        };
        println!(
            "{:<10} {:<9} step: {}",
            algorithm.name(),
            stability,
            algorithm.step_description()
        );
    }
}

/// Writes every step as one JSON object per line.
struct JsonLines<W> {
    out: W,
}

impl<W: Write> StepObserver<u32> for JsonLines<W> {
    fn on_step(
        &mut self,
        _values: &[u32],
        event: &StepEvent<'_, u32>,
    ) -> sort_visualiser_core::Result<()> {
        serde_json::to_writer(&mut self.out, event)?;
        writeln!(self.out)?;
        Ok(())
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Animated sorting algorithm visualiser", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a random sequence and animate one algorithm in the terminal.
    Run(RunArgs),
    /// Sort without delays and print every step as a JSON line.
    Trace {
        /// Algorithm to trace.
        #[arg(short, long, default_value = "merge")]
        algorithm: Algorithm,
        /// Comma separated input values. A random sequence is used when omitted.
        #[arg(long, value_delimiter = ',')]
        values: Vec<u32>,
        /// Length of the random sequence.
        #[arg(long, default_value_t = 16)]
        size: usize,
        /// Seed for the random sequence.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List the supported algorithms.
    Algorithms,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// JSON configuration file; command line flags override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Algorithm to animate.
    #[arg(short, long)]
    algorithm: Option<Algorithm>,
    /// Number of bars.
    #[arg(short, long)]
    size: Option<usize>,
    /// Delay between steps in milliseconds.
    #[arg(short, long, conflicts_with = "speed")]
    delay: Option<u64>,
    /// Speed from 1 (slowest) to 100 (fastest).
    #[arg(long)]
    speed: Option<u8>,
    /// Seed for the random sequence.
    #[arg(long)]
    seed: Option<u64>,
    /// Draw merge runs at their real positions instead of from the left edge.
    #[arg(long)]
    positioned_merge: bool,
    /// How long the sorted sequence stays on screen, in milliseconds.
    #[arg(long, default_value_t = 2_000)]
    hold_ms: u64,
}

impl RunArgs {
    fn resolve_config(&self) -> sort_visualiser_core::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_json_file(path)?,
            None => AppConfig::default(),
        };

        if let Some(algorithm) = self.algorithm {
            config.session.algorithm = algorithm;
        }
        if let Some(size) = self.size {
            config.session.size = size;
        }
        if let Some(delay) = self.delay {
            config.session.delay_ms = delay;
        }
        if let Some(speed) = self.speed {
            config.session.delay_ms = sort_visualiser_core::delay_from_speed(speed)?;
        }
        if self.seed.is_some() {
            config.session.seed = self.seed;
        }
        if self.positioned_merge {
            config.surface.merge_overlay = MergeOverlay::Positioned;
        }

        config.validate()?;
        Ok(config)
    }
}
