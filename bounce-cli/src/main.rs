//! # bounce - headless fixed-timestep driver
//!
//! Runs a scenario through the same frame loop a renderer would, minus the
//! window. Commands that would come from the GUI are read from a script.
//!
//! Usage:
//!   bounce                                     # Reference scenario, real time
//!   bounce --scenario lunar_lob                # Another scenario file
//!   bounce --script scripts/reference_session.yaml --fast
//!   bounce --list                              # Show available scenarios
//!
//! Set `RUST_LOG=bounce_core=debug` to see every floor collision.

mod script;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bounce_core::clock::{FramePacer, ManualClock, MonotonicClock, NoSleep, ThreadSleeper};
use bounce_core::scenario::ScenarioLoader;
use bounce_core::simulation::{run_loop, BodySnapshot, FrameReport, FrameSink, RunSummary};
use bounce_core::Simulation;

/// CLI arguments
#[derive(Parser)]
#[command(name = "bounce")]
#[command(about = "Fixed-timestep ball-and-floor simulation, headless")]
pub struct Args {
    /// Scenario name (file stem inside the scenarios directory)
    #[arg(long, default_value = "reference")]
    scenario: String,

    /// Directory holding scenario YAML files
    #[arg(long, default_value = "scenarios")]
    scenarios_dir: PathBuf,

    /// Directory holding OBJ meshes (default: `meshes` beside the scenarios)
    #[arg(long)]
    meshes_dir: Option<PathBuf>,

    /// Command script (YAML) replayed against the run
    #[arg(long)]
    script: Option<PathBuf>,

    /// Stop after this many frames even without a `close` command
    #[arg(long)]
    frames: Option<u64>,

    /// Skip frame-rate throttling; every frame counts as exactly 1/fps
    #[arg(long)]
    fast: bool,

    /// Log the ball state every N frames
    #[arg(long, default_value = "30")]
    report_every: u64,

    /// List available scenarios and exit
    #[arg(long)]
    list: bool,
}

/// Logs the ball's state at a fixed frame interval.
struct LogSink {
    every: u64,
    frame: u64,
}

impl FrameSink for LogSink {
    fn present(&mut self, snapshot: &BodySnapshot, report: &FrameReport) {
        if self.every > 0 && self.frame % self.every == 0 {
            info!(
                frame = self.frame,
                t = format_args!("{:.3}", snapshot.time),
                y = format_args!("{:.4}", snapshot.position.y),
                vy = format_args!("{:.4}", snapshot.velocity.y),
                steps = report.steps,
                running = snapshot.running,
                "ball"
            );
        }
        self.frame += 1;
    }
}

fn run(args: &Args, sim: &mut Simulation) -> Result<RunSummary> {
    let mut commands = match &args.script {
        Some(path) => script::load(path)?,
        None => Vec::new(),
    };
    let mut sink = LogSink {
        every: args.report_every,
        frame: 0,
    };

    // A clock that never moves: every frame is throttled to exactly 1/fps.
    // Real-time runs without a limit go until `close` or Ctrl-C.
    let summary = if args.fast {
        let frames = args.frames.or(Some(600));
        let clock = ManualClock::new(0.0);
        let mut pacer = FramePacer::new(&clock, NoSleep::default());
        run_loop(sim, &mut pacer, &mut commands, &mut sink, frames)
    } else {
        let mut pacer = FramePacer::new(MonotonicClock::new(), ThreadSleeper);
        run_loop(sim, &mut pacer, &mut commands, &mut sink, args.frames)
    };
    Ok(summary)
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut loader = ScenarioLoader::new(&args.scenarios_dir);
    if let Some(dir) = &args.meshes_dir {
        loader = loader.with_mesh_dir(dir);
    }

    if args.list {
        for name in loader.list()? {
            println!("{}", name);
        }
        return Ok(());
    }

    let scenario = loader
        .load(&args.scenario)
        .with_context(|| format!("loading scenario '{}'", args.scenario))?;
    let mut sim = loader.build(&scenario)?;

    info!(
        "Starting '{}' at {} fps, {} physics ticks/s",
        scenario.name, scenario.config.fps, scenario.config.physics_tick
    );

    let summary = run(&args, &mut sim)?;
    let end = sim.snapshot();

    info!(
        frames = summary.frames,
        steps = summary.steps,
        rebounds = summary.rebounds,
        closed = summary.closed,
        "run finished"
    );
    println!("{}", serde_yaml::to_string(&end)?);
    Ok(())
}
