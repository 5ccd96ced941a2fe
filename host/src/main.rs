//! Headless Handheld Asteroids: runs the frame loop off-hardware with
//! file-backed save memory, optional pacing and tape recording.
//!
//! Usage:
//!   cargo run --release -p handheld-asteroids-host -- run --script demo.keys --frame-out last.ppm
//!   cargo run --release -p handheld-asteroids-host -- tape-info --replay session.tape

use std::{
    fs,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use handheld_asteroids_core::{
    deserialize_tape, replay_tape, App, Keys, MemorySram, Sram, Tape, TapeRecorder, Tuning,
};
use handheld_asteroids_host::{
    config::{self, parse_u32},
    run_session, FileSram, HeadlessDisplay, InputScript, RunSummary, TapeInfo, TracingAudio,
};
use serde::Serialize;
use tracing::{info, warn};

/// Frames to run when neither `--frames` nor an input source says otherwise.
const DEFAULT_FRAMES: u32 = 600;

#[derive(Debug, Parser)]
#[command(name = "handheld-asteroids", version, about = "Headless runner for Handheld Asteroids")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the game loop without a display.
    Run(RunArgs),
    /// Validate a tape and print its header and footer.
    TapeInfo {
        tape: PathBuf,
        /// Also replay the tape and compare against the recorded footer.
        #[arg(long)]
        replay: bool,
        #[arg(long)]
        tuning: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Number of frames to run [default: input length, else 600].
    #[arg(long)]
    frames: Option<u32>,
    /// RNG seed, decimal or 0x-hex [env: HANDHELD_ASTEROIDS_SEED].
    #[arg(long, value_parser = parse_u32)]
    seed: Option<u32>,
    /// Key script: lines of `<frames> <KEY> [KEY...]`.
    #[arg(long, conflicts_with = "tape")]
    script: Option<PathBuf>,
    /// Feed the key samples of a recorded tape; its seed wins over --seed.
    #[arg(long)]
    tape: Option<PathBuf>,
    /// Save memory file (32 KiB, created on demand). In-memory when absent.
    #[arg(long)]
    sram: Option<PathBuf>,
    /// Hold each frame to the handheld's ~59.73 Hz refresh.
    #[arg(long)]
    paced: bool,
    /// Write the last visible frame as a binary PPM.
    #[arg(long)]
    frame_out: Option<PathBuf>,
    /// Record the session's key samples to a tape.
    #[arg(long)]
    record: Option<PathBuf>,
    /// JSON tuning overrides [env: HANDHELD_ASTEROIDS_TUNING].
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Draw collision circles over the match.
    #[arg(long)]
    debug_collisions: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Run(args) => run(args),
        Command::TapeInfo {
            tape,
            replay,
            tuning,
        } => tape_info(&tape, replay, tuning.as_deref()),
    }
}

fn read_tape(path: &Path) -> Result<Tape> {
    let data =
        fs::read(path).with_context(|| format!("failed to read tape: {}", path.display()))?;
    deserialize_tape(&data).with_context(|| format!("invalid tape: {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize json")?;
    println!("{json}");
    Ok(())
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

/// Where `run` takes its key samples from.
enum InputSource {
    Idle,
    Script(InputScript),
    Tape(Tape),
}

impl InputSource {
    fn load(args: &RunArgs) -> Result<Self> {
        match (&args.script, &args.tape) {
            (Some(path), _) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read script: {}", path.display()))?;
                let script = InputScript::parse(&text)
                    .with_context(|| format!("invalid script: {}", path.display()))?;
                Ok(Self::Script(script))
            }
            (None, Some(path)) => Ok(Self::Tape(read_tape(path)?)),
            (None, None) => Ok(Self::Idle),
        }
    }

    fn frame_count(&self) -> Option<u32> {
        match self {
            Self::Idle => None,
            Self::Script(script) => Some(u32::try_from(script.total_frames()).unwrap_or(u32::MAX)),
            Self::Tape(tape) => Some(tape.header.frame_count),
        }
    }

    fn seed(&self) -> Option<u32> {
        match self {
            Self::Tape(tape) => Some(tape.header.seed),
            _ => None,
        }
    }

    /// Expanded lazily; scripts may hold keys for billions of frames.
    fn keys(&self) -> Box<dyn Iterator<Item = Keys> + '_> {
        match self {
            Self::Idle => Box::new(std::iter::empty()),
            Self::Script(script) => Box::new(script.frames()),
            Self::Tape(tape) => Box::new(tape.keys()),
        }
    }
}

fn run(args: RunArgs) -> Result<()> {
    let tuning = config::load_tuning(args.tuning.as_deref())?;
    let input = InputSource::load(&args)?;

    let seed = match (input.seed(), args.seed) {
        (Some(tape_seed), Some(flag)) if tape_seed != flag => {
            warn!(flag, tape_seed, "--seed ignored, replaying with the tape's seed");
            tape_seed
        }
        (Some(tape_seed), _) => tape_seed,
        (None, Some(flag)) => flag,
        (None, None) => config::read_env_u32(config::SEED_ENV)?.unwrap_or_else(clock_seed),
    };
    let frames = args.frames.or(input.frame_count()).unwrap_or(DEFAULT_FRAMES);
    info!(seed, frames, paced = args.paced, "starting run");

    let keys = input.keys();
    let summary = match &args.sram {
        Some(path) => run_with(FileSram::open(path)?, &args, tuning, seed, keys, frames)?,
        None => run_with(MemorySram::new(), &args, tuning, seed, keys, frames)?,
    };
    print_json(&summary)
}

fn run_with<S: Sram>(
    sram: S,
    args: &RunArgs,
    tuning: Tuning,
    seed: u32,
    keys: impl Iterator<Item = Keys>,
    frames: u32,
) -> Result<RunSummary> {
    let mut app = App::new(seed, tuning, sram, TracingAudio::default());
    app.set_show_collisions(args.debug_collisions);
    let mut display = HeadlessDisplay::new(args.paced);
    let mut recorder = args.record.as_ref().map(|_| TapeRecorder::new(seed));

    let summary = run_session(
        &mut app,
        &mut display,
        seed,
        keys,
        frames,
        recorder.as_mut(),
    )?;

    if let Some(path) = &args.frame_out {
        display.save_ppm(path)?;
        info!(path = %path.display(), "wrote frame dump");
    }

    if let (Some(path), Some(recorder)) = (&args.record, &recorder) {
        let data = recorder.finish(summary.score, summary.high_score);
        fs::write(path, data)
            .with_context(|| format!("failed writing tape: {}", path.display()))?;
        info!(path = %path.display(), frames = recorder.frame_count(), "wrote tape");
    }

    Ok(summary)
}

#[derive(Debug, Serialize)]
struct TapeReport {
    #[serde(flatten)]
    info: TapeInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    replayed_score: Option<u32>,
}

fn tape_info(path: &Path, replay: bool, tuning: Option<&Path>) -> Result<()> {
    let tape = read_tape(path)?;
    let mut report = TapeReport {
        info: TapeInfo::from(&tape),
        replayed_score: None,
    };

    if replay {
        let tuning = config::load_tuning(tuning)?;
        let result = replay_tape(&tape, tuning);
        report.replayed_score = Some(result.final_score);
        if result.final_score != tape.footer.final_score {
            print_json(&report)?;
            bail!(
                "score mismatch: replay={}, tape={}",
                result.final_score,
                tape.footer.final_score
            );
        }
    }

    print_json(&report)
}
