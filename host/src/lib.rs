pub mod config;
pub mod display;
pub mod script;
pub mod sram;

use anyhow::{Context, Result};
use handheld_asteroids_core::{
    App, Audio, FrameEvents, Keys, Mode, Screen, SoundRegister, Sram, Tape, TapeRecorder,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

pub use display::HeadlessDisplay;
pub use script::InputScript;
pub use sram::FileSram;

/// Sound sink that logs every register write at `trace` level.
#[derive(Debug, Default)]
pub struct TracingAudio {
    writes: u64,
}

impl TracingAudio {
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl Audio for TracingAudio {
    fn write(&mut self, register: SoundRegister, value: u16) {
        self.writes += 1;
        trace!(
            register = register.name(),
            address = format_args!("0x{:08x}", register.address()),
            value = format_args!("0x{value:04x}"),
            "sound write"
        );
    }
}

/// Result of a headless run, printed as JSON by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u32,
    pub frames: u32,
    pub final_mode: Mode,
    pub score: u32,
    pub high_score: u32,
    pub lives: i32,
    pub rng_state: u32,
    pub flips: u32,
    pub mode_changes: u32,
    pub sound_writes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_save_error: Option<String>,
}

/// Drive `app` for `frames` frames. Input runs out into idle frames. Every
/// sampled key set is appended to `recorder` when one is given.
pub fn run_session<S, I, D>(
    app: &mut App<S, TracingAudio>,
    display: &mut D,
    seed: u32,
    inputs: I,
    frames: u32,
    mut recorder: Option<&mut TapeRecorder>,
) -> Result<RunSummary>
where
    S: Sram,
    I: IntoIterator<Item = Keys>,
    D: Screen,
{
    let mut inputs = inputs.into_iter();
    let mut flips = 0;
    let mut mode_changes = 0;
    let mut mode = app.mode();

    for frame in 0..frames {
        let keys = inputs.next().unwrap_or_else(Keys::empty);
        if let Some(recorder) = recorder.as_deref_mut() {
            recorder.record(keys);
        }

        let report = app
            .frame(keys, display)
            .with_context(|| format!("frame {frame}: present failed"))?;
        if report.flipped {
            flips += 1;
        }

        if report.events.contains(FrameEvents::MODE_CHANGED) {
            mode_changes += 1;
            info!(frame, from = %mode, to = %report.mode, "mode change");
            mode = report.mode;
        }
        log_events(app, frame, report.events);
    }

    Ok(RunSummary {
        seed,
        frames,
        final_mode: app.mode(),
        score: app.game().score(),
        high_score: app.high_score(),
        lives: app.game().lives(),
        rng_state: app.game().rng_state(),
        flips,
        mode_changes,
        sound_writes: app.audio().writes(),
        last_save_error: app.last_save_error().map(|err| err.to_string()),
    })
}

fn log_events<S: Sram>(app: &App<S, TracingAudio>, frame: u32, events: FrameEvents) {
    if events.contains(FrameEvents::SHIP_HIT) {
        debug!(frame, lives = app.game().lives(), "ship destroyed");
    }
    if events.contains(FrameEvents::GAME_OVER) {
        info!(frame, score = app.game().score(), high_score = app.high_score(), "game over");
    }
    if events.contains(FrameEvents::GAME_SAVED) {
        info!(frame, "game saved");
    }
    if events.contains(FrameEvents::GAME_LOADED) {
        info!(frame, score = app.game().score(), "game loaded");
    }
    if events.contains(FrameEvents::HIGH_SCORE_SAVED) {
        info!(frame, high_score = app.high_score(), "high score saved");
    }
    if events.intersects(FrameEvents::SAVE_FAILED | FrameEvents::LOAD_FAILED) {
        match app.last_save_error() {
            Some(err) => warn!(frame, %err, "save memory operation failed"),
            None => warn!(frame, "save memory operation failed"),
        }
    }
}

/// Header and footer of a validated tape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TapeInfo {
    pub version: u8,
    pub seed: u32,
    pub frame_count: u32,
    pub final_score: u32,
    pub high_score: u32,
    pub checksum: String,
}

impl From<&Tape> for TapeInfo {
    fn from(tape: &Tape) -> Self {
        Self {
            version: tape.header.version,
            seed: tape.header.seed,
            frame_count: tape.header.frame_count,
            final_score: tape.footer.final_score,
            high_score: tape.footer.high_score,
            checksum: format!("0x{:08x}", tape.footer.checksum),
        }
    }
}
