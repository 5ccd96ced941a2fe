//! Handheld Asteroids core: fixed-point game logic, software rendering and
//! the mode state machine for a 240x160 BGR555 handheld.
//!
//! Everything here is integer-only and allocation-free per frame; hardware
//! sits behind the [`present::Screen`], [`audio::Audio`] and [`save::Sram`]
//! traits so the same code runs on a device or a headless host.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod app;
pub mod audio;
pub mod constants;
pub mod error;
pub mod events;
pub mod fixed_point;
pub mod game;
pub mod geometry;
pub mod input;
pub mod physics;
pub mod present;
pub mod render;
pub mod rng;
pub mod save;
pub mod tape;
pub mod tuning;
pub mod types;
pub mod ui;

// Re-export key items
pub use app::{replay_tape, App, FrameReport, Mode, ReplayResult};
pub use audio::{Audio, NullAudio, SoundRegister};
pub use error::{FlipError, SaveError, TuningError};
pub use events::FrameEvents;
pub use game::Match;
pub use input::{FrameInput, KeyState, Keys};
pub use present::Screen;
pub use render::Framebuffer;
pub use rng::SeededRng;
pub use save::{MemorySram, Sram};
pub use tape::{deserialize_tape, serialize_tape, Tape, TapeError, TapeRecorder};
pub use tuning::Tuning;
