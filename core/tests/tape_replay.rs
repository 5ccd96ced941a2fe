//! Integration tests: record a session, write it as a tape and replay it.

use handheld_asteroids_core::{
    deserialize_tape, replay_tape, serialize_tape, App, Keys, MemorySram, Mode, NullAudio,
    TapeError, TapeRecorder, Tuning,
};

const SEED: u32 = 0xDEAD_BEEF;

/// Start a game, then circle and fire for a while.
fn scripted_keys() -> Vec<Keys> {
    let mut keys = vec![Keys::empty(), Keys::START, Keys::empty()];
    for frame in 0..600u32 {
        let mut k = Keys::empty();
        if frame % 40 < 12 {
            k |= Keys::RIGHT;
        }
        if frame % 90 < 20 {
            k |= Keys::UP;
        }
        if frame % 6 == 0 {
            k |= Keys::A;
        }
        keys.push(k);
    }
    keys
}

fn record_session() -> (Vec<u8>, u32, u32, u32, Mode) {
    let mut app = App::new(SEED, Tuning::default(), MemorySram::new(), NullAudio);
    let mut recorder = TapeRecorder::new(SEED);
    for keys in scripted_keys() {
        recorder.record(keys);
        app.update(keys);
    }
    let score = app.game().score();
    let high = app.high_score();
    let data = recorder.finish(score, high);
    (data, score, high, app.game().rng_state(), app.mode())
}

#[test]
fn test_replay_matches_live_session() {
    let (data, score, high, rng_state, mode) = record_session();
    let tape = deserialize_tape(&data).expect("tape should parse");

    assert_eq!(tape.header.seed, SEED);
    assert_eq!(tape.header.frame_count as usize, scripted_keys().len());
    assert_eq!(tape.footer.final_score, score);

    let result = replay_tape(&tape, Tuning::default());
    assert_eq!(
        result.final_score, tape.footer.final_score,
        "Score mismatch: replay={}, recorded={}",
        result.final_score, tape.footer.final_score
    );
    assert_eq!(result.high_score, high);
    assert_eq!(
        result.rng_state, rng_state,
        "RNG mismatch: replay=0x{:08x}, live=0x{rng_state:08x}",
        result.rng_state
    );
    assert_eq!(result.final_mode, mode);
    assert_eq!(result.frames, tape.header.frame_count);
}

#[test]
fn test_replay_is_deterministic() {
    let (data, ..) = record_session();
    let tape = deserialize_tape(&data).expect("tape should parse");
    assert_eq!(
        replay_tape(&tape, Tuning::default()),
        replay_tape(&tape, Tuning::default())
    );
}

#[test]
fn test_tuning_changes_outcome() {
    let (data, ..) = record_session();
    let tape = deserialize_tape(&data).expect("tape should parse");
    let slow = Tuning {
        initial_spawn_interval: 10_000,
        ..Tuning::default()
    };
    let base = replay_tape(&tape, Tuning::default());
    let tuned = replay_tape(&tape, slow);
    assert_ne!(base.rng_state, tuned.rng_state);
}

#[test]
fn test_rejects_tampered_tape() {
    let (mut data, ..) = record_session();
    data[20] ^= Keys::A.bits() as u8;
    assert!(matches!(
        deserialize_tape(&data),
        Err(TapeError::CrcMismatch { .. })
    ));
}

#[test]
fn test_rejects_reserved_key_bits() {
    let data = serialize_tape(SEED, &[0, Keys::START.bits(), 0x8000], 0, 0);
    assert_eq!(
        deserialize_tape(&data),
        Err(TapeError::ReservedBitsSet {
            frame: 2,
            keys: 0x8000
        })
    );
}
