//! Integration tests: the mode state machine driven by raw key samples.

use handheld_asteroids_core::constants::{DAMAGE_DELAY, SCREEN_PIXELS};
use handheld_asteroids_core::fixed_point::from_int;
use handheld_asteroids_core::save::write_u32;
use handheld_asteroids_core::{
    App, FrameEvents, FrameReport, Framebuffer, Keys, MemorySram, Mode, NullAudio, Screen, Tuning,
};

type TestApp = App<MemorySram, NullAudio>;

fn tap(app: &mut TestApp, keys: Keys) -> FrameReport {
    app.update(Keys::empty());
    app.update(keys)
}

/// A saved match with two lives left and a small asteroid parked on the ship.
fn doomed_save() -> MemorySram {
    let mut sram = MemorySram::new();
    let mut words = vec![
        0x4741_4D45, // "GAME"
        0,           // score
        2,           // lives
        from_int(116) as u32,
        from_int(76) as u32,
        0,
        0,
        270,
        1,
        // asteroid slot 0: alive, centre, velocity, size code
        1,
        from_int(120) as u32,
        from_int(80) as u32,
        0,
        0,
        8,
    ];
    words.extend([0; 15]); // remaining asteroid slots
    words.extend([0; 10]); // bullets
    for (i, word) in words.into_iter().enumerate() {
        write_u32(&mut sram, 8 + 4 * i, word).expect("write");
    }
    sram
}

#[test]
fn test_new_game_then_pause() {
    let mut app = App::new(42, Tuning::default(), MemorySram::new(), NullAudio);
    assert_eq!(app.update(Keys::empty()).mode, Mode::Menu);

    let report = tap(&mut app, Keys::START);
    assert_eq!(report.mode, Mode::Match);
    assert_eq!(app.game().live_asteroids(), 4);

    let report = tap(&mut app, Keys::START);
    assert_eq!(report.mode, Mode::Pause);
    assert!(!report.flipped);

    // Paused frames do not advance the match
    let frames = app.game().frame_count();
    for _ in 0..10 {
        app.update(Keys::empty());
    }
    assert_eq!(app.game().frame_count(), frames);

    assert_eq!(tap(&mut app, Keys::A).mode, Mode::Match);
}

#[test]
fn test_death_and_respawn_from_loaded_game() {
    let mut app = App::new(42, Tuning::default(), doomed_save(), NullAudio);
    tap(&mut app, Keys::DOWN);
    let report = tap(&mut app, Keys::A);
    assert_eq!(report.mode, Mode::Match);
    assert!(report.events.contains(FrameEvents::GAME_LOADED));
    assert_eq!(app.game().lives(), 2);

    let report = app.update(Keys::empty());
    assert_eq!(report.mode, Mode::Reset);
    assert!(report.events.contains(FrameEvents::SHIP_HIT));
    assert_eq!(app.game().lives(), 1);
    assert!(!app.game().ship().alive);

    let mut report = report;
    for _ in 0..=DAMAGE_DELAY {
        report = app.update(Keys::empty());
    }
    assert_eq!(report.mode, Mode::Match);
    assert!(report.events.contains(FrameEvents::RESPAWNED));
    assert!(app.game().ship().alive);
    // the parked asteroid was inside the clear radius
    assert_eq!(app.game().live_asteroids(), 0);
}

#[test]
fn test_last_life_returns_to_menu() {
    let mut sram = doomed_save();
    write_u32(&mut sram, 16, 1).expect("lives");
    let mut app = App::new(42, Tuning::default(), sram, NullAudio);
    tap(&mut app, Keys::DOWN);
    tap(&mut app, Keys::A);

    let mut report = app.update(Keys::empty());
    assert_eq!(report.mode, Mode::Reset);
    let mut saw_game_over = false;
    while report.mode == Mode::Reset {
        report = app.update(Keys::empty());
        saw_game_over |= report.events.contains(FrameEvents::GAME_OVER);
    }
    assert!(saw_game_over);
    assert_eq!(report.mode, Mode::Menu);
    assert_eq!(app.game().lives(), 3);
}

#[test]
fn test_frame_presents_back_buffer() {
    let mut app = App::new(42, Tuning::default(), MemorySram::new(), NullAudio);
    let mut screen = Framebuffer::new();
    let report = app.frame(Keys::empty(), &mut screen).expect("flip");
    assert!(report.flipped);
    assert_eq!(screen.visible_mut().len(), SCREEN_PIXELS);
    assert_eq!(screen.pixels(), app.back_buffer().pixels());
}
