//! The frame-driven game loop: menu, match, death/game-over screen, pause,
//! settings and credits.
//!
//! Every frame samples the keys once, runs the current mode and draws into
//! the back buffer. [`App::frame`] adds the vblank wait and the flip.

use serde::{Deserialize, Serialize};

use crate::audio::{self, Audio, MenuMusic, NullAudio, SoundEffect};
use crate::constants::*;
use crate::error::{FlipError, SaveError};
use crate::events::FrameEvents;
use crate::game::{Match, StepStatus};
use crate::input::{FrameInput, KeyState, Keys};
use crate::present::{flip, Screen};
use crate::render::font::{centered_pair_x, centered_x, draw_glyph, draw_text, TextBuf, SELECTOR};
use crate::render::scene::{draw_collision_circles, draw_match};
use crate::render::Framebuffer;
use crate::save::{has_saved_game, load_game, save_game, HighScore, MemorySram, Sram};
use crate::tape::Tape;
use crate::tuning::Tuning;
use crate::ui::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Menu,
    Match,
    Reset,
    Pause,
    Settings,
    Credits,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Menu => "menu",
            Mode::Match => "match",
            Mode::Reset => "reset",
            Mode::Pause => "pause",
            Mode::Settings => "settings",
            Mode::Credits => "credits",
        }
    }
}

impl core::fmt::Display for Mode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What one frame did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    /// Mode after the frame.
    pub mode: Mode,
    pub events: FrameEvents,
    /// False when the mode skipped drawing (pausing, or the frame the ship died).
    pub flipped: bool,
}

const MENU_TITLE: &str = "GBA ASTEROIDS";
const MENU_ITEMS: [&str; 4] = [" NEW GAME ", " CONTINUE ", " SETTINGS ", " CREDITS "];
const MENU_NEW_GAME: usize = 0;
const MENU_CONTINUE: usize = 1;
const MENU_SETTINGS: usize = 2;
const MENU_SLIDE_STEP: i32 = 5;
const MENU_WRAP_STEP: i32 = 10;

const SETTINGS_TITLE: &str = "SETTINGS";
const DELETE_ITEM: &str = " DELETE HIGH SCORE ";
const BACK_ITEM: &str = " MAIN MENU ";
const CONFIRM_TITLE: &str = "CONFIRM DELETE?";
const YES_ITEM: &str = " YES ";
const NO_ITEM: &str = " NO ";
const SETTINGS_SLIDE_STEP: i32 = 8;

const CREDITS_TEXT: &str = "MADE BY TAYLOR BOESE";

const PAUSE_TITLE: &str = "  PAUSED!   ";
const PAUSE_ITEMS: [&str; 3] = [" RESUME ", " SAVE GAME ", " QUIT "];
const PAUSE_RESUME: usize = 0;
const PAUSE_SAVE: usize = 1;

fn menu_item_y(index: usize) -> i32 {
    MENU_ITEM_1 + index as i32 * LINE_HEIGHT
}

struct MenuScreen {
    /// False until the menu has been entered; entering rebuilds the shapes
    /// and restarts the jingle.
    visible: bool,
    selection: usize,
    cursor: CursorSlide,
    shapes: [FloatingShape; NUM_MENU_SHAPES],
}

struct SettingsScreen {
    on_back_item: bool,
    confirming: bool,
    confirm_yes: bool,
    cursor: CursorSlide,
}

impl SettingsScreen {
    fn cursor_row(&self) -> i32 {
        let second = if self.confirming {
            !self.confirm_yes
        } else {
            self.on_back_item
        };
        if second {
            MENU_ITEM_3
        } else {
            MENU_ITEM_2
        }
    }
}

pub struct App<S, A> {
    mode: Mode,
    game: Match,
    high_score: HighScore,
    /// High score when the current match started; game over saves only if it rose.
    initial_high_score: u32,
    back: Framebuffer,
    sram: S,
    audio: A,
    keys: KeyState,
    music: MenuMusic,
    notification: Notification,
    menu: MenuScreen,
    settings: SettingsScreen,
    pause_selection: usize,
    reset_counter: u32,
    reset_color: u32,
    circles: [BouncingCircle; NUM_BOUNCING_CIRCLES],
    show_collisions: bool,
    last_save_error: Option<SaveError>,
    frame_count: u32,
}

impl<S: Sram, A: Audio> App<S, A> {
    /// Power on: enable sound, read the high score and start at the menu.
    pub fn new(seed: u32, tuning: Tuning, mut sram: S, mut audio: A) -> Self {
        audio::enable(&mut audio);
        let high_score = HighScore::load(&mut sram);

        Self {
            mode: Mode::Menu,
            game: Match::new(seed, tuning),
            high_score,
            initial_high_score: high_score.get(),
            back: Framebuffer::new(),
            sram,
            audio,
            keys: KeyState::new(),
            music: MenuMusic::new(),
            notification: Notification::default(),
            menu: MenuScreen {
                visible: false,
                selection: MENU_NEW_GAME,
                cursor: CursorSlide::at(menu_item_y(MENU_NEW_GAME)),
                shapes: menu_shapes(),
            },
            settings: SettingsScreen {
                on_back_item: false,
                confirming: false,
                confirm_yes: false,
                cursor: CursorSlide::at(MENU_ITEM_2),
            },
            pause_selection: PAUSE_RESUME,
            reset_counter: 0,
            reset_color: 0,
            circles: bouncing_circles(),
            show_collisions: false,
            last_save_error: None,
            frame_count: 0,
        }
    }

    /// Draw hit circles over the match.
    pub fn set_show_collisions(&mut self, show: bool) {
        self.show_collisions = show;
    }

    /// One full frame: wait for vblank, update and draw, then flip.
    pub fn frame<D: Screen + ?Sized>(&mut self, raw: Keys, screen: &mut D) -> Result<FrameReport, FlipError> {
        screen.wait_for_vblank();
        let report = self.update(raw);
        if report.flipped {
            flip(&self.back, screen)?;
        }
        Ok(report)
    }

    /// Run the current mode for one frame against a raw key sample.
    pub fn update(&mut self, raw: Keys) -> FrameReport {
        let input = self.keys.sample(raw);
        let before = self.mode;
        let mut events = FrameEvents::empty();
        self.frame_count = self.frame_count.wrapping_add(1);

        if self.mode == Mode::Menu {
            self.music.update(&mut self.audio);
        }

        let flipped = match self.mode {
            Mode::Menu => self.menu_frame(input, &mut events),
            Mode::Match => self.match_frame(input, &mut events),
            Mode::Reset => self.reset_frame(&mut events),
            Mode::Pause => self.pause_frame(input, &mut events),
            Mode::Settings => self.settings_frame(input, &mut events),
            Mode::Credits => self.credits_frame(input),
        };

        if self.mode != before {
            events |= FrameEvents::MODE_CHANGED;
        }
        FrameReport {
            mode: self.mode,
            events,
            flipped,
        }
    }

    // ========================================================================
    // Menu
    // ========================================================================

    fn menu_frame(&mut self, input: FrameInput, events: &mut FrameEvents) -> bool {
        if !self.menu.visible {
            self.menu.visible = true;
            self.menu.shapes = menu_shapes();
            self.menu.cursor.snap(menu_item_y(self.menu.selection));
            self.music.start(&mut self.audio);
        }

        self.back.clear();
        for shape in &mut self.menu.shapes {
            shape.update();
            shape.draw(&mut self.back);
        }

        let title_x = centered_x(MENU_TITLE);
        let item_x = title_x + 2 * CHAR_PIX_SIZE;
        draw_text(&mut self.back, MENU_TITLE, title_x, MENU_TEXT_Y, CLR_WHITE);
        for (i, item) in MENU_ITEMS.iter().enumerate() {
            draw_text(&mut self.back, item, item_x, menu_item_y(i), CLR_WHITE);
        }

        if input.pressed(Keys::START | Keys::A) {
            self.select_menu_item(events);
        } else if input.pressed(Keys::UP | Keys::DOWN) {
            let prev = self.menu.selection;
            let count = MENU_ITEMS.len();
            let next = if input.pressed(Keys::DOWN) {
                (prev + 1) % count
            } else {
                (prev + count - 1) % count
            };
            let wrapped = (prev == count - 1 && next == 0) || (prev == 0 && next == count - 1);
            let step = if wrapped { MENU_WRAP_STEP } else { MENU_SLIDE_STEP };

            self.menu.selection = next;
            self.menu.cursor.slide_to(menu_item_y(next), step);
            audio::play(&mut self.audio, SoundEffect::MenuSelect);
            *events |= FrameEvents::MENU_MOVED;
        }

        self.menu.cursor.advance();
        draw_glyph(
            &mut self.back,
            &SELECTOR,
            title_x + CHAR_PIX_SIZE,
            self.menu.cursor.y(),
            CLR_WHITE,
        );

        self.notification.draw(&mut self.back);
        true
    }

    fn select_menu_item(&mut self, events: &mut FrameEvents) {
        match self.menu.selection {
            MENU_NEW_GAME => {
                self.music.stop(&mut self.audio);
                self.initial_high_score = self.high_score.get();
                self.game.setup();
                self.mode = Mode::Match;
            }
            MENU_CONTINUE => {
                if !has_saved_game(&mut self.sram) {
                    self.notification.no_save_data();
                    return;
                }
                self.music.stop(&mut self.audio);
                match load_game(&mut self.sram, &mut self.game) {
                    Ok(()) => {
                        self.initial_high_score = self.high_score.get();
                        self.mode = Mode::Match;
                        *events |= FrameEvents::GAME_LOADED;
                    }
                    Err(err) => {
                        self.last_save_error = Some(err);
                        self.notification.no_save_data();
                        *events |= FrameEvents::LOAD_FAILED;
                    }
                }
            }
            MENU_SETTINGS => self.mode = Mode::Settings,
            _ => self.mode = Mode::Credits,
        }
    }

    // ========================================================================
    // Match
    // ========================================================================

    fn match_frame(&mut self, input: FrameInput, events: &mut FrameEvents) -> bool {
        let report = self.game.step(input);
        self.play_match_sounds(report.events);
        *events |= report.events;

        if report.status == StepStatus::Paused {
            self.mode = Mode::Pause;
            return false;
        }

        if self.game.score() > self.high_score.get() {
            self.high_score.set(self.game.score());
        }

        if report.status == StepStatus::ShipDestroyed {
            self.mode = Mode::Reset;
            return false;
        }

        draw_match(&mut self.back, &self.game, self.high_score.get());
        if self.show_collisions {
            draw_collision_circles(&mut self.back, &self.game);
        }
        true
    }

    fn play_match_sounds(&mut self, events: FrameEvents) {
        if events.contains(FrameEvents::THRUST_ON) {
            audio::play(&mut self.audio, SoundEffect::ThrusterStart);
        }
        if events.contains(FrameEvents::THRUST_OFF) {
            audio::play(&mut self.audio, SoundEffect::ThrusterStop);
        }
        if events.contains(FrameEvents::SHOT) {
            audio::play(&mut self.audio, SoundEffect::Shoot);
        }
        if events.contains(FrameEvents::ASTEROID_DESTROYED) {
            audio::play(&mut self.audio, SoundEffect::Explosion);
        }
        if events.contains(FrameEvents::SHIP_HIT) {
            audio::play(&mut self.audio, SoundEffect::PlayerHit);
        }
    }

    // ========================================================================
    // Death delay / game over
    // ========================================================================

    fn reset_frame(&mut self, events: &mut FrameEvents) -> bool {
        self.reset_counter += 1;
        self.back.clear();

        let lives = self.game.lives();
        let delay = if lives > 0 {
            if self.reset_counter == 1 {
                audio::play(&mut self.audio, SoundEffect::Siren);
            }
            self.back.circle(
                SCREEN_WIDTH / 2,
                SCREEN_HEIGHT / 2,
                RESPAWN_CLEAR_RADIUS,
                rainbow(self.reset_color),
            );
            self.reset_color = self.reset_color.wrapping_add(1);

            let danger = "DANGER!";
            draw_text(&mut self.back, danger, centered_x(danger), END_TEXT_Y, CLR_WHITE);
            let line = TextBuf::<16>::format(format_args!("LIVES LEFT: {lives}"));
            draw_text(&mut self.back, line.as_str(), END_TEXT_X, NUM_LIVES_Y, CLR_WHITE);
            self.game.tuning().damage_delay
        } else {
            draw_text(&mut self.back, " GAME OVER! ", END_TEXT_X, END_TEXT_Y, CLR_WHITE);
            if self.reset_counter == 1 {
                self.circles = bouncing_circles();
                *events |= FrameEvents::GAME_OVER;
                if self.high_score.get() > self.initial_high_score {
                    let result = self.high_score.save(&mut self.sram);
                    let ok = self.record_save(result, FrameEvents::HIGH_SCORE_SAVED, events);
                    self.notification.high_score_saved(ok);
                }
            }
            for circle in &mut self.circles {
                circle.update();
                circle.draw(&mut self.back);
            }
            self.game.tuning().death_delay
        };

        self.notification.draw(&mut self.back);

        if self.reset_counter > delay {
            self.reset_counter = 0;
            if lives > 0 {
                self.game.respawn();
                self.mode = Mode::Match;
                *events |= FrameEvents::RESPAWNED;
            } else {
                self.menu.visible = false;
                self.game.setup();
                self.mode = Mode::Menu;
            }
        }
        true
    }

    // ========================================================================
    // Pause
    // ========================================================================

    fn pause_frame(&mut self, input: FrameInput, events: &mut FrameEvents) -> bool {
        // Drawn over the last match frame
        self.clear_pause_menu();

        let count = PAUSE_ITEMS.len();
        if input.pressed(Keys::DOWN) {
            self.pause_selection = (self.pause_selection + 1) % count;
        } else if input.pressed(Keys::UP) {
            self.pause_selection = (self.pause_selection + count - 1) % count;
        }

        draw_text(&mut self.back, PAUSE_TITLE, END_TEXT_X, END_TEXT_Y, CLR_WHITE);
        let first_y = END_TEXT_Y + 2 * LINE_HEIGHT;
        for (i, item) in PAUSE_ITEMS.iter().enumerate() {
            draw_text(&mut self.back, item, END_TEXT_X, first_y + i as i32 * LINE_HEIGHT, CLR_WHITE);
        }
        draw_glyph(
            &mut self.back,
            &SELECTOR,
            END_TEXT_X - CHAR_PIX_SIZE,
            first_y + self.pause_selection as i32 * LINE_HEIGHT,
            CLR_WHITE,
        );

        if input.pressed(Keys::START) {
            self.resume_match();
        } else if input.pressed(Keys::A) {
            match self.pause_selection {
                PAUSE_RESUME => self.resume_match(),
                PAUSE_SAVE => {
                    if !self.notification.is_active() {
                        let result = save_game(&mut self.sram, &self.game);
                        let ok = self.record_save(result, FrameEvents::GAME_SAVED, events);
                        self.notification.saved(ok);
                    }
                }
                _ => {
                    self.menu.visible = false;
                    self.mode = Mode::Menu;
                }
            }
        }

        self.notification.draw(&mut self.back);
        true
    }

    fn clear_pause_menu(&mut self) {
        self.back.clear_region(
            END_TEXT_X - CHAR_PIX_SIZE - 8,
            END_TEXT_Y,
            14 * CHAR_PIX_SIZE,
            5 * LINE_HEIGHT,
        );
    }

    fn resume_match(&mut self) {
        self.mode = Mode::Match;
        self.clear_pause_menu();
        self.back.clear_region(
            END_TEXT_X,
            END_TEXT_Y + 4 * LINE_HEIGHT,
            12 * CHAR_PIX_SIZE,
            LINE_HEIGHT,
        );
        self.notification.clear();
    }

    // ========================================================================
    // Settings
    // ========================================================================

    fn settings_frame(&mut self, input: FrameInput, events: &mut FrameEvents) -> bool {
        self.back.clear();
        draw_text(
            &mut self.back,
            SETTINGS_TITLE,
            centered_x(SETTINGS_TITLE),
            MENU_TEXT_Y,
            CLR_WHITE,
        );

        let (first, second) = if self.settings.confirming {
            draw_text(
                &mut self.back,
                CONFIRM_TITLE,
                centered_x(CONFIRM_TITLE),
                MENU_ITEM_1,
                CLR_WHITE,
            );
            (YES_ITEM, NO_ITEM)
        } else {
            (DELETE_ITEM, BACK_ITEM)
        };
        let first_x = centered_pair_x(first);
        let second_x = centered_pair_x(second);
        draw_text(&mut self.back, first, first_x + CHAR_PIX_SIZE, MENU_ITEM_2, CLR_WHITE);
        draw_text(&mut self.back, second, second_x + CHAR_PIX_SIZE, MENU_ITEM_3, CLR_WHITE);

        if input.pressed(Keys::UP | Keys::DOWN | Keys::LEFT | Keys::RIGHT) {
            if self.settings.confirming {
                self.settings.confirm_yes = !self.settings.confirm_yes;
            } else {
                self.settings.on_back_item = !self.settings.on_back_item;
            }
            let row = self.settings.cursor_row();
            self.settings.cursor.slide_to(row, SETTINGS_SLIDE_STEP);
        }

        if self.settings.confirming {
            if input.pressed(Keys::A) {
                if self.settings.confirm_yes {
                    self.high_score.set(0);
                    let result = self.high_score.save(&mut self.sram);
                    let ok = self.record_save(result, FrameEvents::HIGH_SCORE_SAVED, events);
                    self.notification.deleted(ok);
                }
                self.leave_confirmation();
            } else if input.pressed(Keys::B | Keys::START) {
                self.leave_confirmation();
            }
        } else if input.pressed(Keys::A) {
            if self.settings.on_back_item {
                self.mode = Mode::Menu;
            } else {
                self.settings.confirming = true;
                self.settings.confirm_yes = false;
                self.settings.cursor.snap(MENU_ITEM_3);
            }
        } else if input.pressed(Keys::START | Keys::B) {
            self.mode = Mode::Menu;
        }

        self.settings.cursor.advance();
        let y = self.settings.cursor.y();
        // The cursor belongs to whichever row it is closer to
        let x = if y <= (MENU_ITEM_2 + MENU_ITEM_3) / 2 {
            first_x
        } else {
            second_x
        };
        draw_glyph(&mut self.back, &SELECTOR, x, y, CLR_WHITE);

        self.notification.draw(&mut self.back);
        true
    }

    fn leave_confirmation(&mut self) {
        self.settings.confirming = false;
        let row = self.settings.cursor_row();
        self.settings.cursor.snap(row);
    }

    // ========================================================================
    // Credits
    // ========================================================================

    fn credits_frame(&mut self, input: FrameInput) -> bool {
        self.back.clear();
        draw_text(
            &mut self.back,
            CREDITS_TEXT,
            centered_x(CREDITS_TEXT),
            END_TEXT_Y - LINE_HEIGHT,
            CLR_WHITE,
        );

        let pair_x = centered_pair_x(BACK_ITEM);
        let y = END_TEXT_Y + 2 * LINE_HEIGHT;
        draw_text(&mut self.back, BACK_ITEM, pair_x + CHAR_PIX_SIZE, y, CLR_WHITE);
        draw_glyph(&mut self.back, &SELECTOR, pair_x, y, CLR_WHITE);

        if input.pressed(Keys::START | Keys::A) {
            self.menu.visible = false;
            self.mode = Mode::Menu;
        }
        true
    }

    fn record_save(&mut self, result: Result<(), SaveError>, saved: FrameEvents, events: &mut FrameEvents) -> bool {
        match result {
            Ok(()) => {
                *events |= saved;
                true
            }
            Err(err) => {
                self.last_save_error = Some(err);
                *events |= FrameEvents::SAVE_FAILED;
                false
            }
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn game(&self) -> &Match {
        &self.game
    }

    pub fn high_score(&self) -> u32 {
        self.high_score.get()
    }

    pub fn back_buffer(&self) -> &Framebuffer {
        &self.back
    }

    pub fn notification(&self) -> Option<Notice> {
        self.notification.current()
    }

    pub fn menu_selection(&self) -> usize {
        self.menu.selection
    }

    /// The most recent save or load failure, for logging.
    pub fn last_save_error(&self) -> Option<SaveError> {
        self.last_save_error
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn sram(&self) -> &S {
        &self.sram
    }

    pub fn sram_mut(&mut self) -> &mut S {
        &mut self.sram
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn into_sram(self) -> S {
        self.sram
    }
}

/// Outcome of replaying a tape against blank save memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayResult {
    pub final_mode: Mode,
    pub final_score: u32,
    pub high_score: u32,
    pub rng_state: u32,
    pub frames: u32,
}

/// Replay a tape headlessly: blank save memory, no sound, no display.
pub fn replay_tape(tape: &Tape, tuning: Tuning) -> ReplayResult {
    let mut app = App::new(tape.header.seed, tuning, MemorySram::new(), NullAudio);
    let mut frames = 0;
    for keys in tape.keys() {
        app.update(keys);
        frames += 1;
    }
    ReplayResult {
        final_mode: app.mode(),
        final_score: app.game().score(),
        high_score: app.high_score(),
        rng_state: app.game().rng_state(),
        frames,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed_point::from_int;
    use crate::types::AsteroidSize;

    fn app() -> App<MemorySram, NullAudio> {
        App::new(1, Tuning::default(), MemorySram::new(), NullAudio)
    }

    /// Release everything for a frame so the next press is an edge.
    fn tap(app: &mut App<MemorySram, NullAudio>, keys: Keys) -> FrameReport {
        app.update(Keys::empty());
        app.update(keys)
    }

    #[test]
    fn test_starts_in_menu_with_title() {
        let mut app = app();
        let report = app.update(Keys::empty());
        assert_eq!(report.mode, Mode::Menu);
        assert!(report.flipped);
        assert!(app.back_buffer().count(CLR_WHITE) > 0);
    }

    #[test]
    fn test_menu_navigation_wraps() {
        let mut app = app();
        let report = tap(&mut app, Keys::UP);
        assert!(report.events.contains(FrameEvents::MENU_MOVED));
        assert_eq!(app.menu_selection(), 3);
        tap(&mut app, Keys::DOWN);
        assert_eq!(app.menu_selection(), 0);
    }

    #[test]
    fn test_new_game_enters_match() {
        let mut app = app();
        let report = tap(&mut app, Keys::START);
        assert_eq!(report.mode, Mode::Match);
        assert!(report.events.contains(FrameEvents::MODE_CHANGED));
        assert_eq!(app.game().live_asteroids(), 4);
    }

    #[test]
    fn test_continue_without_save_notifies() {
        let mut app = app();
        tap(&mut app, Keys::DOWN);
        let report = tap(&mut app, Keys::A);
        assert_eq!(report.mode, Mode::Menu);
        assert_eq!(app.notification(), Some(Notice::NoSaveData));
    }

    #[test]
    fn test_pause_skips_flip_and_resumes() {
        let mut app = app();
        tap(&mut app, Keys::START);
        let report = tap(&mut app, Keys::START);
        assert_eq!(report.mode, Mode::Pause);
        assert!(!report.flipped);

        let report = app.update(Keys::empty());
        assert!(report.flipped);
        assert_eq!(report.mode, Mode::Pause);

        let report = app.update(Keys::START);
        assert_eq!(report.mode, Mode::Match);
    }

    #[test]
    fn test_pause_save_then_continue() {
        let mut app = app();
        tap(&mut app, Keys::START);
        tap(&mut app, Keys::START);
        tap(&mut app, Keys::DOWN);
        let report = tap(&mut app, Keys::A);
        assert!(report.events.contains(FrameEvents::GAME_SAVED));
        assert_eq!(app.notification(), Some(Notice::SaveSuccessful));
        assert!(has_saved_game(app.sram_mut()));

        // A second save while the notice is up is ignored
        let report = tap(&mut app, Keys::A);
        assert!(!report.events.contains(FrameEvents::GAME_SAVED));

        tap(&mut app, Keys::DOWN);
        let report = tap(&mut app, Keys::A);
        assert_eq!(report.mode, Mode::Menu);

        tap(&mut app, Keys::DOWN);
        let report = tap(&mut app, Keys::A);
        assert_eq!(report.mode, Mode::Match);
        assert!(report.events.contains(FrameEvents::GAME_LOADED));
    }

    fn crash_ship(app: &mut App<MemorySram, NullAudio>) {
        let (cx, cy) = app.game.ship().box_center();
        let slot = &mut app.game.asteroids[5];
        slot.obj = crate::types::GameObject::spawn(ASTEROID_SIZE_S, ASTEROID_SIZE_S, cx, cy, 0);
        slot.size = AsteroidSize::Small;
        slot.obj.x = from_int(cx);
        slot.obj.y = from_int(cy);
    }

    #[test]
    fn test_death_respawns_after_damage_delay() {
        let mut app = app();
        tap(&mut app, Keys::START);
        crash_ship(&mut app);

        let report = app.update(Keys::empty());
        assert!(report.events.contains(FrameEvents::SHIP_HIT));
        assert_eq!(report.mode, Mode::Reset);
        assert!(!report.flipped);
        assert_eq!(app.game().lives(), 2);

        let mut frames = 0;
        let report = loop {
            let report = app.update(Keys::empty());
            frames += 1;
            if report.mode != Mode::Reset {
                break report;
            }
        };
        assert_eq!(frames, DAMAGE_DELAY + 1);
        assert_eq!(report.mode, Mode::Match);
        assert!(report.events.contains(FrameEvents::RESPAWNED));
        assert!(app.game().ship().alive);
    }

    #[test]
    fn test_game_over_saves_raised_high_score() {
        let mut app = app();
        tap(&mut app, Keys::START);
        app.game.lives = 1;
        app.game.score = 300;
        crash_ship(&mut app);
        app.update(Keys::empty());
        assert_eq!(app.high_score(), 300);

        let report = app.update(Keys::empty());
        assert!(report.events.contains(FrameEvents::GAME_OVER));
        assert!(report.events.contains(FrameEvents::HIGH_SCORE_SAVED));
        assert_eq!(app.notification(), Some(Notice::HighScoreSaved));

        let mut report = report;
        while report.mode == Mode::Reset {
            report = app.update(Keys::empty());
        }
        assert_eq!(report.mode, Mode::Menu);
        assert_eq!(app.game().lives(), 3);

        let mut sram = app.into_sram();
        assert_eq!(HighScore::load(&mut sram).get(), 300);
    }

    #[test]
    fn test_settings_delete_defaults_to_no() {
        let mut sram = MemorySram::new();
        let mut high = HighScore::load(&mut sram);
        high.set(500);
        high.save(&mut sram).unwrap();

        let mut app = App::new(1, Tuning::default(), sram, NullAudio);
        assert_eq!(app.high_score(), 500);
        tap(&mut app, Keys::DOWN);
        tap(&mut app, Keys::DOWN);
        assert_eq!(tap(&mut app, Keys::A).mode, Mode::Settings);

        // Enter confirmation, accept the default NO
        tap(&mut app, Keys::A);
        tap(&mut app, Keys::A);
        assert_eq!(app.high_score(), 500);

        // Again, this time choose YES
        tap(&mut app, Keys::A);
        tap(&mut app, Keys::UP);
        let report = tap(&mut app, Keys::A);
        assert!(report.events.contains(FrameEvents::HIGH_SCORE_SAVED));
        assert_eq!(app.high_score(), 0);
        assert_eq!(app.notification(), Some(Notice::Deleted));

        assert_eq!(tap(&mut app, Keys::B).mode, Mode::Menu);
    }

    #[test]
    fn test_credits_round_trip() {
        let mut app = app();
        tap(&mut app, Keys::UP);
        assert_eq!(tap(&mut app, Keys::A).mode, Mode::Credits);
        let report = tap(&mut app, Keys::A);
        assert_eq!(report.mode, Mode::Menu);
        assert!(report.events.contains(FrameEvents::MODE_CHANGED));
    }

    #[test]
    fn test_frame_flips_into_screen() {
        let mut app = app();
        let mut screen = Framebuffer::new();
        let report = app.frame(Keys::empty(), &mut screen).unwrap();
        assert!(report.flipped);
        assert_eq!(screen.pixels(), app.back_buffer().pixels());
    }
}
