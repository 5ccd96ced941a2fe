//! Screen, layout, gameplay and palette constants.

// Display
pub const SCREEN_WIDTH: i32 = 240;
pub const SCREEN_HEIGHT: i32 = 160;
pub const SCREEN_PIXELS: usize = (SCREEN_WIDTH * SCREEN_HEIGHT) as usize;

// Pools
pub const MAX_BULLETS: usize = 10;
pub const MAX_ASTEROIDS: usize = 16;

// Ship
pub const PLAYER_SIZE: i32 = 8;
pub const PLAYER_FRONT_EXTEND: i32 = 2;
pub const PLAYER_BACK_INSET: i32 = 2; // drawn outline
pub const PLAYER_HITBOX_INSET: i32 = 1; // collision triangle
pub const PLAYER_MAX_VELOCITY: i32 = 10; // px/frame per axis
pub const ROTATION_SPEED_DEG: i32 = 18;
pub const ACCEL_FACTOR_FP: i32 = 26; // ~0.1 in Q8
pub const SHIP_FACING_UP_DEG: i32 = 270;
pub const STARTING_LIVES: i32 = 3;
pub const MAX_LIVES: i32 = 99;
/// Fastest any object may move, in whole pixels per frame per axis.
pub const MAX_SPEED_PX: i32 = 64;

// Bullets
pub const BULLET_SIZE: i32 = 2;
pub const BULLET_SPEED: i32 = 6;
pub const BULLET_COLOR_TICK: u8 = 3;
pub const BULLET_DRAW_RADIUS: i32 = 2;

// Asteroid sprite boxes (also the persisted size code)
pub const ASTEROID_SIZE_L: i32 = 16;
pub const ASTEROID_SIZE_M: i32 = 12;
pub const ASTEROID_SIZE_S: i32 = 8;

// Asteroid visual radii
pub const ASTEROID_RADIUS_L: i32 = 10;
pub const ASTEROID_RADIUS_M: i32 = 6;
pub const ASTEROID_RADIUS_S: i32 = 3;
pub const ASTEROID_RADIUS_FALLBACK: i32 = 5;

// Scoring
pub const SCORE_LARGE: u32 = 20;
pub const SCORE_MEDIUM: u32 = 50;
pub const SCORE_SMALL: u32 = 100;

// Spawner (frames)
pub const INITIAL_SPAWN_INTERVAL: i32 = 60;
pub const DECREASE_INTERVAL: i32 = INITIAL_SPAWN_INTERVAL * 2;
pub const DECREASE_AMOUNT: i32 = 5;
pub const MIN_SPAWN_INTERVAL: i32 = 20;

// Death / respawn
pub const DAMAGE_DELAY: u32 = 15;
pub const DEATH_DELAY: u32 = 35;
/// Longest countdown tuning may configure (one minute).
pub const MAX_TIMER_FRAMES: i32 = 3600;
pub const RESPAWN_CLEAR_RADIUS: i32 = 24;

// Notifications (frames)
pub const SAVE_NOTIFY_DELAY: u32 = 15;
pub const SAVE_NOTIFY_GAME_OVER_DELAY: u32 = 45;

// Text layout
pub const CHAR_PIX_SIZE: i32 = 8;
pub const LINE_HEIGHT: i32 = 12;
pub const NUM_CHARS_LINE: i32 = 10;
pub const MENU_TEXT_Y: i32 = SCREEN_HEIGHT / 2 - 32;
pub const MENU_ITEM_1: i32 = MENU_TEXT_Y + 2 * LINE_HEIGHT;
pub const MENU_ITEM_2: i32 = MENU_ITEM_1 + LINE_HEIGHT;
pub const MENU_ITEM_3: i32 = MENU_ITEM_2 + LINE_HEIGHT;
pub const MENU_ITEM_4: i32 = MENU_ITEM_3 + LINE_HEIGHT;
pub const END_TEXT_X: i32 = SCREEN_WIDTH / 2 - CHAR_PIX_SIZE * NUM_CHARS_LINE / 2;
pub const END_TEXT_Y: i32 = SCREEN_HEIGHT / 2 - 16;
pub const NUM_LIVES_Y: i32 = END_TEXT_Y + 2 * LINE_HEIGHT;
pub const SCORE_Y: i32 = 10;
pub const HIGH_SCORE_Y: i32 = SCREEN_HEIGHT - LINE_HEIGHT - SCORE_Y;
pub const NOTIFY_Y: i32 = END_TEXT_Y + 4 * LINE_HEIGHT + 16;

// BGR555 palette
pub const CLR_BLACK: u16 = 0x0000;
pub const CLR_RED: u16 = 0x001F;
pub const CLR_LIME: u16 = 0x03E0;
pub const CLR_YELLOW: u16 = 0x03FF;
pub const CLR_BLUE: u16 = 0x7C00;
pub const CLR_MAG: u16 = 0x7C1F;
pub const CLR_CYAN: u16 = 0x7FE0;
pub const CLR_WHITE: u16 = 0x7FFF;

pub const RAINBOW: [u16; 6] = [CLR_RED, CLR_YELLOW, CLR_LIME, CLR_CYAN, CLR_BLUE, CLR_MAG];

/// Rainbow color for a cycling counter.
#[inline]
pub fn rainbow(index: u32) -> u16 {
    RAINBOW[index as usize % RAINBOW.len()]
}
