//! Screen furniture shared by the non-gameplay modes: transient notices, the
//! sliding menu cursor, the menu's floating polygons and the game-over
//! bouncing circles.

use crate::constants::*;
use crate::fixed_point::{cos_fp, sin_fp, FP_SHIFT};
use crate::render::font::{centered_x, draw_text};
use crate::render::Framebuffer;

// ============================================================================
// Notifications
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    SaveSuccessful,
    SaveFailed,
    NoSaveData,
    HighScoreSaved,
    Deleted,
}

impl Notice {
    pub fn text(self) -> &'static str {
        match self {
            Notice::SaveSuccessful => "SAVE SUCCESSFUL",
            Notice::SaveFailed => "SAVE FAILED",
            Notice::NoSaveData => "...NO SAVE DATA...",
            Notice::HighScoreSaved => "HIGH SCORE SAVED!",
            Notice::Deleted => "DELETED!",
        }
    }
}

/// A centred line of text at the bottom of the screen that disappears after
/// a fixed number of drawn frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Notification {
    notice: Option<Notice>,
    remaining: u32,
}

impl Notification {
    pub fn show(&mut self, notice: Notice, frames: u32) {
        self.notice = Some(notice);
        self.remaining = frames;
    }

    /// Outcome of a plain game save.
    pub fn saved(&mut self, ok: bool) {
        let notice = if ok { Notice::SaveSuccessful } else { Notice::SaveFailed };
        self.show(notice, SAVE_NOTIFY_DELAY);
    }

    /// Outcome of the high-score save at game over; lingers longer.
    pub fn high_score_saved(&mut self, ok: bool) {
        let notice = if ok { Notice::HighScoreSaved } else { Notice::SaveFailed };
        self.show(notice, SAVE_NOTIFY_GAME_OVER_DELAY);
    }

    pub fn deleted(&mut self, ok: bool) {
        let notice = if ok { Notice::Deleted } else { Notice::SaveFailed };
        self.show(notice, SAVE_NOTIFY_DELAY);
    }

    pub fn no_save_data(&mut self) {
        self.show(Notice::NoSaveData, SAVE_NOTIFY_DELAY);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    pub fn current(&self) -> Option<Notice> {
        self.notice.filter(|_| self.is_active())
    }

    /// Draw the notice if one is showing and count down one frame.
    pub fn draw(&mut self, fb: &mut Framebuffer) {
        let Some(notice) = self.current() else {
            return;
        };
        let text = notice.text();
        draw_text(fb, text, centered_x(text), NOTIFY_Y, CLR_WHITE);
        self.remaining -= 1;
        if self.remaining == 0 {
            self.notice = None;
        }
    }
}

// ============================================================================
// Cursor slide
// ============================================================================

/// Vertical cursor position that glides to a new row a few pixels per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorSlide {
    y: i32,
    target: i32,
    step: i32,
    animating: bool,
}

impl CursorSlide {
    pub const fn at(y: i32) -> Self {
        Self {
            y,
            target: y,
            step: 0,
            animating: false,
        }
    }

    /// Jump straight to `y`, cancelling any slide.
    pub fn snap(&mut self, y: i32) {
        *self = Self::at(y);
    }

    pub fn slide_to(&mut self, target: i32, step: i32) {
        self.target = target;
        self.step = step;
        self.animating = self.y != target;
    }

    /// Move one frame towards the target without overshooting.
    pub fn advance(&mut self) {
        if !self.animating {
            return;
        }
        if self.y < self.target {
            self.y = (self.y + self.step).min(self.target);
        } else if self.y > self.target {
            self.y = (self.y - self.step).max(self.target);
        }
        if self.y == self.target {
            self.animating = false;
        }
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn target(&self) -> i32 {
        self.target
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }
}

// ============================================================================
// Menu shapes
// ============================================================================

pub const NUM_MENU_SHAPES: usize = 5;
const MAX_SIDES: usize = 6;

/// A regular polygon outline drifting around the menu background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatingShape {
    pub x: i32,
    pub y: i32,
    pub vx: i32,
    pub vy: i32,
    pub radius: i32,
    pub sides: usize,
    pub color_index: u32,
    vertices: [(i32, i32); MAX_SIDES],
}

impl FloatingShape {
    /// The `i`-th shape of the menu layout: spread across the screen with a
    /// little jitter, sizes and side counts varying with the index.
    pub fn new(i: usize) -> Self {
        let n = i as i32;
        let radius = 6 + (n * 5) % 13;
        let sides = 3 + i % 4;

        let mut vertices = [(0, 0); MAX_SIDES];
        for (v, vertex) in vertices.iter_mut().take(sides).enumerate() {
            let deg = (v * 360 / sides) as i32 % 360;
            *vertex = (
                (cos_fp(deg) * radius) >> FP_SHIFT,
                (sin_fp(deg) * radius) >> FP_SHIFT,
            );
        }

        let count = NUM_MENU_SHAPES as i32 + 1;
        let jitter_x = ((n % 3) - 1) * 3;
        let jitter_y = if n % 2 == 1 { 3 } else { -3 };
        let mut x = SCREEN_WIDTH / count * (n + 1) + jitter_x;
        let mut y = SCREEN_HEIGHT / count * (n + 1) + jitter_y;

        if x < radius {
            x = radius + 1;
        }
        if x > SCREEN_WIDTH - radius - 1 {
            x = SCREEN_WIDTH - radius - 1;
        }
        if y < radius {
            y = radius + 1;
        }
        if y > SCREEN_HEIGHT - radius - 1 {
            y = SCREEN_HEIGHT - radius - 1;
        }

        let mut vx = ((n % 3) - 1) * 2;
        if vx == 0 {
            vx = if n % 2 == 1 { 2 } else { -2 };
        }
        let vy = if (n + 1) % 2 == 1 { 2 } else { -2 };

        Self {
            x,
            y,
            vx,
            vy,
            radius,
            sides,
            color_index: (i % RAINBOW.len()) as u32,
            vertices,
        }
    }

    /// Move and bounce off the screen edges.
    pub fn update(&mut self) {
        self.x += self.vx;
        self.y += self.vy;

        if self.x - self.radius <= 0 {
            self.x = self.radius;
            self.vx = -self.vx;
        }
        if self.x + self.radius >= SCREEN_WIDTH {
            self.x = SCREEN_WIDTH - self.radius;
            self.vx = -self.vx;
        }

        let bottom = SCREEN_HEIGHT - 1;
        if self.y - self.radius <= 0 {
            self.y = self.radius;
            self.vy = -self.vy;
        }
        if self.y + self.radius >= bottom {
            self.y = bottom - self.radius;
            self.vy = -self.vy;
        }
    }

    pub fn vertices(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.vertices[..self.sides]
            .iter()
            .map(|&(dx, dy)| (self.x + dx, self.y + dy))
    }

    pub fn draw(&self, fb: &mut Framebuffer) {
        let mut points = [(0, 0); MAX_SIDES];
        for (slot, p) in points.iter_mut().zip(self.vertices()) {
            *slot = p;
        }
        fb.polygon(&points[..self.sides], rainbow(self.color_index));
    }
}

pub fn menu_shapes() -> [FloatingShape; NUM_MENU_SHAPES] {
    core::array::from_fn(FloatingShape::new)
}

// ============================================================================
// Game-over circles
// ============================================================================

pub const NUM_BOUNCING_CIRCLES: usize = 4;

/// A rainbow circle falling under gravity and bouncing off the screen edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BouncingCircle {
    pub x: i32,
    pub y: i32,
    pub vx: i32,
    pub vy: i32,
    pub radius: i32,
    pub color_index: u32,
}

impl BouncingCircle {
    pub fn new(i: usize) -> Self {
        const RADII: [i32; NUM_BOUNCING_CIRCLES] = [8, 12, 6, 10];
        const START_X: [i32; NUM_BOUNCING_CIRCLES] = [40, 140, 200, 100];
        let i = i % NUM_BOUNCING_CIRCLES;
        Self {
            x: START_X[i],
            y: 20 + i as i32 * 10,
            vx: 1 + (i as i32 % 2) * 2,
            vy: 0,
            radius: RADII[i],
            color_index: i as u32,
        }
    }

    pub fn update(&mut self) {
        self.vy += 1;
        self.x += self.vx;
        self.y += self.vy;

        // Floor bounces lose a tenth of their speed
        if self.y + self.radius >= SCREEN_HEIGHT {
            self.y = SCREEN_HEIGHT - self.radius;
            self.vy = -self.vy * 9 / 10;
        }
        if self.y - self.radius <= 0 {
            self.y = self.radius;
            self.vy = -self.vy;
        }
        if self.x + self.radius >= SCREEN_WIDTH {
            self.x = SCREEN_WIDTH - self.radius;
            self.vx = -self.vx;
        }
        if self.x - self.radius <= 0 {
            self.x = self.radius;
            self.vx = -self.vx;
        }

        self.color_index = self.color_index.wrapping_add(1);
    }

    pub fn draw(&self, fb: &mut Framebuffer) {
        fb.circle(self.x, self.y, self.radius, rainbow(self.color_index));
    }
}

pub fn bouncing_circles() -> [BouncingCircle; NUM_BOUNCING_CIRCLES] {
    core::array::from_fn(BouncingCircle::new)
}
