//! Entity model shared by the ship, bullet and asteroid pools.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::fixed_point::{from_int, to_int};

/// Asteroid size class. The sprite box edge doubles as the persisted size code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AsteroidSize {
    Large,
    Medium,
    Small,
}

impl AsteroidSize {
    /// The size both halves take when this asteroid splits.
    pub fn child_size(self) -> Option<AsteroidSize> {
        match self {
            AsteroidSize::Large => Some(AsteroidSize::Medium),
            AsteroidSize::Medium => Some(AsteroidSize::Small),
            AsteroidSize::Small => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            AsteroidSize::Large => ASTEROID_SIZE_L,
            AsteroidSize::Medium => ASTEROID_SIZE_M,
            AsteroidSize::Small => ASTEROID_SIZE_S,
        }
    }

    pub fn from_code(code: i32) -> Option<AsteroidSize> {
        match code {
            ASTEROID_SIZE_L => Some(AsteroidSize::Large),
            ASTEROID_SIZE_M => Some(AsteroidSize::Medium),
            ASTEROID_SIZE_S => Some(AsteroidSize::Small),
            _ => None,
        }
    }

    pub fn score(self) -> u32 {
        match self {
            AsteroidSize::Large => SCORE_LARGE,
            AsteroidSize::Medium => SCORE_MEDIUM,
            AsteroidSize::Small => SCORE_SMALL,
        }
    }

    pub fn color(self) -> u16 {
        match self {
            AsteroidSize::Large => CLR_RED,
            AsteroidSize::Medium => CLR_MAG,
            AsteroidSize::Small => CLR_YELLOW,
        }
    }
}

/// A moving entity. Positions and velocities are Q8; `prev_*` hold the
/// integer position before the last integration step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameObject {
    pub width: i32,
    pub height: i32,
    pub x: i32,
    pub y: i32,
    pub prev_x: i32,
    pub prev_y: i32,
    pub velocity_x: i32,
    pub velocity_y: i32,
    pub angle: i32,
    pub alive: bool,
    pub color_index: u32,
}

impl GameObject {
    /// An empty pool slot.
    pub const DEAD: GameObject = GameObject {
        width: 0,
        height: 0,
        x: 0,
        y: 0,
        prev_x: 0,
        prev_y: 0,
        velocity_x: 0,
        velocity_y: 0,
        angle: SHIP_FACING_UP_DEG,
        alive: false,
        color_index: 0,
    };

    /// A live, stationary object at integer pixel position `(x, y)`, facing up.
    pub fn spawn(width: i32, height: i32, x: i32, y: i32, color_phase: u8) -> Self {
        Self {
            width,
            height,
            x: from_int(x),
            y: from_int(y),
            prev_x: x,
            prev_y: y,
            velocity_x: 0,
            velocity_y: 0,
            angle: SHIP_FACING_UP_DEG,
            alive: true,
            color_index: color_phase as u32,
        }
    }

    #[inline]
    pub fn pixel_x(&self) -> i32 {
        to_int(self.x)
    }

    #[inline]
    pub fn pixel_y(&self) -> i32 {
        to_int(self.y)
    }

    /// Centre of the bounding box, for objects positioned by their top-left corner.
    #[inline]
    pub fn box_center(&self) -> (i32, i32) {
        (
            self.pixel_x() + self.width / 2,
            self.pixel_y() + self.height / 2,
        )
    }

    /// `position += velocity`, remembering the previous integer position.
    pub fn integrate(&mut self) {
        self.prev_x = self.pixel_x();
        self.prev_y = self.pixel_y();
        self.x += self.velocity_x;
        self.y += self.velocity_y;
    }

    /// Teleport to the opposite edge once fully off-screen.
    pub fn wrap(&mut self) {
        let x = self.pixel_x();
        if x < -self.width {
            self.x = from_int(SCREEN_WIDTH);
        } else if x > SCREEN_WIDTH {
            self.x = from_int(-self.width);
        }

        let y = self.pixel_y();
        if y < -self.height {
            self.y = from_int(SCREEN_HEIGHT);
        } else if y > SCREEN_HEIGHT {
            self.y = from_int(-self.height);
        }
    }

    pub fn is_off_screen(&self) -> bool {
        let x = self.pixel_x();
        let y = self.pixel_y();
        x < -self.width || x > SCREEN_WIDTH || y < -self.height || y > SCREEN_HEIGHT
    }
}

/// Asteroid pool slot. Unlike the ship, `obj.x`/`obj.y` are the circle centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Asteroid {
    pub obj: GameObject,
    pub size: AsteroidSize,
}

impl Asteroid {
    pub const DEAD: Asteroid = Asteroid {
        obj: GameObject::DEAD,
        size: AsteroidSize::Large,
    };

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.obj.alive
    }
}
