//! Per-frame entity updates, pooled spawning and collision resolution.
//!
//! Pools are fixed arrays; spawning claims the first dead slot and silently
//! does nothing when the pool is full.

use crate::constants::*;
use crate::fixed_point::*;
use crate::geometry::{bullet_hits_asteroid, ship_hits_asteroid};
use crate::input::Keys;
use crate::rng::SeededRng;
use crate::tuning::Tuning;
use crate::types::{Asteroid, AsteroidSize, GameObject};

// ============================================================================
// Ship
// ============================================================================

/// Rotate, thrust, integrate, wrap, then apply friction. Returns whether the
/// engine fired this frame.
pub fn update_ship(ship: &mut GameObject, held: Keys, tuning: &Tuning) -> bool {
    if held.contains(Keys::LEFT) {
        ship.angle = normalize_deg(ship.angle - tuning.rotation_speed_deg);
    }
    if held.contains(Keys::RIGHT) {
        ship.angle = normalize_deg(ship.angle + tuning.rotation_speed_deg);
    }

    let thrusting = held.intersects(Keys::THRUST);
    if thrusting {
        let max = from_int(tuning.max_velocity);
        ship.velocity_x += (tuning.accel_factor_fp * cos_fp(ship.angle)) >> FP_SHIFT;
        ship.velocity_y += (tuning.accel_factor_fp * sin_fp(ship.angle)) >> FP_SHIFT;
        ship.velocity_x = clamp_axis(ship.velocity_x, max);
        ship.velocity_y = clamp_axis(ship.velocity_y, max);
    }

    // Once per frame only; integrating again in the match loop doubles ship speed.
    ship.integrate();
    ship.wrap();

    ship.velocity_x = apply_friction(ship.velocity_x);
    ship.velocity_y = apply_friction(ship.velocity_y);
    thrusting
}

/// Put a destroyed ship back in the middle of the screen, at rest, facing up.
pub fn recenter_ship(ship: &mut GameObject) {
    ship.x = from_int(SCREEN_WIDTH / 2 - PLAYER_SIZE / 2);
    ship.y = from_int(SCREEN_HEIGHT / 2 - PLAYER_SIZE / 2);
    ship.velocity_x = 0;
    ship.velocity_y = 0;
    ship.angle = SHIP_FACING_UP_DEG;
}

// ============================================================================
// Bullets
// ============================================================================

/// Fire from the ship's nose. Returns false when all slots are live.
pub fn spawn_bullet(
    bullets: &mut [GameObject; MAX_BULLETS],
    ship: &GameObject,
    tuning: &Tuning,
    rng: &mut SeededRng,
) -> bool {
    let Some(slot) = bullets.iter_mut().find(|b| !b.alive) else {
        return false;
    };

    let cos = cos_fp(ship.angle);
    let sin = sin_fp(ship.angle);
    let offset = ship.width / 2;
    let front = offset + PLAYER_FRONT_EXTEND;
    let start_x = ship.pixel_x() + offset + ((front * cos) >> FP_SHIFT);
    let start_y = ship.pixel_y() + offset + ((front * sin) >> FP_SHIFT);

    *slot = GameObject::spawn(BULLET_SIZE, BULLET_SIZE, start_x, start_y, rng.color_phase());
    let speed = from_int(tuning.bullet_speed);
    slot.velocity_x = (speed * cos) >> FP_SHIFT;
    slot.velocity_y = (speed * sin) >> FP_SHIFT;
    true
}

/// Move bullets and retire the ones that left the screen. `color_tick`
/// advances every call; colors step once every [`BULLET_COLOR_TICK`] calls.
pub fn update_bullets(bullets: &mut [GameObject; MAX_BULLETS], color_tick: &mut u8) {
    *color_tick = (*color_tick + 1) % BULLET_COLOR_TICK;
    for bullet in bullets.iter_mut().filter(|b| b.alive) {
        bullet.integrate();
        if *color_tick == 0 {
            bullet.color_index = bullet.color_index.wrapping_add(1);
        }
        if bullet.is_off_screen() {
            bullet.alive = false;
        }
    }
}

// ============================================================================
// Asteroids
// ============================================================================

pub fn update_asteroids(asteroids: &mut [Asteroid; MAX_ASTEROIDS]) {
    for asteroid in asteroids.iter_mut().filter(|a| a.is_alive()) {
        asteroid.obj.integrate();
        asteroid.obj.wrap();
    }
}

/// Claim the first dead slot for a new asteroid centred on `(x, y)` moving at
/// whole pixels per frame. Returns false when the pool is full.
pub fn spawn_asteroid(
    asteroids: &mut [Asteroid; MAX_ASTEROIDS],
    size: AsteroidSize,
    x: i32,
    y: i32,
    velocity: (i32, i32),
    rng: &mut SeededRng,
) -> bool {
    let Some(slot) = asteroids.iter_mut().find(|a| !a.is_alive()) else {
        return false;
    };

    let code = size.code();
    let mut obj = GameObject::spawn(code, code, x, y, rng.color_phase());
    obj.velocity_x = from_int(velocity.0);
    obj.velocity_y = from_int(velocity.1);
    *slot = Asteroid { obj, size };
    true
}

/// Replace the asteroid in `index` with its two children at its integer
/// position. Large halves diverge horizontally, medium halves vertically.
/// Children go to other free slots; the parent's slot ends up dead.
pub fn split_asteroid(asteroids: &mut [Asteroid; MAX_ASTEROIDS], index: usize, rng: &mut SeededRng) {
    let Some(&parent) = asteroids.get(index) else {
        return;
    };

    if let Some(child) = parent.size.child_size() {
        let x = parent.obj.pixel_x();
        let y = parent.obj.pixel_y();
        let vx = to_int(parent.obj.velocity_x);
        let vy = to_int(parent.obj.velocity_y);
        let (a, b) = match parent.size {
            AsteroidSize::Large => ((vx + 1, vy), (vx - 1, vy)),
            _ => ((vx, vy + 1), (vx, vy - 1)),
        };

        // The parent still occupies its slot here
        spawn_asteroid(asteroids, child, x, y, a, rng);
        spawn_asteroid(asteroids, child, x, y, b, rng);
    }

    asteroids[index].obj.alive = false;
}

// ============================================================================
// Spawner
// ============================================================================

/// Countdowns for the edge spawner. Reset at the start of every match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnerState {
    pub interval: i32,
    pub spawn_timer: i32,
    pub decrease_timer: i32,
}

impl SpawnerState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            interval: tuning.initial_spawn_interval,
            spawn_timer: tuning.initial_spawn_interval,
            decrease_timer: tuning.decrease_interval,
        }
    }

    /// Advance both countdowns by one frame. Returns true when a spawn is due;
    /// the spawn countdown is rearmed with the current interval.
    pub fn tick(&mut self, tuning: &Tuning) -> bool {
        self.decrease_timer -= 1;
        if self.decrease_timer <= 0 {
            if self.interval > tuning.min_spawn_interval {
                self.interval =
                    (self.interval - tuning.decrease_amount).max(tuning.min_spawn_interval);
            }
            self.decrease_timer = tuning.decrease_interval;
        }

        self.spawn_timer -= 1;
        if self.spawn_timer <= 0 {
            self.spawn_timer = self.interval;
            return true;
        }
        false
    }
}

/// Spawn a large asteroid just off a random edge, drifting inwards.
/// Edges: 0 top, 1 right, 2 bottom, 3 left.
pub fn spawn_from_edge(asteroids: &mut [Asteroid; MAX_ASTEROIDS], rng: &mut SeededRng) -> bool {
    let size = ASTEROID_SIZE_L;
    let (x, y, vx, vy) = match rng.below(4) {
        0 => {
            let x = rng.below(SCREEN_WIDTH as u32);
            let vx = rng.below(3) - 1;
            let vy = rng.below(2) + 1;
            (x, -size, vx, vy)
        }
        1 => {
            let y = rng.below(SCREEN_HEIGHT as u32);
            let vx = rng.below(2) - 2;
            let vy = rng.below(3) - 1;
            (SCREEN_WIDTH, y, vx, vy)
        }
        2 => {
            let x = rng.below(SCREEN_WIDTH as u32);
            let vx = rng.below(3) - 1;
            let vy = rng.below(2) - 2;
            (x, SCREEN_HEIGHT, vx, vy)
        }
        _ => {
            let y = rng.below(SCREEN_HEIGHT as u32);
            let vx = rng.below(2) + 1;
            let vy = rng.below(3) - 1;
            (-size, y, vx, vy)
        }
    };
    spawn_asteroid(asteroids, AsteroidSize::Large, x, y, (vx, vy), rng)
}

/// Run the spawner for one frame. Suppressed entirely while the ship is dead.
pub fn manage_spawning(
    spawner: &mut SpawnerState,
    ship_alive: bool,
    asteroids: &mut [Asteroid; MAX_ASTEROIDS],
    rng: &mut SeededRng,
    tuning: &Tuning,
) -> bool {
    if !ship_alive {
        return false;
    }
    spawner.tick(tuning) && spawn_from_edge(asteroids, rng)
}

// ============================================================================
// Collisions
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub asteroids_destroyed: u32,
    pub points: u32,
    pub ship_hit: bool,
}

/// Bullets against asteroids (each bullet takes out at most one), then the
/// ship against every live asteroid. A hit ship is killed and recentred; the
/// caller owns lives.
pub fn handle_collisions(
    ship: &mut GameObject,
    asteroids: &mut [Asteroid; MAX_ASTEROIDS],
    bullets: &mut [GameObject; MAX_BULLETS],
    rng: &mut SeededRng,
) -> CollisionReport {
    let mut report = CollisionReport::default();

    for bullet in bullets.iter_mut().filter(|b| b.alive) {
        let hit = asteroids
            .iter()
            .position(|a| a.is_alive() && bullet_hits_asteroid(bullet, a));
        if let Some(index) = hit {
            bullet.alive = false;
            report.asteroids_destroyed += 1;
            report.points += asteroids[index].size.score();
            split_asteroid(asteroids, index, rng);
        }
    }

    if ship.alive && asteroids.iter().any(|a| a.is_alive() && ship_hits_asteroid(ship, a)) {
        ship.alive = false;
        recenter_ship(ship);
        report.ship_hit = true;
    }

    report
}
