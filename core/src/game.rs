//! One match: the ship, the entity pools, score, lives and the spawner.
//!
//! `Match::step` runs the gameplay half of a frame. Drawing, pausing and the
//! death/respawn screens belong to [`crate::app`].

use crate::constants::*;
use crate::events::FrameEvents;
use crate::fixed_point::from_int;
use crate::input::{FrameInput, Keys};
use crate::physics::*;
use crate::rng::SeededRng;
use crate::tuning::Tuning;
use crate::types::{Asteroid, AsteroidSize, GameObject};

/// How a frame of gameplay ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Running,
    /// START was pressed; the rest of the frame was skipped.
    Paused,
    /// The ship was destroyed this frame.
    ShipDestroyed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    pub status: StepStatus,
    pub events: FrameEvents,
}

pub struct Match {
    pub(crate) rng: SeededRng,
    pub(crate) tuning: Tuning,

    pub(crate) score: u32,
    pub(crate) lives: i32,

    pub(crate) ship: GameObject,
    pub(crate) asteroids: [Asteroid; MAX_ASTEROIDS],
    pub(crate) bullets: [GameObject; MAX_BULLETS],

    pub(crate) spawner: SpawnerState,
    pub(crate) bullet_color_tick: u8,
    pub(crate) thrusting: bool,
    pub(crate) frame_count: u32,
}

impl Match {
    pub fn new(seed: u32, tuning: Tuning) -> Self {
        let mut game = Self {
            rng: SeededRng::new(seed),
            tuning,
            score: 0,
            lives: tuning.starting_lives,
            ship: GameObject::DEAD,
            asteroids: [Asteroid::DEAD; MAX_ASTEROIDS],
            bullets: [GameObject::DEAD; MAX_BULLETS],
            spawner: SpawnerState::new(&tuning),
            bullet_color_tick: 0,
            thrusting: false,
            frame_count: 0,
        };
        game.setup();
        game
    }

    /// Start a fresh match: centred ship, four large asteroids in the
    /// corners drifting inward, no bullets. The RNG stream carries on.
    pub fn setup(&mut self) {
        self.ship = GameObject::spawn(
            PLAYER_SIZE,
            PLAYER_SIZE,
            SCREEN_WIDTH / 2 - PLAYER_SIZE / 2,
            SCREEN_HEIGHT / 2 - PLAYER_SIZE / 2,
            self.rng.color_phase(),
        );
        self.lives = self.tuning.starting_lives;
        self.score = 0;
        self.spawner = SpawnerState::new(&self.tuning);
        self.thrusting = false;
        self.frame_count = 0;

        self.asteroids = [Asteroid::DEAD; MAX_ASTEROIDS];
        for i in 0..4 {
            let left = i % 2 == 1;
            let x = if left { 10 } else { SCREEN_WIDTH - ASTEROID_SIZE_L - 10 };
            let y = (i / 2) * 40 + 20;
            let code = ASTEROID_SIZE_L;
            let mut obj = GameObject::spawn(code, code, x, y, self.rng.color_phase());
            obj.velocity_x = from_int(if left { 1 } else { -1 });
            obj.velocity_y = from_int(if i < 2 { 1 } else { -1 });
            self.asteroids[i as usize] = Asteroid {
                obj,
                size: AsteroidSize::Large,
            };
        }

        self.bullets = [GameObject::DEAD; MAX_BULLETS];
    }

    /// Run one frame of gameplay: ship, firing, pause check, bullets,
    /// asteroids, spawner, collisions.
    pub fn step(&mut self, input: FrameInput) -> StepReport {
        let mut events = FrameEvents::empty();
        self.frame_count = self.frame_count.wrapping_add(1);

        let thrusting = update_ship(&mut self.ship, input.held, &self.tuning);
        if thrusting && !self.thrusting {
            events |= FrameEvents::THRUST_ON;
        } else if !thrusting && self.thrusting {
            events |= FrameEvents::THRUST_OFF;
        }
        self.thrusting = thrusting;

        if input.pressed(Keys::A)
            && spawn_bullet(&mut self.bullets, &self.ship, &self.tuning, &mut self.rng)
        {
            events |= FrameEvents::SHOT;
        }

        if input.pressed(Keys::START) {
            return StepReport {
                status: StepStatus::Paused,
                events,
            };
        }

        update_bullets(&mut self.bullets, &mut self.bullet_color_tick);
        update_asteroids(&mut self.asteroids);
        manage_spawning(
            &mut self.spawner,
            self.ship.alive,
            &mut self.asteroids,
            &mut self.rng,
            &self.tuning,
        );

        let report = handle_collisions(
            &mut self.ship,
            &mut self.asteroids,
            &mut self.bullets,
            &mut self.rng,
        );
        self.score = self.score.saturating_add(report.points);
        if report.asteroids_destroyed > 0 {
            events |= FrameEvents::ASTEROID_DESTROYED;
        }

        let status = if report.ship_hit {
            self.lives -= 1;
            self.thrusting = false;
            events |= FrameEvents::SHIP_HIT;
            StepStatus::ShipDestroyed
        } else {
            StepStatus::Running
        };

        StepReport { status, events }
    }

    /// Clear every asteroid whose centre is near the spawn point and bring
    /// the ship back to life.
    pub fn respawn(&mut self) {
        let cx = SCREEN_WIDTH / 2;
        let cy = SCREEN_HEIGHT / 2;
        let r2 = RESPAWN_CLEAR_RADIUS * RESPAWN_CLEAR_RADIUS;
        for asteroid in self.asteroids.iter_mut().filter(|a| a.is_alive()) {
            let dx = asteroid.obj.pixel_x() - cx;
            let dy = asteroid.obj.pixel_y() - cy;
            if dx * dx + dy * dy <= r2 {
                asteroid.obj.alive = false;
            }
        }
        self.ship.alive = true;
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> i32 {
        self.lives
    }

    pub fn ship(&self) -> &GameObject {
        &self.ship
    }

    pub fn asteroids(&self) -> &[Asteroid; MAX_ASTEROIDS] {
        &self.asteroids
    }

    pub fn bullets(&self) -> &[GameObject; MAX_BULLETS] {
        &self.bullets
    }

    pub fn spawner(&self) -> &SpawnerState {
        &self.spawner
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Whether the engine fired on the last frame (drives the flare and thruster tone).
    pub fn is_thrusting(&self) -> bool {
        self.thrusting
    }

    pub fn rng_state(&self) -> u32 {
        self.rng.state()
    }

    /// Frames stepped since the match was set up.
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn live_asteroids(&self) -> usize {
        self.asteroids.iter().filter(|a| a.is_alive()).count()
    }

    pub fn live_bullets(&self) -> usize {
        self.bullets.iter().filter(|b| b.alive).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idle() -> FrameInput {
        FrameInput::default()
    }

    fn press(keys: Keys) -> FrameInput {
        FrameInput {
            held: keys,
            pressed: keys,
        }
    }

    #[test]
    fn test_setup_layout() {
        let game = Match::new(42, Tuning::default());
        assert_eq!(game.score(), 0);
        assert_eq!(game.lives(), 3);
        assert_eq!((game.ship().pixel_x(), game.ship().pixel_y()), (116, 76));
        assert_eq!(game.ship().angle, 270);

        let corners: Vec<_> = game.asteroids()[..4]
            .iter()
            .map(|a| (a.obj.pixel_x(), a.obj.pixel_y(), a.obj.velocity_x, a.obj.velocity_y))
            .collect();
        assert_eq!(
            corners,
            vec![
                (214, 20, -256, 256),
                (10, 20, 256, 256),
                (214, 60, -256, -256),
                (10, 60, 256, -256),
            ]
        );
        assert_eq!(game.live_asteroids(), 4);
        assert_eq!(game.live_bullets(), 0);
    }

    #[test]
    fn test_setup_is_reusable() {
        let mut game = Match::new(42, Tuning::default());
        for _ in 0..10 {
            game.step(press(Keys::A));
            game.step(idle());
        }
        assert!(game.live_bullets() > 0);
        game.setup();
        assert_eq!(game.live_bullets(), 0);
        assert_eq!(game.live_asteroids(), 4);
        assert_eq!(*game.spawner(), SpawnerState::new(&Tuning::default()));
    }

    #[test]
    fn test_start_pauses_before_world_update() {
        let mut game = Match::new(1, Tuning::default());
        let before = game.asteroids()[0].obj;
        let report = game.step(press(Keys::START));
        assert_eq!(report.status, StepStatus::Paused);
        assert_eq!(game.asteroids()[0].obj, before);
    }

    #[test]
    fn test_thrust_events_are_edges() {
        let mut game = Match::new(1, Tuning::default());
        let held = FrameInput {
            held: Keys::UP,
            pressed: Keys::empty(),
        };
        assert!(game.step(held).events.contains(FrameEvents::THRUST_ON));
        assert!(game.step(held).events.is_empty());
        assert!(game.step(idle()).events.contains(FrameEvents::THRUST_OFF));
    }

    #[test]
    fn test_fire_reports_shot() {
        let mut game = Match::new(1, Tuning::default());
        let report = game.step(press(Keys::A));
        assert!(report.events.contains(FrameEvents::SHOT));
        assert_eq!(game.live_bullets(), 1);
    }

    #[test]
    fn test_respawn_clears_spawn_area_only() {
        let mut game = Match::new(1, Tuning::default());
        game.ship.alive = false;
        spawn_asteroid(&mut game.asteroids, AsteroidSize::Small, 130, 90, (0, 0), &mut game.rng);
        game.respawn();
        assert!(game.ship().alive);
        // (130, 90) is 14 px away from the centre; the corner asteroids survive
        assert_eq!(game.live_asteroids(), 4);
    }
}
