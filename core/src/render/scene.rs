//! Drawing the match: ship, asteroids, bullets, scoreboard and the optional
//! collision overlay.

use super::font::{draw_text, TextBuf};
use super::Framebuffer;
use crate::constants::*;
use crate::fixed_point::{cos_fp, sin_fp, FP_SHIFT};
use crate::game::Match;
use crate::geometry::{asteroid_radius, collision_radius, ship_triangle};
use crate::types::{Asteroid, AsteroidSize, GameObject};

const FLARE_OFFSET: i32 = 4;
const FLARE_SIZE: i32 = 2;
const SCORE_X: i32 = 10;
const LIVES_X: i32 = 166;
const SHIP_DEBUG_RADIUS: i32 = 4;

/// Lime outline of the ship, plus a red flare behind it while thrusting.
pub fn draw_ship(fb: &mut Framebuffer, ship: &GameObject, thrusting: bool) {
    if !ship.alive {
        return;
    }
    fb.polygon(&ship_triangle(ship, PLAYER_BACK_INSET), CLR_LIME);

    if thrusting {
        let (cx, cy) = ship.box_center();
        let fx = cx + ((-FLARE_OFFSET * cos_fp(ship.angle)) >> FP_SHIFT);
        let fy = cy + ((-FLARE_OFFSET * sin_fp(ship.angle)) >> FP_SHIFT);
        for dy in 0..FLARE_SIZE {
            for dx in 0..FLARE_SIZE {
                fb.set_pixel(fx + dx, fy + dy, CLR_RED);
            }
        }
    }
}

pub fn draw_asteroid(fb: &mut Framebuffer, asteroid: &Asteroid) {
    if !asteroid.is_alive() {
        return;
    }
    let obj = &asteroid.obj;
    fb.circle(
        obj.pixel_x(),
        obj.pixel_y(),
        asteroid_radius(asteroid.size.code()),
        asteroid.size.color(),
    );
}

pub fn draw_bullet(fb: &mut Framebuffer, bullet: &GameObject) {
    if !bullet.alive {
        return;
    }
    fb.circle(
        bullet.pixel_x(),
        bullet.pixel_y(),
        BULLET_DRAW_RADIUS,
        rainbow(bullet.color_index),
    );
}

/// Score and lives along the top, high score in red along the bottom.
pub fn draw_scoreboard(fb: &mut Framebuffer, score: u32, lives: i32, high_score: u32) {
    let line = TextBuf::<20>::format(format_args!("SCORE: {score}"));
    draw_text(fb, line.as_str(), SCORE_X, SCORE_Y, CLR_WHITE);

    let line = TextBuf::<20>::format(format_args!("LIVES: {}", lives.max(0)));
    draw_text(fb, line.as_str(), LIVES_X, SCORE_Y, CLR_WHITE);

    let line = TextBuf::<20>::format(format_args!("HI: {high_score}"));
    draw_text(fb, line.as_str(), SCORE_X, HIGH_SCORE_Y, CLR_RED);
}

/// Clear the back buffer and draw one frame of the match.
pub fn draw_match(fb: &mut Framebuffer, game: &Match, high_score: u32) {
    fb.clear();
    draw_scoreboard(fb, game.score(), game.lives(), high_score);
    draw_ship(fb, game.ship(), game.is_thrusting());
    for asteroid in game.asteroids() {
        draw_asteroid(fb, asteroid);
    }
    for bullet in game.bullets() {
        draw_bullet(fb, bullet);
    }
}

/// Overlay the hit circles used by collision detection.
pub fn draw_collision_circles(fb: &mut Framebuffer, game: &Match) {
    let ship = game.ship();
    if ship.alive {
        let (cx, cy) = ship.box_center();
        fb.circle(cx, cy, SHIP_DEBUG_RADIUS, CLR_WHITE);
    }

    for bullet in game.bullets().iter().filter(|b| b.alive) {
        fb.circle(bullet.pixel_x(), bullet.pixel_y(), bullet.width, CLR_YELLOW);
    }

    for asteroid in game.asteroids().iter().filter(|a| a.is_alive()) {
        let color = match asteroid.size {
            AsteroidSize::Large => CLR_LIME,
            AsteroidSize::Medium => CLR_CYAN,
            AsteroidSize::Small => CLR_MAG,
        };
        let radius = collision_radius(asteroid_radius(asteroid.size.code()));
        fb.circle(asteroid.obj.pixel_x(), asteroid.obj.pixel_y(), radius, color);
    }
}
