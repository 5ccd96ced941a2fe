//! Gameplay tuning knobs. `Default` is the shipped game; hosts may override
//! individual fields from a JSON file, missing fields keep their defaults.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::TuningError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub starting_lives: i32,
    /// Degrees per frame while LEFT/RIGHT is held.
    pub rotation_speed_deg: i32,
    /// Q8 thrust added per frame along the facing direction.
    pub accel_factor_fp: i32,
    /// Per-axis velocity cap in whole pixels per frame.
    pub max_velocity: i32,
    pub bullet_speed: i32,
    pub initial_spawn_interval: i32,
    pub decrease_interval: i32,
    pub decrease_amount: i32,
    pub min_spawn_interval: i32,
    pub damage_delay: u32,
    pub death_delay: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            starting_lives: STARTING_LIVES,
            rotation_speed_deg: ROTATION_SPEED_DEG,
            accel_factor_fp: ACCEL_FACTOR_FP,
            max_velocity: PLAYER_MAX_VELOCITY,
            bullet_speed: BULLET_SPEED,
            initial_spawn_interval: INITIAL_SPAWN_INTERVAL,
            decrease_interval: DECREASE_INTERVAL,
            decrease_amount: DECREASE_AMOUNT,
            min_spawn_interval: MIN_SPAWN_INTERVAL,
            damage_delay: DAMAGE_DELAY,
            death_delay: DEATH_DELAY,
        }
    }
}

impl Tuning {
    /// Check every knob against the range the frame loop's integer math is
    /// safe for. Hosts call this on anything they deserialize.
    pub fn validate(&self) -> Result<(), TuningError> {
        let timer = i64::from(MAX_TIMER_FRAMES);
        check("starting_lives", self.starting_lives, 1, i64::from(MAX_LIVES))?;
        check("rotation_speed_deg", self.rotation_speed_deg, 0, 359)?;
        check("accel_factor_fp", self.accel_factor_fp, 0, i64::from(MAX_SPEED_PX) << 8)?;
        check("max_velocity", self.max_velocity, 1, i64::from(MAX_SPEED_PX))?;
        check("bullet_speed", self.bullet_speed, 1, i64::from(MAX_SPEED_PX))?;
        check("initial_spawn_interval", self.initial_spawn_interval, 1, timer)?;
        check("decrease_interval", self.decrease_interval, 1, timer)?;
        check("decrease_amount", self.decrease_amount, 0, timer)?;
        check(
            "min_spawn_interval",
            self.min_spawn_interval,
            1,
            i64::from(self.initial_spawn_interval),
        )?;
        check("damage_delay", self.damage_delay, 0, timer)?;
        check("death_delay", self.death_delay, 0, timer)?;
        Ok(())
    }
}

fn check(field: &'static str, value: impl Into<i64>, min: i64, max: i64) -> Result<(), TuningError> {
    let value = value.into();
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}
