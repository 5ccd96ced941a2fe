//! Battery-backed save memory: the high score and one saved match.
//!
//! Layout (little-endian u32 words):
//!   0   save magic 0xA5A5A5A5
//!   4   high score (0..=1_000_000, anything else reads as 0)
//!   8   game-state magic "GAME"
//!   12  score, lives, ship x, y, vx, vy, angle, alive
//!       16 asteroid records: alive, then x, y, vx, vy, size code when alive
//!       10 bullet records: alive, then x, y, vx, vy when alive

use crate::constants::*;
use crate::error::SaveError;
use crate::fixed_point::{from_int, normalize_deg};
use crate::game::Match;
use crate::physics::SpawnerState;
use crate::types::{Asteroid, AsteroidSize, GameObject};

pub const SRAM_SIZE: usize = 0x8000;
pub const SAVE_MAGIC: u32 = 0xA5A5_A5A5;
pub const GAMESTATE_MAGIC: u32 = 0x4741_4D45; // "GAME"
pub const MAX_HIGH_SCORE: u32 = 1_000_000;

const OFF_MAGIC: usize = 0;
const OFF_HIGH_SCORE: usize = 4;
const OFF_GAMESTATE_MAGIC: usize = 8;
const OFF_GAMESTATE_DATA: usize = 12;

/// Byte-addressed save memory.
pub trait Sram {
    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), SaveError>;
    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), SaveError>;
}

/// Save memory held in RAM. Blank cartridges read as 0xFF.
pub struct MemorySram {
    bytes: [u8; SRAM_SIZE],
}

impl MemorySram {
    pub fn new() -> Self {
        Self {
            bytes: [0xFF; SRAM_SIZE],
        }
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        let mut sram = Self::new();
        let len = data.len().min(SRAM_SIZE);
        sram.bytes[..len].copy_from_slice(&data[..len]);
        sram
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for MemorySram {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject accesses that run past the end of save memory.
pub fn check_range(offset: usize, len: usize) -> Result<(), SaveError> {
    match offset.checked_add(len) {
        Some(end) if end <= SRAM_SIZE => Ok(()),
        _ => Err(SaveError::OutOfRange { offset, len }),
    }
}

impl Sram for MemorySram {
    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), SaveError> {
        check_range(offset, buf.len())?;
        buf.copy_from_slice(&self.bytes[offset..offset + buf.len()]);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), SaveError> {
        check_range(offset, data.len())?;
        self.bytes[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }
}

pub fn read_u32<S: Sram + ?Sized>(sram: &mut S, offset: usize) -> Result<u32, SaveError> {
    let mut word = [0u8; 4];
    sram.read(offset, &mut word)?;
    Ok(u32::from_le_bytes(word))
}

pub fn write_u32<S: Sram + ?Sized>(sram: &mut S, offset: usize, value: u32) -> Result<(), SaveError> {
    sram.write(offset, &value.to_le_bytes())
}

// ============================================================================
// High score
// ============================================================================

/// Runtime high score plus its persistence bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighScore {
    value: u32,
    dirty: bool,
    last_save_ok: bool,
}

impl HighScore {
    /// Read the persisted high score. Missing magic, unreadable memory and
    /// out-of-range values all start from zero.
    pub fn load<S: Sram + ?Sized>(sram: &mut S) -> Self {
        let value = match (read_u32(sram, OFF_MAGIC), read_u32(sram, OFF_HIGH_SCORE)) {
            (Ok(SAVE_MAGIC), Ok(v)) if v <= MAX_HIGH_SCORE => v,
            _ => 0,
        };
        Self {
            value,
            dirty: false,
            last_save_ok: false,
        }
    }

    pub fn get(&self) -> u32 {
        self.value
    }

    pub fn set(&mut self, value: u32) {
        self.value = value;
        self.dirty = true;
    }

    /// True while the runtime value differs from what was last persisted.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn last_save_ok(&self) -> bool {
        self.last_save_ok
    }

    /// Write magic and score, then read both back. On mismatch both words
    /// are zeroed and the score stays dirty.
    pub fn save<S: Sram + ?Sized>(&mut self, sram: &mut S) -> Result<(), SaveError> {
        let result = self.write_verified(sram);
        match result {
            Ok(()) => {
                self.last_save_ok = true;
                self.dirty = false;
            }
            Err(_) => {
                self.last_save_ok = false;
                // Best effort: a failing medium may reject these too
                let _ = write_u32(sram, OFF_MAGIC, 0);
                let _ = write_u32(sram, OFF_HIGH_SCORE, 0);
            }
        }
        result
    }

    fn write_verified<S: Sram + ?Sized>(&self, sram: &mut S) -> Result<(), SaveError> {
        write_u32(sram, OFF_MAGIC, SAVE_MAGIC)?;
        write_u32(sram, OFF_HIGH_SCORE, self.value)?;
        if read_u32(sram, OFF_MAGIC)? != SAVE_MAGIC {
            return Err(SaveError::VerifyFailed { offset: OFF_MAGIC });
        }
        if read_u32(sram, OFF_HIGH_SCORE)? != self.value {
            return Err(SaveError::VerifyFailed {
                offset: OFF_HIGH_SCORE,
            });
        }
        Ok(())
    }
}

// ============================================================================
// Game state
// ============================================================================

pub fn has_saved_game<S: Sram + ?Sized>(sram: &mut S) -> bool {
    matches!(read_u32(sram, OFF_GAMESTATE_MAGIC), Ok(GAMESTATE_MAGIC))
}

/// Sequential little-endian word writer.
struct WordWriter<'a, S: Sram + ?Sized> {
    sram: &'a mut S,
    offset: usize,
}

impl<S: Sram + ?Sized> WordWriter<'_, S> {
    fn put(&mut self, value: i32) -> Result<(), SaveError> {
        write_u32(self.sram, self.offset, value as u32)?;
        self.offset += 4;
        Ok(())
    }
}

struct WordReader<'a, S: Sram + ?Sized> {
    sram: &'a mut S,
    offset: usize,
}

impl<S: Sram + ?Sized> WordReader<'_, S> {
    fn take(&mut self) -> Result<i32, SaveError> {
        let value = read_u32(self.sram, self.offset)?;
        self.offset += 4;
        Ok(value as i32)
    }

    fn take_flag(&mut self) -> Result<bool, SaveError> {
        Ok(self.take()? != 0)
    }
}

/// Persist score, lives, ship and both pools. Only the game-state magic is
/// read back for verification.
pub fn save_game<S: Sram + ?Sized>(sram: &mut S, game: &Match) -> Result<(), SaveError> {
    write_u32(sram, OFF_GAMESTATE_MAGIC, GAMESTATE_MAGIC)?;

    let mut w = WordWriter {
        sram: &mut *sram,
        offset: OFF_GAMESTATE_DATA,
    };
    w.put(game.score as i32)?;
    w.put(game.lives)?;

    let ship = &game.ship;
    for word in [ship.x, ship.y, ship.velocity_x, ship.velocity_y, ship.angle] {
        w.put(word)?;
    }
    w.put(ship.alive as i32)?;

    for asteroid in &game.asteroids {
        let obj = &asteroid.obj;
        w.put(obj.alive as i32)?;
        if obj.alive {
            for word in [obj.x, obj.y, obj.velocity_x, obj.velocity_y, asteroid.size.code()] {
                w.put(word)?;
            }
        }
    }

    for bullet in &game.bullets {
        w.put(bullet.alive as i32)?;
        if bullet.alive {
            for word in [bullet.x, bullet.y, bullet.velocity_x, bullet.velocity_y] {
                w.put(word)?;
            }
        }
    }

    if read_u32(sram, OFF_GAMESTATE_MAGIC)? != GAMESTATE_MAGIC {
        return Err(SaveError::VerifyFailed {
            offset: OFF_GAMESTATE_MAGIC,
        });
    }
    Ok(())
}

/// Positions are kept within one screen of the visible area.
fn clamp_position(value: i32, extent: i32) -> i32 {
    value.clamp(from_int(-extent), from_int(2 * extent))
}

fn clamp_velocity(value: i32) -> i32 {
    value.clamp(-from_int(MAX_SPEED_PX), from_int(MAX_SPEED_PX))
}

/// Restore a saved match into `game`. The record is decoded in full before
/// anything is overwritten, so a corrupt record leaves `game` untouched.
/// Out-of-range lives, positions and velocities are clamped rather than
/// rejected.
pub fn load_game<S: Sram + ?Sized>(sram: &mut S, game: &mut Match) -> Result<(), SaveError> {
    if !has_saved_game(sram) {
        return Err(SaveError::NoSaveData);
    }

    let mut r = WordReader {
        sram,
        offset: OFF_GAMESTATE_DATA,
    };
    let score = r.take()? as u32;
    let lives = r.take()?.clamp(0, MAX_LIVES);

    let mut ship = GameObject::DEAD;
    ship.width = PLAYER_SIZE;
    ship.height = PLAYER_SIZE;
    ship.x = clamp_position(r.take()?, SCREEN_WIDTH);
    ship.y = clamp_position(r.take()?, SCREEN_HEIGHT);
    ship.velocity_x = clamp_velocity(r.take()?);
    ship.velocity_y = clamp_velocity(r.take()?);
    ship.angle = normalize_deg(r.take()?);
    ship.alive = r.take_flag()?;
    ship.prev_x = ship.pixel_x();
    ship.prev_y = ship.pixel_y();

    let mut asteroids = [Asteroid::DEAD; MAX_ASTEROIDS];
    for (i, slot) in asteroids.iter_mut().enumerate() {
        if !r.take_flag()? {
            continue;
        }
        let x = clamp_position(r.take()?, SCREEN_WIDTH);
        let y = clamp_position(r.take()?, SCREEN_HEIGHT);
        let velocity_x = clamp_velocity(r.take()?);
        let velocity_y = clamp_velocity(r.take()?);
        let code_offset = r.offset;
        let code = r.take()?;
        let size = AsteroidSize::from_code(code).ok_or(SaveError::Corrupt {
            offset: code_offset,
            value: code as u32,
        })?;

        let mut obj = GameObject::spawn(code, code, 0, 0, i as u8);
        obj.x = x;
        obj.y = y;
        obj.prev_x = obj.pixel_x();
        obj.prev_y = obj.pixel_y();
        obj.velocity_x = velocity_x;
        obj.velocity_y = velocity_y;
        obj.angle = 0;
        *slot = Asteroid { obj, size };
    }

    let mut bullets = [GameObject::DEAD; MAX_BULLETS];
    for (i, slot) in bullets.iter_mut().enumerate() {
        if !r.take_flag()? {
            continue;
        }
        let mut obj = GameObject::spawn(BULLET_SIZE, BULLET_SIZE, 0, 0, i as u8);
        obj.x = clamp_position(r.take()?, SCREEN_WIDTH);
        obj.y = clamp_position(r.take()?, SCREEN_HEIGHT);
        obj.velocity_x = clamp_velocity(r.take()?);
        obj.velocity_y = clamp_velocity(r.take()?);
        obj.prev_x = obj.pixel_x();
        obj.prev_y = obj.pixel_y();
        obj.angle = 0;
        *slot = obj;
    }

    game.score = score;
    game.lives = lives;
    game.ship = ship;
    game.asteroids = asteroids;
    game.bullets = bullets;
    game.spawner = SpawnerState::new(&game.tuning);
    game.thrusting = false;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    /// Accepts writes but reads back zeros, like a missing SRAM chip.
    struct DeadSram;

    impl Sram for DeadSram {
        fn read(&mut self, _offset: usize, buf: &mut [u8]) -> Result<(), SaveError> {
            buf.fill(0);
            Ok(())
        }

        fn write(&mut self, _offset: usize, _data: &[u8]) -> Result<(), SaveError> {
            Ok(())
        }
    }

    #[test]
    fn test_blank_sram_has_no_high_score() {
        let mut sram = MemorySram::new();
        assert_eq!(HighScore::load(&mut sram).get(), 0);
        assert!(!has_saved_game(&mut sram));
    }

    #[test]
    fn test_high_score_persists() {
        let mut sram = MemorySram::new();
        let mut hs = HighScore::load(&mut sram);
        hs.set(1234);
        assert!(hs.is_dirty());
        hs.save(&mut sram).unwrap();
        assert!(hs.last_save_ok());
        assert!(!hs.is_dirty());

        assert_eq!(&sram.as_bytes()[0..8], &[0xA5, 0xA5, 0xA5, 0xA5, 0xD2, 0x04, 0, 0]);
        assert_eq!(HighScore::load(&mut sram).get(), 1234);
    }

    #[test]
    fn test_out_of_range_high_score_reads_zero() {
        let mut sram = MemorySram::new();
        write_u32(&mut sram, 0, SAVE_MAGIC).unwrap();
        write_u32(&mut sram, 4, MAX_HIGH_SCORE + 1).unwrap();
        assert_eq!(HighScore::load(&mut sram).get(), 0);
    }

    #[test]
    fn test_failed_verify_keeps_dirty() {
        let mut hs = HighScore::default();
        hs.set(50);
        let err = hs.save(&mut DeadSram).unwrap_err();
        assert_eq!(err, SaveError::VerifyFailed { offset: 0 });
        assert!(!hs.last_save_ok());
        assert!(hs.is_dirty());
    }

    #[test]
    fn test_game_state_layout() {
        let mut sram = MemorySram::new();
        let game = Match::new(11, Tuning::default());
        save_game(&mut sram, &game).unwrap();

        let bytes = sram.as_bytes();
        assert_eq!(&bytes[8..12], b"EMAG");
        // score 0, lives 3
        assert_eq!(&bytes[12..20], &[0, 0, 0, 0, 3, 0, 0, 0]);
        // ship x = 116 << 8
        assert_eq!(read_u32(&mut sram, 20).unwrap(), 116 << 8);
        // first asteroid record: alive flag then x
        assert_eq!(read_u32(&mut sram, 44).unwrap(), 1);
        assert_eq!(read_u32(&mut sram, 48).unwrap(), 214 << 8);
    }

    #[test]
    fn test_corrupt_size_code_rejected() {
        let mut sram = MemorySram::new();
        let mut game = Match::new(11, Tuning::default());
        save_game(&mut sram, &game).unwrap();
        // size code of the first asteroid record
        write_u32(&mut sram, 64, 9).unwrap();
        game.score = 77;
        assert_eq!(
            load_game(&mut sram, &mut game),
            Err(SaveError::Corrupt { offset: 64, value: 9 })
        );
        assert_eq!(game.score(), 77);
    }

    #[test]
    fn test_extreme_record_is_clamped_and_steppable() {
        let mut sram = MemorySram::new();
        let mut game = Match::new(11, Tuning::default());
        save_game(&mut sram, &game).unwrap();
        // lives, ship x, ship vx, then x and vx of the first asteroid
        write_u32(&mut sram, 16, i32::MIN as u32).unwrap();
        write_u32(&mut sram, 20, i32::MAX as u32).unwrap();
        write_u32(&mut sram, 28, i32::MAX as u32).unwrap();
        write_u32(&mut sram, 48, i32::MIN as u32).unwrap();
        write_u32(&mut sram, 56, i32::MIN as u32).unwrap();

        load_game(&mut sram, &mut game).unwrap();
        assert_eq!(game.lives(), 0);
        assert_eq!(game.ship.x, from_int(2 * SCREEN_WIDTH));
        assert_eq!(game.ship.velocity_x, from_int(MAX_SPEED_PX));
        assert_eq!(game.asteroids[0].obj.x, from_int(-SCREEN_WIDTH));
        assert_eq!(game.asteroids[0].obj.velocity_x, -from_int(MAX_SPEED_PX));

        for _ in 0..240 {
            game.step(crate::input::FrameInput::default());
        }
        assert!((-PLAYER_SIZE..=SCREEN_WIDTH).contains(&game.ship.pixel_x()));
    }

    #[test]
    fn test_out_of_range_access() {
        let mut sram = MemorySram::new();
        assert_eq!(
            write_u32(&mut sram, SRAM_SIZE - 2, 1),
            Err(SaveError::OutOfRange {
                offset: SRAM_SIZE - 2,
                len: 4
            })
        );
    }
}
