//! Sound as raw PSG register writes: one-shot effects on channel 1, the
//! thruster drone and the menu jingle on channel 2.

/// Memory-mapped sound registers used by the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum SoundRegister {
    Sound1CntL = 0x0400_0060,
    Sound1CntH = 0x0400_0062,
    Sound1CntX = 0x0400_0064,
    Sound2CntL = 0x0400_0068,
    Sound2CntH = 0x0400_006C,
    SoundCntL = 0x0400_0080,
    SoundCntX = 0x0400_0084,
}

impl SoundRegister {
    pub fn address(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            SoundRegister::Sound1CntL => "SOUND1CNT_L",
            SoundRegister::Sound1CntH => "SOUND1CNT_H",
            SoundRegister::Sound1CntX => "SOUND1CNT_X",
            SoundRegister::Sound2CntL => "SOUND2CNT_L",
            SoundRegister::Sound2CntH => "SOUND2CNT_H",
            SoundRegister::SoundCntL => "SOUNDCNT_L",
            SoundRegister::SoundCntX => "SOUNDCNT_X",
        }
    }
}

/// Sink for sound register writes.
pub trait Audio {
    fn write(&mut self, register: SoundRegister, value: u16);
}

/// Discards every write.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl Audio for NullAudio {
    fn write(&mut self, _register: SoundRegister, _value: u16) {}
}

use SoundRegister::*;

/// Master enable plus all channels on both sides at full volume.
pub fn enable<A: Audio + ?Sized>(audio: &mut A) {
    audio.write(SoundCntX, 0x0080);
    audio.write(SoundCntL, 0x7777);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    Shoot,
    Explosion,
    MenuSelect,
    ThrusterStart,
    ThrusterStop,
    Siren,
    /// Silences the thruster, then a high downward sweep.
    PlayerHit,
}

impl SoundEffect {
    /// The register writes that trigger this effect, in order.
    pub fn writes(self) -> &'static [(SoundRegister, u16)] {
        match self {
            SoundEffect::Shoot => &[(Sound1CntL, 0x0077), (Sound1CntH, 0xF140), (Sound1CntX, 0x87C0)],
            SoundEffect::Explosion => {
                &[(Sound1CntL, 0x0078), (Sound1CntH, 0xF110), (Sound1CntX, 0x8600)]
            }
            SoundEffect::MenuSelect => {
                &[(Sound1CntL, 0x0000), (Sound1CntH, 0x8300), (Sound1CntX, 0x8400)]
            }
            SoundEffect::ThrusterStart => &[(Sound2CntL, 0x6800), (Sound2CntH, 0x8100)],
            SoundEffect::ThrusterStop => &[(Sound2CntL, 0x0000), (Sound2CntH, 0x0000)],
            SoundEffect::Siren => &[(Sound1CntL, 0x0068), (Sound1CntH, 0xF120), (Sound1CntX, 0x8300)],
            SoundEffect::PlayerHit => &[
                (Sound2CntL, 0x0000),
                (Sound2CntH, 0x0000),
                (Sound1CntL, 0x0077),
                (Sound1CntH, 0xF108),
                (Sound1CntX, 0x8780),
            ],
        }
    }
}

pub fn play<A: Audio + ?Sized>(audio: &mut A, effect: SoundEffect) {
    for &(register, value) in effect.writes() {
        audio.write(register, value);
    }
}

// ============================================================================
// Menu jingle
// ============================================================================

/// Channel 2 frequency values; zero is a rest.
const MELODY: [u16; 16] = [
    0x0739, 0x0739, 0x0000, 0x0739, 0x0000, 0x0705, 0x0739, 0x0000, //
    0x0759, 0x0000, 0x0000, 0x0000, //
    0x06B2, 0x0000, 0x0000, 0x0000,
];
const FRAMES_PER_NOTE: u8 = 2;
const NOTE_DUTY_VOLUME: u16 = 0x3780;
const RESTART: u16 = 0x8000;
const FREQ_MASK: u16 = 0x07FF;

/// Plays [`MELODY`] once, advancing one step every two frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuMusic {
    tick: u8,
    note: usize,
    complete: bool,
}

impl MenuMusic {
    pub const fn new() -> Self {
        Self {
            tick: 0,
            note: 0,
            complete: false,
        }
    }

    /// Rewind and sound the first note.
    pub fn start<A: Audio + ?Sized>(&mut self, audio: &mut A) {
        *self = Self::new();
        Self::sound(audio, MELODY[0]);
    }

    /// Advance by one frame.
    pub fn update<A: Audio + ?Sized>(&mut self, audio: &mut A) {
        if self.complete {
            return;
        }
        self.tick += 1;
        if self.tick < FRAMES_PER_NOTE {
            return;
        }
        self.tick = 0;
        self.note += 1;

        if self.note >= MELODY.len() {
            self.complete = true;
            audio.write(Sound2CntL, 0);
            audio.write(Sound2CntH, 0);
            return;
        }
        Self::sound(audio, MELODY[self.note]);
    }

    /// Silence channel 2 and rewind.
    pub fn stop<A: Audio + ?Sized>(&mut self, audio: &mut A) {
        audio.write(Sound2CntL, 0);
        audio.write(Sound2CntH, 0);
        *self = Self::new();
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    fn sound<A: Audio + ?Sized>(audio: &mut A, note: u16) {
        if note == 0 {
            audio.write(Sound2CntH, 0);
        } else {
            audio.write(Sound2CntL, NOTE_DUTY_VOLUME);
            audio.write(Sound2CntH, RESTART | (note & FREQ_MASK));
        }
    }
}
