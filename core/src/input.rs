//! Key snapshot boundary.
//!
//! The platform samples the 10-bit key register once per frame; [`KeyState`]
//! turns consecutive samples into a [`FrameInput`] with held and newly pressed
//! sets, so game code never sees raw hardware polarity.

bitflags::bitflags! {
    /// Handheld key register bits, in hardware order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Keys: u16 {
        const A      = 1 << 0;
        const B      = 1 << 1;
        const SELECT = 1 << 2;
        const START  = 1 << 3;
        const RIGHT  = 1 << 4;
        const LEFT   = 1 << 5;
        const UP     = 1 << 6;
        const DOWN   = 1 << 7;
        const R      = 1 << 8;
        const L      = 1 << 9;
    }
}

impl Keys {
    /// Keys that fire the ship's engine.
    pub const THRUST: Keys = Keys::UP.union(Keys::B);

    /// Parse a key name as used in input scripts (`A`, `start`, `Left`, ...).
    pub fn from_script_name(name: &str) -> Option<Keys> {
        Self::all()
            .iter_names()
            .find(|(flag, _)| flag.eq_ignore_ascii_case(name))
            .map(|(_, key)| key)
    }
}

/// Keys seen by one frame of game logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameInput {
    pub held: Keys,
    pub pressed: Keys,
}

impl FrameInput {
    pub fn held(&self, keys: Keys) -> bool {
        self.held.intersects(keys)
    }

    pub fn pressed(&self, keys: Keys) -> bool {
        self.pressed.intersects(keys)
    }
}

/// Edge detector over raw per-frame key samples.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyState {
    previous: Keys,
}

impl KeyState {
    pub const fn new() -> Self {
        Self {
            previous: Keys::empty(),
        }
    }

    pub fn sample(&mut self, raw: Keys) -> FrameInput {
        let pressed = raw.difference(self.previous);
        self.previous = raw;
        FrameInput { held: raw, pressed }
    }
}
