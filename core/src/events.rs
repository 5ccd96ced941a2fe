bitflags::bitflags! {
    /// Things that happened during one frame. Sound and host logging key off these.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FrameEvents: u16 {
        const THRUST_ON          = 1 << 0;
        const THRUST_OFF         = 1 << 1;
        const SHOT               = 1 << 2;
        const ASTEROID_DESTROYED = 1 << 3;
        const SHIP_HIT           = 1 << 4;
        const MODE_CHANGED       = 1 << 5;
        const MENU_MOVED         = 1 << 6;
        const GAME_SAVED         = 1 << 7;
        const GAME_LOADED        = 1 << 8;
        const HIGH_SCORE_SAVED   = 1 << 9;
        const SAVE_FAILED        = 1 << 10;
        const GAME_OVER          = 1 << 11;
        const RESPAWNED          = 1 << 12;
        const LOAD_FAILED        = 1 << 13;
    }
}
