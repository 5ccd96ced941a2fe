use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use handheld_asteroids_core::constants::{SCREEN_HEIGHT, SCREEN_PIXELS, SCREEN_WIDTH};
use handheld_asteroids_core::Screen;

/// One vblank at the handheld's ~59.73 Hz refresh.
pub const FRAME_PERIOD: Duration = Duration::from_nanos(16_742_006);

/// Off-screen visible buffer with optional real-time pacing.
pub struct HeadlessDisplay {
    visible: Vec<u16>,
    next_vblank: Option<Instant>,
    vblanks: u64,
}

impl HeadlessDisplay {
    pub fn new(paced: bool) -> Self {
        Self {
            visible: vec![0; SCREEN_PIXELS],
            next_vblank: paced.then(Instant::now),
            vblanks: 0,
        }
    }

    pub fn visible(&self) -> &[u16] {
        &self.visible
    }

    pub fn vblanks(&self) -> u64 {
        self.vblanks
    }

    /// Binary PPM (P6) of the visible buffer.
    pub fn write_ppm<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "P6\n{SCREEN_WIDTH} {SCREEN_HEIGHT}\n255\n")?;
        for &pixel in &self.visible {
            out.write_all(&bgr555_to_rgb(pixel))?;
        }
        out.flush()
    }

    pub fn save_ppm(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("failed to create frame dump: {}", path.display()))?;
        self.write_ppm(BufWriter::new(file))
            .with_context(|| format!("failed writing frame dump: {}", path.display()))
    }
}

impl Screen for HeadlessDisplay {
    fn wait_for_vblank(&mut self) {
        self.vblanks += 1;
        if let Some(next) = self.next_vblank.as_mut() {
            let now = Instant::now();
            if *next > now {
                thread::sleep(*next - now);
            }
            *next += FRAME_PERIOD;
        }
    }

    fn visible_mut(&mut self) -> &mut [u16] {
        &mut self.visible
    }
}

/// Expand a 5-bit-per-channel BGR555 pixel to 8-bit RGB.
pub fn bgr555_to_rgb(pixel: u16) -> [u8; 3] {
    let expand = |c: u16| {
        let c = (c & 0x1F) as u8;
        (c << 3) | (c >> 2)
    };
    [expand(pixel), expand(pixel >> 5), expand(pixel >> 10)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_expansion() {
        assert_eq!(bgr555_to_rgb(0x0000), [0, 0, 0]);
        assert_eq!(bgr555_to_rgb(0x7FFF), [255, 255, 255]);
        assert_eq!(bgr555_to_rgb(0x001F), [255, 0, 0]);
        assert_eq!(bgr555_to_rgb(0x7C00), [0, 0, 255]);
    }

    #[test]
    fn test_ppm_layout() {
        let mut display = HeadlessDisplay::new(false);
        display.visible_mut()[1] = 0x03E0;
        let mut out = Vec::new();
        display.write_ppm(&mut out).unwrap();

        let header = b"P6\n240 160\n255\n";
        assert_eq!(&out[..header.len()], header);
        assert_eq!(out.len(), header.len() + SCREEN_PIXELS * 3);
        assert_eq!(&out[header.len() + 3..header.len() + 6], &[0, 255, 0]);
    }

    #[test]
    fn test_unpaced_vblank_counts() {
        let mut display = HeadlessDisplay::new(false);
        display.wait_for_vblank();
        display.wait_for_vblank();
        assert_eq!(display.vblanks(), 2);
    }
}
