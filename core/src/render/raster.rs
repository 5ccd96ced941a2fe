//! Back buffer and the primitives that draw into it.
//!
//! Every primitive clips per pixel, so callers may pass coordinates anywhere.

use crate::constants::*;

/// 240x160 BGR555 frame, row-major.
#[derive(Clone)]
pub struct Framebuffer {
    pixels: [u16; SCREEN_PIXELS],
}

impl Framebuffer {
    pub const fn new() -> Self {
        Self {
            pixels: [CLR_BLACK; SCREEN_PIXELS],
        }
    }

    pub fn pixels(&self) -> &[u16] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u16] {
        &mut self.pixels
    }

    #[inline]
    fn index(x: i32, y: i32) -> Option<usize> {
        if (0..SCREEN_WIDTH).contains(&x) && (0..SCREEN_HEIGHT).contains(&y) {
            Some((y * SCREEN_WIDTH + x) as usize)
        } else {
            None
        }
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<u16> {
        Self::index(x, y).map(|i| self.pixels[i])
    }

    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u16) {
        if let Some(i) = Self::index(x, y) {
            self.pixels[i] = color;
        }
    }

    pub fn clear(&mut self) {
        self.pixels.fill(CLR_BLACK);
    }

    /// Fill a rectangle with black, clipped to the screen.
    pub fn clear_region(&mut self, x: i32, y: i32, width: i32, height: i32) {
        let x0 = x.max(0);
        let x1 = (x + width).min(SCREEN_WIDTH);
        if x0 >= x1 {
            return;
        }
        for py in y.max(0)..(y + height).min(SCREEN_HEIGHT) {
            let row = (py * SCREEN_WIDTH) as usize;
            self.pixels[row + x0 as usize..row + x1 as usize].fill(CLR_BLACK);
        }
    }

    /// Integer Bresenham line, both endpoints inclusive.
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u16) {
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx - dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.set_pixel(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += sx;
            }
            if e2 < dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Midpoint circle outline, plotting all eight octants per step.
    pub fn circle(&mut self, cx: i32, cy: i32, radius: i32, color: u16) {
        let mut x = radius;
        let mut y = 0;
        let mut err = 0;

        while x >= y {
            for (px, py) in [
                (cx + x, cy + y),
                (cx + y, cy + x),
                (cx - y, cy + x),
                (cx - x, cy + y),
                (cx - x, cy - y),
                (cx - y, cy - x),
                (cx + y, cy - x),
                (cx + x, cy - y),
            ] {
                self.set_pixel(px, py, color);
            }

            y += 1;
            if err <= 0 {
                err += 2 * y + 1;
            } else {
                x -= 1;
                err -= 2 * x + 1;
            }
        }
    }

    /// Closed outline through `points`.
    pub fn polygon(&mut self, points: &[(i32, i32)], color: u16) {
        let Some(&first) = points.first() else {
            return;
        };
        let mut prev = first;
        for &p in &points[1..] {
            self.line(prev.0, prev.1, p.0, p.1, color);
            prev = p;
        }
        self.line(prev.0, prev.1, first.0, first.1, color);
    }

    /// Number of pixels currently set to `color`.
    pub fn count(&self, color: u16) -> usize {
        self.pixels.iter().filter(|&&p| p == color).count()
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_pixel_clips() {
        let mut fb = Framebuffer::new();
        fb.set_pixel(-1, 0, CLR_WHITE);
        fb.set_pixel(SCREEN_WIDTH, 0, CLR_WHITE);
        fb.set_pixel(0, SCREEN_HEIGHT, CLR_WHITE);
        assert_eq!(fb.count(CLR_WHITE), 0);
        fb.set_pixel(239, 159, CLR_WHITE);
        assert_eq!(fb.pixel(239, 159), Some(CLR_WHITE));
        assert_eq!(fb.pixel(240, 159), None);
    }

    #[test]
    fn test_line_endpoints_and_length() {
        let mut fb = Framebuffer::new();
        fb.line(10, 10, 20, 14, CLR_RED);
        assert_eq!(fb.pixel(10, 10), Some(CLR_RED));
        assert_eq!(fb.pixel(20, 14), Some(CLR_RED));
        // x-major line plots one pixel per column
        assert_eq!(fb.count(CLR_RED), 11);
    }

    #[test]
    fn test_line_partially_off_screen() {
        let mut fb = Framebuffer::new();
        fb.line(-5, 0, 5, 0, CLR_LIME);
        assert_eq!(fb.count(CLR_LIME), 6);
    }

    #[test]
    fn test_circle_octant_points() {
        let mut fb = Framebuffer::new();
        fb.circle(50, 50, 10, CLR_CYAN);
        for (x, y) in [(60, 50), (40, 50), (50, 60), (50, 40)] {
            assert_eq!(fb.pixel(x, y), Some(CLR_CYAN), "({x}, {y})");
        }
        assert_eq!(fb.pixel(50, 50), Some(CLR_BLACK));
    }

    #[test]
    fn test_clear_region_clips() {
        let mut fb = Framebuffer::new();
        fb.pixels_mut().fill(CLR_WHITE);
        fb.clear_region(-4, -4, 8, 8);
        assert_eq!(fb.count(CLR_BLACK), 16);
        fb.clear_region(300, 0, 10, 10);
        assert_eq!(fb.count(CLR_BLACK), 16);
        fb.clear();
        assert_eq!(fb.count(CLR_BLACK), SCREEN_PIXELS);
    }

    #[test]
    fn test_polygon_closes() {
        let mut fb = Framebuffer::new();
        fb.polygon(&[(10, 10), (20, 10), (15, 20)], CLR_MAG);
        assert_eq!(fb.pixel(10, 10), Some(CLR_MAG));
        // only the closing edge (15,20)-(10,10) reaches this pixel
        assert_eq!(fb.pixel(13, 15), Some(CLR_MAG));
    }
}
