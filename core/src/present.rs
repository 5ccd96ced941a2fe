//! The boundary to the visible display and the flip that feeds it.

use crate::constants::SCREEN_PIXELS;
use crate::error::FlipError;
use crate::render::Framebuffer;

/// A display with a single visible framebuffer.
pub trait Screen {
    /// Block until the next vertical blank.
    fn wait_for_vblank(&mut self);
    fn visible_mut(&mut self) -> &mut [u16];
}

/// Copy the whole back buffer into the visible buffer.
pub fn flip<S: Screen + ?Sized>(back: &Framebuffer, screen: &mut S) -> Result<(), FlipError> {
    let visible = screen.visible_mut();
    if visible.len() != SCREEN_PIXELS {
        return Err(FlipError::SizeMismatch {
            expected: SCREEN_PIXELS,
            got: visible.len(),
        });
    }
    visible.copy_from_slice(back.pixels());
    Ok(())
}

/// A framebuffer can stand in for the display, e.g. in tests.
impl Screen for Framebuffer {
    fn wait_for_vblank(&mut self) {}

    fn visible_mut(&mut self) -> &mut [u16] {
        self.pixels_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;

    struct ShortScreen([u16; 16]);

    impl Screen for ShortScreen {
        fn wait_for_vblank(&mut self) {}

        fn visible_mut(&mut self) -> &mut [u16] {
            &mut self.0
        }
    }

    #[test]
    fn test_flip_copies_back_buffer() {
        let mut back = Framebuffer::new();
        back.set_pixel(3, 4, CLR_CYAN);
        let mut screen = Framebuffer::new();
        screen.pixels_mut().fill(CLR_WHITE);
        flip(&back, &mut screen).unwrap();
        assert_eq!(screen.pixels(), back.pixels());
    }

    #[test]
    fn test_flip_rejects_wrong_size() {
        let back = Framebuffer::new();
        let mut screen = ShortScreen([CLR_WHITE; 16]);
        assert_eq!(
            flip(&back, &mut screen),
            Err(FlipError::SizeMismatch {
                expected: SCREEN_PIXELS,
                got: 16
            })
        );
        assert!(screen.0.iter().all(|&p| p == CLR_WHITE));
    }
}
