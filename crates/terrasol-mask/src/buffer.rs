//! The rendered shadow buffer sampled by the evaluator.

use crate::error::MaskError;

/// Per-pixel lit/shadowed classification of a rendered frame.
///
/// Produced by the shadow render pass; `true` means the pixel is outside the
/// shadow map's occluded region (directly sunlit).
#[derive(Clone, Debug, PartialEq)]
pub struct ShadowBuffer {
    width: u32,
    height: u32,
    lit: Vec<bool>,
}

impl ShadowBuffer {
    /// Create a buffer with every pixel in the given state.
    pub fn filled(width: u32, height: u32, lit: bool) -> Result<Self, MaskError> {
        if width == 0 || height == 0 {
            return Err(MaskError::EmptyBuffer { width, height });
        }
        Ok(Self {
            width,
            height,
            lit: vec![lit; (width * height) as usize],
        })
    }

    /// Buffer width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Buffer height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the pixel at (x, y) is lit. Out-of-bounds reads count as
    /// shadowed.
    pub fn is_lit(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.lit[(y * self.width + x) as usize]
    }

    /// Set the lit state of a single pixel. Out-of-bounds writes are ignored.
    pub fn set_lit(&mut self, x: u32, y: u32, lit: bool) {
        if x < self.width && y < self.height {
            self.lit[(y * self.width + x) as usize] = lit;
        }
    }

    /// Mark a half-open rectangle `[x0, x1) x [y0, y1)` with the given state.
    pub fn fill_rect(&mut self, x0: u32, y0: u32, x1: u32, y1: u32, lit: bool) {
        for y in y0..y1.min(self.height) {
            for x in x0..x1.min(self.width) {
                self.lit[(y * self.width + x) as usize] = lit;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(
            ShadowBuffer::filled(0, 600, true),
            Err(MaskError::EmptyBuffer { .. })
        ));
    }

    #[test]
    fn test_out_of_bounds_reads_are_shadowed() {
        let buf = ShadowBuffer::filled(4, 4, true).unwrap();
        assert!(buf.is_lit(3, 3));
        assert!(!buf.is_lit(4, 0));
        assert!(!buf.is_lit(0, 4));
    }

    #[test]
    fn test_fill_rect() {
        let mut buf = ShadowBuffer::filled(8, 8, true).unwrap();
        buf.fill_rect(2, 2, 6, 6, false);
        assert!(!buf.is_lit(2, 2));
        assert!(!buf.is_lit(5, 5));
        assert!(buf.is_lit(6, 6));
        assert!(buf.is_lit(1, 1));
    }
}
