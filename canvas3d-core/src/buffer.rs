/// RGBA pixel buffers for frames and textures
use crate::error::BufferError;

/// Row-major RGBA buffer, 4 bytes per pixel.
///
/// `get_pixel` and `set_pixel` address rows from the bottom: `y = 0` is the
/// last stored row. [`PixelBuffer::pixels`] exposes the storage in the usual
/// top-down order for presenting or encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Fully transparent black buffer.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height * 4],
        }
    }

    /// Buffer where every pixel is `rgba`.
    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> Self {
        let mut buffer = Self::new(width, height);
        buffer.clear(rgba);
        buffer
    }

    /// Wrap decoded top-down RGBA data, e.g. an image file's pixels.
    pub fn from_rgba(width: usize, height: usize, pixels: Vec<u8>) -> Result<Self, BufferError> {
        let expected = width * height * 4;
        if pixels.len() != expected {
            return Err(BufferError {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw storage, top row first.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn clear(&mut self, rgba: [u8; 4]) {
        for pixel in self.pixels.chunks_exact_mut(4) {
            pixel.copy_from_slice(&rgba);
        }
    }

    /// Byte offset of a bottom-up coordinate, `None` when outside the buffer.
    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        let row = self.height - 1 - y;
        Some((row * self.width + x) * 4)
    }

    /// RGB at a bottom-up coordinate, `None` when outside the buffer.
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<[u8; 3]> {
        self.offset(x, y)
            .map(|i| [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]])
    }

    /// RGB at a bottom-up coordinate, clamped to the nearest edge pixel.
    ///
    /// Returns black for an empty buffer.
    pub fn get_pixel_clamped(&self, x: i32, y: i32) -> [u8; 3] {
        if self.width == 0 || self.height == 0 {
            return [0, 0, 0];
        }
        let x = x.clamp(0, self.width as i32 - 1);
        let y = y.clamp(0, self.height as i32 - 1);
        self.get_pixel(x, y).unwrap_or([0, 0, 0])
    }

    /// Write an opaque pixel at a bottom-up coordinate.
    ///
    /// Returns `false` and writes nothing when outside the buffer.
    pub fn set_pixel(&mut self, x: i32, y: i32, rgb: [u8; 3]) -> bool {
        match self.offset(x, y) {
            Some(i) => {
                self.pixels[i..i + 3].copy_from_slice(&rgb);
                self.pixels[i + 3] = 255;
                true
            }
            None => false,
        }
    }

    /// RGBA in storage order (`row` counts from the top).
    pub fn rgba_at_row(&self, x: usize, row: usize) -> Option<[u8; 4]> {
        if x >= self.width || row >= self.height {
            return None;
        }
        let i = (row * self.width + x) * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bottom_up_addressing() {
        let mut buffer = PixelBuffer::new(4, 3);
        assert!(buffer.set_pixel(1, 0, [10, 20, 30]));

        // y = 0 is the last stored row
        assert_eq!(buffer.rgba_at_row(1, 2), Some([10, 20, 30, 255]));
        assert_eq!(buffer.get_pixel(1, 0), Some([10, 20, 30]));
        assert_eq!(buffer.rgba_at_row(1, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_out_of_bounds_is_ignored() {
        let mut buffer = PixelBuffer::new(2, 2);
        assert!(!buffer.set_pixel(-1, 0, [1, 1, 1]));
        assert!(!buffer.set_pixel(0, 2, [1, 1, 1]));
        assert!(!buffer.set_pixel(2, 0, [1, 1, 1]));
        assert_eq!(buffer.get_pixel(5, 5), None);
        assert!(buffer.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_clamped_read() {
        let mut buffer = PixelBuffer::new(2, 2);
        buffer.set_pixel(1, 1, [9, 8, 7]);
        assert_eq!(buffer.get_pixel_clamped(40, 40), [9, 8, 7]);
        assert_eq!(PixelBuffer::new(0, 0).get_pixel_clamped(0, 0), [0, 0, 0]);
    }

    #[test]
    fn test_from_rgba_checks_length() {
        assert!(PixelBuffer::from_rgba(2, 2, vec![0; 16]).is_ok());
        assert_eq!(
            PixelBuffer::from_rgba(2, 2, vec![0; 15]),
            Err(BufferError {
                expected: 16,
                actual: 15
            })
        );
    }
}
