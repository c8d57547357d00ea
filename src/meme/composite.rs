use crate::meme::model::{Color, Size};
use anyhow::{anyhow, Result};
use image::RgbaImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        Self {
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        }
    }
}

/// Tightly packed RGBA8 pixels, row major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RgbaBuffer {
    pub fn new(width: u32, height: u32, fill: Rgba) -> Self {
        let pixels = [fill.r, fill.g, fill.b, fill.a].repeat(width as usize * height as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(anyhow!(
                "pixel buffer for {width}x{height} must hold {expected} bytes, got {}",
                pixels.len()
            ));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        Rgba {
            r: self.pixels[idx],
            g: self.pixels[idx + 1],
            b: self.pixels[idx + 2],
            a: self.pixels[idx + 3],
        }
    }

    /// Top-left `width` x `height` region. Requests larger than the buffer
    /// are limited to the buffer.
    pub fn cropped(&self, width: u32, height: u32) -> Self {
        let width = width.min(self.width);
        let height = height.min(self.height);
        if width == self.width && height == self.height {
            return self.clone();
        }
        if width == 0 || height == 0 {
            return Self {
                width,
                height,
                pixels: Vec::new(),
            };
        }
        let row_bytes = width as usize * 4;
        let stride = self.width as usize * 4;
        let mut pixels = Vec::with_capacity(row_bytes * height as usize);
        for row in self.pixels.chunks_exact(stride).take(height as usize) {
            pixels.extend_from_slice(&row[..row_bytes]);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn into_image(self) -> Result<RgbaImage> {
        let (width, height) = (self.width, self.height);
        RgbaImage::from_raw(width, height, self.pixels)
            .ok_or_else(|| anyhow!("pixel buffer does not match {width}x{height}"))
    }
}

/// Canvas bounds in whole pixels.
pub fn canvas_pixels(canvas: Size) -> (u32, u32) {
    let to_px = |v: f32| if v.is_finite() && v > 0.0 { v.round() as u32 } else { 0 };
    (to_px(canvas.width), to_px(canvas.height))
}

/// Clips a capture to the canvas area. Pixels are copied as-is; nothing is
/// resampled.
pub fn clip_to_canvas(capture: &RgbaBuffer, canvas: Size) -> RgbaBuffer {
    let (width, height) = canvas_pixels(canvas);
    capture.cropped(width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> RgbaBuffer {
        let mut pixels = Vec::new();
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[x as u8, y as u8, 7, 255]);
            }
        }
        RgbaBuffer::from_pixels(width, height, pixels).expect("buffer")
    }

    #[test]
    fn from_pixels_rejects_wrong_length() {
        assert!(RgbaBuffer::from_pixels(2, 2, vec![0; 15]).is_err());
        assert!(RgbaBuffer::from_pixels(2, 2, vec![0; 16]).is_ok());
    }

    #[test]
    fn clipping_keeps_top_left_pixels_untouched() {
        let capture = gradient(6, 5);
        let clipped = clip_to_canvas(&capture, Size::new(4.0, 3.0));
        assert_eq!((clipped.width, clipped.height), (4, 3));
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(clipped.pixel(x, y), capture.pixel(x, y));
            }
        }
    }

    #[test]
    fn clipping_never_grows_the_capture() {
        let capture = gradient(3, 3);
        assert_eq!(clip_to_canvas(&capture, Size::new(10.0, 10.0)), capture);
        assert!(clip_to_canvas(&capture, Size::new(f32::NAN, 2.0)).is_empty());
    }

    #[test]
    fn indexing_uses_wide_arithmetic() {
        // Wide rows: offsets past u16 range index correctly.
        let flat = RgbaBuffer {
            width: 70_000,
            height: 0,
            pixels: Vec::new(),
        };
        assert!(flat.is_empty());
        let empty = RgbaBuffer::new(70_000, 0, Rgba::TRANSPARENT);
        assert!(empty.pixels.is_empty());

        let mut pixels = vec![0u8; 70_000 * 4];
        pixels[69_999 * 4..].copy_from_slice(&[1, 2, 3, 4]);
        let row = RgbaBuffer::from_pixels(70_000, 1, pixels).expect("buffer");
        assert_eq!(row.pixel(69_999, 0), Rgba { r: 1, g: 2, b: 3, a: 4 });
    }

    #[test]
    fn fill_uses_color() {
        let buffer = RgbaBuffer::new(2, 1, Color::rgb(1, 2, 3).into());
        assert_eq!(buffer.pixels, vec![1, 2, 3, 255, 1, 2, 3, 255]);
        let image = buffer.into_image().expect("image");
        assert_eq!(image.dimensions(), (2, 1));
    }
}
