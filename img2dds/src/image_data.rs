//! Raster pixel container and image classification.
//!
//! [`ImageData`] owns a decoded RGBA8 pixel buffer together with basic
//! metadata (dimensions, transparency, normal-map marker). It is the unit
//! the DDS encoder consumes: one `ImageData` per texture face.

use bitflags::bitflags;

bitflags! {
    /// Metadata flags carried by an [`ImageData`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ImageFlags: u32 {
        /// At least one pixel has a non-opaque alpha value.
        const ALPHA = 0x01;
        /// Source metadata declared this image a normal map.
        const NORMAL = 0x02;
    }
}

impl Default for ImageFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// A decoded raster image.
///
/// Pixels are stored row-major, top-to-bottom, channel order R,G,B,A with
/// rows tightly packed. The buffer length is always exactly
/// `width * height * 4`, or zero for the empty image. Moving an `ImageData`
/// transfers buffer ownership; the moved-from binding is gone, not reusable.
#[derive(Debug, Default)]
pub struct ImageData {
    width: u32,
    height: u32,
    pub flags: ImageFlags,
    pixels: Vec<u8>,
}

impl ImageData {
    /// Create an empty instance. No allocation is performed.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a zero-filled image of the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            flags: ImageFlags::empty(),
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Create an image from an existing RGBA8 buffer.
    ///
    /// Returns `None` if the buffer length does not match the dimensions.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if pixels.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            flags: ImageFlags::empty(),
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// True iff this holds no pixel data.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// The raw RGBA8 pixel buffer.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Consume the image, returning its pixel buffer.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Check if any non-opaque pixel is present and update the ALPHA flag
    /// accordingly. Idempotent.
    pub fn determine_alpha(&mut self) {
        self.flags.remove(ImageFlags::ALPHA);
        if self.pixels.chunks_exact(4).any(|px| px[3] != 255) {
            self.flags.insert(ImageFlags::ALPHA);
        }
    }

    /// Guess whether the image is a normal map.
    ///
    /// Normal maps store unit vectors biased by one half, so every pixel
    /// should decode to a vector of roughly unit length with near-opaque
    /// alpha, and the average color should sit near `#8080ff`. Both
    /// conditions must hold; an empty image is never a normal map.
    pub fn is_normal_map(&self) -> bool {
        if self.is_empty() {
            return false;
        }

        let mut sum = [0.0f32; 3];

        for px in self.pixels.chunks_exact(4) {
            let c = [
                px[0] as f32 / 255.0 - 0.5,
                px[1] as f32 / 255.0 - 0.5,
                px[2] as f32 / 255.0 - 0.5,
            ];
            let a = px[3] as f32 / 255.0;

            let c_sq = c[0] * c[0] + c[1] * c[1] + c[2] * c[2];
            if (1.0 - c_sq).abs() > 0.8 || a < 0.9 {
                return false;
            }

            sum[0] += c[0];
            sum[1] += c[1];
            sum[2] += c[2];
        }

        let n = (self.width * self.height) as f32;
        let avg = [sum[0] / n, sum[1] / n, sum[2] / n - 0.5];

        avg[0] * avg[0] + avg[1] * avg[1] + avg[2] * avg[2] < 0.1
    }
}
