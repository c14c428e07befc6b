//! Mipmap geometry and resampling.
//!
//! Every level of the pyramid is resampled from the full-resolution level 0
//! image rather than from the previous level, so filter error does not
//! accumulate down the chain. Resampling uses a Catmull-Rom filter.

use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Number of levels of a full chain down to 1x1:
/// `floor(log2(max(width, height))) + 1`.
pub fn mipmap_count(width: u32, height: u32) -> u32 {
    width.max(height).max(1).ilog2() + 1
}

/// Output dimensions after applying the build scale, clamped to 1x1.
///
/// Rounds half away from zero, matching `lround`.
pub fn scaled_size(width: u32, height: u32, scale: f64) -> (u32, u32) {
    let w = (width as f64 * scale).round() as u32;
    let h = (height as f64 * scale).round() as u32;
    (w.max(1), h.max(1))
}

/// Dimensions of mip level `level` for a level-0 size of `width` x `height`.
pub fn level_size(width: u32, height: u32, level: u32) -> (u32, u32) {
    ((width >> level).max(1), (height >> level).max(1))
}

/// Catmull-Rom resample to the given dimensions.
pub fn resample(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    imageops::resize(image, width, height, FilterType::CatmullRom)
}
