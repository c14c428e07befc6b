//! Per-face preparation: orientation and channel rewrites.
//!
//! Each face is oriented (flip/flop) and swizzled before mipmap generation,
//! so every level inherits the rewrite. The channel rewrites are mutually
//! exclusive, first match wins:
//!
//! - YYYX: `(R,G,B,A) <- (G,G,G,R)`, for DXT5nm normal maps
//! - ZYZX: `(R,G,B,A) <- (B,G,B,R)`, for DXT5nm+z normal maps
//! - otherwise, under compression: swap R and B so the buffer carries the
//!   B,G,R,A byte order the block compressor consumes

use image::imageops;
use image::RgbaImage;

use crate::dds::types::{BuildFlags, BuildOptions};
use crate::image_data::ImageData;

/// Orient and swizzle one face, yielding the buffer the mipmap loop feeds on.
pub(crate) fn prepare_face(face: &ImageData, options: &BuildOptions) -> RgbaImage {
    let mut image = RgbaImage::from_raw(face.width(), face.height(), face.pixels().to_vec())
        .expect("ImageData buffer length matches its dimensions");

    if options.flags.contains(BuildFlags::FLIP) {
        imageops::flip_vertical_in_place(&mut image);
    }
    if options.flags.contains(BuildFlags::FLOP) {
        imageops::flip_horizontal_in_place(&mut image);
    }

    if options.flags.contains(BuildFlags::YYYX) {
        swizzle_yyyx(&mut image);
    } else if options.flags.contains(BuildFlags::ZYZX) {
        swizzle_zyzx(&mut image);
    } else if options.flags.contains(BuildFlags::COMPRESSION) {
        swap_red_blue(&mut image);
    }

    image
}

/// `(R,G,B,A) <- (G,G,G,R)`: green broadcast to the colour channels, red
/// carried to alpha.
fn swizzle_yyyx(image: &mut RgbaImage) {
    for px in image.chunks_exact_mut(4) {
        px[3] = px[0];
        px[0] = px[1];
        px[2] = px[1];
    }
}

/// `(R,G,B,A) <- (B,G,B,R)`: blue broadcast over red, red carried to alpha.
fn swizzle_zyzx(image: &mut RgbaImage) {
    for px in image.chunks_exact_mut(4) {
        px[3] = px[0];
        px[0] = px[2];
    }
}

fn swap_red_blue(image: &mut RgbaImage) {
    for px in image.chunks_exact_mut(4) {
        px.swap(0, 2);
    }
}
