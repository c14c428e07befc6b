//! Image loading with MBM fallback.
//!
//! The loader first hands the file to the general raster decoder (the
//! `image` crate), which recognizes PNG, JPEG, TGA, BMP and friends by
//! content. When that fails, the legacy MBM container is tried before the
//! input is rejected.
//!
//! The raster decoder keeps no process-wide state, so there is no
//! init/teardown pairing to observe; loading is a pure function of the
//! file contents.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::error::BuildError;
use crate::image_data::{ImageData, ImageFlags};

/// Magic number of the MBM container, little-endian on disk.
const MBM_MAGIC: u32 = 0x5053_4B03;

/// Load an image file into an RGBA8 [`ImageData`].
///
/// Transparency is detected by scanning the decoded alpha channel. MBM
/// inputs additionally carry a normal-map marker which is mapped to
/// [`ImageFlags::NORMAL`].
///
/// # Errors
///
/// [`BuildError::Open`] if the file cannot be read,
/// [`BuildError::Decode`] if neither the raster decoder nor the MBM
/// fallback recognize it.
pub fn load_image(path: &Path) -> Result<ImageData, BuildError> {
    match image::open(path) {
        Ok(decoded) => {
            let rgba = decoded.to_rgba8();
            let (width, height) = rgba.dimensions();
            debug!(?path, width, height, "decoded raster image");

            let mut image = ImageData::from_rgba8(width, height, rgba.into_raw())
                .expect("RgbaImage buffer length matches its dimensions");
            image.determine_alpha();
            Ok(image)
        }
        Err(_) => {
            let file = File::open(path).map_err(|source| BuildError::Open {
                path: path.to_path_buf(),
                source,
            })?;

            debug!(?path, "raster decode failed, trying MBM container");
            decode_mbm(BufReader::new(file)).map_err(|err| match err {
                // An unrecognized magic means the input is simply not an
                // image; I/O errors mid-stream are surfaced as such.
                BuildError::BadHeader(_) => BuildError::Decode {
                    path: path.to_path_buf(),
                },
                other => other,
            })
        }
    }
}

/// Decode the legacy MBM container.
///
/// Layout: u32 magic, u32 width, u32 height, u32 type (non-zero marks a
/// normal map), u32 bpp (24 or 32), all little-endian, followed by pixel
/// rows stored bottom-to-top in R,G,B(,A) order. The decoded image is the
/// vertical reflection of the stored rows; a missing alpha channel is
/// implied opaque.
pub fn decode_mbm<R: Read>(mut reader: R) -> Result<ImageData, BuildError> {
    let magic = read_u32_le(&mut reader)?;
    if magic != MBM_MAGIC {
        return Err(BuildError::BadHeader(magic.to_le_bytes()));
    }

    let width = read_u32_le(&mut reader)?;
    let height = read_u32_le(&mut reader)?;
    let kind = read_u32_le(&mut reader)?;
    let bpp = read_u32_le(&mut reader)?;

    if width == 0 || height == 0 || !matches!(bpp, 24 | 32) {
        return Err(BuildError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("invalid MBM geometry: {}x{} at {} bpp", width, height, bpp),
        )));
    }

    let mut image = ImageData::new(width, height);
    if kind != 0 {
        image.flags.insert(ImageFlags::NORMAL);
    }

    let channels = (bpp / 8) as usize;
    let mut row = vec![0u8; width as usize * channels];
    let mut has_alpha = false;

    // Rows are stored bottom-to-top; fill the buffer from the last row up.
    for y in (0..height as usize).rev() {
        reader.read_exact(&mut row)?;

        let stride = width as usize * 4;
        let dest = &mut image.pixels_mut()[y * stride..(y + 1) * stride];
        for (src, dst) in row.chunks_exact(channels).zip(dest.chunks_exact_mut(4)) {
            dst[0] = src[0];
            dst[1] = src[1];
            dst[2] = src[2];
            dst[3] = if channels == 4 { src[3] } else { 255 };
            has_alpha |= dst[3] != 255;
        }
    }

    if has_alpha {
        image.flags.insert(ImageFlags::ALPHA);
    }

    debug!(width, height, bpp, normal = kind != 0, "decoded MBM image");
    Ok(image)
}

fn read_u32_le<R: Read>(reader: &mut R) -> Result<u32, BuildError> {
    let mut buffer = [0u8; 4];
    reader.read_exact(&mut buffer)?;
    Ok(u32::from_le_bytes(buffer))
}
