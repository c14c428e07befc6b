//! DDS encoder: turns prepared faces into a complete DDS file.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use image::RgbaImage;
use tracing::debug;

use crate::dds::bc::{self, CompressFlags};
use crate::dds::face::prepare_face;
use crate::dds::header::DdsHeader;
use crate::dds::info::TextureInfo;
use crate::dds::mipmap::{level_size, mipmap_count, resample, scaled_size};
use crate::dds::types::{BuildFlags, BuildOptions, SurfaceDesc};
use crate::error::BuildError;
use crate::image_data::{ImageData, ImageFlags};

/// Compressor flag set used for every build: the strongest colour fit,
/// alpha-weighted, format selected by transparency.
pub(crate) fn compression_flags(has_alpha: bool) -> CompressFlags {
    let format = if has_alpha {
        CompressFlags::DXT5
    } else {
        CompressFlags::DXT1
    };
    CompressFlags::ITERATIVE_CLUSTER_FIT | CompressFlags::WEIGHT_COLOUR_BY_ALPHA | format
}

/// DDS encoder configured by [`BuildOptions`].
///
/// One encoder value can serve any number of builds; each build is a pure
/// function of the faces, the options and nothing else.
pub struct DdsEncoder {
    options: BuildOptions,
}

impl DdsEncoder {
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    /// Encode `faces` into `writer` and return the build summary.
    ///
    /// An array texture is created when more than one face is given unless
    /// [`BuildFlags::CUBE_MAP`] is set, in which case exactly 6 faces are
    /// required, ordered +x, -x, +y, -y, +z, -z.
    ///
    /// On error the writer may have received a partial file.
    pub fn encode<W: Write>(
        &self,
        faces: &[ImageData],
        writer: &mut W,
    ) -> Result<TextureInfo, BuildError> {
        let desc = self.describe(faces)?;
        let header = DdsHeader::new(&desc);

        debug!(
            width = desc.width,
            height = desc.height,
            faces = desc.n_faces,
            mipmaps = desc.mipmap_count,
            compressed = desc.compressed,
            "writing DDS"
        );

        writer.write_all(&header.to_bytes())?;
        for face in faces {
            self.write_face(face, &desc, writer)?;
        }

        Ok(TextureInfo::from_header(&header))
    }

    /// Encode `faces` into the file at `path`, creating or truncating it.
    ///
    /// The file is flushed on success. A failed build may leave a partial
    /// file behind; the error return invalidates it.
    pub fn encode_to_file(
        &self,
        faces: &[ImageData],
        path: &Path,
    ) -> Result<TextureInfo, BuildError> {
        let file = File::create(path).map_err(|source| BuildError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut writer = BufWriter::new(file);
        let info = self.encode(faces, &mut writer)?;
        writer.flush()?;
        Ok(info)
    }

    /// Validate the face set and derive the output geometry and format.
    fn describe(&self, faces: &[ImageData]) -> Result<SurfaceDesc, BuildError> {
        let first = faces.first().ok_or(BuildError::EmptyFaces)?;
        let flags = self.options.flags;

        for face in &faces[1..] {
            if face.width() != first.width() || face.height() != first.height() {
                return Err(BuildError::ShapeMismatch {
                    expected_width: first.width(),
                    expected_height: first.height(),
                    width: face.width(),
                    height: face.height(),
                });
            }
        }

        let cube_map = flags.contains(BuildFlags::CUBE_MAP);
        if cube_map && faces.len() != 6 {
            return Err(BuildError::CubeArity(faces.len()));
        }

        let (width, height) = scaled_size(first.width(), first.height(), self.options.scale);

        // The swizzles repurpose alpha as a data channel, so they force it on.
        let has_alpha = first.flags.contains(ImageFlags::ALPHA)
            || flags.intersects(BuildFlags::YYYX | BuildFlags::ZYZX);
        let compressed = flags.contains(BuildFlags::COMPRESSION);
        let is_array = !cube_map && faces.len() > 1;

        let mipmaps = flags.contains(BuildFlags::MIPMAPS);
        Ok(SurfaceDesc {
            width,
            height,
            bpp: if has_alpha || compressed || is_array { 32 } else { 24 },
            mipmap_count: if mipmaps { mipmap_count(width, height) } else { 1 },
            mipmaps,
            n_faces: faces.len() as u32,
            has_alpha,
            compressed,
            cube_map,
            normal_map: flags.contains(BuildFlags::NORMAL_MAP),
        })
    }

    /// Emit one face: level 0 through the last mip, no padding in between.
    fn write_face<W: Write>(
        &self,
        face: &ImageData,
        desc: &SurfaceDesc,
        writer: &mut W,
    ) -> Result<(), BuildError> {
        let oriented = prepare_face(face, &self.options);

        // Every level resamples from level 0, never from the previous
        // level, so filter error does not accumulate.
        let level0 = if oriented.dimensions() != (desc.width, desc.height) {
            resample(&oriented, desc.width, desc.height)
        } else {
            oriented
        };

        for level in 0..desc.mipmap_count {
            let (width, height) = level_size(desc.width, desc.height, level);
            let scaled;
            let image = if level == 0 {
                &level0
            } else {
                scaled = resample(&level0, width, height);
                &scaled
            };

            if desc.compressed {
                let blocks = bc::compress(
                    image.as_raw(),
                    width,
                    height,
                    compression_flags(desc.has_alpha),
                );
                writer.write_all(&blocks)?;
            } else {
                write_scanlines(writer, image, desc.bpp)?;
            }
        }

        Ok(())
    }
}

/// Write the raster as tightly packed B,G,R(,A) scanlines.
fn write_scanlines<W: Write>(writer: &mut W, image: &RgbaImage, bpp: u32) -> io::Result<()> {
    let channels = (bpp / 8) as usize;
    let width = image.width() as usize;
    let mut row = vec![0u8; width * channels];

    for scanline in image.as_raw().chunks_exact(width * 4) {
        for (src, dst) in scanline.chunks_exact(4).zip(row.chunks_exact_mut(channels)) {
            dst[0] = src[2];
            dst[1] = src[1];
            dst[2] = src[0];
            if channels == 4 {
                dst[3] = src[3];
            }
        }
        writer.write_all(&row)?;
    }

    Ok(())
}
