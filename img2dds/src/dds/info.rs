//! DDS introspection: header-only inspection of existing files.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::dds::header::DdsHeader;
use crate::dds::types::{DDPF_FOURCC, DDPF_NORMAL, DDSD_MIPMAPCOUNT};
use crate::error::BuildError;

/// Pixel format tag as reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatTag {
    /// Block-compressed or extended format, named by its FourCC.
    FourCc([u8; 4]),
    /// Uncompressed 32-bit pixels.
    Rgba,
    /// Uncompressed pixels at any other bit depth.
    Rgb,
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatTag::FourCc(cc) => write!(f, "{}", String::from_utf8_lossy(cc)),
            FormatTag::Rgba => write!(f, "RGBA"),
            FormatTag::Rgb => write!(f, "RGB "),
        }
    }
}

/// One-line summary of a DDS file: format, geometry, mipmaps, normal-map
/// marker. Produced both by the introspector and as the encoder's build
/// report, so a build and a subsequent inspection agree by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureInfo {
    pub format: FormatTag,
    pub width: u32,
    pub height: u32,
    pub mipmap_count: u32,
    pub normal_map: bool,
}

impl TextureInfo {
    /// Derive the summary from a parsed header.
    pub fn from_header(header: &DdsHeader) -> Self {
        let format = if header.pixel_format.flags & DDPF_FOURCC != 0 {
            FormatTag::FourCc(header.pixel_format.four_cc)
        } else if header.pixel_format.rgb_bit_count == 32 {
            FormatTag::Rgba
        } else {
            FormatTag::Rgb
        };

        // A stored count is only meaningful when the flag says so.
        let mipmap_count = if header.flags & DDSD_MIPMAPCOUNT != 0 {
            header.mipmap_count
        } else {
            1
        };

        Self {
            format,
            width: header.width,
            height: header.height,
            mipmap_count,
            normal_map: header.pixel_format.flags & DDPF_NORMAL != 0,
        }
    }
}

impl fmt::Display for TextureInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  {:>4}x{:<4}  {:>2} mipmaps{}",
            self.format,
            self.width,
            self.height,
            self.mipmap_count,
            if self.normal_map { "  NORMAL_MAP" } else { "" }
        )
    }
}

/// Read and summarize the header of the DDS file at `path`.
///
/// Only the header is parsed; the payload is never touched.
pub fn read_info(path: &Path) -> Result<TextureInfo, BuildError> {
    let file = File::open(path).map_err(|source| BuildError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let header = DdsHeader::read(&mut BufReader::new(file))?;
    Ok(TextureInfo::from_header(&header))
}
