//! DDS (DirectDraw Surface) texture encoding.
//!
//! This module turns prepared [`crate::ImageData`] faces into complete DDS
//! files: the 128-byte legacy header (plus the 20-byte DX10 extension for
//! texture arrays), followed by face-major, mip-level-ascending payload.
//!
//! # Features
//!
//! - **BC1/DXT1 and BC3/DXT5 compression**: selected automatically from the
//!   transparency of the input
//! - **Mipmap generation**: full chain down to 1x1, Catmull-Rom resampled
//! - **Cube maps**: six faces in +x, -x, +y, -y, +z, -z order
//! - **Texture arrays**: any face count, described by a DX10 header
//! - **Swizzles**: YYYX and ZYZX channel rewrites for DXT5nm normal maps
//!
//! # Example
//!
//! ```no_run
//! use img2dds::dds::{BuildFlags, BuildOptions, DdsEncoder};
//! use img2dds::loader;
//!
//! # fn main() -> Result<(), img2dds::BuildError> {
//! let face = loader::load_image("rock.png".as_ref())?;
//!
//! let options = BuildOptions::new(BuildFlags::COMPRESSION | BuildFlags::MIPMAPS);
//! DdsEncoder::new(options).encode_to_file(&[face], "rock.dds".as_ref())?;
//! # Ok(())
//! # }
//! ```
//!
//! # Format Details
//!
//! Uncompressed payloads are written in the canonical DDS byte order
//! B,G,R(,A) with the matching channel masks in the header; opaque inputs
//! drop the alpha channel and are stored at 24 bits per pixel. Compressed
//! payloads use 8-byte (DXT1) or 16-byte (DXT5) blocks per 4x4 pixel group.
//! All header words are little-endian regardless of host byte order.

mod bc;
mod encoder;
mod face;
mod header;
mod info;
mod mipmap;
mod types;

pub use bc::{compress, storage_requirements, CompressFlags};
pub use encoder::DdsEncoder;
pub use header::{DdsHeader, DdsPixelFormat, Dx10Header};
pub use info::{read_info, FormatTag, TextureInfo};
pub use types::{BuildFlags, BuildOptions, SurfaceDesc};

// Mipmap helpers are exposed for callers that size textures ahead of time.
pub use mipmap::{mipmap_count, scaled_size};
