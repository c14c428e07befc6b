//! img2dds - Image to DDS texture builder
//!
//! This library converts conventional images (PNG, JPEG, TGA, BMP, ... via
//! the `image` crate) and the legacy MBM container into DDS (DirectDraw
//! Surface) textures, optionally applying S3 block compression and
//! generating mipmap pyramids.
//!
//! # High-Level API
//!
//! ```no_run
//! use img2dds::dds::{BuildFlags, BuildOptions, DdsEncoder};
//! use img2dds::loader;
//!
//! # fn main() -> Result<(), img2dds::BuildError> {
//! let image = loader::load_image("texture.png".as_ref())?;
//!
//! let options = BuildOptions::new(BuildFlags::COMPRESSION | BuildFlags::MIPMAPS);
//! let encoder = DdsEncoder::new(options);
//! let info = encoder.encode_to_file(&[image], "texture.dds".as_ref())?;
//!
//! println!("{}", info);
//! # Ok(())
//! # }
//! ```
//!
//! A texture array is created when more than one face is given. If exactly
//! six faces are given together with [`dds::BuildFlags::CUBE_MAP`], a cube
//! map is generated; faces must be ordered +x, -x, +y, -y, +z, -z.

pub mod dds;
pub mod error;
pub mod image_data;
pub mod loader;

pub use error::BuildError;
pub use image_data::{ImageData, ImageFlags};

/// Version of the img2dds library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
