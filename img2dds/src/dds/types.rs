//! DDS format constants and build configuration.

use bitflags::bitflags;

bitflags! {
    /// Per-build option bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BuildFlags: u32 {
        /// The face array is a cube map (requires exactly 6 faces).
        const CUBE_MAP = 0x01;
        /// Mark the output as a normal map (DDPF_NORMAL).
        const NORMAL_MAP = 0x02;
        /// Generate the full mipmap chain down to 1x1.
        const MIPMAPS = 0x04;
        /// Apply S3 block compression (DXT1 opaque, DXT5 with alpha).
        const COMPRESSION = 0x08;
        /// Flip each face vertically before encoding.
        const FLIP = 0x10;
        /// Flip each face horizontally before encoding.
        const FLOP = 0x20;
        /// RGB(A) -> GGGR swizzle for DXT5nm normal map compression.
        const YYYX = 0x40;
        /// RGB(A) -> BGBR swizzle for DXT5nm+z normal map compression.
        const ZYZX = 0x80;
    }
}

/// Immutable per-build configuration.
#[derive(Debug, Clone, Copy)]
pub struct BuildOptions {
    pub flags: BuildFlags,
    /// Uniform scale applied to the face dimensions, default 1.0.
    pub scale: f64,
}

impl BuildOptions {
    pub fn new(flags: BuildFlags) -> Self {
        Self { flags, scale: 1.0 }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self::new(BuildFlags::empty())
    }
}

/// Geometry and format of one build, computed before any byte is written.
///
/// This is the single input of the header emitter and the payload loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceDesc {
    /// Output width (scale already applied).
    pub width: u32,
    /// Output height (scale already applied).
    pub height: u32,
    /// Bits per pixel of the uncompressed payload (24 or 32).
    pub bpp: u32,
    /// Number of mipmap levels per face (1 = no mipmaps).
    pub mipmap_count: u32,
    /// Mipmaps were requested; drives the MIPMAPCOUNT flag and caps bits
    /// even when the chain collapses to a single level.
    pub mipmaps: bool,
    /// Number of faces.
    pub n_faces: u32,
    /// Any face has non-opaque alpha, or a swizzle forced alpha on.
    pub has_alpha: bool,
    pub compressed: bool,
    pub cube_map: bool,
    pub normal_map: bool,
}

impl SurfaceDesc {
    /// A non-cube build with more than one face is a texture array and is
    /// described by a DX10 extension header.
    pub fn is_array(&self) -> bool {
        !self.cube_map && self.n_faces > 1
    }
}

// DDS header flags (DDSD_*), per the Microsoft DDS specification:
// https://learn.microsoft.com/en-us/windows/win32/direct3ddds/dds-header
pub const DDSD_CAPS: u32 = 0x1;
pub const DDSD_HEIGHT: u32 = 0x2;
pub const DDSD_WIDTH: u32 = 0x4;
pub const DDSD_PITCH: u32 = 0x8;
pub const DDSD_PIXELFORMAT: u32 = 0x1000;
pub const DDSD_MIPMAPCOUNT: u32 = 0x20000;
pub const DDSD_LINEARSIZE: u32 = 0x80000;

// DDS caps flags (DDSCAPS_*)
pub const DDSCAPS_COMPLEX: u32 = 0x8;
pub const DDSCAPS_TEXTURE: u32 = 0x1000;
pub const DDSCAPS_MIPMAP: u32 = 0x400000;

// DDS caps2 cube map flags (DDSCAPS2_*)
pub const DDSCAPS2_CUBEMAP: u32 = 0x200;
pub const DDSCAPS2_CUBEMAP_POSITIVEX: u32 = 0x400;
pub const DDSCAPS2_CUBEMAP_NEGATIVEX: u32 = 0x800;
pub const DDSCAPS2_CUBEMAP_POSITIVEY: u32 = 0x1000;
pub const DDSCAPS2_CUBEMAP_NEGATIVEY: u32 = 0x2000;
pub const DDSCAPS2_CUBEMAP_POSITIVEZ: u32 = 0x4000;
pub const DDSCAPS2_CUBEMAP_NEGATIVEZ: u32 = 0x8000;

/// All six cube face bits. Direct3D 10+ requires complete cube maps.
pub const DDSCAPS2_CUBEMAP_ALL_FACES: u32 = DDSCAPS2_CUBEMAP_POSITIVEX
    | DDSCAPS2_CUBEMAP_NEGATIVEX
    | DDSCAPS2_CUBEMAP_POSITIVEY
    | DDSCAPS2_CUBEMAP_NEGATIVEY
    | DDSCAPS2_CUBEMAP_POSITIVEZ
    | DDSCAPS2_CUBEMAP_NEGATIVEZ;

// DDS pixel format flags (DDPF_*)
pub const DDPF_ALPHAPIXELS: u32 = 0x1;
pub const DDPF_FOURCC: u32 = 0x4;
pub const DDPF_RGB: u32 = 0x40;
/// Non-standard marker used by engines to tag normal-map textures.
pub const DDPF_NORMAL: u32 = 0x8000_0000;

// DXGI formats used by the DX10 extension header.
pub const DXGI_FORMAT_R8G8B8A8_UNORM: u32 = 28;
pub const DXGI_FORMAT_BC1_UNORM: u32 = 71;
pub const DXGI_FORMAT_BC3_UNORM: u32 = 77;

pub const D3D10_RESOURCE_DIMENSION_TEXTURE2D: u32 = 3;

// Canonical channel masks for uncompressed payload: bytes on disk are
// B,G,R(,A), so red occupies bits 16..24 of the little-endian pixel word.
pub const RGB_MASK_RED: u32 = 0x00FF0000;
pub const RGB_MASK_GREEN: u32 = 0x0000FF00;
pub const RGB_MASK_BLUE: u32 = 0x000000FF;
pub const RGB_MASK_ALPHA: u32 = 0xFF000000;
