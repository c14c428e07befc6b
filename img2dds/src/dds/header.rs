//! DDS header construction, serialization and parsing.
//!
//! Layout per the Microsoft DDS specification:
//! https://learn.microsoft.com/en-us/windows/win32/direct3ddds/dds-header

use std::io::Read;

use crate::dds::bc;
use crate::dds::encoder::compression_flags;
use crate::dds::types::*;
use crate::error::BuildError;

/// The magic bytes at the start of every DDS file.
pub const DDS_MAGIC: [u8; 4] = *b"DDS ";

/// Size of the header structure, excluding magic.
const HEADER_SIZE: u32 = 124;
/// Size of the pixel format structure embedded in the header.
const PIXEL_FORMAT_SIZE: u32 = 32;

/// DDS file header: 4 magic bytes plus the 124-byte structure, optionally
/// followed by the 20-byte DX10 extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdsHeader {
    /// Flags indicating which fields are valid.
    pub flags: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Surface width in pixels.
    pub width: u32,
    /// Scanline pitch for uncompressed surfaces, level-0 byte size for
    /// compressed ones.
    pub pitch_or_linear_size: u32,
    /// Depth for volume textures; always 0 here.
    pub depth: u32,
    /// Number of mipmap levels.
    pub mipmap_count: u32,
    /// Pixel format structure.
    pub pixel_format: DdsPixelFormat,
    /// Surface complexity capabilities.
    pub caps: u32,
    /// Cube map face capabilities.
    pub caps2: u32,
    /// DX10 extension, present iff the FourCC reads `DX10`.
    pub dx10: Option<Dx10Header>,
}

/// DDS pixel format structure (32 bytes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdsPixelFormat {
    pub flags: u32,
    pub four_cc: [u8; 4],
    pub rgb_bit_count: u32,
    pub r_bit_mask: u32,
    pub g_bit_mask: u32,
    pub b_bit_mask: u32,
    pub a_bit_mask: u32,
}

/// DX10 extension header (20 bytes), required for texture arrays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dx10Header {
    pub dxgi_format: u32,
    pub resource_dimension: u32,
    pub misc_flag: u32,
    pub array_size: u32,
    pub misc_flags2: u32,
}

impl DdsHeader {
    /// Build the header for a described surface.
    pub fn new(desc: &SurfaceDesc) -> Self {
        let mut flags = DDSD_CAPS | DDSD_HEIGHT | DDSD_WIDTH | DDSD_PIXELFORMAT;
        flags |= if desc.mipmaps { DDSD_MIPMAPCOUNT } else { 0 };
        flags |= if desc.compressed { DDSD_LINEARSIZE } else { DDSD_PITCH };

        let pitch_or_linear_size = if desc.compressed {
            bc::storage_requirements(desc.width, desc.height, compression_flags(desc.has_alpha))
                as u32
        } else {
            // Scanline width in bytes, aligned up to 4.
            (desc.width * desc.bpp / 8 + 3) / 4 * 4
        };

        let mut caps = DDSCAPS_TEXTURE;
        caps |= if desc.mipmaps {
            DDSCAPS_COMPLEX | DDSCAPS_MIPMAP
        } else {
            0
        };
        caps |= if desc.cube_map { DDSCAPS_COMPLEX } else { 0 };

        let caps2 = if desc.cube_map {
            DDSCAPS2_CUBEMAP | DDSCAPS2_CUBEMAP_ALL_FACES
        } else {
            0
        };

        let mut pixel_flags = 0;
        pixel_flags |= if desc.has_alpha { DDPF_ALPHAPIXELS } else { 0 };
        pixel_flags |= if desc.compressed { DDPF_FOURCC } else { DDPF_RGB };
        pixel_flags |= if desc.normal_map { DDPF_NORMAL } else { 0 };

        let four_cc: [u8; 4] = if desc.is_array() {
            *b"DX10"
        } else if desc.compressed {
            if desc.has_alpha {
                *b"DXT5"
            } else {
                *b"DXT1"
            }
        } else {
            [0; 4]
        };

        // Bit counts and masks are meaningless for block-compressed data.
        let pixel_format = if desc.compressed {
            DdsPixelFormat {
                flags: pixel_flags,
                four_cc,
                rgb_bit_count: 0,
                r_bit_mask: 0,
                g_bit_mask: 0,
                b_bit_mask: 0,
                a_bit_mask: 0,
            }
        } else {
            DdsPixelFormat {
                flags: pixel_flags,
                four_cc,
                rgb_bit_count: desc.bpp,
                r_bit_mask: RGB_MASK_RED,
                g_bit_mask: RGB_MASK_GREEN,
                b_bit_mask: RGB_MASK_BLUE,
                a_bit_mask: RGB_MASK_ALPHA,
            }
        };

        let dx10 = desc.is_array().then(|| Dx10Header {
            dxgi_format: if desc.compressed {
                if desc.has_alpha {
                    DXGI_FORMAT_BC3_UNORM
                } else {
                    DXGI_FORMAT_BC1_UNORM
                }
            } else {
                DXGI_FORMAT_R8G8B8A8_UNORM
            },
            resource_dimension: D3D10_RESOURCE_DIMENSION_TEXTURE2D,
            misc_flag: 0,
            array_size: desc.n_faces,
            misc_flags2: 0,
        });

        DdsHeader {
            flags,
            height: desc.height,
            width: desc.width,
            pitch_or_linear_size,
            depth: 0,
            mipmap_count: desc.mipmap_count,
            pixel_format,
            caps,
            caps2,
            dx10,
        }
    }

    /// Serialize to bytes: 128 bytes, or 148 with the DX10 extension.
    /// Every word is written little-endian.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(148);

        bytes.extend_from_slice(&DDS_MAGIC);
        bytes.extend_from_slice(&HEADER_SIZE.to_le_bytes());
        bytes.extend_from_slice(&self.flags.to_le_bytes());
        bytes.extend_from_slice(&self.height.to_le_bytes());
        bytes.extend_from_slice(&self.width.to_le_bytes());
        bytes.extend_from_slice(&self.pitch_or_linear_size.to_le_bytes());
        bytes.extend_from_slice(&self.depth.to_le_bytes());
        bytes.extend_from_slice(&self.mipmap_count.to_le_bytes());

        // Reserved int[11].
        bytes.extend_from_slice(&[0u8; 44]);

        bytes.extend_from_slice(&PIXEL_FORMAT_SIZE.to_le_bytes());
        bytes.extend_from_slice(&self.pixel_format.flags.to_le_bytes());
        bytes.extend_from_slice(&self.pixel_format.four_cc);
        bytes.extend_from_slice(&self.pixel_format.rgb_bit_count.to_le_bytes());
        bytes.extend_from_slice(&self.pixel_format.r_bit_mask.to_le_bytes());
        bytes.extend_from_slice(&self.pixel_format.g_bit_mask.to_le_bytes());
        bytes.extend_from_slice(&self.pixel_format.b_bit_mask.to_le_bytes());
        bytes.extend_from_slice(&self.pixel_format.a_bit_mask.to_le_bytes());

        bytes.extend_from_slice(&self.caps.to_le_bytes());
        bytes.extend_from_slice(&self.caps2.to_le_bytes());
        // caps3, caps4, reserved2.
        bytes.extend_from_slice(&[0u8; 12]);

        if let Some(dx10) = &self.dx10 {
            bytes.extend_from_slice(&dx10.dxgi_format.to_le_bytes());
            bytes.extend_from_slice(&dx10.resource_dimension.to_le_bytes());
            bytes.extend_from_slice(&dx10.misc_flag.to_le_bytes());
            bytes.extend_from_slice(&dx10.array_size.to_le_bytes());
            bytes.extend_from_slice(&dx10.misc_flags2.to_le_bytes());
        }

        bytes
    }

    /// Parse a header from a reader positioned at the magic bytes.
    ///
    /// The DX10 extension is read whenever the FourCC bytes spell `DX10`,
    /// matching the emitter (uncompressed arrays carry the extension
    /// without the FOURCC pixel-format flag).
    pub fn read<R: Read>(reader: &mut R) -> Result<Self, BuildError> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != DDS_MAGIC {
            return Err(BuildError::BadHeader(magic));
        }

        let words = read_words::<31, R>(reader)?;

        // words[0] is the header size, words[18] the pixel format size;
        // both are fixed by the format and not worth rejecting on.
        let mut four_cc = [0u8; 4];
        four_cc.copy_from_slice(&words[20].to_le_bytes());

        let pixel_format = DdsPixelFormat {
            flags: words[19],
            four_cc,
            rgb_bit_count: words[21],
            r_bit_mask: words[22],
            g_bit_mask: words[23],
            b_bit_mask: words[24],
            a_bit_mask: words[25],
        };

        let dx10 = if &four_cc == b"DX10" {
            let ext = read_words::<5, R>(reader)?;
            Some(Dx10Header {
                dxgi_format: ext[0],
                resource_dimension: ext[1],
                misc_flag: ext[2],
                array_size: ext[3],
                misc_flags2: ext[4],
            })
        } else {
            None
        };

        Ok(DdsHeader {
            flags: words[1],
            height: words[2],
            width: words[3],
            pitch_or_linear_size: words[4],
            depth: words[5],
            mipmap_count: words[6],
            pixel_format,
            caps: words[26],
            caps2: words[27],
            dx10,
        })
    }
}

fn read_words<const N: usize, R: Read>(reader: &mut R) -> Result<[u32; N], BuildError> {
    let mut buffer = [0u8; 4];
    let mut words = [0u32; N];
    for word in &mut words {
        reader.read_exact(&mut buffer)?;
        *word = u32::from_le_bytes(buffer);
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_desc() -> SurfaceDesc {
        SurfaceDesc {
            width: 256,
            height: 256,
            bpp: 24,
            mipmap_count: 1,
            mipmaps: false,
            n_faces: 1,
            has_alpha: false,
            compressed: false,
            cube_map: false,
            normal_map: false,
        }
    }

    #[test]
    fn test_plain_header_flags() {
        let header = DdsHeader::new(&plain_desc());
        assert_eq!(
            header.flags,
            DDSD_CAPS | DDSD_HEIGHT | DDSD_WIDTH | DDSD_PIXELFORMAT | DDSD_PITCH
        );
        assert_eq!(header.caps, DDSCAPS_TEXTURE);
        assert_eq!(header.caps2, 0);
        assert!(header.dx10.is_none());
    }

    #[test]
    fn test_uncompressed_pitch_is_4_byte_aligned() {
        let mut desc = plain_desc();

        desc.width = 4;
        assert_eq!(DdsHeader::new(&desc).pitch_or_linear_size, 12);

        // 3 pixels at 24 bpp is 9 bytes, aligned up to 12.
        desc.width = 3;
        assert_eq!(DdsHeader::new(&desc).pitch_or_linear_size, 12);

        desc.width = 5;
        desc.bpp = 32;
        assert_eq!(DdsHeader::new(&desc).pitch_or_linear_size, 20);
    }

    #[test]
    fn test_compressed_header_linear_size() {
        let mut desc = plain_desc();
        desc.compressed = true;
        desc.bpp = 32;

        let header = DdsHeader::new(&desc);
        assert_eq!(header.flags & DDSD_LINEARSIZE, DDSD_LINEARSIZE);
        assert_eq!(header.flags & DDSD_PITCH, 0);
        // 256x256 as DXT1: 64x64 blocks of 8 bytes.
        assert_eq!(header.pitch_or_linear_size, 32768);
        assert_eq!(&header.pixel_format.four_cc, b"DXT1");
        assert_eq!(header.pixel_format.rgb_bit_count, 0);
        assert_eq!(header.pixel_format.r_bit_mask, 0);
    }

    #[test]
    fn test_compressed_alpha_selects_dxt5() {
        let mut desc = plain_desc();
        desc.compressed = true;
        desc.has_alpha = true;
        desc.bpp = 32;

        let header = DdsHeader::new(&desc);
        assert_eq!(&header.pixel_format.four_cc, b"DXT5");
        // 16-byte blocks double the linear size.
        assert_eq!(header.pitch_or_linear_size, 65536);
        assert_eq!(
            header.pixel_format.flags & DDPF_ALPHAPIXELS,
            DDPF_ALPHAPIXELS
        );
    }

    #[test]
    fn test_mipmap_header_bits() {
        let mut desc = plain_desc();
        desc.mipmaps = true;
        desc.mipmap_count = 9;

        let header = DdsHeader::new(&desc);
        assert_eq!(header.mipmap_count, 9);
        assert_eq!(header.flags & DDSD_MIPMAPCOUNT, DDSD_MIPMAPCOUNT);
        assert_eq!(
            header.caps,
            DDSCAPS_TEXTURE | DDSCAPS_COMPLEX | DDSCAPS_MIPMAP
        );
    }

    #[test]
    fn test_cube_map_caps() {
        let mut desc = plain_desc();
        desc.cube_map = true;
        desc.n_faces = 6;

        let header = DdsHeader::new(&desc);
        assert_eq!(header.caps & DDSCAPS_COMPLEX, DDSCAPS_COMPLEX);
        assert_eq!(header.caps2, 0xFE00);
        // Cube maps are not arrays; no DX10 extension.
        assert!(header.dx10.is_none());
    }

    #[test]
    fn test_array_header_dx10() {
        let mut desc = plain_desc();
        desc.n_faces = 3;
        desc.bpp = 32;

        let header = DdsHeader::new(&desc);
        assert_eq!(&header.pixel_format.four_cc, b"DX10");
        // Uncompressed arrays keep the RGB pixel-format flag and masks.
        assert_eq!(header.pixel_format.flags & DDPF_RGB, DDPF_RGB);
        assert_eq!(header.pixel_format.rgb_bit_count, 32);

        let dx10 = header.dx10.expect("array header carries DX10 extension");
        assert_eq!(dx10.dxgi_format, DXGI_FORMAT_R8G8B8A8_UNORM);
        assert_eq!(dx10.resource_dimension, D3D10_RESOURCE_DIMENSION_TEXTURE2D);
        assert_eq!(dx10.array_size, 3);
    }

    #[test]
    fn test_compressed_array_dxgi_format() {
        let mut desc = plain_desc();
        desc.n_faces = 2;
        desc.compressed = true;
        desc.bpp = 32;

        let header = DdsHeader::new(&desc);
        assert_eq!(&header.pixel_format.four_cc, b"DX10");
        assert_eq!(header.dx10.as_ref().unwrap().dxgi_format, DXGI_FORMAT_BC1_UNORM);

        desc.has_alpha = true;
        let header = DdsHeader::new(&desc);
        assert_eq!(header.dx10.as_ref().unwrap().dxgi_format, DXGI_FORMAT_BC3_UNORM);
    }

    #[test]
    fn test_normal_map_pixel_flag() {
        let mut desc = plain_desc();
        desc.normal_map = true;

        let header = DdsHeader::new(&desc);
        assert_eq!(header.pixel_format.flags & DDPF_NORMAL, DDPF_NORMAL);
    }

    #[test]
    fn test_to_bytes_layout() {
        let header = DdsHeader::new(&plain_desc());
        let bytes = header.to_bytes();

        assert_eq!(bytes.len(), 128);
        assert_eq!(&bytes[0..4], b"DDS ");
        assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), 124);
        assert_eq!(u32::from_le_bytes(bytes[12..16].try_into().unwrap()), 256); // height
        assert_eq!(u32::from_le_bytes(bytes[16..20].try_into().unwrap()), 256); // width
        assert_eq!(u32::from_le_bytes(bytes[24..28].try_into().unwrap()), 0); // depth
        // Pixel format structure size at offset 76.
        assert_eq!(u32::from_le_bytes(bytes[76..80].try_into().unwrap()), 32);
        // Reserved words are zero.
        assert!(bytes[32..76].iter().all(|&b| b == 0));
        assert!(bytes[116..128].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_to_bytes_dx10_length() {
        let mut desc = plain_desc();
        desc.n_faces = 4;
        desc.bpp = 32;

        let bytes = DdsHeader::new(&desc).to_bytes();
        assert_eq!(bytes.len(), 148);
        assert_eq!(&bytes[84..88], b"DX10");
        // dxgiFormat is the first extension word at offset 128.
        assert_eq!(u32::from_le_bytes(bytes[128..132].try_into().unwrap()), 28);
        // arraySize is the fourth extension word.
        assert_eq!(u32::from_le_bytes(bytes[140..144].try_into().unwrap()), 4);
    }

    #[test]
    fn test_round_trip_plain() {
        let header = DdsHeader::new(&plain_desc());
        let bytes = header.to_bytes();
        let parsed = DdsHeader::read(&mut bytes.as_slice()).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn test_round_trip_array_with_dx10() {
        let mut desc = plain_desc();
        desc.n_faces = 3;
        desc.bpp = 32;
        desc.compressed = true;
        desc.has_alpha = true;
        desc.mipmaps = true;
        desc.mipmap_count = 5;

        let header = DdsHeader::new(&desc);
        let bytes = header.to_bytes();
        let parsed = DdsHeader::read(&mut bytes.as_slice()).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn test_read_rejects_bad_magic() {
        let err = DdsHeader::read(&mut &b"PNG \x00\x00\x00\x00"[..]).unwrap_err();
        assert!(matches!(err, BuildError::BadHeader(m) if &m == b"PNG "));
    }

    #[test]
    fn test_read_truncated_header() {
        let err = DdsHeader::read(&mut &b"DDS \x7c\x00\x00\x00"[..]).unwrap_err();
        assert!(matches!(err, BuildError::Io(_)));
    }
}
