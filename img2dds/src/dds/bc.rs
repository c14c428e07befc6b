//! S3 block compression primitive.
//!
//! A pure-function facade over BC1/DXT1 and BC3/DXT5 block encoders:
//! `compress(pixels, width, height, flags)` consumes a B,G,R,A pixel buffer
//! and returns the packed blocks; `storage_requirements` reports the output
//! size ahead of time. The flag set mirrors the libsquish option words so
//! call sites read the same as against the C library.
//!
//! BC1 packs each 4x4 pixel group into 8 bytes (two RGB565 endpoints plus
//! sixteen 2-bit palette indices). BC3 prepends an 8-byte alpha block (two
//! endpoints plus sixteen 3-bit indices over an 8-value palette).

use bitflags::bitflags;

bitflags! {
    /// Compressor options, bit-compatible with the libsquish flag values.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CompressFlags: u32 {
        /// Use DXT1 compression (8-byte blocks, no alpha).
        const DXT1 = 0x001;
        /// Use DXT3 compression (16-byte blocks, explicit alpha).
        const DXT3 = 0x002;
        /// Use DXT5 compression (16-byte blocks, interpolated alpha).
        const DXT5 = 0x004;
        /// Use a slow, high-quality colour fit.
        const CLUSTER_FIT = 0x008;
        /// Use a fast, low-quality colour fit.
        const RANGE_FIT = 0x010;
        /// Weight colour error by alpha when fitting endpoints.
        const WEIGHT_COLOUR_BY_ALPHA = 0x080;
        /// Use a very slow, very high-quality colour fit.
        const ITERATIVE_CLUSTER_FIT = 0x100;
    }
}

/// Bytes of one compressed 4x4 block for the selected format.
fn block_size(flags: CompressFlags) -> usize {
    if flags.contains(CompressFlags::DXT1) {
        8
    } else {
        16
    }
}

/// Storage required for a compressed `width` x `height` surface.
///
/// Partial edge blocks round up, so any dimension is valid.
pub fn storage_requirements(width: u32, height: u32, flags: CompressFlags) -> usize {
    let blocks_wide = width.div_ceil(4) as usize;
    let blocks_high = height.div_ceil(4) as usize;
    blocks_wide * blocks_high * block_size(flags)
}

/// Compress a B,G,R,A pixel buffer into DXT1 or DXT5 blocks.
///
/// `pixels` must hold exactly `width * height * 4` bytes. Blocks are
/// emitted row-major; edge blocks beyond the image bounds are padded with
/// transparent black. The quality-selection bits pick among fitting
/// strategies; this encoder provides its bounding-box fit for all of them.
pub fn compress(pixels: &[u8], width: u32, height: u32, flags: CompressFlags) -> Vec<u8> {
    debug_assert_eq!(pixels.len(), width as usize * height as usize * 4);

    let blocks_wide = width.div_ceil(4);
    let blocks_high = height.div_ceil(4);
    let dxt1 = flags.contains(CompressFlags::DXT1);
    let weigh_alpha = flags.contains(CompressFlags::WEIGHT_COLOUR_BY_ALPHA);

    let mut output = Vec::with_capacity(storage_requirements(width, height, flags));

    for block_y in 0..blocks_high {
        for block_x in 0..blocks_wide {
            let block = extract_block(pixels, width, height, block_x, block_y);
            if dxt1 {
                output.extend_from_slice(&compress_bc1_block(&block, weigh_alpha));
            } else {
                output.extend_from_slice(&compress_bc3_block(&block, weigh_alpha));
            }
        }
    }

    output
}

/// Extract a 4x4 block as R,G,B,A pixels from a B,G,R,A buffer.
fn extract_block(pixels: &[u8], width: u32, height: u32, block_x: u32, block_y: u32) -> [[u8; 4]; 16] {
    let mut block = [[0u8; 4]; 16];

    for y in 0..4 {
        for x in 0..4 {
            let px = block_x * 4 + x;
            let py = block_y * 4 + y;
            if px < width && py < height {
                let offset = ((py * width + px) * 4) as usize;
                block[(y * 4 + x) as usize] = [
                    pixels[offset + 2],
                    pixels[offset + 1],
                    pixels[offset],
                    pixels[offset + 3],
                ];
            }
        }
    }

    block
}

/// Compress a 4x4 RGBA block to an 8-byte BC1 block.
fn compress_bc1_block(block: &[[u8; 4]; 16], weigh_alpha: bool) -> [u8; 8] {
    let (c0, c1) = find_endpoints(block, weigh_alpha);

    // c0 > c1 selects the opaque 4-colour mode.
    let (c0, c1) = if c0 > c1 { (c0, c1) } else { (c1, c0) };

    let indices = colour_indices(block, c0, c1);

    let mut output = [0u8; 8];
    output[0..2].copy_from_slice(&c0.to_le_bytes());
    output[2..4].copy_from_slice(&c1.to_le_bytes());
    output[4..8].copy_from_slice(&indices.to_le_bytes());
    output
}

/// Compress a 4x4 RGBA block to a 16-byte BC3 block (alpha + colour).
fn compress_bc3_block(block: &[[u8; 4]; 16], weigh_alpha: bool) -> [u8; 16] {
    let mut output = [0u8; 16];
    output[0..8].copy_from_slice(&compress_alpha_block(block));
    output[8..16].copy_from_slice(&compress_bc1_block(block, weigh_alpha));
    output
}

/// Endpoint fit over the colour bounding box.
///
/// With `weigh_alpha`, fully transparent pixels are excluded so invisible
/// texels cannot stretch the palette range.
fn find_endpoints(block: &[[u8; 4]; 16], weigh_alpha: bool) -> (u16, u16) {
    let mut min = [255u8; 3];
    let mut max = [0u8; 3];
    let mut seen = false;

    for px in block {
        if weigh_alpha && px[3] == 0 {
            continue;
        }
        seen = true;
        for ch in 0..3 {
            min[ch] = min[ch].min(px[ch]);
            max[ch] = max[ch].max(px[ch]);
        }
    }

    if !seen {
        // Every pixel was transparent; fall back to the full block.
        for px in block {
            for ch in 0..3 {
                min[ch] = min[ch].min(px[ch]);
                max[ch] = max[ch].max(px[ch]);
            }
        }
    }

    (
        pack_rgb565(max[0], max[1], max[2]),
        pack_rgb565(min[0], min[1], min[2]),
    )
}

/// Pick the closest palette entry for each pixel, packed as 2-bit indices.
fn colour_indices(block: &[[u8; 4]; 16], c0: u16, c1: u16) -> u32 {
    let palette = [
        unpack_rgb565(c0),
        unpack_rgb565(c1),
        lerp_rgb565(c0, c1, 1),
        lerp_rgb565(c0, c1, 2),
    ];

    let mut indices = 0u32;
    for (i, px) in block.iter().enumerate() {
        let mut best_dist = u32::MAX;
        let mut best = 0u32;
        for (idx, entry) in palette.iter().enumerate() {
            let dist = colour_distance_sq(px, entry);
            if dist < best_dist {
                best_dist = dist;
                best = idx as u32;
            }
        }
        indices |= best << (i * 2);
    }
    indices
}

/// Compress the alpha channel of a 4x4 block to 8 bytes (DXT5 layout).
fn compress_alpha_block(block: &[[u8; 4]; 16]) -> [u8; 8] {
    let mut min_alpha = 255u8;
    let mut max_alpha = 0u8;
    for px in block {
        min_alpha = min_alpha.min(px[3]);
        max_alpha = max_alpha.max(px[3]);
    }

    // alpha0 > alpha1 selects the 8-value interpolated mode.
    let (alpha0, alpha1) = (max_alpha, min_alpha);
    let palette = alpha_palette(alpha0, alpha1);

    let mut indices = 0u64;
    for (i, px) in block.iter().enumerate() {
        let mut best_dist = u32::MAX;
        let mut best = 0u64;
        for (idx, &entry) in palette.iter().enumerate() {
            let dist = (px[3] as i32 - entry as i32).unsigned_abs();
            if dist < best_dist {
                best_dist = dist;
                best = idx as u64;
            }
        }
        indices |= best << (i * 3);
    }

    let index_bytes = indices.to_le_bytes();
    let mut output = [0u8; 8];
    output[0] = alpha0;
    output[1] = alpha1;
    // 16 pixels x 3 bits = 48 bits = 6 bytes of indices.
    output[2..8].copy_from_slice(&index_bytes[0..6]);
    output
}

/// The 8-value alpha palette for the interpolated DXT5 mode.
fn alpha_palette(alpha0: u8, alpha1: u8) -> [u8; 8] {
    let a0 = alpha0 as u16;
    let a1 = alpha1 as u16;
    [
        alpha0,
        alpha1,
        ((6 * a0 + a1) / 7) as u8,
        ((5 * a0 + 2 * a1) / 7) as u8,
        ((4 * a0 + 3 * a1) / 7) as u8,
        ((3 * a0 + 4 * a1) / 7) as u8,
        ((2 * a0 + 5 * a1) / 7) as u8,
        ((a0 + 6 * a1) / 7) as u8,
    ]
}

fn pack_rgb565(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 >> 3) << 11) | ((g as u16 >> 2) << 5) | (b as u16 >> 3)
}

/// Expand RGB565 back to 8-bit channels, replicating the high bits into the
/// low bits so the full 0..=255 range is reachable.
fn unpack_rgb565(colour: u16) -> [u8; 3] {
    let r5 = (colour >> 11) & 0x1F;
    let g6 = (colour >> 5) & 0x3F;
    let b5 = colour & 0x1F;
    [
        ((r5 << 3) | (r5 >> 2)) as u8,
        ((g6 << 2) | (g6 >> 4)) as u8,
        ((b5 << 3) | (b5 >> 2)) as u8,
    ]
}

/// Interpolate the two palette midpoints (`t` = 1 or 2 thirds toward c1).
fn lerp_rgb565(c0: u16, c1: u16, t: u16) -> [u8; 3] {
    let rgb0 = unpack_rgb565(c0);
    let rgb1 = unpack_rgb565(c1);
    let mut out = [0u8; 3];
    for ch in 0..3 {
        out[ch] = (((3 - t) * rgb0[ch] as u16 + t * rgb1[ch] as u16) / 3) as u8;
    }
    out
}

/// Squared colour distance, weighted toward green like the eye is.
fn colour_distance_sq(a: &[u8; 4], b: &[u8; 3]) -> u32 {
    let dr = (a[0] as i32 - b[0] as i32) * 3;
    let dg = (a[1] as i32 - b[1] as i32) * 6;
    let db = a[2] as i32 - b[2] as i32;
    (dr * dr + dg * dg + db * db) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    const DXT1_FLAGS: CompressFlags = CompressFlags::DXT1;
    const DXT5_FLAGS: CompressFlags = CompressFlags::DXT5;

    /// A width x height BGRA buffer filled with one B,G,R,A value.
    fn solid_bgra(width: u32, height: u32, bgra: [u8; 4]) -> Vec<u8> {
        bgra.repeat((width * height) as usize)
    }

    #[test]
    fn test_storage_dxt1() {
        // 8 bytes per 4x4 block.
        assert_eq!(storage_requirements(4, 4, DXT1_FLAGS), 8);
        assert_eq!(storage_requirements(8, 8, DXT1_FLAGS), 32);
        assert_eq!(storage_requirements(256, 256, DXT1_FLAGS), 32768);
    }

    #[test]
    fn test_storage_dxt5() {
        // 16 bytes per 4x4 block.
        assert_eq!(storage_requirements(4, 4, DXT5_FLAGS), 16);
        assert_eq!(storage_requirements(256, 256, DXT5_FLAGS), 65536);
    }

    #[test]
    fn test_storage_rounds_partial_blocks_up() {
        assert_eq!(storage_requirements(1, 1, DXT1_FLAGS), 8);
        assert_eq!(storage_requirements(5, 4, DXT1_FLAGS), 16);
        assert_eq!(storage_requirements(100, 100, DXT1_FLAGS), 25 * 25 * 8);
    }

    #[test]
    fn test_compress_output_length_matches_storage() {
        for (w, h) in [(4, 4), (8, 4), (5, 3), (16, 16)] {
            let pixels = solid_bgra(w, h, [1, 2, 3, 255]);
            for flags in [DXT1_FLAGS, DXT5_FLAGS] {
                let blocks = compress(&pixels, w, h, flags);
                assert_eq!(blocks.len(), storage_requirements(w, h, flags));
            }
        }
    }

    #[test]
    fn test_compress_solid_white_dxt1() {
        let pixels = solid_bgra(4, 4, [255, 255, 255, 255]);
        let blocks = compress(&pixels, 4, 4, DXT1_FLAGS);

        let c0 = u16::from_le_bytes([blocks[0], blocks[1]]);
        let c1 = u16::from_le_bytes([blocks[2], blocks[3]]);
        assert_eq!(c0, 0xFFFF);
        assert_eq!(c1, 0xFFFF);

        // Uniform block: every index points at the same endpoint.
        let indices = u32::from_le_bytes([blocks[4], blocks[5], blocks[6], blocks[7]]);
        assert_eq!(indices, 0);
    }

    #[test]
    fn test_compress_reads_bgra_channel_order() {
        // Pure red in BGRA byte order is [0, 0, 255, 255]; the packed
        // endpoint must come out as RGB565 red, not blue.
        let pixels = solid_bgra(4, 4, [0, 0, 255, 255]);
        let blocks = compress(&pixels, 4, 4, DXT1_FLAGS);

        let c0 = u16::from_le_bytes([blocks[0], blocks[1]]);
        assert_eq!(c0, 0xF800);
    }

    #[test]
    fn test_compress_dxt5_alpha_endpoints() {
        let mut pixels = solid_bgra(4, 4, [10, 20, 30, 50]);
        pixels[7] = 200; // one pixel's alpha

        let blocks = compress(&pixels, 4, 4, DXT5_FLAGS);
        // alpha0 is the max, alpha1 the min (8-value mode).
        assert_eq!(blocks[0], 200);
        assert_eq!(blocks[1], 50);
    }

    #[test]
    fn test_compress_dxt5_colour_half_matches_dxt1() {
        let pixels = solid_bgra(4, 4, [40, 80, 120, 255]);
        let bc3 = compress(&pixels, 4, 4, DXT5_FLAGS);
        let bc1 = compress(&pixels, 4, 4, DXT1_FLAGS);
        assert_eq!(&bc3[8..16], &bc1[..]);
    }

    #[test]
    fn test_two_colour_block_uses_both_endpoints() {
        // Top half black, bottom half white.
        let mut pixels = solid_bgra(4, 4, [0, 0, 0, 255]);
        for px in pixels[32..].chunks_exact_mut(4) {
            px.copy_from_slice(&[255, 255, 255, 255]);
        }

        let blocks = compress(&pixels, 4, 4, DXT1_FLAGS);
        let c0 = u16::from_le_bytes([blocks[0], blocks[1]]);
        let c1 = u16::from_le_bytes([blocks[2], blocks[3]]);
        assert_eq!(c0, 0xFFFF);
        assert_eq!(c1, 0x0000);

        let indices = u32::from_le_bytes([blocks[4], blocks[5], blocks[6], blocks[7]]);
        for i in 0..8 {
            assert_eq!((indices >> (i * 2)) & 0x3, 1, "pixel {} should be black", i);
        }
        for i in 8..16 {
            assert_eq!((indices >> (i * 2)) & 0x3, 0, "pixel {} should be white", i);
        }
    }

    #[test]
    fn test_weigh_alpha_ignores_invisible_texels() {
        // A transparent white pixel in an otherwise black block.
        let mut pixels = solid_bgra(4, 4, [0, 0, 0, 255]);
        pixels[0..4].copy_from_slice(&[255, 255, 255, 0]);

        let weighted = compress(
            &pixels,
            4,
            4,
            CompressFlags::DXT5 | CompressFlags::WEIGHT_COLOUR_BY_ALPHA,
        );

        // The colour endpoints collapse to black; the white texel carried
        // no weight.
        let c0 = u16::from_le_bytes([weighted[8], weighted[9]]);
        let c1 = u16::from_le_bytes([weighted[10], weighted[11]]);
        assert_eq!(c0, 0);
        assert_eq!(c1, 0);
    }

    #[test]
    fn test_fully_transparent_block_still_encodes() {
        let pixels = solid_bgra(4, 4, [90, 90, 90, 0]);
        let blocks = compress(
            &pixels,
            4,
            4,
            CompressFlags::DXT5 | CompressFlags::WEIGHT_COLOUR_BY_ALPHA,
        );
        assert_eq!(blocks.len(), 16);
        assert_eq!(blocks[0], 0);
        assert_eq!(blocks[1], 0);
    }

    #[test]
    fn test_alpha_palette_order() {
        let palette = alpha_palette(255, 0);
        assert_eq!(palette[0], 255);
        assert_eq!(palette[1], 0);
        for pair in palette[2..].windows(2) {
            assert!(pair[0] >= pair[1], "interpolants must descend");
        }
    }

    #[test]
    fn test_rgb565_round_trip_primaries() {
        for (r, g, b) in [(0, 0, 0), (255, 255, 255), (255, 0, 0), (0, 255, 0), (0, 0, 255)] {
            let packed = pack_rgb565(r, g, b);
            assert_eq!(unpack_rgb565(packed), [r, g, b]);
        }
    }

    #[test]
    fn test_rgb565_precision_loss_bounded() {
        let packed = pack_rgb565(123, 234, 56);
        let [r, g, b] = unpack_rgb565(packed);
        assert!((123i16 - r as i16).abs() <= 4);
        assert!((234i16 - g as i16).abs() <= 2);
        assert!((56i16 - b as i16).abs() <= 4);
    }

    #[test]
    fn test_lerp_endpoints_and_midpoints() {
        let white = pack_rgb565(255, 255, 255);
        let black = pack_rgb565(0, 0, 0);
        assert_eq!(lerp_rgb565(white, black, 1)[0], 170);
        assert_eq!(lerp_rgb565(white, black, 2)[0], 85);
    }

    #[test]
    fn test_edge_block_padding_is_deterministic() {
        // A 5x4 surface has one partial block column; padded texels must
        // not disturb the first block.
        let pixels = solid_bgra(5, 4, [30, 60, 90, 255]);
        let blocks = compress(&pixels, 5, 4, DXT1_FLAGS);
        assert_eq!(blocks.len(), 16);

        let full = compress(&solid_bgra(4, 4, [30, 60, 90, 255]), 4, 4, DXT1_FLAGS);
        assert_eq!(&blocks[..8], &full[..]);
    }
}
