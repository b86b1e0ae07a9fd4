//! PNG encoding for tile images.
//!
//! A heatmap tile can never hold more than 256 distinct colors: every pixel
//! is looked up in the 256-entry count LUT. The primary encoder therefore
//! writes indexed PNGs, feeding the overlap grid in directly as the index
//! plane and the LUT as the palette, with per-entry alpha carried in tRNS.
//! An RGBA encoder exists for callers that already expanded raw pixels.
//!
//! Identical input always produces identical bytes: fixed compression level,
//! filter type 0 on every scanline, and no ancillary chunks besides tRNS.

use std::io::Write;

const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

const COLOR_TYPE_INDEXED: u8 = 3;
const COLOR_TYPE_RGBA: u8 = 6;

/// Encode an indexed PNG from a palette and one index byte per pixel.
///
/// This is the fast path for tile rendering: `palette` is the precomputed
/// count LUT and `indices` is the overlap grid itself, so nothing is
/// converted per pixel before compression.
pub fn create_png_indexed(
    width: usize,
    height: usize,
    palette: &[(u8, u8, u8, u8)],
    indices: &[u8],
) -> Result<Vec<u8>, String> {
    if indices.len() != width * height {
        return Err(format!(
            "index plane is {} bytes but the tile is {}x{}",
            indices.len(),
            width,
            height
        ));
    }

    let mut out = Vec::with_capacity(indices.len() / 4);
    out.extend_from_slice(&SIGNATURE);
    append_chunk(
        &mut out,
        *b"IHDR",
        &header_fields(width, height, COLOR_TYPE_INDEXED),
    );

    let mut plte = Vec::with_capacity(palette.len() * 3);
    for &(r, g, b, _) in palette {
        plte.extend_from_slice(&[r, g, b]);
    }
    append_chunk(&mut out, *b"PLTE", &plte);

    // Gradient LUTs always make entry 0 transparent, so tiles carry a tRNS
    // chunk in practice; a fully opaque palette can skip it.
    if palette.iter().any(|&(_, _, _, a)| a < 255) {
        let alphas: Vec<u8> = palette.iter().map(|&(_, _, _, a)| a).collect();
        append_chunk(&mut out, *b"tRNS", &alphas);
    }

    let compressed = compress_scanlines(indices, width, 1)
        .map_err(|e| format!("deflate failed: {e}"))?;
    append_chunk(&mut out, *b"IDAT", &compressed);
    append_chunk(&mut out, *b"IEND", &[]);

    Ok(out)
}

/// Encode an RGBA PNG (8 bits per channel, 4 bytes per pixel).
pub fn create_png(pixels: &[u8], width: usize, height: usize) -> Result<Vec<u8>, String> {
    if pixels.len() != width * height * 4 {
        return Err(format!(
            "pixel buffer is {} bytes but the tile is {}x{} RGBA",
            pixels.len(),
            width,
            height
        ));
    }

    let mut out = Vec::with_capacity(pixels.len() / 4);
    out.extend_from_slice(&SIGNATURE);
    append_chunk(
        &mut out,
        *b"IHDR",
        &header_fields(width, height, COLOR_TYPE_RGBA),
    );

    let compressed = compress_scanlines(pixels, width, 4)
        .map_err(|e| format!("deflate failed: {e}"))?;
    append_chunk(&mut out, *b"IDAT", &compressed);
    append_chunk(&mut out, *b"IEND", &[]);

    Ok(out)
}

/// The 13 IHDR fields: dimensions, 8-bit depth, color type, and the fixed
/// compression/filter/interlace methods.
fn header_fields(width: usize, height: usize, color_type: u8) -> [u8; 13] {
    let w = (width as u32).to_be_bytes();
    let h = (height as u32).to_be_bytes();
    [
        w[0], w[1], w[2], w[3], // width
        h[0], h[1], h[2], h[3], // height
        8, // bit depth
        color_type,
        0, // compression method
        0, // filter method
        0, // interlace method
    ]
}

/// Append one chunk: big-endian payload length, tag, payload, then the
/// CRC-32 of tag plus payload.
fn append_chunk(out: &mut Vec<u8>, tag: [u8; 4], payload: &[u8]) {
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(&tag);
    out.extend_from_slice(payload);

    let mut crc = crc32fast::Hasher::new();
    crc.update(&tag);
    crc.update(payload);
    out.extend_from_slice(&crc.finalize().to_be_bytes());
}

/// Deflate the image rows, each prefixed with filter type 0.
///
/// Skipping per-row filters keeps the output deterministic; overlap data is
/// dominated by zero runs that deflate compresses well on its own.
fn compress_scanlines(
    data: &[u8],
    width: usize,
    bytes_per_pixel: usize,
) -> Result<Vec<u8>, std::io::Error> {
    let stride = width * bytes_per_pixel;
    let mut raw = Vec::with_capacity(data.len() + data.len() / stride);
    for row in data.chunks_exact(stride) {
        raw.push(0); // filter type: none
        raw.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder.write_all(&raw)?;
    encoder.finish()
}
