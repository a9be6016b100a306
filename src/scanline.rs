// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/scanline.rs - Scanline decoder for Radiance HDR pixel data.
 *  Copyright (C) 2026  Forest Crossman <cyrozap@gmail.com>
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

/*!
 * # `scanline` Module
 *
 * This module turns the binary part of a Radiance HDR file into RGBE quads.
 *
 * Pixel data is stored either flat (four bytes per pixel) or with the
 * per-channel run-length encoding, where every scanline starts with a
 * `2 2 <width>` marker and then stores its red, green, blue and exponent
 * planes one after another as a mix of repeated-byte runs and literal runs.
 *
 * The first scanline in the file becomes the last row of the output, so row 0
 * of the result is the bottom of the picture.
 */

use log::{debug, trace};

use crate::color::RgbeQuad;
use crate::error::DecodeError;
use crate::header::Header;
use crate::limits::Limits;

/// Scanlines narrower than this are never run-length encoded.
pub const MIN_RLE_WIDTH: usize = 8;
/// Scanlines wider than this are never run-length encoded.
pub const MAX_RLE_WIDTH: usize = 0x7fff;

/// How the pixel data of a file is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanlineMode {
    /// Four raw bytes per pixel.
    Flat,
    /// Per-channel run-length encoded scanlines.
    RunLength,
}

/// Decodes the pixel data of an image described by `header`.
///
/// # Arguments
///
/// * `buffer` - The complete file contents.
/// * `offset` - Where the pixel data starts, as returned by [Header::parse].
/// * `header` - The parsed header.
///
/// # Returns
///
/// A `Result` containing `width * height` quads in output row order, or a
/// [DecodeError].
pub fn decode_scanlines(
    buffer: &[u8],
    offset: usize,
    header: &Header,
) -> Result<Vec<RgbeQuad>, DecodeError> {
    decode_scanlines_with(buffer, offset, header, &Limits::default(), |quad| quad)
}

/// Decodes the pixel data like [decode_scanlines], passing every quad through
/// `f` and storing its result directly in the output buffer.
///
/// The input is checked for having enough bytes for the declared dimensions
/// before anything is allocated, and the output buffer counts against
/// `limits`.
pub fn decode_scanlines_with<T, F>(
    buffer: &[u8],
    offset: usize,
    header: &Header,
    limits: &Limits,
    f: F,
) -> Result<Vec<T>, DecodeError>
where
    T: Clone + Default,
    F: Fn(RgbeQuad) -> T,
{
    let width = header.width as usize;
    let height = header.height as usize;
    let data = buffer.get(offset..).unwrap_or_default();

    if width == 0 || height == 0 {
        return Ok(Vec::new());
    }

    let mode = detect_mode(data, width)?;
    debug!("Decoding {}x{} pixels in {:?} mode", width, height, mode);

    let minimum = match mode {
        ScanlineMode::Flat => width.checked_mul(height).and_then(|n| n.checked_mul(4)),
        ScanlineMode::RunLength => height.checked_mul(min_rle_scanline_len(width)),
    };
    if minimum.is_none_or(|minimum| data.len() < minimum) {
        return Err(DecodeError::read("unexpected end of pixel data"));
    }

    let scratch = match mode {
        ScanlineMode::Flat => 0,
        ScanlineMode::RunLength => 4 * width,
    };
    let mut output = allocate_output(width, height, scratch, limits)?;
    match mode {
        ScanlineMode::Flat => decode_flat(data, width, height, &mut output, f),
        ScanlineMode::RunLength => decode_rle(data, width, height, &mut output, f)?,
    }

    Ok(output)
}

/// Chooses between flat and run-length decoding by looking at the scanline
/// width and the first four bytes of pixel data.
pub fn detect_mode(data: &[u8], width: usize) -> Result<ScanlineMode, DecodeError> {
    if !(MIN_RLE_WIDTH..=MAX_RLE_WIDTH).contains(&width) {
        return Ok(ScanlineMode::Flat);
    }

    let signature = data
        .get(..4)
        .ok_or_else(|| DecodeError::read("unexpected end of pixel data"))?;
    if signature[0] != 2 || signature[1] != 2 || (signature[2] & 0x80) != 0 {
        return Ok(ScanlineMode::Flat);
    }

    Ok(ScanlineMode::RunLength)
}

/// The fewest bytes a run-length encoded scanline of `width` pixels can take:
/// the marker plus two-byte runs of at most 127 values each.
fn min_rle_scanline_len(width: usize) -> usize {
    4 + 2 * (4 * width).div_ceil(127)
}

/// Reserves the output buffer after checking it, plus `scratch` bytes of
/// working space, against `limits`.
fn allocate_output<T: Clone + Default>(
    width: usize,
    height: usize,
    scratch: usize,
    limits: &Limits,
) -> Result<Vec<T>, DecodeError> {
    let len = width
        .checked_mul(height)
        .ok_or_else(|| DecodeError::memory("image dimensions are too large"))?;
    let bytes = u64::try_from(len)
        .ok()
        .and_then(|len| len.checked_mul(size_of::<T>() as u64))
        .and_then(|bytes| bytes.checked_add(scratch as u64));
    limits.check_alloc(bytes)?;

    let mut output = Vec::new();
    output
        .try_reserve_exact(len)
        .map_err(|_| DecodeError::memory("failed to allocate pixel buffer"))?;
    output.resize(len, T::default());

    Ok(output)
}

/// Output row index for the `n`-th scanline of the stream.
fn flip_row(n: usize, height: usize) -> usize {
    height - 1 - n
}

/// Expects `data` to hold at least `4 * output.len()` bytes.
fn decode_flat<T, F>(data: &[u8], width: usize, height: usize, output: &mut [T], f: F)
where
    F: Fn(RgbeQuad) -> T,
{
    let needed = 4 * output.len();
    for (n, scanline) in data[..needed].chunks_exact(4 * width).enumerate() {
        let row = flip_row(n, height);
        let out = &mut output[row * width..(row + 1) * width];
        for (dst, bytes) in out.iter_mut().zip(scanline.chunks_exact(4)) {
            *dst = f(RgbeQuad::new(bytes[0], bytes[1], bytes[2], bytes[3]));
        }
    }
}

fn decode_rle<T, F>(
    data: &[u8],
    width: usize,
    height: usize,
    output: &mut [T],
    f: F,
) -> Result<(), DecodeError>
where
    F: Fn(RgbeQuad) -> T,
{
    let mut reader = ByteReader::new(data);
    // Reused for every scanline: R plane, then G, then B, then E.
    let mut planes = vec![0u8; 4 * width];

    for n in 0..height {
        let marker = reader
            .take(4)
            .ok_or_else(|| DecodeError::read("unexpected end of scanline header"))?;
        if usize::from(u16::from_be_bytes([marker[2], marker[3]])) != width {
            return Err(DecodeError::format("wrong scanline width"));
        }

        decode_planes(&mut reader, &mut planes)?;
        trace!("Decoded scanline {} ({} bytes consumed)", n, reader.position());

        let row = flip_row(n, height);
        let out = &mut output[row * width..(row + 1) * width];
        for (i, dst) in out.iter_mut().enumerate() {
            *dst = f(RgbeQuad::new(
                planes[i],
                planes[width + i],
                planes[2 * width + i],
                planes[3 * width + i],
            ));
        }
    }

    Ok(())
}

/// Fills `planes` from a sequence of encoded and literal runs.
fn decode_planes(reader: &mut ByteReader, planes: &mut [u8]) -> Result<(), DecodeError> {
    let mut pos = 0;
    while pos < planes.len() {
        let mut count = usize::from(reader.byte()?);
        let is_encoded_run = count > 128;
        if is_encoded_run {
            count -= 128;
        }

        if count == 0 || pos + count > planes.len() {
            return Err(DecodeError::format("bad scanline data"));
        }

        if is_encoded_run {
            let value = reader.byte()?;
            planes[pos..pos + count].fill(value);
        } else {
            let run = reader
                .take(count)
                .ok_or_else(|| DecodeError::read("unexpected end of scanline data"))?;
            planes[pos..pos + count].copy_from_slice(run);
        }
        pos += count;
    }

    Ok(())
}

/// A cursor over the pixel data.
struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn take(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(len)?;
        let bytes = self.data.get(self.pos..end)?;
        self.pos = end;
        Some(bytes)
    }

    fn byte(&mut self) -> Result<u8, DecodeError> {
        self.take(1)
            .map(|b| b[0])
            .ok_or_else(|| DecodeError::read("unexpected end of scanline data"))
    }
}
