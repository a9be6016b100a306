// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/image.rs - Decoded Radiance HDR images.
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
 * # `image` Module
 *
 * This module ties the [header](crate::header), [scanline](crate::scanline)
 * and [color](crate::color) stages together into a decoded [Image].
 *
 * ## Usage Example
 *
 * ```no_run
 * use radiancehdr::image::Image;
 *
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     let data = std::fs::read("example.hdr")?;
 *     let image = Image::assemble(&data)?;
 *
 *     println!("{}x{}", image.width, image.height);
 *     if let Some([r, g, b]) = image.pixel(0, 0) {
 *         println!("Bottom left: ({}, {}, {})", r, g, b);
 *     }
 *
 *     Ok(())
 * }
 * ```
 */

use log::debug;

use crate::color::{Pixel, RgbeQuad};
use crate::error::DecodeError;
use crate::header::Header;
use crate::limits::Limits;
use crate::scanline::decode_scanlines_with;

/// A fully decoded Radiance HDR image.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// The parsed file header. Gamma and exposure are informational only.
    pub header: Header,
    /// Number of pixels per row.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// Linear RGB pixels, row-major. Row 0 is the bottom of the picture.
    pub pixels: Vec<Pixel>,
}

impl Image {
    /// Decodes a complete Radiance HDR file.
    ///
    /// # Arguments
    ///
    /// * `buffer` - The complete file contents.
    ///
    /// # Returns
    ///
    /// A `Result` containing the decoded `Image` or the first [DecodeError]
    /// encountered.
    pub fn assemble(buffer: &[u8]) -> Result<Self, DecodeError> {
        Self::assemble_with_limits(buffer, &Limits::default())
    }

    /// Decodes a complete Radiance HDR file, failing with a memory error if
    /// the pixel buffer would exceed `limits`.
    pub fn assemble_with_limits(buffer: &[u8], limits: &Limits) -> Result<Self, DecodeError> {
        let (header, offset) = Header::parse(buffer)?;
        let pixels = decode_scanlines_with(buffer, offset, &header, limits, RgbeQuad::to_color)?;

        debug!("Decoded {} pixels", pixels.len());

        Ok(Self {
            width: header.width,
            height: header.height,
            header,
            pixels,
        })
    }

    /// Returns the pixel at column `x` of row `y`, counting rows from the
    /// bottom of the picture.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Returns one row of pixels, counting rows from the bottom.
    pub fn row(&self, y: u32) -> Option<&[Pixel]> {
        if y >= self.height {
            return None;
        }
        let width = self.width as usize;
        let start = y as usize * width;
        self.pixels.get(start..start + width)
    }

    /// Flattens the pixels into RGBA floats with an opaque alpha channel, the
    /// layout floating-point textures are usually uploaded in.
    pub fn to_rgba_f32(&self) -> Vec<f32> {
        self.pixels
            .iter()
            .flat_map(|&[r, g, b]| [r, g, b, 1.0])
            .collect()
    }
}
