// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/lib.rs - Decoder library for Radiance HDR image files.
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
 * # `radiancehdr` Crate
 *
 * A library for decoding Radiance HDR (RGBE) image files.
 *
 * The decoder works on a complete in-memory copy of the file and runs in
 * several stages:
 *
 * 1. [header]: Parses the ASCII header into a [header::Header].
 * 2. [scanline]: Decodes flat or run-length encoded pixel data into RGBE
 *    quads.
 * 3. [color]: Converts each RGBE quad into linear RGB.
 * 4. [image]: Assembles the results into an [image::Image].
 *
 * Reading the file, and turning the result into a texture, are left to the
 * caller. Gamma and exposure from the header are reported but never applied.
 *
 * ## Usage Example
 *
 * ```no_run
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     // Read the file
 *     let data = std::fs::read("example.hdr")?;
 *
 *     // Decode it
 *     let image = radiancehdr::decode(&data)?;
 *
 *     println!("{} {}x{}", image.header.program_type, image.width, image.height);
 *     for (i, [r, g, b]) in image.pixels.iter().take(4).enumerate() {
 *         println!("  Pixel {}: ({}, {}, {})", i, r, g, b);
 *     }
 *
 *     Ok(())
 * }
 * ```
 */

pub mod color;
pub mod error;
pub mod header;
pub mod image;
pub mod limits;
pub mod scanline;

pub use error::{DecodeError, ErrorKind};
pub use image::Image;
pub use limits::Limits;

/// Decodes a complete Radiance HDR file held in memory.
pub fn decode(bytes: &[u8]) -> Result<Image, DecodeError> {
    Image::assemble(bytes)
}
