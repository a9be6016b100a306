// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/header.rs - Header parser for Radiance HDR files.
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
 * # `header` Module
 *
 * This module parses the ASCII header at the start of a Radiance HDR file.
 *
 * The header is a sequence of newline-terminated lines: a `#?<program>` magic
 * line, optional attribute and comment lines, and a resolution line such as
 * `-Y 512 +X 768`. Only the header bytes are read here; the binary pixel data
 * that follows is left for the [scanline](crate::scanline) decoder.
 *
 * ## Usage Example
 *
 * ```
 * use radiancehdr::header::Header;
 *
 * let data = b"#?RADIANCE\nFORMAT=32-bit_rle_rgbe\n\n-Y 2 +X 3\n";
 * let (header, offset) = Header::parse(data).unwrap();
 *
 * assert_eq!(header.program_type, "RADIANCE");
 * assert_eq!((header.width, header.height), (3, 2));
 * assert_eq!(offset, data.len());
 * ```
 */

use log::{debug, warn};

use crate::error::DecodeError;

/// The only pixel format this decoder understands.
pub const RGBE_FORMAT: &str = "32-bit_rle_rgbe";

const ORIENTATION_TOKENS: [&str; 4] = ["-Y", "+Y", "-X", "+X"];

bitflags::bitflags! {
    /// Records which mandatory parts of the header have been seen.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ValidityFlags: u8 {
        /// The `#?<program>` magic line was present.
        const PROGRAMTYPE = 0x01;
        /// A `FORMAT=` line was present.
        const FORMAT = 0x02;
        /// A resolution line was present.
        const DIMENSIONS = 0x04;
    }
}

/// A parsed Radiance HDR header.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    /// Which mandatory header parts were found.
    pub valid: ValidityFlags,
    /// The verbatim header text, one `\n`-terminated line per header line.
    pub raw_header: String,
    /// All comment lines, each terminated by `\n`.
    pub comments: String,
    /// The token following the `#?` magic, identifying the producing program.
    pub program_type: String,
    /// The pixel format, e.g. `32-bit_rle_rgbe`.
    pub format: String,
    /// Gamma the pixel values were encoded with. Not applied by the decoder.
    pub gamma: f32,
    /// Exposure the pixel values were multiplied by. Not applied by the decoder.
    pub exposure: f32,
    /// Number of pixels per scanline.
    pub width: u32,
    /// Number of scanlines.
    pub height: u32,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            valid: ValidityFlags::empty(),
            raw_header: String::new(),
            comments: String::new(),
            program_type: "RGBE".to_string(),
            format: String::new(),
            gamma: 1.0,
            exposure: 1.0,
            width: 0,
            height: 0,
        }
    }
}

impl Header {
    /// Parses the header at the start of `buffer`.
    ///
    /// # Arguments
    ///
    /// * `buffer` - The complete contents of a Radiance HDR file.
    ///
    /// # Returns
    ///
    /// A `Result` containing the parsed `Header` together with the byte offset
    /// at which the pixel data starts, or a [DecodeError].
    pub fn parse(buffer: &[u8]) -> Result<(Self, usize), DecodeError> {
        let mut header = Self::default();
        let mut lines = Lines::new(buffer);

        let first = lines
            .next()
            .ok_or_else(|| DecodeError::read("no header found"))?;
        let first = String::from_utf8_lossy(first);
        let program_type =
            parse_magic(&first).ok_or_else(|| DecodeError::format("bad initial token"))?;
        header.program_type = program_type.to_string();
        header.valid |= ValidityFlags::PROGRAMTYPE;
        header.push_raw(&first);

        let mut seen_separator = false;
        while let Some(line) = lines.next() {
            let line = String::from_utf8_lossy(line);
            header.push_raw(&line);

            if line.starts_with('#') {
                header.comments.push_str(&line);
                header.comments.push('\n');
                continue;
            }

            if line.trim().is_empty() {
                seen_separator = true;
                continue;
            }

            if let Some(value) = parse_float_attribute(&line, "GAMMA") {
                match value {
                    Some(gamma) => header.gamma = gamma,
                    None => warn!("Ignoring malformed GAMMA line: {:?}", line),
                }
            } else if let Some(value) = parse_float_attribute(&line, "EXPOSURE") {
                match value {
                    Some(exposure) => header.exposure = exposure,
                    None => warn!("Ignoring malformed EXPOSURE line: {:?}", line),
                }
            } else if let Some(format) = parse_format(&line) {
                header.format = format.to_string();
                header.valid |= ValidityFlags::FORMAT;
            } else if let Some((height, width)) = parse_dimensions(&line)? {
                header.height = height;
                header.width = width;
                header.valid |= ValidityFlags::DIMENSIONS;
            }

            if header
                .valid
                .contains(ValidityFlags::FORMAT | ValidityFlags::DIMENSIONS)
            {
                // Headers that put the resolution line before the blank
                // separator still end with that blank line.
                if !seen_separator && lines.skip_empty_line() {
                    header.push_raw("");
                }
                break;
            }
        }

        if !header.valid.contains(ValidityFlags::FORMAT) {
            return Err(DecodeError::format("missing format specifier"));
        }
        if !header.valid.contains(ValidityFlags::DIMENSIONS) {
            return Err(DecodeError::format("missing image size specifier"));
        }
        if header.width == 0 || header.height == 0 {
            return Err(DecodeError::format("bad image size specifier"));
        }
        if header.format != RGBE_FORMAT {
            return Err(DecodeError::format("unsupported format specifier"));
        }

        debug!(
            "Parsed {} header: {}x{}, format {}, gamma {}, exposure {}, {} header bytes",
            header.program_type,
            header.width,
            header.height,
            header.format,
            header.gamma,
            header.exposure,
            lines.position()
        );

        Ok((header, lines.position()))
    }

    fn push_raw(&mut self, line: &str) {
        self.raw_header.push_str(line);
        self.raw_header.push('\n');
    }
}

/// Splits raw bytes into `\n`-terminated lines without decoding them, keeping
/// track of how many bytes have been consumed.
struct Lines<'a> {
    buffer: &'a [u8],
    pos: usize,
}

impl<'a> Lines<'a> {
    fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, pos: 0 }
    }

    fn position(&self) -> usize {
        self.pos
    }

    /// Consumes the next line if it is empty, returning whether it did.
    fn skip_empty_line(&mut self) -> bool {
        let rest = &self.buffer[self.pos..];
        let len = if rest.starts_with(b"\n") {
            1
        } else if rest.starts_with(b"\r\n") {
            2
        } else {
            return false;
        };
        self.pos += len;
        true
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a [u8];

    /// Returns the next line without its line terminator, or `None` at the end
    /// of the buffer.
    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.buffer[self.pos..];
        if rest.is_empty() {
            return None;
        }

        let (line, consumed) = match rest.iter().position(|&b| b == b'\n') {
            Some(end) => (&rest[..end], end + 1),
            None => (rest, rest.len()),
        };
        self.pos += consumed;

        Some(line.strip_suffix(b"\r").unwrap_or(line))
    }
}

/// Matches `#?<token>` and returns the token.
fn parse_magic(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("#?")?;
    let token = rest.split(char::is_whitespace).next()?;
    if token.is_empty() { None } else { Some(token) }
}

/// Matches `<key> = <decimal>`.
///
/// Returns `None` if the line is not a `key` assignment at all, and
/// `Some(None)` if it is one but the value is not a plain decimal number.
fn parse_float_attribute(line: &str, key: &str) -> Option<Option<f32>> {
    let rest = line.trim().strip_prefix(key)?;
    let value = rest.trim_start().strip_prefix('=')?.trim();
    Some(parse_decimal(value))
}

/// Parses `<digits>` or `<digits>.<digits>`.
fn parse_decimal(value: &str) -> Option<f32> {
    let (integer, fraction) = match value.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (value, None),
    };
    let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(integer) || !fraction.is_none_or(is_digits) {
        return None;
    }
    value.parse::<f32>().ok()
}

/// Matches `FORMAT=<token>`.
fn parse_format(line: &str) -> Option<&str> {
    let value = line.trim_start().strip_prefix("FORMAT=")?.trim_end();
    if value.is_empty() || value.contains(char::is_whitespace) {
        None
    } else {
        Some(value)
    }
}

/// Matches a resolution line and returns `(height, width)`.
///
/// Lines that are not resolution lines yield `Ok(None)`. Resolution lines in
/// any orientation other than `-Y <height> +X <width>` are rejected.
fn parse_dimensions(line: &str) -> Result<Option<(u32, u32)>, DecodeError> {
    let parts = line.split_whitespace().collect::<Vec<_>>();
    if parts.len() != 4
        || !ORIENTATION_TOKENS.contains(&parts[0])
        || !ORIENTATION_TOKENS.contains(&parts[2])
    {
        return Ok(None);
    }

    if parts[0] != "-Y" || parts[2] != "+X" {
        return Err(DecodeError::format("unsupported image orientation"));
    }

    let parse_size = |s: &str| {
        s.parse::<u32>()
            .map_err(|_| DecodeError::format("bad image size specifier"))
    };
    let height = parse_size(parts[1])?;
    let width = parse_size(parts[3])?;

    Ok(Some((height, width)))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::error::ErrorKind;

    #[test]
    fn test_parse_standard_header() {
        let data = b"#?RADIANCE\n# made by hand\nGAMMA=2.2\nEXPOSURE = 0.5\nFORMAT=32-bit_rle_rgbe\n\n-Y 480 +X 640\n\x02\x02";
        let (header, offset) = Header::parse(data).unwrap();

        assert_eq!(header.program_type, "RADIANCE");
        assert_eq!(header.comments, "# made by hand\n");
        assert_eq!(header.format, RGBE_FORMAT);
        assert_eq!(header.gamma, 2.2);
        assert_eq!(header.exposure, 0.5);
        assert_eq!(header.width, 640);
        assert_eq!(header.height, 480);
        assert!(header.valid.contains(ValidityFlags::all()));
        assert_eq!(offset, data.len() - 2);
        assert_eq!(
            header.raw_header,
            "#?RADIANCE\n# made by hand\nGAMMA=2.2\nEXPOSURE = 0.5\nFORMAT=32-bit_rle_rgbe\n\n-Y 480 +X 640\n"
        );
    }

    #[test]
    fn test_defaults() {
        let data = b"#?RGBE\nFORMAT=32-bit_rle_rgbe\n\n-Y 1 +X 1\n";
        let (header, _) = Header::parse(data).unwrap();

        assert_eq!(header.gamma, 1.0);
        assert_eq!(header.exposure, 1.0);
        assert!(header.comments.is_empty());
        assert_eq!(Header::default().program_type, "RGBE");
    }

    #[test]
    fn test_dimensions_before_blank_line() {
        let data = b"#?RADIANCE\nFORMAT=32-bit_rle_rgbe\n-Y 2 +X 3\n\nPIXELS";
        let (header, offset) = Header::parse(data).unwrap();

        assert_eq!((header.width, header.height), (3, 2));
        assert_eq!(&data[offset..], b"PIXELS");
    }

    #[test]
    fn test_pixel_data_starting_with_newline_is_kept() {
        let data = b"#?RADIANCE\nFORMAT=32-bit_rle_rgbe\n\n-Y 1 +X 1\n\n\x01\x01\x80";
        let (_, offset) = Header::parse(data).unwrap();

        assert_eq!(&data[offset..], b"\n\x01\x01\x80");
    }

    #[test]
    fn test_crlf_line_endings() {
        let data = b"#?RADIANCE\r\nFORMAT=32-bit_rle_rgbe\r\n\r\n-Y 4 +X 5\r\nXX";
        let (header, offset) = Header::parse(data).unwrap();

        assert_eq!(header.format, RGBE_FORMAT);
        assert_eq!((header.width, header.height), (5, 4));
        assert_eq!(&data[offset..], b"XX");
    }

    #[test]
    fn test_bad_initial_token() {
        for data in [&b"RADIANCE\n"[..], b"#? RADIANCE\n", b"#?\n", b"#RADIANCE\n"] {
            assert_eq!(
                Header::parse(data),
                Err(DecodeError::format("bad initial token"))
            );
        }
    }

    #[test]
    fn test_empty_buffer() {
        let err = Header::parse(b"").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Read);
    }

    #[test]
    fn test_missing_format() {
        let data = b"#?RADIANCE\nGAMMA=1.0\n\n-Y 2 +X 3\n";
        assert_eq!(
            Header::parse(data),
            Err(DecodeError::format("missing format specifier"))
        );
    }

    #[test]
    fn test_missing_dimensions() {
        let data = b"#?RADIANCE\nFORMAT=32-bit_rle_rgbe\n\n";
        assert_eq!(
            Header::parse(data),
            Err(DecodeError::format("missing image size specifier"))
        );
    }

    #[test]
    fn test_unsupported_orientation() {
        for dims in ["+Y 2 +X 3", "-Y 2 -X 3", "+X 3 -Y 2"] {
            let data = format!("#?RADIANCE\nFORMAT=32-bit_rle_rgbe\n\n{}\n", dims);
            assert_eq!(
                Header::parse(data.as_bytes()),
                Err(DecodeError::format("unsupported image orientation"))
            );
        }
    }

    #[test]
    fn test_bad_dimensions() {
        for dims in ["-Y 0 +X 3", "-Y 2 +X 0", "-Y 2 +X 99999999999", "-Y two +X 3"] {
            let data = format!("#?RADIANCE\nFORMAT=32-bit_rle_rgbe\n\n{}\n", dims);
            assert_eq!(
                Header::parse(data.as_bytes()),
                Err(DecodeError::format("bad image size specifier"))
            );
        }
    }

    #[test]
    fn test_unsupported_format() {
        let data = b"#?RADIANCE\nFORMAT=32-bit_rle_xyze\n\n-Y 2 +X 3\n";
        assert_eq!(
            Header::parse(data),
            Err(DecodeError::format("unsupported format specifier"))
        );
    }

    #[test]
    fn test_malformed_attributes_are_ignored() {
        let data = b"#?RADIANCE\nGAMMA=fast\nEXPOSURE=-1\nPRIMARIES=0 0 0 0 0 0 0 0\nFORMAT=32-bit_rle_rgbe\n\n-Y 1 +X 1\n";
        let (header, _) = Header::parse(data).unwrap();

        assert_eq!(header.gamma, 1.0);
        assert_eq!(header.exposure, 1.0);
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("2"), Some(2.0));
        assert_eq!(parse_decimal("0.25"), Some(0.25));
        assert_eq!(parse_decimal("1."), None);
        assert_eq!(parse_decimal(".5"), None);
        assert_eq!(parse_decimal("1e3"), None);
        assert_eq!(parse_decimal(""), None);
    }
}
