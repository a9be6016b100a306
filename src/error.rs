// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/error.rs - Error types for the Radiance HDR decoder.
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

/// Classification of a [DecodeError], for callers that only care about the
/// category of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The input ended before the decoder had everything it needed.
    Read,
    /// The header or the pixel data violates the file format.
    Format,
    /// The output image could not be allocated.
    Memory,
}

/// Errors that can occur while decoding a Radiance HDR file.
///
/// Every error is fatal to the decode call that produced it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The stream ended unexpectedly.
    #[error("read error: {0}")]
    Read(String),

    /// Header or scanline grammar violation.
    #[error("format error: {0}")]
    Format(String),

    /// The pixel buffer could not be allocated.
    #[error("memory error: {0}")]
    Memory(String),
}

impl DecodeError {
    pub(crate) fn read(message: &str) -> Self {
        Self::Read(message.to_string())
    }

    pub(crate) fn format(message: &str) -> Self {
        Self::Format(message.to_string())
    }

    pub(crate) fn memory(message: &str) -> Self {
        Self::Memory(message.to_string())
    }

    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Read(_) => ErrorKind::Read,
            Self::Format(_) => ErrorKind::Format,
            Self::Memory(_) => ErrorKind::Memory,
        }
    }

    /// Returns the human-readable reason carried by this error.
    pub fn message(&self) -> &str {
        match self {
            Self::Read(m) | Self::Format(m) | Self::Memory(m) => m,
        }
    }
}
