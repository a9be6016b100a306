// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/limits.rs - Allocation limits for the Radiance HDR decoder.
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

use crate::error::DecodeError;

/// Resource limits applied while decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Limits {
    /// The maximum number of bytes the decoder may allocate for the output
    /// buffer and its scanline scratch space. The default is no limit.
    pub max_alloc: Option<u64>,
}

impl Limits {
    /// Disables all limits.
    pub fn no_limits() -> Self {
        Self { max_alloc: None }
    }

    /// Fails with a memory error if `amount` bytes exceed the allocation
    /// limit. An amount that doesn't fit in `u64` always fails.
    pub fn check_alloc(&self, amount: Option<u64>) -> Result<(), DecodeError> {
        let amount = amount.ok_or_else(|| DecodeError::memory("image dimensions are too large"))?;
        match self.max_alloc {
            Some(max_alloc) if amount > max_alloc => Err(DecodeError::memory(
                "image exceeds the allocation limit",
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::error::ErrorKind;

    #[test]
    fn test_check_alloc() {
        let limits = Limits {
            max_alloc: Some(100),
        };
        assert!(limits.check_alloc(Some(100)).is_ok());
        assert_eq!(
            limits.check_alloc(Some(101)).unwrap_err().kind(),
            ErrorKind::Memory
        );
        assert_eq!(
            Limits::no_limits().check_alloc(None).unwrap_err().kind(),
            ErrorKind::Memory
        );
        assert!(Limits::default().check_alloc(Some(u64::MAX)).is_ok());
    }
}
