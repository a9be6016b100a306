// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/color.rs - RGBE to linear RGB conversion.
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

/// A linear RGB color.
pub type Pixel = [f32; 3];

/// One encoded pixel: three mantissa bytes sharing one exponent byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RgbeQuad {
    /// Red mantissa.
    pub r: u8,
    /// Green mantissa.
    pub g: u8,
    /// Blue mantissa.
    pub b: u8,
    /// Shared exponent, biased by 128. Zero means black.
    pub e: u8,
}

impl RgbeQuad {
    /// Creates a quad from its four raw bytes.
    pub fn new(r: u8, g: u8, b: u8, e: u8) -> Self {
        Self { r, g, b, e }
    }

    /// Converts the quad into linear RGB. An exponent of zero is black.
    ///
    /// Gamma and exposure are not applied.
    #[inline]
    pub fn to_color(self) -> Pixel {
        if self.e == 0 {
            return [0.0, 0.0, 0.0];
        }

        let scale = f64::powi(2.0, i32::from(self.e) - 128) / 255.0;
        [
            (f64::from(self.r) * scale) as f32,
            (f64::from(self.g) * scale) as f32,
            (f64::from(self.b) * scale) as f32,
        ]
    }
}

/// Converts `quad` into linear RGB.
pub fn to_color(quad: RgbeQuad) -> Pixel {
    quad.to_color()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_exponent_is_black() {
        for mantissa in [0, 1, 128, 255] {
            assert_eq!(to_color(RgbeQuad::new(mantissa, 255, 7, 0)), [0.0; 3]);
        }
    }

    #[test]
    fn test_unit_scale() {
        assert_eq!(RgbeQuad::new(255, 255, 255, 128).to_color(), [1.0; 3]);
        assert_eq!(RgbeQuad::new(0, 0, 0, 128).to_color(), [0.0; 3]);
    }

    #[test]
    fn test_exponent_scaling() {
        // 2^(136-128) / 255 * 255 = 256
        assert_eq!(RgbeQuad::new(255, 0, 0, 136).to_color(), [256.0, 0.0, 0.0]);
        // 2^(120-128) / 255 * 255 = 1/256
        assert_eq!(
            RgbeQuad::new(0, 255, 0, 120).to_color(),
            [0.0, 1.0 / 256.0, 0.0]
        );

        let [r, g, b] = RgbeQuad::new(128, 64, 32, 129).to_color();
        let scale = 2.0 / 255.0;
        assert!((r - 128.0 * scale).abs() < 1e-6);
        assert!((g - 64.0 * scale).abs() < 1e-6);
        assert!((b - 32.0 * scale).abs() < 1e-6);
    }

    #[test]
    fn test_extreme_exponents() {
        let [r, _, _] = RgbeQuad::new(255, 0, 0, 1).to_color();
        assert!(r >= 0.0 && r.is_finite());

        let [r, _, _] = RgbeQuad::new(255, 0, 0, 255).to_color();
        assert!(r > 1e38 || r.is_infinite());
    }
}
