// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Colour-space descriptors for decoded raster buffers.

use serde::{Deserialize, Serialize};

/// Describes how the 8-bit channels of a pixel are packed into a 32-bit word.
///
/// Image loaders start out as [`ColorSpace::Unsupported`] and must settle on a
/// concrete value during `open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColorSpace {
    /// `a << 24 | b << 16 | g << 8 | r`, alpha-premultiplied.
    Abgr8888,
    /// `a << 24 | r << 16 | g << 8 | b`, alpha-premultiplied.
    Argb8888,
    /// `a << 24 | b << 16 | g << 8 | r`, straight alpha.
    Abgr8888S,
    /// `a << 24 | r << 16 | g << 8 | b`, straight alpha.
    Argb8888S,
    /// One 8-bit luminance channel.
    Grayscale8,
    /// Not yet determined, or not representable.
    #[default]
    Unsupported,
}

impl ColorSpace {
    /// Returns `true` for every value except [`ColorSpace::Unsupported`].
    pub fn is_supported(self) -> bool {
        self != ColorSpace::Unsupported
    }

    /// Returns `true` if colour channels are stored multiplied by alpha.
    pub fn is_premultiplied(self) -> bool {
        matches!(self, ColorSpace::Abgr8888 | ColorSpace::Argb8888)
    }

    /// Returns `true` for the four packed 32-bit layouts.
    pub fn is_packed32(self) -> bool {
        matches!(
            self,
            ColorSpace::Abgr8888 | ColorSpace::Argb8888 | ColorSpace::Abgr8888S | ColorSpace::Argb8888S
        )
    }

    /// Packs straight-alpha RGBA channels into a word of this layout.
    ///
    /// Returns `None` for layouts that are not packed 32-bit.
    pub fn pack(self, [r, g, b, a]: [u8; 4]) -> Option<u32> {
        if !self.is_packed32() {
            return None;
        }
        let (r, g, b) = if self.is_premultiplied() {
            (multiply(r, a), multiply(g, a), multiply(b, a))
        } else {
            (r, g, b)
        };
        let word = match self {
            ColorSpace::Abgr8888 | ColorSpace::Abgr8888S => {
                u32::from(a) << 24 | u32::from(b) << 16 | u32::from(g) << 8 | u32::from(r)
            }
            _ => u32::from(a) << 24 | u32::from(r) << 16 | u32::from(g) << 8 | u32::from(b),
        };
        Some(word)
    }

    /// Unpacks a word of this layout into straight-alpha RGBA channels.
    pub fn unpack(self, word: u32) -> Option<[u8; 4]> {
        if !self.is_packed32() {
            return None;
        }
        let a = (word >> 24) as u8;
        let hi = (word >> 16) as u8;
        let g = (word >> 8) as u8;
        let lo = word as u8;
        let (r, b) = match self {
            ColorSpace::Abgr8888 | ColorSpace::Abgr8888S => (lo, hi),
            _ => (hi, lo),
        };
        if self.is_premultiplied() {
            Some([divide(r, a), divide(g, a), divide(b, a), a])
        } else {
            Some([r, g, b, a])
        }
    }
}

fn multiply(channel: u8, alpha: u8) -> u8 {
    ((u16::from(channel) * u16::from(alpha) + 127) / 255) as u8
}

fn divide(channel: u8, alpha: u8) -> u8 {
    if alpha == 0 {
        return 0;
    }
    ((u16::from(channel) * 255 + u16::from(alpha) / 2) / u16::from(alpha)).min(255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unsupported() {
        assert_eq!(ColorSpace::default(), ColorSpace::Unsupported);
        assert!(!ColorSpace::default().is_supported());
    }

    #[test]
    fn channel_order_follows_layout() {
        let px = [0x11, 0x22, 0x33, 0xFF];
        assert_eq!(ColorSpace::Abgr8888S.pack(px), Some(0xFF33_2211));
        assert_eq!(ColorSpace::Argb8888S.pack(px), Some(0xFF11_2233));
        assert_eq!(ColorSpace::Grayscale8.pack(px), None);
    }

    #[test]
    fn premultiplied_layouts_scale_by_alpha() {
        let word = ColorSpace::Argb8888.pack([255, 128, 0, 128]).unwrap();
        assert_eq!(word >> 24, 128);
        assert_eq!((word >> 16) & 0xFF, 128);
        assert_eq!(word & 0xFF, 0);

        let back = ColorSpace::Argb8888.unpack(word).unwrap();
        assert_eq!(back[3], 128);
        assert_eq!(back[0], 255);
    }

    #[test]
    fn transparent_pixels_unpack_to_zero() {
        assert_eq!(ColorSpace::Abgr8888.unpack(0x0000_0000), Some([0, 0, 0, 0]));
    }
}
