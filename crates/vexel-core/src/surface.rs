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

//! Decoded raster buffers handed from image loaders to the renderer.

use crate::{color::ColorSpace, error::LoaderError};

/// A decoded, tightly owned raster buffer.
///
/// Image loaders lend a `Surface` through `ImageLoader::bitmap`; the borrow is
/// only valid while the loader is alive.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    /// Packed pixels, `stride * height` words.
    pub data: Vec<u32>,
    /// Words per row.
    pub stride: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Layout of every word in `data`.
    pub color_space: ColorSpace,
}

impl Surface {
    /// Builds a surface from straight-alpha RGBA8 bytes, packing into `color_space`.
    pub fn from_rgba8(
        rgba: &[u8],
        width: u32,
        height: u32,
        color_space: ColorSpace,
    ) -> Result<Self, LoaderError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(LoaderError::BufferSize {
                expected,
                actual: rgba.len(),
            });
        }

        let data = rgba
            .chunks_exact(4)
            .map(|px| {
                color_space
                    .pack([px[0], px[1], px[2], px[3]])
                    .ok_or(LoaderError::UnsupportedColorSpace(color_space))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            data,
            stride: width,
            width,
            height,
            color_space,
        })
    }

    /// Wraps already-packed words.
    pub fn from_words(
        data: Vec<u32>,
        width: u32,
        height: u32,
        color_space: ColorSpace,
    ) -> Result<Self, LoaderError> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(LoaderError::BufferSize {
                expected: expected * 4,
                actual: data.len() * 4,
            });
        }
        Ok(Self {
            data,
            stride: width,
            width,
            height,
            color_space,
        })
    }

    /// Converts every pixel in place to `target`, swizzling and (un)premultiplying.
    pub fn convert(&mut self, target: ColorSpace) -> Result<(), LoaderError> {
        if self.color_space == target {
            return Ok(());
        }
        if !target.is_packed32() {
            return Err(LoaderError::UnsupportedColorSpace(target));
        }
        let source = self.color_space;
        if !source.is_packed32() {
            return Err(LoaderError::UnsupportedColorSpace(source));
        }
        for word in &mut self.data {
            let rgba = source
                .unpack(*word)
                .ok_or(LoaderError::UnsupportedColorSpace(source))?;
            *word = target
                .pack(rgba)
                .ok_or(LoaderError::UnsupportedColorSpace(target))?;
        }
        self.color_space = target;
        Ok(())
    }

    /// Returns the pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get((y * self.stride + x) as usize).copied()
    }

    /// Views the pixel words as bytes for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgba8_packs_and_validates_length() {
        let surface =
            Surface::from_rgba8(&[1, 2, 3, 255, 4, 5, 6, 255], 2, 1, ColorSpace::Argb8888S)
                .unwrap();
        assert_eq!(surface.pixel(0, 0), Some(0xFF01_0203));
        assert_eq!(surface.pixel(1, 0), Some(0xFF04_0506));
        assert_eq!(surface.pixel(2, 0), None);
        assert_eq!(surface.as_bytes().len(), 8);

        let err = Surface::from_rgba8(&[0; 7], 2, 1, ColorSpace::Argb8888S).unwrap_err();
        assert!(matches!(err, LoaderError::BufferSize { expected: 8, .. }));
    }

    #[test]
    fn convert_swizzles_channels() {
        let mut surface = Surface::from_words(vec![0xFF01_0203], 1, 1, ColorSpace::Argb8888S)
            .unwrap();
        surface.convert(ColorSpace::Abgr8888S).unwrap();
        assert_eq!(surface.data[0], 0xFF03_0201);
        assert_eq!(surface.color_space, ColorSpace::Abgr8888S);
    }

    #[test]
    fn convert_rejects_non_packed_targets() {
        let mut surface = Surface::from_words(vec![0], 1, 1, ColorSpace::Abgr8888).unwrap();
        assert!(surface.convert(ColorSpace::Grayscale8).is_err());
        assert_eq!(surface.color_space, ColorSpace::Abgr8888);
    }
}
