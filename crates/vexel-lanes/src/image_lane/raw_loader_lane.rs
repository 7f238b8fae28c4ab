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

//! Caller-provided raw pixels.

use std::sync::Arc;
use vexel_core::{
    error::{LoaderError, LoaderResult},
    ColorSpace, FileType, ImageInfo, ImageLoader, LoadModule, LoaderState, SourceData, Surface,
};

/// Wraps a buffer of packed ARGB words (native byte order) supplied by the caller.
///
/// Raw pixels carry no header, so the generic `open_data` entry point always
/// fails; use [`RawLoader::open_raw`] with explicit dimensions instead.
pub struct RawLoader {
    state: LoaderState,
    info: ImageInfo,
    pixels: Option<Arc<[u8]>>,
    surface: Option<Surface>,
}

impl RawLoader {
    /// Creates an unopened raw loader.
    pub fn new() -> Self {
        Self {
            state: LoaderState::new(FileType::Raw),
            info: ImageInfo::default(),
            pixels: None,
            surface: None,
        }
    }

    /// Opens `width * height` packed ARGB words.
    ///
    /// `premultiplied` selects between [`ColorSpace::Argb8888`] and
    /// [`ColorSpace::Argb8888S`]. The ownership contract of `data` is the one
    /// described on [`SourceData`].
    pub fn open_raw(
        &mut self,
        data: SourceData<'_>,
        width: u32,
        height: u32,
        premultiplied: bool,
    ) -> bool {
        match Self::validate(&data, width, height) {
            Ok(()) => {
                self.pixels = Some(data.into_shared());
                self.info = ImageInfo {
                    width: width as f32,
                    height: height as f32,
                    color_space: if premultiplied {
                        ColorSpace::Argb8888
                    } else {
                        ColorSpace::Argb8888S
                    },
                };
                true
            }
            Err(e) => {
                log::warn!("Rejected raw pixel buffer: {e}");
                self.info.reset();
                self.pixels = None;
                false
            }
        }
    }

    /// The caller's pixels as kept by the loader, until `read` consumes them.
    pub fn source_bytes(&self) -> Option<&Arc<[u8]>> {
        self.pixels.as_ref()
    }

    fn validate(data: &SourceData<'_>, width: u32, height: u32) -> LoaderResult<()> {
        if width == 0 || height == 0 {
            return Err(LoaderError::InvalidDimensions { width, height });
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or(LoaderError::InvalidDimensions { width, height })?;
        if data.len() != expected {
            return Err(LoaderError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(())
    }
}

impl Default for RawLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadModule for RawLoader {
    fn state(&self) -> &LoaderState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut LoaderState {
        &mut self.state
    }

    fn read(&mut self) -> bool {
        let Some(pixels) = self.pixels.as_ref() else {
            return false;
        };
        if !self.state.begin_read() {
            return false;
        }
        let words = pixels
            .chunks_exact(4)
            .map(|px| u32::from_ne_bytes([px[0], px[1], px[2], px[3]]))
            .collect();
        match Surface::from_words(
            words,
            self.info.width as u32,
            self.info.height as u32,
            self.info.color_space,
        ) {
            Ok(surface) => {
                self.surface = Some(surface);
                self.pixels = None;
            }
            Err(e) => log::warn!("Failed to wrap raw pixels: {e}"),
        }
        true
    }
}

impl ImageLoader for RawLoader {
    fn info(&self) -> &ImageInfo {
        &self.info
    }

    fn bitmap(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words_as_bytes(words: &[u32]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_ne_bytes()).collect()
    }

    #[test]
    fn generic_open_data_is_refused() {
        let mut loader = RawLoader::new();
        assert!(!loader.open_data(SourceData::Copied(&[0; 4]), ""));
    }

    #[test]
    fn size_must_match_dimensions() {
        let mut loader = RawLoader::new();
        assert!(!loader.open_raw(SourceData::Copied(&[0; 12]), 2, 2, true));
        assert!(!loader.open_raw(SourceData::Copied(&[]), 0, 0, true));
        assert_eq!(loader.info(), &ImageInfo::default());
    }

    #[test]
    fn read_produces_surface_in_declared_layout() {
        let bytes = words_as_bytes(&[0xFF00_00FF, 0x8000_0080]);
        let mut loader = RawLoader::new();
        assert!(loader.open_raw(SourceData::Copied(&bytes), 2, 1, false));
        assert_eq!(loader.info().color_space, ColorSpace::Argb8888S);

        assert!(loader.read());
        assert!(!loader.read());
        let surface = loader.bitmap().expect("surface");
        assert_eq!(surface.data, vec![0xFF00_00FF, 0x8000_0080]);
        assert_eq!(surface.color_space, ColorSpace::Argb8888S);
        assert!(loader.source_bytes().is_none());
    }
}
