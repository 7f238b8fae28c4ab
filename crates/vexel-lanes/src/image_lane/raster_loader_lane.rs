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

//! Raster picture loading through the `image` crate.

use super::DecodeTask;
use image::{codecs::gif::GifDecoder, AnimationDecoder, ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use vexel_core::{
    error::{LoaderError, LoaderResult},
    ColorSpace, FileType, ImageInfo, ImageLoader, LoadModule, LoaderSettings, LoaderState,
    SourceData, Surface,
};

/// Loads PNG, JPEG, WebP and GIF pictures into a [`Surface`].
///
/// `open` only parses the header (size, container check, animation); the
/// pixels are decoded by `read`, either inline or on a background thread when
/// [`LoaderSettings::async_decode`] is set. The encoded bytes are released
/// once they are handed to the background thread or decoded inline.
pub struct RasterLoader {
    state: LoaderState,
    info: ImageInfo,
    target: ColorSpace,
    async_decode: bool,
    thread_name: String,
    encoded: Option<Arc<[u8]>>,
    frames: usize,
    surface: Option<Surface>,
    task: Option<DecodeTask<Surface>>,
}

impl RasterLoader {
    /// Creates a loader for one of the raster file types.
    pub fn new(file_type: FileType, settings: &LoaderSettings) -> Self {
        let target = if settings.color_space.is_packed32() {
            settings.color_space
        } else {
            log::warn!(
                "Raster loaders cannot decode into {:?}; falling back to Abgr8888S",
                settings.color_space
            );
            ColorSpace::Abgr8888S
        };

        Self {
            state: LoaderState::new(file_type),
            info: ImageInfo::default(),
            target,
            async_decode: settings.async_decode,
            thread_name: settings.decode_thread_name.clone(),
            encoded: None,
            frames: 0,
            surface: None,
            task: None,
        }
    }

    /// The encoded bytes still held by the loader, if decoding has not started.
    pub fn source_bytes(&self) -> Option<&Arc<[u8]>> {
        self.encoded.as_ref()
    }

    /// Returns `true` while the background decode thread is still running.
    pub fn is_decoding(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    fn expected_format(&self) -> Option<ImageFormat> {
        match self.state.file_type() {
            FileType::Png => Some(ImageFormat::Png),
            FileType::Jpg => Some(ImageFormat::Jpeg),
            FileType::Webp => Some(ImageFormat::WebP),
            FileType::Gif => Some(ImageFormat::Gif),
            _ => None,
        }
    }

    fn parse_header(&mut self, bytes: Arc<[u8]>) -> LoaderResult<()> {
        let expected = LoaderError::FormatMismatch {
            expected: self.state.file_type(),
        };
        let format = self.expected_format().ok_or(expected)?;
        let guessed = image::guess_format(&bytes).map_err(|e| LoaderError::Decode(e.to_string()))?;
        if guessed != format {
            return Err(LoaderError::FormatMismatch {
                expected: self.state.file_type(),
            });
        }

        let (width, height) = ImageReader::with_format(Cursor::new(&bytes[..]), format)
            .into_dimensions()
            .map_err(|e| LoaderError::Decode(e.to_string()))?;
        if width == 0 || height == 0 {
            return Err(LoaderError::InvalidDimensions { width, height });
        }

        self.frames = if format == ImageFormat::Gif {
            count_frames(&bytes)?
        } else {
            1
        };
        self.info = ImageInfo {
            width: width as f32,
            height: height as f32,
            color_space: self.target,
        };
        self.encoded = Some(bytes);
        Ok(())
    }

    fn finish_open(&mut self, result: LoaderResult<()>, source: &str) -> bool {
        match result {
            Ok(()) => {
                log::debug!(
                    "Opened {} picture {source} ({}x{})",
                    self.state.file_type().as_str(),
                    self.info.width,
                    self.info.height
                );
                true
            }
            Err(e) => {
                log::warn!("Failed to open {source}: {e}");
                self.info.reset();
                self.encoded = None;
                self.frames = 0;
                false
            }
        }
    }

    /// Stores a deferred decode's result and publishes `readied` on success.
    fn publish(&mut self, result: LoaderResult<Surface>) {
        match result {
            Ok(surface) => {
                self.surface = Some(surface);
                self.state.finish_read();
            }
            Err(e) => log::warn!("Failed to decode picture {}: {e}", self.state.key()),
        }
    }
}

fn count_frames(bytes: &[u8]) -> LoaderResult<usize> {
    let decoder =
        GifDecoder::new(Cursor::new(bytes)).map_err(|e| LoaderError::Decode(e.to_string()))?;
    // Two decoded frames are enough to tell a still from an animation.
    Ok(decoder.into_frames().take(2).filter(Result::is_ok).count())
}

fn decode(bytes: &[u8], format: ImageFormat, target: ColorSpace) -> LoaderResult<Surface> {
    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| LoaderError::Decode(e.to_string()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Surface::from_rgba8(rgba.as_raw(), width, height, target)
}

impl LoadModule for RasterLoader {
    fn state(&self) -> &LoaderState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut LoaderState {
        &mut self.state
    }

    fn open_path(&mut self, path: &Path) -> bool {
        let result = std::fs::read(path)
            .map_err(|source| LoaderError::Io {
                path: path.display().to_string(),
                source,
            })
            .and_then(|bytes| self.parse_header(Arc::from(bytes)));
        self.finish_open(result, &path.display().to_string())
    }

    fn open_data(&mut self, data: SourceData<'_>, _resource_path: &str) -> bool {
        let result = self.parse_header(data.into_shared());
        self.finish_open(result, "<memory>")
    }

    fn read(&mut self) -> bool {
        let (Some(bytes), Some(format)) = (self.encoded.clone(), self.expected_format()) else {
            return false;
        };
        let target = self.target;

        if self.async_decode {
            if !self.state.begin_deferred_read() {
                return false;
            }
            self.encoded = None;
            match DecodeTask::spawn(&self.thread_name, move || decode(&bytes, format, target)) {
                Ok(task) => self.task = Some(task),
                Err(inline) => {
                    let result = inline();
                    self.publish(result);
                }
            }
            return true;
        }

        if self.state.is_readied() || self.state.is_read_pending() {
            return false;
        }
        match decode(&bytes, format, target) {
            Ok(surface) => {
                self.surface = Some(surface);
                self.encoded = None;
                self.state.begin_read()
            }
            Err(e) => {
                log::warn!("Failed to decode picture {}: {e}", self.state.key());
                false
            }
        }
    }

    fn sync(&mut self) {
        if let Some(task) = self.task.take() {
            let result = task.wait();
            self.publish(result);
        }
    }
}

impl ImageLoader for RasterLoader {
    fn info(&self) -> &ImageInfo {
        &self.info
    }

    fn animatable(&self) -> bool {
        self.frames > 1
    }

    fn bitmap(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }
}

impl Drop for RasterLoader {
    fn drop(&mut self) {
        // A running decode is never abandoned.
        self.sync();
    }
}
