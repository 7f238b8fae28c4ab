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

use super::LoadModule;
use crate::{color::ColorSpace, scene::Paint, surface::Surface};

/// Header metadata every image loader settles during `open`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImageInfo {
    /// Nominal width; valid only after a successful `open`.
    pub width: f32,
    /// Nominal height; valid only after a successful `open`.
    pub height: f32,
    /// Layout of the decoded pixels; `Unsupported` until `open` succeeds.
    pub color_space: ColorSpace,
}

impl ImageInfo {
    /// Clears everything back to the pre-`open` state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A loader that produces either a raster buffer or a vector scene.
///
/// A concrete loader answers meaningfully from exactly one of
/// [`bitmap`](ImageLoader::bitmap) and [`paint`](ImageLoader::paint); which one
/// is decided by the source format.
pub trait ImageLoader: LoadModule {
    /// Nominal size and colour space.
    fn info(&self) -> &ImageInfo;

    /// `true` only for formats that carry animation.
    fn animatable(&self) -> bool {
        false
    }

    /// The decoded raster buffer, borrowed from the loader.
    fn bitmap(&self) -> Option<&Surface> {
        None
    }

    /// The scene root for vector sources, borrowed from the loader.
    fn paint(&self) -> Option<&Paint> {
        None
    }
}
