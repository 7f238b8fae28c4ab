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

use super::{FontLoader, ImageLoader, LoadModule, LoaderState};
use crate::{format::FileType, scene::Paint, source::SourceData};
use std::path::Path;

/// A loader instance tagged by capability.
///
/// The variant is chosen from the [`FileType`] when the loader is built and
/// never changes, so callers reach image- or font-specific operations without
/// inspecting concrete types.
pub enum LoaderKind {
    /// Raster or vector picture loader.
    Image(Box<dyn ImageLoader>),
    /// Font loader.
    Font(Box<dyn FontLoader>),
}

macro_rules! dispatch {
    ($kind:expr, $loader:ident => $body:expr) => {
        match $kind {
            LoaderKind::Image($loader) => $body,
            LoaderKind::Font($loader) => $body,
        }
    };
}

impl LoaderKind {
    /// Shared bookkeeping of the wrapped loader.
    pub fn state(&self) -> &LoaderState {
        dispatch!(self, loader => loader.state())
    }

    /// Mutable bookkeeping of the wrapped loader.
    pub fn state_mut(&mut self) -> &mut LoaderState {
        dispatch!(self, loader => loader.state_mut())
    }

    /// The decoder-kind tag.
    pub fn file_type(&self) -> FileType {
        self.state().file_type()
    }

    /// See [`LoadModule::open_path`].
    pub fn open_path(&mut self, path: &Path) -> bool {
        dispatch!(self, loader => loader.open_path(path))
    }

    /// See [`LoadModule::open_data`].
    pub fn open_data(&mut self, data: SourceData<'_>, resource_path: &str) -> bool {
        dispatch!(self, loader => loader.open_data(data, resource_path))
    }

    /// See [`LoadModule::resize`].
    pub fn resize(&mut self, paint: &mut Paint, w: f32, h: f32) -> bool {
        dispatch!(self, loader => loader.resize(paint, w, h))
    }

    /// See [`LoadModule::sync`].
    pub fn sync(&mut self) {
        dispatch!(self, loader => loader.sync())
    }

    /// See [`LoadModule::read`].
    pub fn read(&mut self) -> bool {
        dispatch!(self, loader => loader.read())
    }

    /// See [`LoadModule::close`].
    pub fn close(&self) -> bool {
        dispatch!(self, loader => loader.close())
    }

    /// The image capability, if this is an image loader.
    pub fn as_image(&self) -> Option<&dyn ImageLoader> {
        match self {
            LoaderKind::Image(loader) => Some(loader.as_ref()),
            LoaderKind::Font(_) => None,
        }
    }

    /// Mutable image capability.
    pub fn as_image_mut(&mut self) -> Option<&mut dyn ImageLoader> {
        match self {
            LoaderKind::Image(loader) => Some(loader.as_mut()),
            LoaderKind::Font(_) => None,
        }
    }

    /// The font capability, if this is a font loader.
    pub fn as_font(&self) -> Option<&dyn FontLoader> {
        match self {
            LoaderKind::Font(loader) => Some(loader.as_ref()),
            LoaderKind::Image(_) => None,
        }
    }

    /// Mutable font capability.
    pub fn as_font_mut(&mut self) -> Option<&mut dyn FontLoader> {
        match self {
            LoaderKind::Font(loader) => Some(loader.as_mut()),
            LoaderKind::Image(_) => None,
        }
    }
}

impl std::fmt::Debug for LoaderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let variant = match self {
            LoaderKind::Image(_) => "Image",
            LoaderKind::Font(_) => "Font",
        };
        f.debug_struct("LoaderKind")
            .field("variant", &variant)
            .field("state", self.state())
            .finish()
    }
}
