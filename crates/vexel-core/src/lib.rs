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

//! Foundational contracts and primitive types for Vexel's resource loaders.
//!
//! This crate defines the "common language" shared by every loader in the
//! engine: the [`loader::LoadModule`] lifecycle (open, read, sync, close), its
//! image and font specializations, and the collaborator types they exchange
//! with the renderer (surfaces, colour spaces, scene stand-ins).
//!
//! It has no knowledge of how loaders are cached or which decoders exist.
//! Concrete decoders live in `vexel-lanes`; the deduplicating registry lives
//! in `vexel-agents`.

#![warn(missing_docs)]

pub mod color;
pub mod error;
pub mod format;
pub mod loader;
pub mod scene;
pub mod settings;
pub mod source;
pub mod surface;
pub mod telemetry;
pub mod utils;

pub use color::ColorSpace;
pub use error::LoaderError;
pub use format::FileType;
pub use loader::{
    FontLoader, ImageInfo, ImageLoader, LoadModule, LoaderKey, LoaderKind, LoaderState,
    ShareCount,
};
pub use scene::{Paint, PathCommand, Point, Shape, Transform};
pub use settings::LoaderSettings;
pub use source::SourceData;
pub use surface::Surface;
pub use utils::timer::Stopwatch;
