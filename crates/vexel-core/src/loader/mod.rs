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

//! The loader lifecycle contract.
//!
//! Every loader, whatever it decodes, follows the same lifecycle:
//!
//! 1. Constructed by the registry on a cache miss, with its [`LoaderKey`] bound.
//! 2. [`LoadModule::open_path`] or [`LoadModule::open_data`] validates the
//!    header. Failure discards the instance before it is ever shared.
//! 3. [`LoadModule::read`] performs the full decode, at most once.
//! 4. [`LoadModule::sync`] waits for any decode still running in the background.
//! 5. [`LoadModule::close`] is called once per acquired reference; the call
//!    that finds the share count already at zero reports `true`, and the
//!    caller destroys the instance.
//!
//! Image and font loaders extend the base contract through [`ImageLoader`]
//! and [`FontLoader`]; [`LoaderKind`] carries one or the other, selected by
//! the [`FileType`](crate::FileType) tag.

mod font;
mod image;
mod key;
mod kind;
mod state;

pub use font::FontLoader;
pub use image::{ImageInfo, ImageLoader};
pub use key::LoaderKey;
pub use kind::LoaderKind;
pub use state::{LoaderState, ShareCount};

use crate::{scene::Paint, source::SourceData};
use std::path::Path;

/// The base lifecycle every loader implements.
///
/// All operations answer with `bool`. A `false` from `open` is a failure; a
/// `false` from `resize` is a capability answer, not an error.
pub trait LoadModule: Send + Sync {
    /// Shared bookkeeping (key, type, share count, read flag).
    fn state(&self) -> &LoaderState;

    /// Mutable access to the bookkeeping, used by the registry to bind the key.
    fn state_mut(&mut self) -> &mut LoaderState;

    /// Opens a filesystem source and parses its header.
    fn open_path(&mut self, _path: &Path) -> bool {
        false
    }

    /// Opens an in-memory source and parses its header.
    ///
    /// `resource_path` is the directory external references resolve against.
    /// See [`SourceData`] for the ownership contract of `data`.
    fn open_data(&mut self, _data: SourceData<'_>, _resource_path: &str) -> bool {
        false
    }

    /// Rescales the loader's output to `w` x `h` by adjusting `paint`.
    fn resize(&mut self, _paint: &mut Paint, _w: f32, _h: f32) -> bool {
        false
    }

    /// Blocks until any background decode for this instance has finished.
    fn sync(&mut self) {}

    /// Triggers the full decode. Only the first call returns `true`.
    ///
    /// Implementations that override this must gate their work on
    /// [`LoaderState::begin_read`], or on [`LoaderState::begin_deferred_read`]
    /// followed by [`LoaderState::finish_read`] once a background decode has
    /// been joined, so that the once-only contract holds and `readied` never
    /// precedes the payload.
    fn read(&mut self) -> bool {
        self.state().begin_read()
    }

    /// Releases one reference. Returns `true` when the caller now owns the
    /// final destruction.
    fn close(&self) -> bool {
        self.state().release()
    }
}
