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

use std::{
    fmt,
    sync::{Arc, Weak},
};

use vexel_core::{FileType, FontLoader, ImageInfo, ImageLoader, LoaderKey, Paint};

use super::{
    registry::RegistryShared,
    table::{LoaderCell, LoaderId},
    RegistryError,
};

/// A shared reference to a loader owned by a [`LoaderRegistry`](super::LoaderRegistry).
///
/// Cloning a handle shares the loader; dropping the last handle closes it and
/// removes it from the registry. Both happen under the registry lock, so a
/// loader being destroyed is never handed out by a concurrent load.
///
/// Sharing and releasing only touch the loader's share counter, so they never
/// wait on a decode. The accessors that take a closure hold the loader's lock
/// while the closure runs; calling `read`, `sync`, `resize` or
/// `with_font_mut` on the same loader from inside it deadlocks.
pub struct LoaderHandle {
    id: LoaderId,
    cell: Arc<LoaderCell>,
    registry: Weak<RegistryShared>,
    released: bool,
}

impl LoaderHandle {
    pub(crate) fn new(id: LoaderId, cell: Arc<LoaderCell>, registry: Weak<RegistryShared>) -> Self {
        Self {
            id,
            cell,
            registry,
            released: false,
        }
    }

    /// The registry slot of the loader.
    pub fn id(&self) -> LoaderId {
        self.id
    }

    /// The deduplication key the loader was registered under.
    pub fn key(&self) -> &LoaderKey {
        self.cell.key()
    }

    /// The decoder family of the loader.
    pub fn file_type(&self) -> FileType {
        self.cell.file_type()
    }

    /// Number of handles beyond the first.
    pub fn sharing(&self) -> u16 {
        self.cell.sharing()
    }

    /// Whether the decoded payload is available.
    ///
    /// A background decode is only reported once [`sync`](Self::sync) has
    /// joined it, so `true` guarantees `bitmap` or `paint` is populated.
    pub fn is_readied(&self) -> bool {
        self.cell.read().state().is_readied()
    }

    /// Requests decoding. Returns `true` for exactly one caller across all
    /// handles to the same loader.
    pub fn read(&self) -> bool {
        self.cell.write().read()
    }

    /// Waits for a pending background decode.
    pub fn sync(&self) {
        self.cell.write().sync();
    }

    /// Fits the loader's content into `w` x `h` by transforming `paint`.
    pub fn resize(&self, paint: &mut Paint, w: f32, h: f32) -> bool {
        self.cell.write().resize(paint, w, h)
    }

    /// Returns `true` if both handles refer to the same loader instance.
    pub fn same_loader(&self, other: &LoaderHandle) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }

    /// Runs `f` on the image loader, or returns `None` for font loaders.
    pub fn with_image<R>(&self, f: impl FnOnce(&dyn ImageLoader) -> R) -> Option<R> {
        let guard = self.cell.read();
        guard.as_image().map(f)
    }

    /// Copies the image metadata, or returns `None` for font loaders.
    pub fn image_info(&self) -> Option<ImageInfo> {
        self.with_image(|image| *image.info())
    }

    /// Runs `f` on the font loader, or returns `None` for image loaders.
    pub fn with_font<R>(&self, f: impl FnOnce(&dyn FontLoader) -> R) -> Option<R> {
        let guard = self.cell.read();
        guard.as_font().map(f)
    }

    /// Like [`with_font`](Self::with_font) with exclusive access, e.g. to change the scale.
    pub fn with_font_mut<R>(&self, f: impl FnOnce(&mut dyn FontLoader) -> R) -> Option<R> {
        let mut guard = self.cell.write();
        guard.as_font_mut().map(f)
    }

    /// Releases this handle now instead of at drop.
    ///
    /// Returns `true` if this was the last reference and the loader was
    /// removed from the registry.
    pub fn close(mut self) -> bool {
        self.release()
    }

    fn release(&mut self) -> bool {
        if std::mem::replace(&mut self.released, true) {
            return false;
        }

        let Some(shared) = self.registry.upgrade() else {
            return self.cell.release();
        };

        let mut table = shared.lock_table_recovering();
        if !self.cell.release() {
            return false;
        }
        let removed = table.remove(self.id);
        drop(table);

        if removed.is_some() {
            shared.metrics.adjust_live(-1.0);
            log::debug!("Destroyed loader {} ({:?})", self.cell.key(), self.id);
        }
        // The loader itself is dropped outside the table lock.
        drop(removed);
        true
    }

    /// Shares the loader, failing with [`RegistryError::ShareLimit`] once it
    /// has `u16::MAX` extra handles.
    pub fn try_clone(&self) -> Result<Self, RegistryError> {
        match self.registry.upgrade() {
            Some(shared) => {
                let _table = shared.lock_table_recovering();
                self.cell.share()?;
            }
            None => self.cell.share()?,
        }
        Ok(Self::new(
            self.id,
            Arc::clone(&self.cell),
            Weak::clone(&self.registry),
        ))
    }
}

impl Clone for LoaderHandle {
    /// # Panics
    ///
    /// Panics if the loader already has `u16::MAX` extra handles; use
    /// [`LoaderHandle::try_clone`] to handle that case.
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(handle) => handle,
            Err(e) => panic!("cannot clone loader handle: {e}"),
        }
    }
}

impl Drop for LoaderHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for LoaderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderHandle")
            .field("id", &self.id)
            .field("key", self.cell.key())
            .field("file_type", &self.cell.file_type())
            .finish()
    }
}
