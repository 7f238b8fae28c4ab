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

//! Generational slot storage for live loaders.

use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use vexel_core::{FileType, LoaderKey, LoaderKind, ShareCount};

use super::RegistryError;

/// Identifies a live entry of a [`LoaderRegistry`](super::LoaderRegistry).
///
/// The generation changes every time a slot is reused, so an id kept past the
/// destruction of its loader never aliases the next occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoaderId {
    /// Slot index.
    pub index: u32,
    /// Generation of the slot when the entry was inserted.
    pub generation: u32,
}

/// A loader shared between the table and every handle to it.
///
/// The share counter lives beside the lock so that sharing and releasing
/// never wait on a decode holding the loader.
pub(crate) struct LoaderCell {
    key: LoaderKey,
    file_type: FileType,
    sharing: ShareCount,
    loader: RwLock<LoaderKind>,
}

impl LoaderCell {
    pub(crate) fn new(key: LoaderKey, loader: LoaderKind) -> Self {
        Self {
            key,
            file_type: loader.file_type(),
            sharing: loader.state().share_count(),
            loader: RwLock::new(loader),
        }
    }

    pub(crate) fn sharing(&self) -> u16 {
        self.sharing.get()
    }

    /// Accounts for one more handle, or refuses once the counter is full.
    pub(crate) fn share(&self) -> Result<(), RegistryError> {
        match self.sharing.share() {
            Some(_) => Ok(()),
            None => {
                log::warn!("Share limit reached for loader {}", self.key);
                Err(RegistryError::ShareLimit(self.key.clone()))
            }
        }
    }

    /// Releases one handle. `true` means it was the last one.
    pub(crate) fn release(&self) -> bool {
        self.sharing.release()
    }

    pub(crate) fn key(&self) -> &LoaderKey {
        &self.key
    }

    pub(crate) fn file_type(&self) -> FileType {
        self.file_type
    }

    // A panic inside a loader leaves its state flags consistent, so the
    // instance stays usable after poisoning.
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, LoaderKind> {
        self.loader.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, LoaderKind> {
        self.loader.write().unwrap_or_else(PoisonError::into_inner)
    }
}

struct Slot {
    generation: u32,
    cell: Option<Arc<LoaderCell>>,
}

/// Slots plus the key index. Always accessed under the registry mutex.
#[derive(Default)]
pub(crate) struct LoaderTable {
    slots: Vec<Slot>,
    free: Vec<u32>,
    index: HashMap<LoaderKey, LoaderId>,
}

impl LoaderTable {
    pub(crate) fn find(&self, key: &LoaderKey) -> Option<(LoaderId, Arc<LoaderCell>)> {
        let id = *self.index.get(key)?;
        self.get(id).map(|cell| (id, cell))
    }

    pub(crate) fn get(&self, id: LoaderId) -> Option<Arc<LoaderCell>> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.cell.clone()
    }

    pub(crate) fn insert(&mut self, cell: Arc<LoaderCell>) -> LoaderId {
        let key = cell.key().clone();
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.cell = Some(cell);
                LoaderId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    cell: Some(cell),
                });
                LoaderId {
                    index,
                    generation: 0,
                }
            }
        };
        self.index.insert(key, id);
        id
    }

    /// Removes the entry if `id` is still current; the caller drops the
    /// returned cell once the table lock is released.
    pub(crate) fn remove(&mut self, id: LoaderId) -> Option<Arc<LoaderCell>> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let cell = slot.cell.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        if self.index.get(cell.key()) == Some(&id) {
            self.index.remove(cell.key());
        }
        Some(cell)
    }

    pub(crate) fn contains(&self, key: &LoaderKey) -> bool {
        self.index.contains_key(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.index.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vexel_lanes::RawLoader;

    fn cell(key: LoaderKey) -> Arc<LoaderCell> {
        Arc::new(LoaderCell::new(
            key,
            LoaderKind::Image(Box::new(RawLoader::new())),
        ))
    }

    #[test]
    fn removed_slots_are_reused_with_a_new_generation() {
        let mut table = LoaderTable::default();
        let a = table.insert(cell(LoaderKey::Data(1)));
        assert_eq!(table.len(), 1);
        assert!(table.contains(&LoaderKey::Data(1)));

        assert!(table.remove(a).is_some());
        assert!(table.remove(a).is_none());
        assert!(!table.contains(&LoaderKey::Data(1)));

        let b = table.insert(cell(LoaderKey::Data(2)));
        assert_eq!(b.index, a.index);
        assert_ne!(b.generation, a.generation);
        assert!(table.get(a).is_none());
        assert!(table.get(b).is_some());
    }

    #[test]
    fn find_returns_the_indexed_cell() {
        let mut table = LoaderTable::default();
        let id = table.insert(cell(LoaderKey::path("a.png")));
        let (found, cell) = table.find(&LoaderKey::path("a.png")).unwrap();
        assert_eq!(found, id);
        assert_eq!(cell.file_type(), FileType::Raw);
        assert!(table.find(&LoaderKey::path("b.png")).is_none());
    }

    #[test]
    fn cell_counter_is_the_loaders_counter() {
        let cell = cell(LoaderKey::Data(3));
        cell.share().unwrap();
        assert_eq!(cell.read().state().sharing(), 1);
        assert!(!cell.read().close());
        assert!(cell.release());
    }
}
