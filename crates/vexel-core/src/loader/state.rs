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

use super::LoaderKey;
use crate::format::FileType;
use std::sync::{
    atomic::{AtomicU16, AtomicU8, Ordering},
    Arc,
};

const IDLE: u8 = 0;
const PENDING: u8 = 1;
const READIED: u8 = 2;

/// The share counter of one loader instance.
///
/// Clones observe the same counter, so the registry can share and release a
/// loader without locking its payload.
#[derive(Debug, Clone, Default)]
pub struct ShareCount(Arc<AtomicU16>);

impl ShareCount {
    /// Current number of extra holders.
    pub fn get(&self) -> u16 {
        self.0.load(Ordering::Acquire)
    }

    /// Records one more holder and returns the new count.
    ///
    /// Returns `None` and leaves the count untouched once it reached
    /// `u16::MAX`; the caller must not hand out a new reference then.
    pub fn share(&self) -> Option<u16> {
        self.0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_add(1))
            .ok()
            .map(|previous| previous + 1)
    }

    /// Releases one holder.
    ///
    /// Returns `true` exactly when the count was already zero, meaning the
    /// caller holds the last reference and must destroy the instance.
    /// Otherwise decrements and returns `false`.
    pub fn release(&self) -> bool {
        self.0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_err()
    }
}

/// Bookkeeping embedded in every loader.
///
/// `sharing` counts holders beyond the first. The read flag moves from idle
/// to readied exactly once, either directly or through a pending phase while
/// a background decode runs. Both are atomic so a loader can be queried and
/// released from any render thread without taking its payload lock.
#[derive(Debug)]
pub struct LoaderState {
    key: LoaderKey,
    file_type: FileType,
    sharing: ShareCount,
    read: AtomicU8,
}

impl LoaderState {
    /// Creates unbound bookkeeping for a loader of `file_type`.
    pub fn new(file_type: FileType) -> Self {
        Self {
            key: LoaderKey::Unbound,
            file_type,
            sharing: ShareCount::default(),
            read: AtomicU8::new(IDLE),
        }
    }

    /// The deduplication key.
    pub fn key(&self) -> &LoaderKey {
        &self.key
    }

    /// Binds the deduplication key. Called by the registry before `open`.
    pub fn bind_key(&mut self, key: LoaderKey) {
        self.key = key;
    }

    /// The decoder-kind tag.
    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    /// Current number of extra holders.
    pub fn sharing(&self) -> u16 {
        self.sharing.get()
    }

    /// A handle on the share counter, for owners that must not lock the loader.
    pub fn share_count(&self) -> ShareCount {
        self.sharing.clone()
    }

    /// See [`ShareCount::share`].
    pub fn share(&self) -> Option<u16> {
        let shared = self.sharing.share();
        if shared.is_none() {
            log::warn!("Share limit reached for loader {}", self.key);
        }
        shared
    }

    /// See [`ShareCount::release`].
    pub fn release(&self) -> bool {
        self.sharing.release()
    }

    /// Whether the decoded payload is available.
    ///
    /// Observing `true` also makes every write of the decode visible.
    pub fn is_readied(&self) -> bool {
        self.read.load(Ordering::Acquire) == READIED
    }

    /// Whether a background decode was started and not yet published.
    pub fn is_read_pending(&self) -> bool {
        self.read.load(Ordering::Acquire) == PENDING
    }

    /// Marks the instance readied after an inline decode.
    ///
    /// Returns `true` only for the call that performed the transition.
    pub fn begin_read(&self) -> bool {
        self.transition(IDLE, READIED)
    }

    /// Claims the one read for a decode that finishes later.
    ///
    /// Further `begin_read` calls fail, but `is_readied` stays `false` until
    /// [`finish_read`](Self::finish_read) publishes the payload.
    pub fn begin_deferred_read(&self) -> bool {
        self.transition(IDLE, PENDING)
    }

    /// Publishes the payload of a deferred read.
    pub fn finish_read(&self) -> bool {
        self.transition(PENDING, READIED)
    }

    fn transition(&self, from: u8, to: u8) -> bool {
        self.read
            .compare_exchange(from, to, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}
