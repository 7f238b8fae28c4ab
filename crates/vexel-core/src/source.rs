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

//! In-memory sources and their ownership contract.

use std::sync::Arc;

/// Bytes handed to `LoadModule::open_data`, tagged with who owns them.
///
/// The variant is the ownership contract:
/// - [`SourceData::Copied`] borrows the caller's buffer for the duration of the
///   call only. The loader duplicates it before returning, so the caller may
///   free its buffer immediately afterwards.
/// - [`SourceData::Shared`] hands the loader a reference to the caller's
///   allocation without copying. The allocation stays alive for as long as the
///   loader keeps it, whatever the caller does with its own reference.
#[derive(Debug, Clone)]
pub enum SourceData<'a> {
    /// Duplicate before returning.
    Copied(&'a [u8]),
    /// Adopt without copying.
    Shared(Arc<[u8]>),
}

impl<'a> SourceData<'a> {
    /// The bytes, regardless of ownership.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            SourceData::Copied(bytes) => bytes,
            SourceData::Shared(bytes) => bytes,
        }
    }

    /// Returns `true` under the copy contract.
    pub fn is_copy(&self) -> bool {
        matches!(self, SourceData::Copied(_))
    }

    /// Number of bytes.
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Returns `true` if there are no bytes.
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// Produces the allocation a loader keeps.
    ///
    /// `Copied` data is duplicated exactly once here; `Shared` data is adopted
    /// as-is, so `Arc::ptr_eq` holds between the caller's and the loader's copy.
    pub fn into_shared(self) -> Arc<[u8]> {
        match self {
            SourceData::Copied(bytes) => Arc::from(bytes),
            SourceData::Shared(bytes) => bytes,
        }
    }

    /// Derives the content hash used as a registry key.
    ///
    /// The declared type tag is mixed in so the same bytes declared as two
    /// different formats do not collide.
    pub fn content_hash(&self, type_tag: &str) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(type_tag.as_bytes());
        hasher.update(&[0]);
        hasher.update(self.as_bytes());
        let digest = hasher.finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest.as_bytes()[..8]);
        u64::from_le_bytes(head)
    }
}

impl From<Arc<[u8]>> for SourceData<'static> {
    fn from(bytes: Arc<[u8]>) -> Self {
        SourceData::Shared(bytes)
    }
}

impl<'a> From<&'a [u8]> for SourceData<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        SourceData::Copied(bytes)
    }
}
