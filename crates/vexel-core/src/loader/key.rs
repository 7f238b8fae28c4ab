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

use std::fmt;

/// The deduplication key of a loader instance.
///
/// Exactly one of the two identities is meaningful for a given instance:
/// content-derived for in-memory sources, path-derived for files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum LoaderKey {
    /// Not registered yet.
    #[default]
    Unbound,
    /// Hash of an in-memory source.
    Data(u64),
    /// Path of a file source, owned by the key.
    Path(Box<str>),
}

impl LoaderKey {
    /// Builds a path key.
    pub fn path(path: impl Into<String>) -> Self {
        LoaderKey::Path(path.into().into_boxed_str())
    }

    /// Returns `true` unless the key is [`LoaderKey::Unbound`].
    pub fn is_bound(&self) -> bool {
        !matches!(self, LoaderKey::Unbound)
    }

    /// The content hash, if this is a data key.
    pub fn hash_key(&self) -> Option<u64> {
        match self {
            LoaderKey::Data(hash) => Some(*hash),
            _ => None,
        }
    }

    /// The path, if this is a path key.
    pub fn hash_path(&self) -> Option<&str> {
        match self {
            LoaderKey::Path(path) => Some(path),
            _ => None,
        }
    }
}

impl fmt::Display for LoaderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoaderKey::Unbound => write!(f, "<unbound>"),
            LoaderKey::Data(hash) => write!(f, "data:{hash:016x}"),
            LoaderKey::Path(path) => write!(f, "path:{path}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_expose_only_the_meaningful_identity() {
        let data = LoaderKey::Data(42);
        assert_eq!(data.hash_key(), Some(42));
        assert_eq!(data.hash_path(), None);

        let path = LoaderKey::path("a.png");
        assert_eq!(path.hash_key(), None);
        assert_eq!(path.hash_path(), Some("a.png"));

        assert!(!LoaderKey::default().is_bound());
        assert_eq!(format!("{}", LoaderKey::Data(255)), "data:00000000000000ff");
    }
}
