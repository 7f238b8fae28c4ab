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

//! Tunables shared by every loader built through the registry.

use crate::color::ColorSpace;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings passed to loader factories.
///
/// Settings are plain data and are usually read from a RON file:
///
/// ```
/// use vexel_core::{ColorSpace, LoaderSettings};
///
/// let settings = LoaderSettings::from_ron_str("(async_decode: true)").unwrap();
/// assert!(settings.async_decode);
/// assert_eq!(settings.color_space, ColorSpace::Abgr8888S);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderSettings {
    /// Run raster decodes on a background thread; `sync` waits for them.
    pub async_decode: bool,
    /// Layout raster loaders decode into.
    pub color_space: ColorSpace,
    /// Name given to background decode threads.
    pub decode_thread_name: String,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            async_decode: false,
            color_space: ColorSpace::Abgr8888S,
            decode_thread_name: "vexel-decode".to_string(),
        }
    }
}

impl LoaderSettings {
    /// Parses settings from RON. Missing fields take their default.
    pub fn from_ron_str(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }

    /// Reads and parses a RON settings file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read loader settings from '{}'", path.display()))?;
        let settings = Self::from_ron_str(&text)
            .with_context(|| format!("Failed to parse loader settings in '{}'", path.display()))?;
        log::debug!("Loaded loader settings from '{}': {settings:?}", path.display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let settings = LoaderSettings::from_ron_str("()").unwrap();
        assert_eq!(settings, LoaderSettings::default());
    }

    #[test]
    fn fields_override_defaults() {
        let settings = LoaderSettings::from_ron_str(
            "(async_decode: true, color_space: Argb8888, decode_thread_name: \"io\")",
        )
        .unwrap();
        assert!(settings.async_decode);
        assert_eq!(settings.color_space, ColorSpace::Argb8888);
        assert_eq!(settings.decode_thread_name, "io");
    }

    #[test]
    fn from_file_reports_path_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loaders.ron");
        std::fs::write(&path, "(async_decode: maybe)").unwrap();

        let err = LoaderSettings::from_file(&path).unwrap_err();
        assert!(format!("{err}").contains("loaders.ron"));

        std::fs::write(&path, "(async_decode: false)").unwrap();
        assert!(!LoaderSettings::from_file(&path).unwrap().async_decode);
    }
}
