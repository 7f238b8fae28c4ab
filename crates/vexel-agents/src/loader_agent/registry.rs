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
    fs::File,
    io::Read,
    path::{Component, Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use vexel_core::{
    FileType, FontLoader, ImageLoader, LoadModule, LoaderKey, LoaderKind, LoaderSettings,
    SourceData,
};
use vexel_lanes::{RasterLoader, RawLoader};
use vexel_telemetry::{MetricsRegistry, ScopedMetricTimer};

use super::{
    factory::LoaderFactories,
    metrics::LoaderMetrics,
    table::{LoaderCell, LoaderTable},
    LoaderHandle, RegistryError,
};

/// Bytes read from a file whose type cannot be told from its extension.
const SNIFF_LEN: usize = 64;

/// Raster formats served by [`RasterLoader`] in [`LoaderRegistry::with_default_loaders`].
const RASTER_TYPES: [FileType; 4] = [FileType::Png, FileType::Jpg, FileType::Webp, FileType::Gif];

/// State shared between the registry and the handles it gave out.
pub(crate) struct RegistryShared {
    table: Mutex<LoaderTable>,
    pub(crate) metrics: LoaderMetrics,
}

impl RegistryShared {
    fn lock_table(&self) -> Result<MutexGuard<'_, LoaderTable>, RegistryError> {
        self.table.lock().map_err(|_| RegistryError::Poisoned)
    }

    /// Used on paths that cannot report an error (queries, clone, drop).
    pub(crate) fn lock_table_recovering(&self) -> MutexGuard<'_, LoaderTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Deduplicating owner of every live loader.
///
/// Loads with an equal [`LoaderKey`] return handles to the same instance, so a
/// source is opened and decoded once no matter how many users request it.
pub struct LoaderRegistry {
    shared: Arc<RegistryShared>,
    factories: LoaderFactories,
    settings: LoaderSettings,
}

impl LoaderRegistry {
    /// Creates an empty registry with no factories.
    pub fn new(settings: LoaderSettings, metrics: &MetricsRegistry) -> Result<Self, RegistryError> {
        let metrics = LoaderMetrics::register(metrics)?;
        Ok(Self {
            shared: Arc::new(RegistryShared {
                table: Mutex::new(LoaderTable::default()),
                metrics,
            }),
            factories: LoaderFactories::default(),
            settings,
        })
    }

    /// Creates a registry serving PNG, JPEG, WebP and GIF through [`RasterLoader`].
    ///
    /// Raw pixels are always available through [`load_raw`](Self::load_raw).
    pub fn with_default_loaders(
        settings: LoaderSettings,
        metrics: &MetricsRegistry,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new(settings, metrics)?;
        for file_type in RASTER_TYPES {
            registry.register_image_factory(file_type, move |settings| -> Box<dyn ImageLoader> {
                Box::new(RasterLoader::new(file_type, settings))
            })?;
        }
        log::info!(
            "Loader registry ready (async decode: {})",
            registry.settings.async_decode
        );
        Ok(registry)
    }

    /// Registers the constructor of image loaders for `file_type`, replacing any previous one.
    pub fn register_image_factory<F>(
        &mut self,
        file_type: FileType,
        factory: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&LoaderSettings) -> Box<dyn ImageLoader> + Send + Sync + 'static,
    {
        self.factories.register_image(file_type, Box::new(factory))
    }

    /// Registers the constructor of font loaders for `file_type`, replacing any previous one.
    pub fn register_font_factory<F>(
        &mut self,
        file_type: FileType,
        factory: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&LoaderSettings) -> Box<dyn FontLoader> + Send + Sync + 'static,
    {
        self.factories.register_font(file_type, Box::new(factory))
    }

    /// Returns `true` if a factory serves `file_type`.
    pub fn has_factory(&self, file_type: FileType) -> bool {
        self.factories.contains(file_type)
    }

    /// Settings passed to every factory.
    pub fn settings(&self) -> &LoaderSettings {
        &self.settings
    }

    /// Loads a file, reusing the live loader for the same path.
    ///
    /// The type comes from `file_type` if given, else the extension, else the
    /// first bytes of the file. It is only determined when no loader exists yet.
    pub fn load_path(
        &self,
        path: impl AsRef<Path>,
        file_type: Option<FileType>,
    ) -> Result<LoaderHandle, RegistryError> {
        let path = path.as_ref();
        let key = LoaderKey::path(normalize(path).to_string_lossy());

        self.acquire(key, |key| {
            let file_type = match file_type {
                Some(file_type) => file_type,
                None => detect_path_type(path)?,
            };
            self.open_with(file_type, key, |loader| loader.open_path(path))
        })
    }

    /// Loads an in-memory source, reusing the live loader for identical content.
    ///
    /// `mime` may be a mime type or a short name (`"png"`); when it names no
    /// known format the bytes are sniffed. `resource_path` is forwarded to the
    /// loader for resolving external references.
    pub fn load_data(
        &self,
        data: SourceData<'_>,
        mime: &str,
        resource_path: &str,
    ) -> Result<LoaderHandle, RegistryError> {
        let file_type = match FileType::from_mime(mime) {
            FileType::Unknown => FileType::sniff(data.as_bytes()),
            file_type => file_type,
        };
        if file_type == FileType::Unknown {
            return Err(RegistryError::UnknownFileType(format!(
                "{} bytes of '{mime}' data",
                data.len()
            )));
        }

        let key = LoaderKey::Data(data.content_hash(file_type.as_str()));
        self.acquire(key, |key| {
            self.open_with(file_type, key, |loader| loader.open_data(data, resource_path))
        })
    }

    /// Loads `width * height` packed ARGB words.
    ///
    /// Identical pixels with different dimensions or alpha mode get distinct loaders.
    pub fn load_raw<'a>(
        &self,
        data: impl Into<SourceData<'a>>,
        width: u32,
        height: u32,
        premultiplied: bool,
    ) -> Result<LoaderHandle, RegistryError> {
        let data = data.into();
        let tag = format!("raw:{width}x{height}:{premultiplied}");
        let key = LoaderKey::Data(data.content_hash(&tag));

        self.acquire(key, |key| {
            let mut loader = RawLoader::new();
            loader.state_mut().bind_key(key.clone());
            if loader.open_raw(data, width, height, premultiplied) {
                Ok(LoaderKind::Image(Box::new(loader)))
            } else {
                Err(RegistryError::OpenFailed(key.clone()))
            }
        })
    }

    /// Returns a new handle to the live loader for `key`, if any.
    pub fn get(&self, key: &LoaderKey) -> Result<Option<LoaderHandle>, RegistryError> {
        let table = self.shared.lock_table()?;
        let Some((id, cell)) = table.find(key) else {
            return Ok(None);
        };
        cell.share()?;
        Ok(Some(LoaderHandle::new(id, cell, Arc::downgrade(&self.shared))))
    }

    /// Returns `true` if a loader is registered under `key`.
    pub fn contains(&self, key: &LoaderKey) -> bool {
        self.shared.lock_table_recovering().contains(key)
    }

    /// Number of live loaders.
    pub fn len(&self) -> usize {
        self.shared.lock_table_recovering().len()
    }

    /// Returns `true` if no loader is alive.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hit or miss for `key`, all under the table lock.
    ///
    /// A hit only touches the loader's share counter, so it never waits on a
    /// decode in progress.
    fn acquire<F>(&self, key: LoaderKey, build: F) -> Result<LoaderHandle, RegistryError>
    where
        F: FnOnce(&LoaderKey) -> Result<LoaderKind, RegistryError>,
    {
        let metrics = &self.shared.metrics;
        let mut table = self.shared.lock_table()?;

        if let Some((id, cell)) = table.find(&key) {
            cell.share()?;
            LoaderMetrics::count(&metrics.cache_hits);
            log::trace!("Reusing loader {key} ({id:?})");
            return Ok(LoaderHandle::new(id, cell, Arc::downgrade(&self.shared)));
        }

        LoaderMetrics::count(&metrics.cache_misses);
        let built = {
            let _timer = ScopedMetricTimer::new(&metrics.open_time);
            build(&key)
        };
        let loader = match built {
            Ok(loader) => loader,
            Err(e) => {
                if matches!(e, RegistryError::OpenFailed(_)) {
                    LoaderMetrics::count(&metrics.open_failures);
                }
                log::warn!("Failed to load {key}: {e}");
                return Err(e);
            }
        };

        let cell = Arc::new(LoaderCell::new(key, loader));
        let id = table.insert(Arc::clone(&cell));
        metrics.adjust_live(1.0);
        log::debug!(
            "Registered {:?} loader {} as {id:?}",
            cell.file_type(),
            cell.key()
        );
        Ok(LoaderHandle::new(id, cell, Arc::downgrade(&self.shared)))
    }

    fn open_with<F>(
        &self,
        file_type: FileType,
        key: &LoaderKey,
        open: F,
    ) -> Result<LoaderKind, RegistryError>
    where
        F: FnOnce(&mut LoaderKind) -> bool,
    {
        let mut loader = self.factories.build(file_type, &self.settings)?;
        loader.state_mut().bind_key(key.clone());
        if open(&mut loader) {
            Ok(loader)
        } else {
            Err(RegistryError::OpenFailed(key.clone()))
        }
    }
}

/// Drops `.` components so `./a.png` and `a.png` share a key.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}

fn detect_path_type(path: &Path) -> Result<FileType, RegistryError> {
    let from_extension = FileType::from_path(path);
    if from_extension != FileType::Unknown {
        return Ok(from_extension);
    }

    let io_error = |source| RegistryError::Io {
        path: path.display().to_string(),
        source,
    };
    let mut head = Vec::with_capacity(SNIFF_LEN);
    File::open(path)
        .map_err(io_error)?
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut head)
        .map_err(io_error)?;

    match FileType::sniff(&head) {
        FileType::Unknown => Err(RegistryError::UnknownFileType(path.display().to_string())),
        file_type => Ok(file_type),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_drops_current_dir_components() {
        assert_eq!(normalize(Path::new("./a/./b.png")), PathBuf::from("a/b.png"));
        assert_eq!(normalize(Path::new("a/../b.png")), PathBuf::from("a/../b.png"));
    }

    #[test]
    fn extension_wins_over_content() {
        assert_eq!(detect_path_type(Path::new("missing.png")).unwrap(), FileType::Png);
        assert!(matches!(
            detect_path_type(Path::new("missing.bin")),
            Err(RegistryError::Io { .. })
        ));
    }
}
