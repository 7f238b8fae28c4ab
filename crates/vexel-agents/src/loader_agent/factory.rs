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

//! Per-file-type constructors for concrete loaders.

use std::collections::HashMap;

use vexel_core::{FileType, FontLoader, ImageLoader, LoaderKind, LoaderSettings};

use super::RegistryError;

type ImageFactory = Box<dyn Fn(&LoaderSettings) -> Box<dyn ImageLoader> + Send + Sync>;
type FontFactory = Box<dyn Fn(&LoaderSettings) -> Box<dyn FontLoader> + Send + Sync>;

enum Factory {
    Image(ImageFactory),
    Font(FontFactory),
}

/// Maps each [`FileType`] to the constructor of the loader that serves it.
#[derive(Default)]
pub(crate) struct LoaderFactories {
    factories: HashMap<FileType, Factory>,
}

impl LoaderFactories {
    pub(crate) fn register_image(
        &mut self,
        file_type: FileType,
        factory: ImageFactory,
    ) -> Result<(), RegistryError> {
        if !file_type.is_image() {
            return Err(RegistryError::CapabilityMismatch(file_type));
        }
        self.replace(file_type, Factory::Image(factory));
        Ok(())
    }

    pub(crate) fn register_font(
        &mut self,
        file_type: FileType,
        factory: FontFactory,
    ) -> Result<(), RegistryError> {
        if !file_type.is_font() {
            return Err(RegistryError::CapabilityMismatch(file_type));
        }
        self.replace(file_type, Factory::Font(factory));
        Ok(())
    }

    fn replace(&mut self, file_type: FileType, factory: Factory) {
        if self.factories.insert(file_type, factory).is_some() {
            log::debug!("Replaced loader factory for {file_type:?}");
        }
    }

    pub(crate) fn contains(&self, file_type: FileType) -> bool {
        self.factories.contains_key(&file_type)
    }

    pub(crate) fn build(
        &self,
        file_type: FileType,
        settings: &LoaderSettings,
    ) -> Result<LoaderKind, RegistryError> {
        match self.factories.get(&file_type) {
            Some(Factory::Image(make)) => Ok(LoaderKind::Image(make(settings))),
            Some(Factory::Font(make)) => Ok(LoaderKind::Font(make(settings))),
            None => Err(RegistryError::NoFactory(file_type)),
        }
    }
}
