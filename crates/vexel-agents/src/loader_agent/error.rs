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

use thiserror::Error;
use vexel_core::{telemetry::MetricsError, FileType, LoaderKey};

/// Errors returned by [`LoaderRegistry`](super::LoaderRegistry) operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Neither the hint, the extension nor the content identify a format.
    #[error("cannot determine the file type of {0}")]
    UnknownFileType(String),
    /// No factory is registered for the file type.
    #[error("no loader registered for {0:?}")]
    NoFactory(FileType),
    /// A factory was registered under a type of the other capability.
    #[error("{0:?} cannot be served by this kind of loader")]
    CapabilityMismatch(FileType),
    /// The loader rejected the source; nothing was registered.
    #[error("failed to open {0}")]
    OpenFailed(LoaderKey),
    /// The loader already has the maximum number of handles.
    #[error("too many handles to {0}")]
    ShareLimit(LoaderKey),
    /// The source could not be inspected.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// Path being inspected.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Metric registration failed.
    #[error("metrics error: {0}")]
    Metrics(#[from] MetricsError),
    /// A thread panicked while holding the registry table.
    #[error("loader table poisoned")]
    Poisoned,
}
