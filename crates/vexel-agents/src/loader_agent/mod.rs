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

//! Acts as the **agent** for the loader subsystem.
//!
//! This module holds the tactical logic of resource loading: deduplication by
//! key, construction through factories, and reference-counted lifetime. The
//! decoding itself is delegated to the lanes in `vexel-lanes` (or to any
//! loader a caller registers a factory for).

mod error;
mod factory;
mod handle;
mod metrics;
mod registry;
mod table;

pub use error::RegistryError;
pub use handle::LoaderHandle;
pub use registry::LoaderRegistry;
pub use table::LoaderId;
