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

//! High-level management of loader instances.
//!
//! The [`LoaderRegistry`] is the only way the rest of the engine obtains a
//! loader. It decides cache hits and misses, builds the concrete loader for a
//! source's [`FileType`](vexel_core::FileType) through registered factories,
//! and hands out [`LoaderHandle`]s whose last drop removes the entry.

#![warn(missing_docs)]

pub mod loader_agent;

pub use loader_agent::{LoaderHandle, LoaderId, LoaderRegistry, RegistryError};
