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

//! Hot-path decoders that implement the loader contracts from `vexel-core`.
//!
//! Each lane owns one family of sources:
//! - [`image_lane::RasterLoader`]: PNG, JPEG, WebP and GIF through the `image` crate,
//!   optionally decoded on a background thread.
//! - [`image_lane::RawLoader`]: caller-provided packed ARGB pixels.

#![warn(missing_docs)]

pub mod image_lane;

pub use image_lane::{RasterLoader, RawLoader};
