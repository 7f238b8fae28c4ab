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

use super::LoadModule;
use crate::scene::Shape;

/// A loader that turns text into glyph outlines.
pub trait FontLoader: LoadModule {
    /// Factor applied to every produced glyph. Defaults to `1.0`.
    fn scale(&self) -> f32;

    /// Changes the glyph scale for subsequent requests.
    fn set_scale(&mut self, scale: f32);

    /// Shapes `text` into `shape` at the current scale.
    ///
    /// `italic` is a style request the font may synthesize. Returns `false`
    /// when shaping fails (missing glyphs, corrupt tables), in which case
    /// `shape` must be left exactly as it was. [`Shape::append_staged`] gives
    /// that guarantee for free.
    fn request(&self, shape: &mut Shape, text: &str, italic: bool) -> bool;
}
