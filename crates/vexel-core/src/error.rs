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

//! Error types produced inside loaders before they collapse to a boolean answer.

use crate::{color::ColorSpace, format::FileType};
use thiserror::Error;

/// Reasons a loader can fail to open or decode a source.
///
/// The polymorphic loader surface only reports `bool`; concrete decoders use
/// this type internally and log it before answering `false`.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The source could not be read from disk.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// The path that failed to read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The bytes do not match the container this loader understands.
    #[error("source is not a valid {expected:?} container")]
    FormatMismatch {
        /// The file type the loader was constructed for.
        expected: FileType,
    },
    /// The header or payload could not be decoded.
    #[error("decode failed: {0}")]
    Decode(String),
    /// A size declared by the caller or the header is unusable.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions {
        /// Declared width in pixels.
        width: u32,
        /// Declared height in pixels.
        height: u32,
    },
    /// A raw pixel buffer does not hold `width * height` words.
    #[error("buffer holds {actual} bytes, expected {expected}")]
    BufferSize {
        /// Bytes required by the declared dimensions.
        expected: usize,
        /// Bytes actually provided.
        actual: usize,
    },
    /// A conversion target is not a packed 32-bit colour space.
    #[error("colour space {0:?} is not supported for this operation")]
    UnsupportedColorSpace(ColorSpace),
    /// The background decode thread panicked or could not be spawned.
    #[error("background decode failed: {0}")]
    Task(String),
}

/// A specialized `Result` type for loader internals.
pub type LoaderResult<T> = Result<T, LoaderError>;
