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

//! The decoder-kind tag and the rules for deriving it from a source.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Identifies which concrete decoder owns a loader instance.
///
/// The tag is fixed at construction and drives every routing decision in the
/// registry: which factory builds the loader and whether it is exposed as an
/// image or a font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileType {
    /// Portable Network Graphics.
    Png,
    /// JPEG / JFIF.
    Jpg,
    /// WebP (lossy or lossless).
    Webp,
    /// GIF, possibly animated.
    Gif,
    /// Scalable Vector Graphics.
    Svg,
    /// Lottie JSON animation.
    Lottie,
    /// TrueType / OpenType font.
    Ttf,
    /// Caller-provided raw pixels.
    Raw,
    /// No decoder is known for the source.
    Unknown,
}

impl FileType {
    /// Maps a mime type or short type name (`"png"`, `"image/svg+xml"`, ...) to a tag.
    ///
    /// Matching is case-insensitive; anything unrecognised yields [`FileType::Unknown`].
    pub fn from_mime(mime: &str) -> Self {
        let mime = mime.trim().to_ascii_lowercase();
        let subtype = mime
            .strip_prefix("image/")
            .or_else(|| mime.strip_prefix("font/"))
            .or_else(|| mime.strip_prefix("application/"))
            .unwrap_or(&mime);

        match subtype {
            "png" => FileType::Png,
            "jpg" | "jpeg" => FileType::Jpg,
            "webp" => FileType::Webp,
            "gif" => FileType::Gif,
            "svg" | "svg+xml" => FileType::Svg,
            "lottie" | "json" | "lottie+json" => FileType::Lottie,
            "ttf" | "otf" => FileType::Ttf,
            "raw" => FileType::Raw,
            _ => FileType::Unknown,
        }
    }

    /// Derives the tag from a path's extension.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_mime)
            .unwrap_or(FileType::Unknown)
    }

    /// Detects the tag from the leading bytes of a buffer.
    ///
    /// Raw pixels and Lottie documents carry no signature and are never sniffed.
    pub fn sniff(bytes: &[u8]) -> Self {
        const PNG: &[u8] = b"\x89PNG\r\n\x1a\n";

        if bytes.starts_with(PNG) {
            return FileType::Png;
        }
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return FileType::Jpg;
        }
        if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            return FileType::Webp;
        }
        if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            return FileType::Gif;
        }
        if bytes.starts_with(&[0x00, 0x01, 0x00, 0x00])
            || bytes.starts_with(b"OTTO")
            || bytes.starts_with(b"true")
        {
            return FileType::Ttf;
        }

        let text = bytes
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .map(|start| &bytes[start..])
            .unwrap_or_default();
        if text.starts_with(b"<svg") || text.starts_with(b"<?xml") {
            return FileType::Svg;
        }

        FileType::Unknown
    }

    /// Returns `true` if loaders of this type are exposed as image loaders.
    pub fn is_image(self) -> bool {
        matches!(
            self,
            FileType::Png
                | FileType::Jpg
                | FileType::Webp
                | FileType::Gif
                | FileType::Svg
                | FileType::Lottie
                | FileType::Raw
        )
    }

    /// Returns `true` if loaders of this type are exposed as font loaders.
    pub fn is_font(self) -> bool {
        self == FileType::Ttf
    }

    /// A short, stable name used in keys and log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            FileType::Png => "png",
            FileType::Jpg => "jpg",
            FileType::Webp => "webp",
            FileType::Gif => "gif",
            FileType::Svg => "svg",
            FileType::Lottie => "lottie",
            FileType::Ttf => "ttf",
            FileType::Raw => "raw",
            FileType::Unknown => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_aliases_resolve() {
        assert_eq!(FileType::from_mime("image/png"), FileType::Png);
        assert_eq!(FileType::from_mime("JPEG"), FileType::Jpg);
        assert_eq!(FileType::from_mime("image/svg+xml"), FileType::Svg);
        assert_eq!(FileType::from_mime("svg"), FileType::Svg);
        assert_eq!(FileType::from_mime("lottie+json"), FileType::Lottie);
        assert_eq!(FileType::from_mime("font/otf"), FileType::Ttf);
        assert_eq!(FileType::from_mime("raw"), FileType::Raw);
        assert_eq!(FileType::from_mime("text/plain"), FileType::Unknown);
    }

    #[test]
    fn extension_drives_path_detection() {
        assert_eq!(FileType::from_path(Path::new("assets/a.PNG")), FileType::Png);
        assert_eq!(FileType::from_path(Path::new("font.ttf")), FileType::Ttf);
        assert_eq!(FileType::from_path(Path::new("no_extension")), FileType::Unknown);
    }

    #[test]
    fn sniffing_recognises_signatures() {
        assert_eq!(FileType::sniff(b"\x89PNG\r\n\x1a\nrest"), FileType::Png);
        assert_eq!(FileType::sniff(&[0xFF, 0xD8, 0xFF, 0xE0]), FileType::Jpg);
        assert_eq!(FileType::sniff(b"RIFF\0\0\0\0WEBPVP8 "), FileType::Webp);
        assert_eq!(FileType::sniff(b"GIF89a"), FileType::Gif);
        assert_eq!(FileType::sniff(b"  \n<svg width='1'/>"), FileType::Svg);
        assert_eq!(FileType::sniff(b"OTTO"), FileType::Ttf);
        assert_eq!(FileType::sniff(b""), FileType::Unknown);
        assert_eq!(FileType::sniff(b"{\"v\":\"5.7\"}"), FileType::Unknown);
    }

    #[test]
    fn capability_routing_is_exclusive() {
        for ty in [
            FileType::Png,
            FileType::Jpg,
            FileType::Webp,
            FileType::Gif,
            FileType::Svg,
            FileType::Lottie,
            FileType::Ttf,
            FileType::Raw,
        ] {
            assert_ne!(ty.is_image(), ty.is_font(), "{ty:?}");
        }
        assert!(!FileType::Unknown.is_image());
        assert!(!FileType::Unknown.is_font());
    }
}
