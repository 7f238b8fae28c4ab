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

use image::{codecs::gif::GifEncoder, Delay, Frame, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::sync::Arc;
use tempfile::tempdir;
use vexel_core::{ColorSpace, FileType, ImageLoader, LoadModule, LoaderSettings, SourceData};
use vexel_lanes::{RasterLoader, RawLoader};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn encode(img: &RgbaImage, format: ImageFormat) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format).unwrap();
    out.into_inner()
}

fn gif_bytes(frame_count: usize) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut out);
        let frames = (0..frame_count).map(|i| {
            let img = RgbaImage::from_pixel(4, 4, Rgba([i as u8 * 40, 0, 0, 255]));
            Frame::from_parts(img, 0, 0, Delay::from_numer_denom_ms(100, 1))
        });
        encoder.encode_frames(frames).unwrap();
    }
    out
}

#[test]
fn open_png_from_path_then_read_once() -> anyhow::Result<()> {
    init_logger();
    let dir = tempdir()?;
    let path = dir.path().join("a.png");
    let img = RgbaImage::from_pixel(8, 4, Rgba([255, 0, 0, 255]));
    std::fs::write(&path, encode(&img, ImageFormat::Png))?;

    let mut loader = RasterLoader::new(FileType::Png, &LoaderSettings::default());
    assert!(loader.open_path(&path));
    assert!(loader.info().color_space.is_supported());
    assert_eq!((loader.info().width, loader.info().height), (8.0, 4.0));

    assert!(loader.read());
    assert!(!loader.read());

    let surface = loader.bitmap().expect("decoded bitmap");
    assert_eq!(surface.data.len(), 32);
    assert_eq!(surface.pixel(0, 0), Some(0xFF00_00FF));
    assert!(loader.paint().is_none());
    Ok(())
}

#[test]
fn missing_file_fails_to_open() {
    init_logger();
    let dir = tempdir().unwrap();
    let mut loader = RasterLoader::new(FileType::Png, &LoaderSettings::default());
    assert!(!loader.open_path(&dir.path().join("absent.png")));
    assert_eq!(loader.info().color_space, ColorSpace::Unsupported);
}

#[test]
fn async_decode_completes_at_sync() {
    init_logger();
    let settings = LoaderSettings {
        async_decode: true,
        ..LoaderSettings::default()
    };
    let img = RgbaImage::from_pixel(64, 64, Rgba([0, 255, 0, 128]));
    let bytes = encode(&img, ImageFormat::Png);

    let mut loader = RasterLoader::new(FileType::Png, &settings);
    assert!(loader.open_data(SourceData::Copied(&bytes), ""));
    assert!(loader.read());
    assert!(!loader.read());
    // Readied is only published together with the pixels.
    assert_eq!(loader.state().is_readied(), loader.bitmap().is_some());

    loader.sync();
    assert!(!loader.is_decoding());
    assert!(loader.state().is_readied());
    let surface = loader.bitmap().expect("bitmap visible after sync");
    assert_eq!(surface.width, 64);
    assert_eq!(surface.color_space, ColorSpace::Abgr8888S);

    // A second sync has nothing to wait for.
    loader.sync();
    assert!(loader.bitmap().is_some());
}

#[test]
fn async_readied_implies_bitmap() {
    init_logger();
    let settings = LoaderSettings {
        async_decode: true,
        ..LoaderSettings::default()
    };
    let bytes = encode(&RgbaImage::new(256, 256), ImageFormat::Png);
    let mut loader = RasterLoader::new(FileType::Png, &settings);
    assert!(loader.open_data(SourceData::Copied(&bytes), ""));

    assert!(loader.read());
    assert!(loader.state().is_read_pending());
    assert!(!loader.state().is_readied());
    assert!(loader.bitmap().is_none());

    while loader.is_decoding() {
        std::thread::yield_now();
    }
    // The thread is done, but nothing is published before sync joins it.
    assert!(!loader.state().is_readied());

    loader.sync();
    assert!(loader.state().is_readied());
    assert!(!loader.state().is_read_pending());
    assert_eq!(loader.bitmap().map(|s| (s.width, s.height)), Some((256, 256)));
}

#[test]
fn dropping_with_pending_decode_waits_for_it() {
    let settings = LoaderSettings {
        async_decode: true,
        ..LoaderSettings::default()
    };
    let bytes = encode(&RgbaImage::new(32, 32), ImageFormat::Png);
    let mut loader = RasterLoader::new(FileType::Png, &settings);
    assert!(loader.open_data(SourceData::Copied(&bytes), ""));
    assert!(loader.read());
    drop(loader);
}

#[test]
fn shared_buffer_is_adopted_and_outlives_the_caller() {
    init_logger();
    let bytes = encode(&RgbaImage::new(2, 2), ImageFormat::Png);
    let caller: Arc<[u8]> = Arc::from(bytes);

    let mut loader = RasterLoader::new(FileType::Png, &LoaderSettings::default());
    assert!(loader.open_data(SourceData::Shared(caller.clone()), ""));
    assert!(Arc::ptr_eq(loader.source_bytes().unwrap(), &caller));

    // The caller releasing its buffer before close cannot invalidate the loader.
    drop(caller);
    assert!(loader.read());
    assert_eq!(loader.bitmap().map(|s| s.width), Some(2));
}

#[test]
fn copied_buffer_is_duplicated_before_open_returns() {
    let mut bytes = encode(&RgbaImage::new(2, 2), ImageFormat::Png);
    let mut loader = RasterLoader::new(FileType::Png, &LoaderSettings::default());
    assert!(loader.open_data(SourceData::Copied(&bytes), ""));

    let kept = loader.source_bytes().unwrap().clone();
    assert_ne!(kept.as_ptr(), bytes.as_ptr());
    bytes.iter_mut().for_each(|b| *b = 0);
    drop(bytes);
    assert!(loader.read());
    assert!(loader.bitmap().is_some());
}

#[test]
fn animated_gif_is_animatable() {
    init_logger();
    let mut still = RasterLoader::new(FileType::Gif, &LoaderSettings::default());
    assert!(still.open_data(SourceData::Copied(&gif_bytes(1)), ""));
    assert!(!still.animatable());

    let mut animated = RasterLoader::new(FileType::Gif, &LoaderSettings::default());
    assert!(animated.open_data(SourceData::Copied(&gif_bytes(3)), ""));
    assert!(animated.animatable());
}

#[test]
fn raster_loaders_never_resize() {
    let bytes = encode(&RgbaImage::new(2, 2), ImageFormat::Png);
    let mut loader = RasterLoader::new(FileType::Png, &LoaderSettings::default());
    assert!(loader.open_data(SourceData::Copied(&bytes), ""));
    let mut paint = vexel_core::Paint::scene(vec![]);
    assert!(!loader.resize(&mut paint, 10.0, 10.0));
}

#[test]
fn raw_loader_shares_caller_pixels_until_read() {
    let words: Vec<u8> = [0xFFFF_0000u32; 4]
        .iter()
        .flat_map(|w| w.to_ne_bytes())
        .collect();
    let caller: Arc<[u8]> = Arc::from(words);

    let mut loader = RawLoader::new();
    assert!(loader.open_raw(SourceData::Shared(caller.clone()), 2, 2, true));
    assert!(Arc::ptr_eq(loader.source_bytes().unwrap(), &caller));
    assert_eq!(loader.info().color_space, ColorSpace::Argb8888);

    drop(caller);
    assert!(loader.read());
    assert_eq!(loader.bitmap().unwrap().pixel(1, 1), Some(0xFFFF_0000));
}
