// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! CoreVideo / Metal backend for macOS and iOS.

pub mod capture_delegate;
pub(crate) mod corevideo_ffi;
pub mod pixel_buffer;
pub mod texture_cache;

use parking_lot::Mutex;

pub use capture_delegate::CaptureDelegate;
pub use pixel_buffer::PixelBuffer;
pub use texture_cache::{MetalTexture, MetalTextureCache, MetalTextureCacheProvider};

/// Bridge backed by the CoreVideo Metal texture cache.
pub type MetalFrameBridge<O> = crate::core::FrameTextureBridge<MetalTextureCacheProvider, O>;

/// Global lock for CoreVideo initialization operations.
///
/// CoreVideo's internal `_pixelFormatDictionaryInit` is not thread-safe and can crash
/// when `CVMetalTextureCacheCreate` races with AVFoundation's `AVCaptureDeviceInput`
/// initialization or another CoreVideo init call.
///
/// [`MetalTextureCache::new`] holds it, on the main thread, around
/// `CVMetalTextureCacheCreate`. Hosts that build their own capture session
/// should hold it while creating the `AVCaptureDeviceInput`.
pub static COREVIDEO_INIT_LOCK: Mutex<()> = Mutex::new(());
