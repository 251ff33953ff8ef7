// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! texbridge: camera frame to GPU texture bridge
//!
//! Subscribes to a platform capture pipeline, turns each delivered pixel
//! buffer into GPU texture handles through the platform texture cache, and
//! hands them to a registered [`FrameObserver`] together with the frame's
//! presentation time.
//!
//! The platform-agnostic bridge lives in [`core`]. The CoreVideo / Metal
//! backend lives in `apple` and is only compiled on macOS and iOS.

#![allow(clippy::missing_safety_doc)] // Safety documented in implementation comments

pub mod core;
pub mod logging;

#[cfg(any(target_os = "macos", target_os = "ios"))]
pub mod apple;

pub use core::{
    BridgeConfig, CaptureState, ConfigError, ConversionError, ErrorCategory, FrameObserver,
    FrameTextureBridge, FrameTextures, ImageBuffer, MediaTime, PixelLayout, PlaneDescriptor,
    Result, RhiError, SampleBuffer, TextureCacheProvider, TextureFormat,
};
