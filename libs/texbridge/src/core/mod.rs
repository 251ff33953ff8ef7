// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

pub mod bridge;
pub mod config;
pub mod error;
pub mod media_time;
pub mod observer;
pub mod pixel_layout;
pub mod rhi;
pub mod state;

pub use bridge::FrameTextureBridge;
pub use config::BridgeConfig;
pub use error::*;
pub use media_time::MediaTime;
pub use observer::{FrameObserver, FrameTextures};
pub use pixel_layout::{PixelLayout, PlaneDescriptor, TextureFormat};
pub use rhi::{ImageBuffer, SampleBuffer, TextureCacheProvider};
pub use state::CaptureState;
