// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Platform seam between the bridge and the capture/GPU frameworks.

mod sample_buffer;
mod texture_cache;

pub use sample_buffer::{ImageBuffer, SampleBuffer};
pub use texture_cache::{ProviderImage, TextureCacheProvider};
