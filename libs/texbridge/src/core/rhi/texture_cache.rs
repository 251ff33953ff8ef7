// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! GPU device and texture-cache provider.

use super::SampleBuffer;
use crate::core::{RhiError, TextureFormat};

/// Image type carried by a provider's samples.
pub type ProviderImage<P> =
    <<P as TextureCacheProvider>::Sample as SampleBuffer>::Image;

/// Creates GPU textures from captured image buffers without copying.
///
/// Wraps the platform's texture cache (CVMetalTextureCache on Apple
/// platforms). The bridge owns exactly one cache, created in
/// [`FrameTextureBridge::start`](crate::core::FrameTextureBridge::start)
/// and dropped with the bridge.
pub trait TextureCacheProvider {
    /// GPU device the cache is created against.
    type Device;

    /// Texture cache handle. Released on drop.
    type Cache;

    /// Texture view over one plane of an image buffer.
    type Texture;

    /// Frame buffer type delivered by the capture pipeline.
    type Sample: SampleBuffer + ?Sized;

    /// Capture connection a frame arrived on.
    type Connection: ?Sized;

    /// Check once, before any resource is acquired, that texture caches
    /// are available on this platform.
    fn check_capability(&self) -> Result<(), RhiError> {
        Ok(())
    }

    /// Acquire the system default GPU device.
    fn default_device(&self) -> Result<Self::Device, RhiError>;

    /// Create a texture cache for `device`.
    fn create_texture_cache(&self, device: &Self::Device) -> Result<Self::Cache, RhiError>;

    /// Create a texture over `plane` of `image`.
    fn create_texture(
        &self,
        cache: &Self::Cache,
        image: &ProviderImage<Self>,
        format: TextureFormat,
        width: u32,
        height: u32,
        plane: usize,
    ) -> Result<Self::Texture, RhiError>;

    /// Release cached textures no longer in use.
    fn flush(&self, _cache: &Self::Cache) {}
}
