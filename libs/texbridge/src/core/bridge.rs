// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Converts delivered camera frames into GPU textures.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::rhi::ProviderImage;
use crate::core::{
    BridgeConfig, CaptureState, ConversionError, FrameObserver, FrameTextures, ImageBuffer,
    PixelLayout, Result, RhiError, SampleBuffer, TextureCacheProvider,
};

/// Turns each frame delivered by the capture pipeline into one texture per
/// plane of the configured [`PixelLayout`] and hands them to the observer.
///
/// The bridge keeps nothing between frames. A frame that fails to convert
/// is logged and dropped; the next one is attempted independently and no
/// partial texture set is ever delivered.
///
/// The texture cache is written once by [`start`](Self::start) and only
/// read afterwards, so [`on_frame_delivered`](Self::on_frame_delivered)
/// takes `&self` and needs no lock.
pub struct FrameTextureBridge<P, O>
where
    P: TextureCacheProvider,
    O: FrameObserver<P::Texture>,
{
    config: BridgeConfig,
    observer: O,
    provider: P,
    cache: Option<P::Cache>,
    /// Texture sets requested from the cache. Drives periodic flushes.
    conversions: AtomicU64,
    frames_delivered: AtomicU64,
}

impl<P, O> FrameTextureBridge<P, O>
where
    P: TextureCacheProvider,
    O: FrameObserver<P::Texture>,
{
    /// Create a bridge for `pixel_layout`. Acquires nothing until
    /// [`start`](Self::start).
    pub fn new(pixel_layout: PixelLayout, observer: O, provider: P) -> Self {
        Self::with_config(BridgeConfig::from(pixel_layout), observer, provider)
    }

    pub fn with_config(config: BridgeConfig, observer: O, provider: P) -> Self {
        Self {
            config,
            observer,
            provider,
            cache: None,
            conversions: AtomicU64::new(0),
            frames_delivered: AtomicU64::new(0),
        }
    }

    /// Acquire the texture cache against the default GPU device.
    ///
    /// Failure is not fatal: it is logged and reported to the observer as
    /// [`ConversionError::TextureCacheInitFailure`], and every frame
    /// delivered afterwards fails with the same error.
    pub fn start(&mut self) {
        if self.cache.is_some() {
            tracing::debug!("FrameTextureBridge: texture cache already created");
            return;
        }

        match self.create_cache() {
            Ok(cache) => {
                tracing::info!(
                    "FrameTextureBridge: texture cache ready ({:?}, {} plane(s))",
                    self.config.pixel_layout,
                    self.config.pixel_layout.plane_count()
                );
                self.cache = Some(cache);
            }
            Err(e) => {
                self.observer
                    .on_state_changed(CaptureState::Errored, Some(e));
            }
        }
    }

    fn create_cache(&self) -> Result<P::Cache> {
        let cache_init_failure = |e: RhiError| {
            tracing::warn!("FrameTextureBridge: texture cache unavailable: {}", e);
            ConversionError::TextureCacheInitFailure
        };

        self.provider.check_capability().map_err(cache_init_failure)?;
        let device = self.provider.default_device().map_err(cache_init_failure)?;
        self.provider
            .create_texture_cache(&device)
            .map_err(cache_init_failure)
    }

    /// Frame delivery callback, invoked once per captured frame.
    ///
    /// Never fails: conversion errors are logged and the frame is skipped.
    pub fn on_frame_delivered(&self, sample: Option<&P::Sample>, _connection: &P::Connection) {
        match self.convert_frame(sample) {
            Ok(frame) => {
                self.observer
                    .on_frame_textures(frame.textures, frame.timestamp);
                self.frames_delivered.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::warn!("FrameTextureBridge: dropping frame: {}", e);
            }
        }
    }

    /// Convert one frame into its plane textures and timestamp.
    pub fn convert_frame(
        &self,
        sample: Option<&P::Sample>,
    ) -> Result<FrameTextures<P::Texture>> {
        let sample = sample.ok_or(ConversionError::MissingFrameBuffer)?;
        let cache = self
            .cache
            .as_ref()
            .ok_or(ConversionError::TextureCacheInitFailure)?;
        let image = sample
            .image_buffer()
            .ok_or(ConversionError::MissingImageBuffer)?;

        self.maybe_flush(cache);

        let textures = self.create_plane_textures(cache, image)?;

        let timestamp = sample
            .presentation_time()
            .and_then(|time| time.seconds())
            .ok_or(ConversionError::TimestampRetrievalFailure)?;

        Ok(FrameTextures {
            textures,
            timestamp,
        })
    }

    fn create_plane_textures(
        &self,
        cache: &P::Cache,
        image: &ProviderImage<P>,
    ) -> Result<Vec<P::Texture>> {
        let planes = self.config.pixel_layout.planes();
        if planes.len() > 1 && !(image.is_planar() && image.plane_count() >= planes.len()) {
            let e = RhiError::PlaneOutOfRange {
                plane: planes.len() - 1,
                plane_count: image.plane_count(),
            };
            tracing::debug!("FrameTextureBridge: {:?} frame: {}", self.config.pixel_layout, e);
            return Err(ConversionError::TextureCreationFailure);
        }

        let mut textures = Vec::with_capacity(planes.len());

        for plane in planes {
            let (width, height) = image.plane_extent(plane.index);
            let texture = self
                .provider
                .create_texture(cache, image, plane.format, width, height, plane.index)
                .map_err(|e| {
                    tracing::debug!(
                        "FrameTextureBridge: plane {} ({}x{}, {:?}): {}",
                        plane.index,
                        width,
                        height,
                        plane.format,
                        e
                    );
                    ConversionError::TextureCreationFailure
                })?;
            textures.push(texture);
        }

        Ok(textures)
    }

    fn maybe_flush(&self, cache: &P::Cache) {
        let interval = self.config.flush_interval;
        let count = self.conversions.fetch_add(1, Ordering::Relaxed);
        if interval > 0 && count > 0 && count.is_multiple_of(interval) {
            tracing::trace!("FrameTextureBridge: flushing texture cache");
            self.provider.flush(cache);
        }
    }

    /// Forward a capture state transition to the observer unchanged.
    pub fn report_state(&self, state: CaptureState, error: Option<ConversionError>) {
        match error {
            Some(e) => tracing::warn!("FrameTextureBridge: capture {}: {}", state, e),
            None => tracing::debug!("FrameTextureBridge: capture {}", state),
        }
        self.observer.on_state_changed(state, error);
    }

    pub fn pixel_layout(&self) -> PixelLayout {
        self.config.pixel_layout
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Whether the texture cache has been acquired.
    pub fn is_started(&self) -> bool {
        self.cache.is_some()
    }

    pub fn frames_delivered(&self) -> u64 {
        self.frames_delivered.load(Ordering::Relaxed)
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl<P, O> Drop for FrameTextureBridge<P, O>
where
    P: TextureCacheProvider,
    O: FrameObserver<P::Texture>,
{
    fn drop(&mut self) {
        if self.cache.take().is_some() {
            tracing::debug!(
                "FrameTextureBridge: releasing texture cache after {} frames",
                self.frames_delivered()
            );
        }
    }
}

impl<P, O> std::fmt::Debug for FrameTextureBridge<P, O>
where
    P: TextureCacheProvider,
    O: FrameObserver<P::Texture>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameTextureBridge")
            .field("pixel_layout", &self.config.pixel_layout)
            .field("started", &self.is_started())
            .field("frames_delivered", &self.frames_delivered())
            .finish()
    }
}
