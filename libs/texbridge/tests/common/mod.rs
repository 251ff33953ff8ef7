// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! In-memory provider, sample and observer used to drive the bridge
//! without a GPU.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use texbridge::{
    CaptureState, ConversionError, FrameObserver, ImageBuffer, MediaTime, RhiError,
    SampleBuffer, TextureCacheProvider, TextureFormat,
};

// =============================================================================
// Frames
// =============================================================================

pub struct TestImage {
    pub width: u32,
    pub height: u32,
    /// Per-plane sizes. Empty for non-planar images.
    pub planes: Vec<(u32, u32)>,
}

impl TestImage {
    pub fn interleaved(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            planes: Vec::new(),
        }
    }

    /// 4:2:0 bi-planar: full-size luma, half-size chroma.
    pub fn bi_planar(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            planes: vec![(width, height), (width / 2, height / 2)],
        }
    }
}

impl ImageBuffer for TestImage {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn is_planar(&self) -> bool {
        !self.planes.is_empty()
    }

    fn plane_count(&self) -> usize {
        self.planes.len()
    }

    fn width_of_plane(&self, plane: usize) -> u32 {
        self.planes.get(plane).map_or(0, |p| p.0)
    }

    fn height_of_plane(&self, plane: usize) -> u32 {
        self.planes.get(plane).map_or(0, |p| p.1)
    }
}

pub struct TestSample {
    pub image: Option<TestImage>,
    pub time: Option<MediaTime>,
}

impl TestSample {
    pub fn new(image: TestImage, time: MediaTime) -> Self {
        Self {
            image: Some(image),
            time: Some(time),
        }
    }
}

impl SampleBuffer for TestSample {
    type Image = TestImage;

    fn image_buffer(&self) -> Option<&TestImage> {
        self.image.as_ref()
    }

    fn presentation_time(&self) -> Option<MediaTime> {
        self.time
    }
}

// =============================================================================
// Provider
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestTexture {
    pub plane: usize,
    pub format: TextureFormat,
    pub width: u32,
    pub height: u32,
}

pub struct TestDevice;

pub struct TestCache {
    released: Arc<AtomicUsize>,
}

impl Drop for TestCache {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// Shared counters so tests can inspect the provider after moving it into
/// the bridge.
#[derive(Default)]
pub struct ProviderCounters {
    pub caches_created: AtomicUsize,
    pub caches_released: Arc<AtomicUsize>,
    pub textures_created: AtomicUsize,
    pub flushes: AtomicUsize,
}

impl ProviderCounters {
    pub fn caches_created(&self) -> usize {
        self.caches_created.load(Ordering::SeqCst)
    }

    pub fn caches_released(&self) -> usize {
        self.caches_released.load(Ordering::SeqCst)
    }

    pub fn textures_created(&self) -> usize {
        self.textures_created.load(Ordering::SeqCst)
    }

    pub fn flushes(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }
}

pub struct TestProvider {
    pub supported: bool,
    pub has_device: bool,
    pub cache_status: i32,
    /// Plane index whose texture creation fails.
    pub failing_plane: Option<usize>,
    pub counters: Arc<ProviderCounters>,
}

impl Default for TestProvider {
    fn default() -> Self {
        Self {
            supported: true,
            has_device: true,
            cache_status: 0,
            failing_plane: None,
            counters: Arc::new(ProviderCounters::default()),
        }
    }
}

impl TextureCacheProvider for TestProvider {
    type Device = TestDevice;
    type Cache = TestCache;
    type Texture = TestTexture;
    type Sample = TestSample;
    type Connection = ();

    fn check_capability(&self) -> Result<(), RhiError> {
        if self.supported {
            Ok(())
        } else {
            Err(RhiError::Unsupported("test platform".into()))
        }
    }

    fn default_device(&self) -> Result<TestDevice, RhiError> {
        if self.has_device {
            Ok(TestDevice)
        } else {
            Err(RhiError::NullHandle("default_device"))
        }
    }

    fn create_texture_cache(&self, _device: &TestDevice) -> Result<TestCache, RhiError> {
        if self.cache_status != 0 {
            return Err(RhiError::Status {
                operation: "create_texture_cache",
                status: self.cache_status,
            });
        }
        self.counters.caches_created.fetch_add(1, Ordering::SeqCst);
        Ok(TestCache {
            released: Arc::clone(&self.counters.caches_released),
        })
    }

    fn create_texture(
        &self,
        _cache: &TestCache,
        _image: &TestImage,
        format: TextureFormat,
        width: u32,
        height: u32,
        plane: usize,
    ) -> Result<TestTexture, RhiError> {
        if self.failing_plane == Some(plane) {
            return Err(RhiError::Status {
                operation: "create_texture",
                status: -6660,
            });
        }
        self.counters.textures_created.fetch_add(1, Ordering::SeqCst);
        Ok(TestTexture {
            plane,
            format,
            width,
            height,
        })
    }

    fn flush(&self, _cache: &TestCache) {
        self.counters.flushes.fetch_add(1, Ordering::SeqCst);
    }
}

// =============================================================================
// Observer
// =============================================================================

#[derive(Default)]
pub struct RecordingObserver {
    frames: Mutex<Vec<(Vec<TestTexture>, f64)>>,
    states: Mutex<Vec<(CaptureState, Option<ConversionError>)>>,
}

impl RecordingObserver {
    pub fn frames(&self) -> Vec<(Vec<TestTexture>, f64)> {
        self.frames.lock().unwrap().clone()
    }

    pub fn states(&self) -> Vec<(CaptureState, Option<ConversionError>)> {
        self.states.lock().unwrap().clone()
    }
}

impl FrameObserver<TestTexture> for RecordingObserver {
    fn on_frame_textures(&self, textures: Vec<TestTexture>, timestamp: f64) {
        self.frames.lock().unwrap().push((textures, timestamp));
    }

    fn on_state_changed(&self, state: CaptureState, error: Option<ConversionError>) {
        self.states.lock().unwrap().push((state, error));
    }
}
