// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Texture-cache provider using CVMetalTextureCache.

use std::ffi::c_void;
use std::ptr;
use std::sync::mpsc;
use std::time::Duration;

use dispatch2::DispatchQueue;

use objc2::rc::Retained;
use objc2::runtime::ProtocolObject;
use objc2_av_foundation::AVCaptureConnection;
use objc2_core_media::CMSampleBuffer;
use objc2_foundation::NSThread;
use objc2_metal::{MTLCreateSystemDefaultDevice, MTLDevice, MTLTexture};

use super::corevideo_ffi::{
    kCVReturnSuccess, CFRelease, CVMetalTextureCacheCreate,
    CVMetalTextureCacheCreateTextureFromImage, CVMetalTextureCacheFlush, CVMetalTextureCacheRef,
    CVMetalTextureGetTexture, CVMetalTextureRef,
};
use super::{PixelBuffer, COREVIDEO_INIT_LOCK};
use crate::core::{RhiError, TextureCacheProvider, TextureFormat};

/// Whether this build targets the iOS simulator, which has no
/// CVMetalTextureCache.
const fn is_simulator() -> bool {
    cfg!(any(
        target_abi = "sim",
        all(target_os = "ios", target_arch = "x86_64")
    ))
}

/// Provider backed by the system default Metal device and CoreVideo's
/// Metal texture cache.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetalTextureCacheProvider;

impl TextureCacheProvider for MetalTextureCacheProvider {
    type Device = Retained<ProtocolObject<dyn MTLDevice>>;
    type Cache = MetalTextureCache;
    type Texture = MetalTexture;
    type Sample = CMSampleBuffer;
    type Connection = AVCaptureConnection;

    fn check_capability(&self) -> Result<(), RhiError> {
        if is_simulator() {
            return Err(RhiError::Unsupported(
                "CVMetalTextureCache is not available on the simulator".into(),
            ));
        }
        Ok(())
    }

    fn default_device(&self) -> Result<Self::Device, RhiError> {
        let device = MTLCreateSystemDefaultDevice()
            .ok_or(RhiError::NullHandle("MTLCreateSystemDefaultDevice"))?;
        tracing::debug!("MetalTextureCacheProvider: using {}", device.name());
        Ok(device)
    }

    fn create_texture_cache(&self, device: &Self::Device) -> Result<Self::Cache, RhiError> {
        MetalTextureCache::new(device)
    }

    fn create_texture(
        &self,
        cache: &Self::Cache,
        image: &PixelBuffer,
        format: TextureFormat,
        width: u32,
        height: u32,
        plane: usize,
    ) -> Result<Self::Texture, RhiError> {
        cache.create_texture(image, format, width, height, plane)
    }

    fn flush(&self, cache: &Self::Cache) {
        cache.flush();
    }
}

/// Owned CVMetalTextureCache. Released on drop.
pub struct MetalTextureCache {
    cache: CVMetalTextureCacheRef,
}

impl MetalTextureCache {
    /// Create a texture cache for `device`.
    ///
    /// `CVMetalTextureCacheCreate` races with `AVCaptureDeviceInput`
    /// initialization inside CoreVideo, so creation runs on the main thread
    /// under [`COREVIDEO_INIT_LOCK`]. Runs inline when already on the main
    /// thread; otherwise blocks until the main queue runs it, failing with
    /// [`RhiError::MainThreadUnavailable`] after [`MAIN_THREAD_TIMEOUT`].
    pub fn new(device: &ProtocolObject<dyn MTLDevice>) -> Result<Self, RhiError> {
        // Raw pointer as usize to cross the thread boundary. `device` is
        // borrowed for the whole blocking call.
        let device_ptr = device as *const ProtocolObject<dyn MTLDevice> as usize;

        let sendable = run_on_main_thread_blocking("CVMetalTextureCacheCreate", move || {
            create_cache_locked(device_ptr)
        })??;

        tracing::debug!("MetalTextureCache: created");
        Ok(Self { cache: sendable.0 })
    }

    /// Create a texture over `plane` of `image`.
    pub fn create_texture(
        &self,
        image: &PixelBuffer,
        format: TextureFormat,
        width: u32,
        height: u32,
        plane: usize,
    ) -> Result<MetalTexture, RhiError> {
        let mut texture: CVMetalTextureRef = ptr::null_mut();

        let status = unsafe {
            CVMetalTextureCacheCreateTextureFromImage(
                ptr::null(), // allocator
                self.cache,
                image.as_ptr(),
                ptr::null(), // texture attributes
                format.to_mtl_pixel_format(),
                width as usize,
                height as usize,
                plane,
                &mut texture,
            )
        };

        if status != kCVReturnSuccess {
            return Err(RhiError::Status {
                operation: "CVMetalTextureCacheCreateTextureFromImage",
                status,
            });
        }
        if texture.is_null() {
            return Err(RhiError::NullHandle("CVMetalTextureCacheCreateTextureFromImage"));
        }

        // Owned from here on, released on drop even if unwrapping fails.
        let texture = MetalTexture {
            texture,
            width,
            height,
            format,
            plane,
        };

        if unsafe { CVMetalTextureGetTexture(texture.texture) }.is_null() {
            return Err(RhiError::NullHandle("CVMetalTextureGetTexture"));
        }

        Ok(texture)
    }

    /// Flush the cache to free unused textures.
    pub fn flush(&self) {
        unsafe {
            CVMetalTextureCacheFlush(self.cache, 0);
        }
    }
}

impl Drop for MetalTextureCache {
    fn drop(&mut self) {
        if !self.cache.is_null() {
            unsafe {
                CFRelease(self.cache as *const c_void);
            }
        }
    }
}

// CVMetalTextureCache is thread-safe
unsafe impl Send for MetalTextureCache {}
unsafe impl Sync for MetalTextureCache {}

/// How long a background thread waits for the main queue to create the
/// cache. Hosts without a running main run loop fail instead of hanging.
pub const MAIN_THREAD_TIMEOUT: Duration = Duration::from_secs(5);

/// Run `f` on the main thread and wait for its result.
///
/// Runs directly when already on the main thread to avoid deadlock.
fn run_on_main_thread_blocking<F, R>(operation: &'static str, f: F) -> Result<R, RhiError>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    if NSThread::currentThread().isMainThread() {
        tracing::debug!("MetalTextureCache: already on main thread, executing directly");
        return Ok(f());
    }

    tracing::debug!("MetalTextureCache: dispatching {} to main thread", operation);
    let (tx, rx) = mpsc::channel();

    DispatchQueue::main().exec_async(move || {
        let _ = tx.send(f());
    });

    rx.recv_timeout(MAIN_THREAD_TIMEOUT).map_err(|e| {
        tracing::warn!("MetalTextureCache: {} not run on main thread: {}", operation, e);
        RhiError::MainThreadUnavailable(operation, MAIN_THREAD_TIMEOUT)
    })
}

/// CVMetalTextureCacheRef that can cross back from the main thread.
struct SendableCacheRef(CVMetalTextureCacheRef);

// CVMetalTextureCache is thread-safe
unsafe impl Send for SendableCacheRef {}

/// Create the CVMetalTextureCache while holding [`COREVIDEO_INIT_LOCK`].
fn create_cache_locked(device_ptr: usize) -> Result<SendableCacheRef, RhiError> {
    let _guard = COREVIDEO_INIT_LOCK.lock();

    let mut cache: CVMetalTextureCacheRef = ptr::null_mut();
    let status = unsafe {
        CVMetalTextureCacheCreate(
            ptr::null(), // allocator
            ptr::null(), // cache attributes
            device_ptr as *const c_void,
            ptr::null(), // texture attributes
            &mut cache,
        )
    };

    if status != kCVReturnSuccess {
        return Err(RhiError::Status {
            operation: "CVMetalTextureCacheCreate",
            status,
        });
    }
    if cache.is_null() {
        return Err(RhiError::NullHandle("CVMetalTextureCacheCreate"));
    }

    Ok(SendableCacheRef(cache))
}

/// Metal texture over one plane of a captured frame.
///
/// Holds the CVMetalTexture, which keeps the underlying pixel buffer
/// alive until the texture is dropped.
pub struct MetalTexture {
    texture: CVMetalTextureRef,
    width: u32,
    height: u32,
    format: TextureFormat,
    plane: usize,
}

impl MetalTexture {
    /// Get the underlying Metal texture.
    pub fn metal_texture(&self) -> &ProtocolObject<dyn MTLTexture> {
        // SAFETY: checked non-null at creation; the CVMetalTexture retains
        // the MTLTexture for as long as `self` lives.
        unsafe {
            &*(CVMetalTextureGetTexture(self.texture) as *const ProtocolObject<dyn MTLTexture>)
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> TextureFormat {
        self.format
    }

    /// Index of the image plane this texture views.
    pub fn plane(&self) -> usize {
        self.plane
    }
}

impl Drop for MetalTexture {
    fn drop(&mut self) {
        if !self.texture.is_null() {
            unsafe {
                CFRelease(self.texture as *const c_void);
            }
        }
    }
}

// CVMetalTexture is thread-safe
unsafe impl Send for MetalTexture {}
unsafe impl Sync for MetalTexture {}

impl std::fmt::Debug for MetalTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetalTexture")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("plane", &self.plane)
            .finish()
    }
}
