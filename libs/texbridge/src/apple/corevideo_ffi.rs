// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! CoreVideo / CoreMedia FFI bindings for the Metal texture cache and
//! sample buffer access.

#![allow(non_snake_case, non_upper_case_globals)]

use std::ffi::c_void;

pub type CVMetalTextureCacheRef = *mut c_void;
pub type CVMetalTextureRef = *mut c_void;
pub type CVPixelBufferRef = *mut c_void;
pub type CMSampleBufferRef = *mut c_void;
pub type CVReturn = i32;
pub type Boolean = u8;

pub const kCVReturnSuccess: CVReturn = 0;

/// CoreMedia `CMTime`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CMTime {
    pub value: i64,
    pub timescale: i32,
    pub flags: u32,
    pub epoch: i64,
}

#[link(name = "CoreVideo", kind = "framework")]
unsafe extern "C" {
    /// Creates a CVMetalTextureCache for creating Metal textures from CVPixelBuffers.
    ///
    /// Pass null for allocator, cache attributes and texture attributes.
    pub fn CVMetalTextureCacheCreate(
        allocator: *const c_void,
        cache_attributes: *const c_void,
        metal_device: *const c_void,
        texture_attributes: *const c_void,
        cache_out: *mut CVMetalTextureCacheRef,
    ) -> CVReturn;

    /// Creates a Metal texture over one plane of a CVPixelBuffer.
    pub fn CVMetalTextureCacheCreateTextureFromImage(
        allocator: *const c_void,
        texture_cache: CVMetalTextureCacheRef,
        source_image: CVPixelBufferRef,
        texture_attributes: *const c_void,
        pixel_format: u64, // MTLPixelFormat
        width: usize,
        height: usize,
        plane_index: usize,
        texture_out: *mut CVMetalTextureRef,
    ) -> CVReturn;

    /// Returns the MTLTexture backing a CVMetalTexture, or null.
    pub fn CVMetalTextureGetTexture(texture: CVMetalTextureRef) -> *mut c_void;

    pub fn CVMetalTextureCacheFlush(texture_cache: CVMetalTextureCacheRef, options: u64);

    pub fn CVPixelBufferGetWidth(pixel_buffer: CVPixelBufferRef) -> usize;
    pub fn CVPixelBufferGetHeight(pixel_buffer: CVPixelBufferRef) -> usize;
    pub fn CVPixelBufferIsPlanar(pixel_buffer: CVPixelBufferRef) -> Boolean;
    pub fn CVPixelBufferGetPlaneCount(pixel_buffer: CVPixelBufferRef) -> usize;
    pub fn CVPixelBufferGetWidthOfPlane(pixel_buffer: CVPixelBufferRef, plane: usize) -> usize;
    pub fn CVPixelBufferGetHeightOfPlane(pixel_buffer: CVPixelBufferRef, plane: usize) -> usize;
}

#[link(name = "CoreMedia", kind = "framework")]
unsafe extern "C" {
    /// Returns the sample's image buffer (not retained), or null.
    pub fn CMSampleBufferGetImageBuffer(sbuf: CMSampleBufferRef) -> CVPixelBufferRef;

    pub fn CMSampleBufferGetPresentationTimeStamp(sbuf: CMSampleBufferRef) -> CMTime;
}

#[link(name = "CoreFoundation", kind = "framework")]
unsafe extern "C" {
    pub fn CFRelease(cf: *const c_void);
}
