// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! `CMSampleBuffer` / `CVPixelBuffer` access for the bridge.

use std::ffi::c_void;
use std::marker::{PhantomData, PhantomPinned};

use objc2_core_media::CMSampleBuffer;

use super::corevideo_ffi::{
    CMSampleBufferGetImageBuffer, CMSampleBufferGetPresentationTimeStamp,
    CVPixelBufferGetHeight, CVPixelBufferGetHeightOfPlane, CVPixelBufferGetPlaneCount,
    CVPixelBufferGetWidth, CVPixelBufferGetWidthOfPlane, CVPixelBufferIsPlanar,
    CVPixelBufferRef,
};
use crate::core::{ImageBuffer, MediaTime, SampleBuffer};

/// Borrowed `CVPixelBuffer`.
///
/// Only ever handled by reference, borrowed from the sample buffer that
/// owns it. Never retained past the delivery callback.
#[repr(C)]
pub struct PixelBuffer {
    _data: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

impl PixelBuffer {
    /// # Safety
    /// `ptr` must be null or a valid `CVPixelBufferRef` that outlives `'a`.
    unsafe fn from_ptr<'a>(ptr: CVPixelBufferRef) -> Option<&'a Self> {
        unsafe { ptr.cast::<Self>().as_ref() }
    }

    /// Get the raw `CVPixelBufferRef`.
    pub fn as_ptr(&self) -> CVPixelBufferRef {
        self as *const Self as *mut c_void
    }
}

impl ImageBuffer for PixelBuffer {
    fn width(&self) -> u32 {
        unsafe { CVPixelBufferGetWidth(self.as_ptr()) as u32 }
    }

    fn height(&self) -> u32 {
        unsafe { CVPixelBufferGetHeight(self.as_ptr()) as u32 }
    }

    fn is_planar(&self) -> bool {
        unsafe { CVPixelBufferIsPlanar(self.as_ptr()) != 0 }
    }

    fn plane_count(&self) -> usize {
        unsafe { CVPixelBufferGetPlaneCount(self.as_ptr()) }
    }

    fn width_of_plane(&self, plane: usize) -> u32 {
        unsafe { CVPixelBufferGetWidthOfPlane(self.as_ptr(), plane) as u32 }
    }

    fn height_of_plane(&self, plane: usize) -> u32 {
        unsafe { CVPixelBufferGetHeightOfPlane(self.as_ptr(), plane) as u32 }
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("planes", &self.plane_count())
            .finish()
    }
}

fn sample_ptr(sample: &CMSampleBuffer) -> *mut c_void {
    sample as *const CMSampleBuffer as *mut c_void
}

impl SampleBuffer for CMSampleBuffer {
    type Image = PixelBuffer;

    fn image_buffer(&self) -> Option<&PixelBuffer> {
        // SAFETY: the image buffer is owned by the sample and lives as long
        // as the borrow of `self`.
        unsafe { PixelBuffer::from_ptr(CMSampleBufferGetImageBuffer(sample_ptr(self))) }
    }

    fn presentation_time(&self) -> Option<MediaTime> {
        let time = unsafe { CMSampleBufferGetPresentationTimeStamp(sample_ptr(self)) };
        let time = MediaTime {
            value: time.value,
            timescale: time.timescale,
            flags: time.flags,
        };
        time.is_valid().then_some(time)
    }
}
