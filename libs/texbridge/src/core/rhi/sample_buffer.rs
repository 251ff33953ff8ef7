// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Frame buffers handed to the bridge by the capture pipeline.

use crate::core::MediaTime;

/// CPU-accessible image backing one captured frame.
///
/// On Apple platforms this is a `CVPixelBuffer`.
pub trait ImageBuffer {
    /// Width of the whole image in pixels.
    fn width(&self) -> u32;

    /// Height of the whole image in pixels.
    fn height(&self) -> u32;

    fn is_planar(&self) -> bool;

    /// Number of planes. Zero for non-planar images.
    fn plane_count(&self) -> usize;

    fn width_of_plane(&self, plane: usize) -> u32;

    fn height_of_plane(&self, plane: usize) -> u32;

    /// Texture extent for `plane`: the plane's own size when the image is
    /// planar, the whole image otherwise.
    fn plane_extent(&self, plane: usize) -> (u32, u32) {
        if self.is_planar() {
            (self.width_of_plane(plane), self.height_of_plane(plane))
        } else {
            (self.width(), self.height())
        }
    }
}

/// One delivered frame: an image buffer plus its presentation time.
///
/// Only valid for the duration of the delivery callback.
pub trait SampleBuffer {
    type Image: ImageBuffer + ?Sized;

    fn image_buffer(&self) -> Option<&Self::Image>;

    /// Presentation time, `None` when the sample carries none.
    fn presentation_time(&self) -> Option<MediaTime>;
}
