// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Pixel layouts the bridge can convert and their per-plane texture formats.

use serde::{Deserialize, Serialize};

// MTLPixelFormat constants
const MTL_PIXEL_FORMAT_R8_UNORM: u64 = 10;
const MTL_PIXEL_FORMAT_RG8_UNORM: u64 = 30;
const MTL_PIXEL_FORMAT_BGRA8_UNORM: u64 = 80;

// CVPixelFormatType FourCC codes
const CV_PIXEL_FORMAT_32BGRA: u32 = 0x42475241; // 'BGRA'
const CV_PIXEL_FORMAT_420_BIPLANAR_FULL_RANGE: u32 = 0x34323066; // '420f'

/// Layout of the pixel buffers delivered by the capture pipeline.
///
/// Fixed for the lifetime of a bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelLayout {
    /// Single-plane BGRA color.
    #[default]
    Interleaved,
    /// Two planes: full-resolution luminance, then half-resolution
    /// interleaved chroma pairs (4:2:0 bi-planar).
    PlanarLuminanceChroma,
}

/// GPU texture format requested for one plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    Bgra8Unorm,
    R8Unorm,
    Rg8Unorm,
}

impl TextureFormat {
    /// Convert to MTLPixelFormat for texture creation.
    pub const fn to_mtl_pixel_format(&self) -> u64 {
        match self {
            Self::Bgra8Unorm => MTL_PIXEL_FORMAT_BGRA8_UNORM,
            Self::R8Unorm => MTL_PIXEL_FORMAT_R8_UNORM,
            Self::Rg8Unorm => MTL_PIXEL_FORMAT_RG8_UNORM,
        }
    }
}

/// One plane the bridge turns into a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaneDescriptor {
    pub index: usize,
    pub format: TextureFormat,
}

const INTERLEAVED_PLANES: [PlaneDescriptor; 1] = [PlaneDescriptor {
    index: 0,
    format: TextureFormat::Bgra8Unorm,
}];

const LUMA_CHROMA_PLANES: [PlaneDescriptor; 2] = [
    PlaneDescriptor {
        index: 0,
        format: TextureFormat::R8Unorm,
    },
    PlaneDescriptor {
        index: 1,
        format: TextureFormat::Rg8Unorm,
    },
];

impl PixelLayout {
    /// Planes in the order their textures are delivered.
    pub const fn planes(&self) -> &'static [PlaneDescriptor] {
        match self {
            Self::Interleaved => &INTERLEAVED_PLANES,
            Self::PlanarLuminanceChroma => &LUMA_CHROMA_PLANES,
        }
    }

    pub const fn plane_count(&self) -> usize {
        self.planes().len()
    }

    /// CVPixelFormatType the capture output has to be configured with to
    /// deliver buffers in this layout.
    pub const fn cv_pixel_format_type(&self) -> u32 {
        match self {
            Self::Interleaved => CV_PIXEL_FORMAT_32BGRA,
            Self::PlanarLuminanceChroma => CV_PIXEL_FORMAT_420_BIPLANAR_FULL_RANGE,
        }
    }
}
