// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use thiserror::Error;

/// Capture and conversion failures surfaced to the bridge's observer.
///
/// The first six variants come from the capture session (hardware and
/// session level). The remaining five are per-frame conversion failures
/// raised by the bridge itself.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionError {
    #[error("Camera access was denied")]
    NoHardwareAccess,

    #[error("Failed to attach the camera input to the capture session")]
    InputAttachFailure,

    #[error("Failed to attach the video output to the capture session")]
    OutputAttachFailure,

    #[error("No camera hardware was found")]
    HardwareNotFound,

    #[error("The camera input is unavailable")]
    InputUnavailable,

    #[error("The capture session hit a runtime error")]
    RuntimeError,

    #[error("Failed to create the GPU texture cache")]
    TextureCacheInitFailure,

    #[error("The delivered sample has no frame buffer")]
    MissingFrameBuffer,

    #[error("The frame buffer has no image buffer")]
    MissingImageBuffer,

    #[error("Failed to create a texture from the image buffer")]
    TextureCreationFailure,

    #[error("Failed to retrieve the frame's presentation timestamp")]
    TimestampRetrievalFailure,
}

/// Which layer an error originated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Hardware or capture-session failure.
    Streaming,
    /// Per-frame texture or timestamp extraction failure.
    Conversion,
}

impl ConversionError {
    /// Every variant, streaming errors first.
    pub const ALL: [ConversionError; 11] = [
        Self::NoHardwareAccess,
        Self::InputAttachFailure,
        Self::OutputAttachFailure,
        Self::HardwareNotFound,
        Self::InputUnavailable,
        Self::RuntimeError,
        Self::TextureCacheInitFailure,
        Self::MissingFrameBuffer,
        Self::MissingImageBuffer,
        Self::TextureCreationFailure,
        Self::TimestampRetrievalFailure,
    ];

    /// Whether this error comes from the capture session rather than from
    /// converting a frame.
    pub const fn is_streaming_error(&self) -> bool {
        matches!(
            self,
            Self::NoHardwareAccess
                | Self::InputAttachFailure
                | Self::OutputAttachFailure
                | Self::HardwareNotFound
                | Self::InputUnavailable
                | Self::RuntimeError
        )
    }

    pub const fn category(&self) -> ErrorCategory {
        if self.is_streaming_error() {
            ErrorCategory::Streaming
        } else {
            ErrorCategory::Conversion
        }
    }

    /// Fixed human-readable description of the failure.
    pub fn description(&self) -> String {
        self.to_string()
    }
}

/// Failure reported by a platform texture-cache provider.
///
/// Never leaves the bridge: it is logged with its detail and mapped onto
/// the matching [`ConversionError`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RhiError {
    #[error("Operation not supported on this platform: {0}")]
    Unsupported(String),

    #[error("{operation} failed with status {status}")]
    Status { operation: &'static str, status: i32 },

    #[error("{0} returned a null handle")]
    NullHandle(&'static str),

    #[error("Plane {plane} out of range for an image with {plane_count} planes")]
    PlaneOutOfRange { plane: usize, plane_count: usize },

    #[error("Main thread did not run {0} within {1:?}")]
    MainThreadUnavailable(&'static str, std::time::Duration),
}

/// Failure loading a [`BridgeConfig`](super::BridgeConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unsupported configuration file extension: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, ConversionError>;
