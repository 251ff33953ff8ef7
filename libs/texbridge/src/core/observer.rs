// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Observer interface for converted frames and capture state.

use std::sync::Arc;

use crate::core::{CaptureState, ConversionError};

/// Textures produced from one frame, in plane order, with the frame's
/// presentation time.
#[derive(Debug)]
pub struct FrameTextures<T> {
    pub textures: Vec<T>,
    /// Presentation time in seconds.
    pub timestamp: f64,
}

/// Receives converted frames and capture lifecycle transitions.
///
/// Called synchronously from the capture pipeline's delivery thread, so
/// implementations should hand work off rather than block.
///
/// A blanket implementation is provided for `Arc<O>`, so an Arc can be
/// registered directly while the caller keeps its own handle.
pub trait FrameObserver<T> {
    /// Called once per successfully converted frame.
    fn on_frame_textures(&self, textures: Vec<T>, timestamp: f64);

    /// Called when the capture state changes, or when the bridge fails to
    /// acquire its texture cache.
    fn on_state_changed(&self, state: CaptureState, error: Option<ConversionError>);
}

impl<T, O: FrameObserver<T> + ?Sized> FrameObserver<T> for Arc<O> {
    fn on_frame_textures(&self, textures: Vec<T>, timestamp: f64) {
        (**self).on_frame_textures(textures, timestamp)
    }

    fn on_state_changed(&self, state: CaptureState, error: Option<ConversionError>) {
        (**self).on_state_changed(state, error)
    }
}

impl<T, O: FrameObserver<T> + ?Sized> FrameObserver<T> for Box<O> {
    fn on_frame_textures(&self, textures: Vec<T>, timestamp: f64) {
        (**self).on_frame_textures(textures, timestamp)
    }

    fn on_state_changed(&self, state: CaptureState, error: Option<ConversionError>) {
        (**self).on_state_changed(state, error)
    }
}
