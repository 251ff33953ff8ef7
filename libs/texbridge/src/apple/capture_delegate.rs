// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! AVFoundation sample-buffer delegate feeding a [`MetalFrameBridge`].
//!
//! Register the delegate on an `AVCaptureVideoDataOutput` with
//! `setSampleBufferDelegate:queue:`. Every frame the output delivers is
//! handed to [`FrameTextureBridge::on_frame_delivered`](crate::core::FrameTextureBridge::on_frame_delivered)
//! on the output's queue.

use std::sync::Arc;

use objc2::rc::Retained;
use objc2::{define_class, msg_send, AllocAnyThread, DefinedClass};
use objc2_av_foundation::{
    AVCaptureConnection, AVCaptureOutput, AVCaptureVideoDataOutputSampleBufferDelegate,
};
use objc2_core_media::CMSampleBuffer;
use objc2_foundation::{NSObject, NSObjectProtocol};

use super::{MetalFrameBridge, MetalTexture};
use crate::core::FrameObserver;

type FrameHandler = Box<dyn Fn(Option<&CMSampleBuffer>, &AVCaptureConnection) + Send + Sync>;

pub struct CaptureDelegateIvars {
    on_frame: FrameHandler,
}

define_class!(
    #[unsafe(super(NSObject))]
    #[name = "TexbridgeCaptureDelegate"]
    #[ivars = CaptureDelegateIvars]
    pub struct CaptureDelegate;

    unsafe impl NSObjectProtocol for CaptureDelegate {}

    unsafe impl AVCaptureVideoDataOutputSampleBufferDelegate for CaptureDelegate {
        #[unsafe(method(captureOutput:didOutputSampleBuffer:fromConnection:))]
        fn capture_output_did_output_sample_buffer(
            &self,
            _output: &AVCaptureOutput,
            sample_buffer: Option<&CMSampleBuffer>,
            connection: &AVCaptureConnection,
        ) {
            (self.ivars().on_frame)(sample_buffer, connection);
        }

        #[unsafe(method(captureOutput:didDropSampleBuffer:fromConnection:))]
        fn capture_output_did_drop_sample_buffer(
            &self,
            _output: &AVCaptureOutput,
            _sample_buffer: Option<&CMSampleBuffer>,
            _connection: &AVCaptureConnection,
        ) {
            tracing::trace!("CaptureDelegate: capture output dropped a frame");
        }
    }
);

impl CaptureDelegate {
    /// Delegate forwarding every delivered frame to `bridge`.
    pub fn new<O>(bridge: Arc<MetalFrameBridge<O>>) -> Retained<Self>
    where
        O: FrameObserver<MetalTexture> + Send + Sync + 'static,
    {
        Self::with_handler(Box::new(move |sample, connection| {
            bridge.on_frame_delivered(sample, connection);
        }))
    }

    fn with_handler(on_frame: FrameHandler) -> Retained<Self> {
        let this = Self::alloc().set_ivars(CaptureDelegateIvars { on_frame });
        unsafe { msg_send![super(this), init] }
    }
}
