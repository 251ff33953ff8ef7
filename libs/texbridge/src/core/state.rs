// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Capture lifecycle state.

use std::fmt;

/// Lifecycle state of the capture session feeding the bridge.
///
/// Owned by the capture collaborator. The bridge forwards transitions to
/// its observer without interpreting them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaptureState {
    #[default]
    Ready,
    Streaming,
    Stopped,
    Waiting,
    Errored,
}

impl CaptureState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Streaming => "streaming",
            Self::Stopped => "stopped",
            Self::Waiting => "waiting",
            Self::Errored => "errored",
        }
    }
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
