// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use std::sync::Arc;

use crate::error::HostError;

/// Result of a legacy pseudo-random request.
///
/// Legacy call sites distinguish a hard failure from a soft one where the
/// source was merely unavailable.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum PseudoRandStatus {
    /// Every requested byte was written.
    Success,
    /// The request failed and must not be retried with the same source.
    HardFailure,
    /// The source was unavailable; the buffer content is unspecified.
    SoftFailure,
}

impl PseudoRandStatus {
    /// Returns the raw legacy code: `1`, `0` or `-1`.
    pub fn as_raw(self) -> i32 {
        match self {
            Self::Success => 1,
            Self::HardFailure => 0,
            Self::SoftFailure => -1,
        }
    }

    /// Returns true for [`PseudoRandStatus::Success`].
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

/// Random byte provider installed into an engine.
pub trait RandMethod: Send + Sync {
    /// Fills `buf` completely with random bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if not every byte could be written.
    fn bytes(&self, buf: &mut [u8]) -> Result<(), HostError>;

    /// Legacy variant of [`RandMethod::bytes`].
    fn pseudo_bytes(&self, buf: &mut [u8]) -> PseudoRandStatus;

    /// Returns true if the method is ready to produce bytes.
    fn status(&self) -> bool;
}

/// Engine init/finish function.
pub type LifecycleFn = Arc<dyn Fn() -> Result<(), HostError> + Send + Sync>;
