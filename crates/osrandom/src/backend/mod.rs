// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Platform entropy backends.
//!
//! Exactly one backend is active per platform:
//!
//! - **Unix**: [`DeviceBackend`], a file descriptor on `/dev/urandom`
//! - **Windows**: [`ProviderBackend`], a CryptoAPI provider context
//!
//! Both keep their OS calls behind a small trait ([`DeviceIo`], [`ProviderApi`])
//! so the retry and cleanup logic can run against scripted failures.

use crate::error::BackendError;

#[cfg(unix)]
mod device;
#[cfg(any(windows, test, feature = "test_utils"))]
mod provider;

#[cfg(unix)]
pub use device::{DeviceBackend, DeviceIo, LibcDeviceIo, RawFd, URANDOM_PATH};
#[cfg(any(windows, test, feature = "test_utils"))]
pub use provider::{ProviderApi, ProviderBackend, ProviderHandle};
#[cfg(windows)]
pub use provider::CryptoApiProvider;

/// Entropy source operations shared by every platform variant.
///
/// A backend is either fully acquired or fully absent; no partially
/// initialized state survives a failed `acquire`.
pub trait Backend: Send {
    /// Acquires the entropy source. A no-op if already acquired.
    ///
    /// # Errors
    ///
    /// Returns an acquisition error; the backend stays unacquired.
    fn acquire(&mut self) -> Result<(), BackendError>;

    /// Fills `buf` completely.
    ///
    /// # Errors
    ///
    /// - [`BackendError::NotAcquired`] without performing any I/O.
    /// - A read error; the content of `buf` is unspecified then.
    fn read(&mut self, buf: &mut [u8]) -> Result<(), BackendError>;

    /// Returns true if the source is acquired. Performs no I/O.
    fn status(&self) -> bool;

    /// Releases the source. A no-op if not acquired.
    ///
    /// # Errors
    ///
    /// Returns a release error. Whether the backend is still acquired
    /// afterwards depends on the variant.
    fn release(&mut self) -> Result<(), BackendError>;
}

/// The backend of the current platform.
#[cfg(unix)]
pub type SystemBackend = DeviceBackend<LibcDeviceIo>;

/// The backend of the current platform.
#[cfg(windows)]
pub type SystemBackend = ProviderBackend<CryptoApiProvider>;

/// Creates the unacquired backend of the current platform.
#[cfg(unix)]
pub fn system_backend() -> SystemBackend {
    DeviceBackend::new(LibcDeviceIo)
}

/// Creates the unacquired backend of the current platform.
#[cfg(windows)]
pub fn system_backend() -> SystemBackend {
    ProviderBackend::new(CryptoApiProvider)
}
