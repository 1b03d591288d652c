// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! CryptoAPI provider backend.
//!
//! Holds one verification-only provider context. The provider fills a request
//! completely or fails it as a whole, so reads are a single call per chunk.

use log::{debug, trace, warn};

use super::Backend;
use crate::error::BackendError;

/// Opaque provider context handle (`HCRYPTPROV`).
pub type ProviderHandle = usize;

/// Provider calls used by [`ProviderBackend`].
///
/// Every method returns the raw OS error code on failure.
pub trait ProviderApi: Send {
    /// Acquires a verification-only context on the default provider.
    fn acquire_context(&self) -> Result<ProviderHandle, i32>;

    /// Fills `buf` with random bytes; `buf.len()` never exceeds `u32::MAX`.
    fn gen_random(&self, handle: ProviderHandle, buf: &mut [u8]) -> Result<(), i32>;

    /// Releases a context.
    fn release_context(&self, handle: ProviderHandle) -> Result<(), i32>;
}

/// [`ProviderApi`] over `advapi32` CryptoAPI.
#[cfg(windows)]
#[derive(Debug, Clone, Copy, Default)]
pub struct CryptoApiProvider;

#[cfg(windows)]
fn last_os_error() -> i32 {
    std::io::Error::last_os_error().raw_os_error().unwrap_or(0)
}

#[cfg(windows)]
impl ProviderApi for CryptoApiProvider {
    fn acquire_context(&self) -> Result<ProviderHandle, i32> {
        use windows_sys::Win32::Security::Cryptography::{
            CRYPT_VERIFYCONTEXT, CryptAcquireContextW, PROV_RSA_FULL,
        };

        let mut handle: ProviderHandle = 0;
        let ok = unsafe {
            CryptAcquireContextW(
                &mut handle,
                core::ptr::null(),
                core::ptr::null(),
                PROV_RSA_FULL,
                CRYPT_VERIFYCONTEXT,
            )
        };

        if ok != 0 {
            Ok(handle)
        } else {
            Err(last_os_error())
        }
    }

    fn gen_random(&self, handle: ProviderHandle, buf: &mut [u8]) -> Result<(), i32> {
        use windows_sys::Win32::Security::Cryptography::CryptGenRandom;

        let ok = unsafe { CryptGenRandom(handle, buf.len() as u32, buf.as_mut_ptr()) };

        if ok != 0 {
            Ok(())
        } else {
            Err(last_os_error())
        }
    }

    fn release_context(&self, handle: ProviderHandle) -> Result<(), i32> {
        use windows_sys::Win32::Security::Cryptography::CryptReleaseContext;

        if unsafe { CryptReleaseContext(handle, 0) } != 0 {
            Ok(())
        } else {
            Err(last_os_error())
        }
    }
}

/// Entropy backend over a cryptographic service provider context.
#[derive(Debug)]
pub struct ProviderBackend<A: ProviderApi> {
    api: A,
    handle: Option<ProviderHandle>,
}

impl<A: ProviderApi> ProviderBackend<A> {
    /// Creates an unacquired backend.
    pub fn new(api: A) -> Self {
        Self { api, handle: None }
    }

    /// The held context, if acquired.
    pub fn handle(&self) -> Option<ProviderHandle> {
        self.handle
    }

    /// The provider layer.
    pub fn api(&self) -> &A {
        &self.api
    }
}

impl<A: ProviderApi> Backend for ProviderBackend<A> {
    fn acquire(&mut self) -> Result<(), BackendError> {
        if self.handle.is_some() {
            return Ok(());
        }

        let handle = self
            .api
            .acquire_context()
            .map_err(BackendError::AcquireContext)?;
        self.handle = Some(handle);

        debug!("acquired provider context {handle:#x}");

        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<(), BackendError> {
        let handle = self.handle.ok_or(BackendError::NotAcquired)?;

        for chunk in buf.chunks_mut(u32::MAX as usize) {
            self.api
                .gen_random(handle, chunk)
                .map_err(BackendError::GenRandom)?;
        }

        trace!("generated {} bytes from context {handle:#x}", buf.len());

        Ok(())
    }

    fn status(&self) -> bool {
        self.handle.is_some()
    }

    fn release(&mut self) -> Result<(), BackendError> {
        let Some(handle) = self.handle else {
            return Ok(());
        };

        // On failure the context stays held so the caller may retry.
        self.api.release_context(handle).map_err(|code| {
            warn!("failed to release provider context {handle:#x} (os error {code})");
            BackendError::ReleaseContext(code)
        })?;
        self.handle = None;

        debug!("released provider context {handle:#x}");

        Ok(())
    }
}
