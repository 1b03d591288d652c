// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for osrandom.
use osrandom_host::HostError;
use thiserror::Error;

/// Failure class of a [`BackendError`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum BackendErrorKind {
    /// The entropy source could not be opened or acquired.
    Acquisition,
    /// A read from an acquired source failed.
    Read,
    /// Closing or releasing the source failed.
    Release,
    /// The operation needs an acquired source.
    NotAcquired,
}

/// Errors from backend operations. Codes are raw OS error numbers.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum BackendError {
    /// The backend has not been acquired.
    #[error("entropy source is not acquired")]
    NotAcquired,

    /// Opening the entropy device failed.
    #[error("open(/dev/urandom) failed (os error {0})")]
    Open(i32),

    /// Reading the descriptor flags failed.
    #[error("fcntl(F_GETFD) failed (os error {0})")]
    GetDescriptorFlags(i32),

    /// Marking the descriptor close-on-exec failed.
    #[error("fcntl(F_SETFD, FD_CLOEXEC) failed (os error {0})")]
    SetDescriptorFlags(i32),

    /// Acquiring the provider context failed.
    #[error("CryptAcquireContext failed (os error {0})")]
    AcquireContext(i32),

    /// Reading the entropy device failed.
    #[error("read failed (os error {0})")]
    Read(i32),

    /// The entropy device returned end of stream before the buffer was full.
    #[error("entropy device reached end of stream")]
    UnexpectedEof,

    /// The provider failed to generate.
    #[error("CryptGenRandom failed (os error {0})")]
    GenRandom(i32),

    /// Closing the descriptor failed.
    #[error("close failed (os error {0})")]
    Close(i32),

    /// Releasing the provider context failed.
    #[error("CryptReleaseContext failed (os error {0})")]
    ReleaseContext(i32),
}

impl BackendError {
    /// Classifies the error.
    pub fn kind(&self) -> BackendErrorKind {
        match self {
            Self::NotAcquired => BackendErrorKind::NotAcquired,
            Self::Open(_)
            | Self::GetDescriptorFlags(_)
            | Self::SetDescriptorFlags(_)
            | Self::AcquireContext(_) => BackendErrorKind::Acquisition,
            Self::Read(_) | Self::UnexpectedEof | Self::GenRandom(_) => BackendErrorKind::Read,
            Self::Close(_) | Self::ReleaseContext(_) => BackendErrorKind::Release,
        }
    }
}

/// Errors that can occur when driving or registering the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A backend operation failed.
    #[error("BackendError: {0}")]
    Backend(#[from] BackendError),

    /// Building or installing the engine into the registry failed.
    #[error("RegistrationError: {0}")]
    Registration(#[from] HostError),

    /// The engine is not present in the registry.
    #[error("engine {0:?} is not registered")]
    NotRegistered(&'static str),

    /// A mutex was poisoned.
    #[error("mutex poisoned")]
    MutexPoisoned,
}
