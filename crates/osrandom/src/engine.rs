// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Engine adapter over a [`Backend`].
//!
//! Maps the host's RNG contract onto the backend operations:
//!
//! | Engine              | Backend   |
//! |---------------------|-----------|
//! | `init`              | `acquire` |
//! | `generate`          | `read`    |
//! | `generate_legacy`   | `read`    |
//! | `status`            | `status`  |
//! | `finish`            | `release` |
//!
//! Every backend I/O failure during generation queues one diagnostic record.

use std::sync::{Arc, LazyLock, Mutex, MutexGuard};

use log::debug;
use osrandom_host::{
    ErrorLibrary, ErrorQueue, ErrorReason, ErrorRecord, HostError, PseudoRandStatus, RandMethod,
};

use crate::backend::{Backend, SystemBackend, system_backend};
use crate::error::{BackendError, BackendErrorKind, EngineError};

/// Source tag of the diagnostic records queued by the engine.
pub const DIAGNOSTIC_SOURCE: &str = "osrandom_engine";

static SYSTEM: LazyLock<Arc<OsRandomEngine<SystemBackend>>> =
    LazyLock::new(|| Arc::new(OsRandomEngine::new(system_backend())));

/// Random engine delegating to a single, mutex-guarded backend.
pub struct OsRandomEngine<B: Backend> {
    backend: Mutex<B>,
    errors: Arc<ErrorQueue>,
}

impl OsRandomEngine<SystemBackend> {
    /// The process-wide engine over the platform backend.
    pub fn system() -> Arc<Self> {
        Arc::clone(&SYSTEM)
    }
}

impl<B: Backend> OsRandomEngine<B> {
    /// Creates an engine reporting into the global [`ErrorQueue`].
    pub fn new(backend: B) -> Self {
        Self::with_error_queue(backend, ErrorQueue::global())
    }

    /// Creates an engine reporting into `errors`.
    pub fn with_error_queue(backend: B, errors: Arc<ErrorQueue>) -> Self {
        Self {
            backend: Mutex::new(backend),
            errors,
        }
    }

    /// The queue diagnostic records are pushed to.
    pub fn error_queue(&self) -> &Arc<ErrorQueue> {
        &self.errors
    }

    fn backend(&self) -> Result<MutexGuard<'_, B>, EngineError> {
        self.backend.lock().map_err(|_| EngineError::MutexPoisoned)
    }

    fn report(&self, error: &BackendError) {
        debug!("random generation failed: {error}");

        self.errors.put(ErrorRecord {
            library: ErrorLibrary::Rand,
            function: 0,
            reason: ErrorReason::RandLib,
            file: DIAGNOSTIC_SOURCE,
            line: 0,
        });
    }

    /// Acquires the backend. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Backend`] with an acquisition error.
    pub fn init(&self) -> Result<(), EngineError> {
        self.backend()?.acquire()?;

        Ok(())
    }

    /// Fills `buf` completely with OS randomness.
    ///
    /// # Errors
    ///
    /// - [`BackendError::NotAcquired`] before `init`, without any I/O.
    /// - A read error, after queueing one diagnostic record.
    pub fn generate(&self, buf: &mut [u8]) -> Result<(), EngineError> {
        let result = self.backend()?.read(buf);

        if let Err(e) = &result
            && e.kind() != BackendErrorKind::NotAcquired
        {
            self.report(e);
        }

        result.map_err(EngineError::from)
    }

    /// Legacy form of [`OsRandomEngine::generate`].
    ///
    /// Every failure maps to [`PseudoRandStatus::SoftFailure`], never to
    /// [`PseudoRandStatus::HardFailure`].
    pub fn generate_legacy(&self, buf: &mut [u8]) -> PseudoRandStatus {
        match self.generate(buf) {
            Ok(()) => PseudoRandStatus::Success,
            Err(_) => PseudoRandStatus::SoftFailure,
        }
    }

    /// Returns true if the backend is acquired.
    pub fn status(&self) -> bool {
        self.backend().is_ok_and(|backend| backend.status())
    }

    /// Releases the backend. A no-op if not acquired.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Backend`] with a release error.
    pub fn finish(&self) -> Result<(), EngineError> {
        self.backend()?.release()?;

        Ok(())
    }
}

impl<B: Backend> RandMethod for OsRandomEngine<B> {
    fn bytes(&self, buf: &mut [u8]) -> Result<(), HostError> {
        self.generate(buf).map_err(HostError::callback_error)
    }

    fn pseudo_bytes(&self, buf: &mut [u8]) -> PseudoRandStatus {
        self.generate_legacy(buf)
    }

    fn status(&self) -> bool {
        OsRandomEngine::status(self)
    }
}

impl<B: Backend> core::fmt::Debug for OsRandomEngine<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OsRandomEngine")
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}
