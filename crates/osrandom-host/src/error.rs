// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for osrandom-host.
use thiserror::Error;

/// Errors raised by the engine registry and engine objects.
#[derive(Debug, Error)]
pub enum HostError {
    /// A new engine object could not be allocated (the registry was cleaned up).
    #[error("engine allocation failed")]
    AllocationFailed,

    /// The engine id is empty or contains characters outside `[A-Za-z0-9_-]`.
    #[error("invalid engine id: {0:?}")]
    InvalidId(String),

    /// The engine display name is empty.
    #[error("invalid engine name")]
    InvalidName,

    /// The engine has no id set when being added.
    #[error("engine has no id")]
    MissingId,

    /// The engine has no display name set when being added.
    #[error("engine has no name")]
    MissingName,

    /// The engine has no random method set when being added.
    #[error("engine has no RAND method")]
    MissingRandMethod,

    /// An engine with the same id is already registered.
    #[error("engine id {0:?} is already registered")]
    DuplicateId(String),

    /// No engine with the given id is registered.
    #[error("engine {0:?} not found")]
    NotFound(String),

    /// The registry no longer accepts engines.
    #[error("registry is closed")]
    Closed,

    /// `finish` was called on an engine without functional references.
    #[error("engine {0:?} is not initialized")]
    NotInitialized(String),

    /// No default random engine has been set.
    #[error("no default RAND engine")]
    NoDefaultRand,

    /// An engine failed to finish as default while another engine became the
    /// default; it still holds its functional reference.
    #[error("engine {id:?} failed to finish and was displaced as default: {source}")]
    Displaced {
        /// Id of the displaced engine.
        id: String,
        /// The finish error.
        source: Box<HostError>,
    },

    /// A build step was forced to fail.
    #[cfg(any(test, feature = "test_utils"))]
    #[error("injected fault at {0:?}")]
    InjectedFault(crate::engine::RegistryFault),

    /// An engine callback (init, finish, bytes) failed.
    #[error("callback error: {0:?}")]
    Callback(Box<dyn core::fmt::Debug + Send + Sync + 'static>),
}

impl HostError {
    /// Creates a Callback error from any Debug + Send + Sync error.
    pub fn callback_error<E: core::fmt::Debug + Send + Sync + 'static>(e: E) -> Self {
        Self::Callback(Box::new(e))
    }
}
