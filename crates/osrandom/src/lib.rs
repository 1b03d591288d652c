// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! # osrandom
//!
//! A random engine that hands out operating system randomness and nothing else:
//! no mixing, no reseeding, no fallback to a weaker source.
//!
//! ## Core Types
//!
//! - [`OsRandomEngine`]: init / generate / status / finish over a [`Backend`]
//! - [`DeviceBackend`] (Unix): a close-on-exec descriptor on `/dev/urandom`
//! - [`ProviderBackend`] (Windows): a verification-only CryptoAPI context
//!
//! ## Registration
//!
//! [`add_osrandom_engine`] installs the engine into the global
//! [`EngineRegistry`](osrandom_host::EngineRegistry) under the id `"osrandom"`;
//! [`activate_osrandom_engine`] then makes it the default random engine.
//!
//! ## Example
//!
//! ```rust
//! use osrandom::{OsRandomEngine, add_osrandom_engine, activate_osrandom_engine};
//! use osrandom_host::EngineRegistry;
//!
//! assert!(add_osrandom_engine());
//! activate_osrandom_engine().expect("Failed to activate_osrandom_engine()");
//!
//! let mut key = [0u8; 32];
//! EngineRegistry::global()
//!     .rand_bytes(&mut key)
//!     .expect("Failed to rand_bytes()");
//!
//! assert!(OsRandomEngine::system().status());
//! ```
//!
//! ## Concurrency
//!
//! The backend lives behind a mutex: concurrent calls serialize, and a
//! blocking read holds the lock until the kernel returns.

#![warn(missing_docs)]

#[cfg(test)]
mod tests;

mod backend;
mod engine;
mod error;
mod registration;
mod support;

pub use backend::{Backend, SystemBackend, system_backend};
#[cfg(unix)]
pub use backend::{DeviceBackend, DeviceIo, LibcDeviceIo, RawFd, URANDOM_PATH};
#[cfg(any(windows, test, feature = "test_utils"))]
pub use backend::{ProviderApi, ProviderBackend, ProviderHandle};
#[cfg(windows)]
pub use backend::CryptoApiProvider;

pub use engine::{DIAGNOSTIC_SOURCE, OsRandomEngine};
pub use error::{BackendError, BackendErrorKind, EngineError};
pub use registration::{
    EngineIdentity, OSRANDOM_IDENTITY, activate_in, activate_osrandom_engine,
    add_osrandom_engine, deactivate_in, deactivate_osrandom_engine, install,
};

#[cfg(any(test, feature = "test_utils"))]
pub use support::test_utils;
