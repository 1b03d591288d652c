// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! # osrandom_host
//!
//! The host side of the osrandom engine: what a consuming cryptography
//! library exposes to pluggable random engines.
//!
//! ## Core Types
//!
//! - [`EngineRegistry`]: process-wide set of engines plus the default random engine
//! - [`EngineBuilder`]: atomic construction of an [`Engine`]
//! - [`ErrorQueue`]: shared diagnostic queue engines report I/O failures into
//!
//! ## Traits
//!
//! - [`RandMethod`]: the "give me N random bytes" contract
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use osrandom_host::{EngineBuilder, EngineRegistry, HostError, PseudoRandStatus, RandMethod};
//!
//! struct Zeros;
//!
//! impl RandMethod for Zeros {
//!     fn bytes(&self, buf: &mut [u8]) -> Result<(), HostError> {
//!         buf.fill(0);
//!         Ok(())
//!     }
//!
//!     fn pseudo_bytes(&self, buf: &mut [u8]) -> PseudoRandStatus {
//!         buf.fill(0);
//!         PseudoRandStatus::Success
//!     }
//!
//!     fn status(&self) -> bool {
//!         true
//!     }
//! }
//!
//! let registry = EngineRegistry::new();
//!
//! let mut builder = EngineBuilder::new(&registry).expect("Failed to new()");
//! builder
//!     .set_id("zeros")
//!     .and_then(|b| b.set_name("all zeros"))
//!     .and_then(|b| b.set_rand(Arc::new(Zeros)))
//!     .expect("Failed to configure engine");
//! let engine = builder.add().expect("Failed to add()");
//!
//! registry.set_default_rand(&engine).expect("Failed to set_default_rand()");
//!
//! let mut buf = [1u8; 16];
//! registry.rand_bytes(&mut buf).expect("Failed to rand_bytes()");
//! assert_eq!(buf, [0u8; 16]);
//! ```

#![warn(missing_docs)]

#[cfg(test)]
mod tests;

mod engine;
mod error;
mod error_queue;
mod rand;
mod registry;
mod support;

pub use engine::{Engine, EngineBuilder, RegistryFault};
pub use error::HostError;
pub use error_queue::{ERROR_QUEUE_CAPACITY, ErrorLibrary, ErrorQueue, ErrorReason, ErrorRecord};
pub use rand::{LifecycleFn, PseudoRandStatus, RandMethod};
pub use registry::EngineRegistry;

#[cfg(any(test, feature = "test_utils"))]
pub use support::test_utils;
