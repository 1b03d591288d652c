// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Registration of the engine into an [`EngineRegistry`].
//!
//! [`install`] runs the whole build sequence through an [`EngineBuilder`]:
//! either the configured engine ends up in the registry or nothing does.

use std::sync::Arc;

use log::{debug, warn};
use osrandom_host::{EngineBuilder, EngineRegistry, HostError};

use crate::backend::Backend;
use crate::engine::OsRandomEngine;
use crate::error::EngineError;

/// Identity strings under which an engine is registered.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct EngineIdentity {
    /// Short machine identifier.
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
}

/// Identity of the OS random engine.
pub const OSRANDOM_IDENTITY: EngineIdentity = EngineIdentity {
    id: "osrandom",
    name: "osrandom_engine",
};

/// Builds an engine over `engine` and adds it to `registry`.
///
/// The engine's `generate` fills the random-bytes slot and `generate_legacy`
/// the pseudo-random slot; `init` and `finish` become the lifecycle functions.
///
/// # Errors
///
/// Returns [`EngineError::Registration`] if any step fails. The registry is
/// left untouched then.
pub fn install<B: Backend + 'static>(
    registry: &EngineRegistry,
    identity: &EngineIdentity,
    engine: Arc<OsRandomEngine<B>>,
) -> Result<(), EngineError> {
    let init_engine = Arc::clone(&engine);
    let finish_engine = Arc::clone(&engine);

    let mut builder = EngineBuilder::new(registry)?;

    builder
        .set_id(identity.id)?
        .set_name(identity.name)?
        .set_rand(engine)?
        .set_init_function(Arc::new(move || {
            init_engine.init().map_err(HostError::callback_error)
        }))?
        .set_finish_function(Arc::new(move || {
            finish_engine.finish().map_err(HostError::callback_error)
        }))?;

    builder.add()?;

    debug!("installed engine {:?}", identity.id);

    Ok(())
}

/// Installs the OS random engine into the global registry.
///
/// Returns `false` on any failure, including an engine with the same id
/// already being registered. Nothing is registered on failure.
pub fn add_osrandom_engine() -> bool {
    install(
        EngineRegistry::global(),
        &OSRANDOM_IDENTITY,
        OsRandomEngine::system(),
    )
    .inspect_err(|e| warn!("failed to add osrandom engine: {e}"))
    .is_ok()
}

/// Makes the engine registered as `id` the default random engine of `registry`.
///
/// Runs the engine's `init` unless it already holds a functional reference.
///
/// # Errors
///
/// - [`EngineError::NotRegistered`] if no engine has this id.
/// - [`EngineError::Registration`] if `init` fails; the previous default stays.
pub fn activate_in(registry: &EngineRegistry, id: &'static str) -> Result<(), EngineError> {
    let engine = registry.by_id(id).ok_or(EngineError::NotRegistered(id))?;
    registry.set_default_rand(&engine)?;

    Ok(())
}

/// Removes the engine registered as `id` from the default random slot.
///
/// A no-op when another engine, or none, is the default.
///
/// # Errors
///
/// Returns [`EngineError::Registration`] if `finish` fails.
pub fn deactivate_in(registry: &EngineRegistry, id: &'static str) -> Result<(), EngineError> {
    let is_default = registry
        .default_rand()
        .is_some_and(|engine| engine.id() == id);

    if is_default {
        registry.unregister_default_rand()?;
    }

    Ok(())
}

/// Makes the OS random engine the default random engine of the global registry.
///
/// # Errors
///
/// See [`activate_in`].
pub fn activate_osrandom_engine() -> Result<(), EngineError> {
    activate_in(EngineRegistry::global(), OSRANDOM_IDENTITY.id)
}

/// Reverts the global registry to having no default random engine if the OS
/// random engine is the default.
///
/// # Errors
///
/// See [`deactivate_in`].
pub fn deactivate_osrandom_engine() -> Result<(), EngineError> {
    deactivate_in(EngineRegistry::global(), OSRANDOM_IDENTITY.id)
}
