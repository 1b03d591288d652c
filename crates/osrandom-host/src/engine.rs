// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Engine objects and their builder.

use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, warn};

use crate::error::HostError;
use crate::rand::{LifecycleFn, RandMethod};
use crate::registry::EngineRegistry;

/// Steps of the engine build sequence, used to force failures in tests.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RegistryFault {
    /// [`EngineBuilder::new`]
    New,
    /// [`EngineBuilder::set_id`]
    SetId,
    /// [`EngineBuilder::set_name`]
    SetName,
    /// [`EngineBuilder::set_rand`]
    SetRand,
    /// [`EngineBuilder::set_init_function`]
    SetInit,
    /// [`EngineBuilder::set_finish_function`]
    SetFinish,
    /// [`EngineBuilder::add`]
    Add,
}

/// A registered, host-visible engine.
///
/// Holds the identity strings, the random method and the optional lifecycle
/// functions. The functional reference count guarantees that `init` runs on
/// the first reference only and `finish` on the last release only.
pub struct Engine {
    id: String,
    name: String,
    rand: Arc<dyn RandMethod>,
    init: Option<LifecycleFn>,
    finish: Option<LifecycleFn>,
    functional_refs: Mutex<usize>,
}

impl Engine {
    /// Short machine identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The engine's random method.
    pub fn rand(&self) -> &Arc<dyn RandMethod> {
        &self.rand
    }

    // The count is only updated after the lifecycle function returned.
    fn refs(&self) -> MutexGuard<'_, usize> {
        self.functional_refs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of outstanding functional references.
    pub fn functional_refs(&self) -> usize {
        *self.refs()
    }

    /// Takes a functional reference, running the init function on the first one.
    ///
    /// # Errors
    ///
    /// Propagates the init function's error; no reference is taken then.
    pub fn init(&self) -> Result<(), HostError> {
        let mut refs = self.refs();

        if *refs == 0 {
            if let Some(init) = &self.init {
                init().inspect_err(|e| warn!("engine {:?} init failed: {e}", self.id))?;
            }
            debug!("engine {:?} initialized", self.id);
        }

        *refs += 1;

        Ok(())
    }

    /// Releases a functional reference, running the finish function on the last one.
    ///
    /// # Errors
    ///
    /// - [`HostError::NotInitialized`] if no functional reference is held.
    /// - The finish function's error; the reference is kept so the caller may retry.
    pub fn finish(&self) -> Result<(), HostError> {
        let mut refs = self.refs();

        if *refs == 0 {
            return Err(HostError::NotInitialized(self.id.clone()));
        }

        if *refs == 1 {
            if let Some(finish) = &self.finish {
                finish().inspect_err(|e| warn!("engine {:?} finish failed: {e}", self.id))?;
            }
            debug!("engine {:?} finished", self.id);
        }

        *refs -= 1;

        Ok(())
    }
}

impl core::fmt::Debug for Engine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Engine")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("functional_refs", &self.functional_refs())
            .finish_non_exhaustive()
    }
}

/// Accumulates an engine's configuration and commits it into a registry.
///
/// Nothing is visible to the registry until [`EngineBuilder::add`] succeeds.
/// Dropping the builder discards the partial configuration.
pub struct EngineBuilder<'r> {
    registry: &'r EngineRegistry,
    id: Option<String>,
    name: Option<String>,
    rand: Option<Arc<dyn RandMethod>>,
    init: Option<LifecycleFn>,
    finish: Option<LifecycleFn>,
}

impl<'r> EngineBuilder<'r> {
    /// Allocates a new, empty engine configuration for `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::AllocationFailed`] if the registry was cleaned up.
    pub fn new(registry: &'r EngineRegistry) -> Result<Self, HostError> {
        registry.check_fault(RegistryFault::New)?;

        if registry.is_closed() {
            return Err(HostError::AllocationFailed);
        }

        Ok(Self {
            registry,
            id: None,
            name: None,
            rand: None,
            init: None,
            finish: None,
        })
    }

    /// Sets the engine id.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::InvalidId`] unless `id` is non-empty `[A-Za-z0-9_-]`.
    pub fn set_id(&mut self, id: &str) -> Result<&mut Self, HostError> {
        self.registry.check_fault(RegistryFault::SetId)?;

        let valid = !id.is_empty()
            && id
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');

        if !valid {
            return Err(HostError::InvalidId(id.into()));
        }

        self.id = Some(id.into());

        Ok(self)
    }

    /// Sets the engine display name.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::InvalidName`] if `name` is empty.
    pub fn set_name(&mut self, name: &str) -> Result<&mut Self, HostError> {
        self.registry.check_fault(RegistryFault::SetName)?;

        if name.is_empty() {
            return Err(HostError::InvalidName);
        }

        self.name = Some(name.into());

        Ok(self)
    }

    /// Sets the random method.
    pub fn set_rand(&mut self, rand: Arc<dyn RandMethod>) -> Result<&mut Self, HostError> {
        self.registry.check_fault(RegistryFault::SetRand)?;
        self.rand = Some(rand);

        Ok(self)
    }

    /// Sets the function run when the first functional reference is taken.
    pub fn set_init_function(&mut self, init: LifecycleFn) -> Result<&mut Self, HostError> {
        self.registry.check_fault(RegistryFault::SetInit)?;
        self.init = Some(init);

        Ok(self)
    }

    /// Sets the function run when the last functional reference is released.
    pub fn set_finish_function(&mut self, finish: LifecycleFn) -> Result<&mut Self, HostError> {
        self.registry.check_fault(RegistryFault::SetFinish)?;
        self.finish = Some(finish);

        Ok(self)
    }

    /// Commits the engine into the registry.
    ///
    /// The registry keeps the only reference besides the returned one.
    ///
    /// # Errors
    ///
    /// - [`HostError::MissingId`], [`HostError::MissingName`] or
    ///   [`HostError::MissingRandMethod`] for an incomplete configuration.
    /// - [`HostError::DuplicateId`] if the id is already registered.
    /// - [`HostError::Closed`] if the registry was cleaned up meanwhile.
    pub fn add(self) -> Result<Arc<Engine>, HostError> {
        self.registry.check_fault(RegistryFault::Add)?;

        let engine = Engine {
            id: self.id.ok_or(HostError::MissingId)?,
            name: self.name.ok_or(HostError::MissingName)?,
            rand: self.rand.ok_or(HostError::MissingRandMethod)?,
            init: self.init,
            finish: self.finish,
            functional_refs: Mutex::new(0),
        };

        self.registry.insert(engine)
    }
}
