// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Process-wide engine registry.
//!
//! Owns every registered [`Engine`] and the default random engine, and serves
//! the consumer-side random byte requests by resolving that default.

use std::sync::{Arc, LazyLock, Mutex, MutexGuard};

use log::{debug, warn};

use crate::engine::{Engine, RegistryFault};
use crate::error::HostError;
use crate::rand::PseudoRandStatus;

static GLOBAL: LazyLock<EngineRegistry> = LazyLock::new(EngineRegistry::new);

#[derive(Default)]
struct RegistryState {
    engines: Vec<Arc<Engine>>,
    default_rand: Option<Arc<Engine>>,
    closed: bool,
}

/// Registry of engines and of the default random engine.
#[derive(Default)]
pub struct EngineRegistry {
    state: Mutex<RegistryState>,
    #[cfg(any(test, feature = "test_utils"))]
    fault: Mutex<Option<RegistryFault>>,
}

impl EngineRegistry {
    /// Creates an empty, open registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide registry.
    pub fn global() -> &'static EngineRegistry {
        &GLOBAL
    }

    // Lifecycle functions never run while the state lock is held, so a
    // poisoned lock still guards a consistent state.
    fn state(&self) -> MutexGuard<'_, RegistryState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Forces the given build step to fail until reset with `None`.
    #[cfg(any(test, feature = "test_utils"))]
    pub fn inject_fault(&self, fault: Option<RegistryFault>) {
        *self
            .fault
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = fault;
    }

    #[cfg(any(test, feature = "test_utils"))]
    pub(crate) fn check_fault(&self, step: RegistryFault) -> Result<(), HostError> {
        let fault = *self
            .fault
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        match fault {
            Some(f) if f == step => Err(HostError::InjectedFault(step)),
            _ => Ok(()),
        }
    }

    #[cfg(not(any(test, feature = "test_utils")))]
    #[inline(always)]
    pub(crate) fn check_fault(&self, _step: RegistryFault) -> Result<(), HostError> {
        Ok(())
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.state().closed
    }

    pub(crate) fn insert(&self, engine: Engine) -> Result<Arc<Engine>, HostError> {
        let mut state = self.state();

        if state.closed {
            return Err(HostError::Closed);
        }

        if state.engines.iter().any(|e| e.id() == engine.id()) {
            return Err(HostError::DuplicateId(engine.id().into()));
        }

        let engine = Arc::new(engine);
        state.engines.push(Arc::clone(&engine));

        debug!("engine {:?} ({}) added", engine.id(), engine.name());

        Ok(engine)
    }

    /// Looks up a registered engine by id.
    pub fn by_id(&self, id: &str) -> Option<Arc<Engine>> {
        self.state()
            .engines
            .iter()
            .find(|e| e.id() == id)
            .cloned()
    }

    /// Ids of all registered engines, in registration order.
    pub fn ids(&self) -> Vec<String> {
        self.state()
            .engines
            .iter()
            .map(|e| e.id().into())
            .collect()
    }

    /// Number of registered engines.
    pub fn len(&self) -> usize {
        self.state().engines.len()
    }

    /// Returns true if no engine is registered.
    pub fn is_empty(&self) -> bool {
        self.state().engines.is_empty()
    }

    /// Removes an engine, unregistering it as default random engine first.
    ///
    /// # Errors
    ///
    /// - [`HostError::NotFound`] if no engine has this id.
    /// - Any error from finishing the engine as default; it stays registered
    ///   then, see [`EngineRegistry::unregister_default_rand`].
    pub fn remove(&self, id: &str) -> Result<(), HostError> {
        let (removed, previous) = {
            let mut state = self.state();

            let position = state
                .engines
                .iter()
                .position(|e| e.id() == id)
                .ok_or_else(|| HostError::NotFound(id.into()))?;
            let removed = state.engines.remove(position);

            let is_default = state
                .default_rand
                .as_ref()
                .is_some_and(|engine| Arc::ptr_eq(engine, &removed));
            let previous = if is_default {
                state.default_rand.take()
            } else {
                None
            };

            (removed, previous)
        };

        if let Some(previous) = previous
            && let Err(e) = previous.finish()
        {
            let mut state = self.state();
            let taken = state.engines.iter().any(|engine| engine.id() == removed.id());

            if !state.closed && !taken {
                state.engines.push(removed);
            }
            drop(state);

            return Err(self.restore_default(previous, e));
        }

        debug!("engine {id:?} removed");

        Ok(())
    }

    /// Makes `engine` the default random engine.
    ///
    /// Takes a functional reference on `engine` first and releases the one
    /// held on the previous default afterwards.
    ///
    /// # Errors
    ///
    /// - The engine's init error; the previous default is kept.
    /// - [`HostError::Closed`] if the registry was cleaned up.
    /// - [`HostError::NotFound`] if `engine` is not registered here.
    pub fn set_default_rand(&self, engine: &Arc<Engine>) -> Result<(), HostError> {
        engine.init()?;

        let previous = {
            let mut state = self.state();

            let rejection = if state.closed {
                Some(HostError::Closed)
            } else if !state.engines.iter().any(|e| Arc::ptr_eq(e, engine)) {
                Some(HostError::NotFound(engine.id().into()))
            } else {
                None
            };

            if let Some(rejection) = rejection {
                drop(state);
                engine.finish()?;
                return Err(rejection);
            }

            state.default_rand.replace(Arc::clone(engine))
        };

        if let Some(previous) = previous
            && let Err(e) = previous.finish()
        {
            warn!("previous default {:?} failed to finish: {e}", previous.id());
        }

        debug!("engine {:?} is the default RAND", engine.id());

        Ok(())
    }

    /// The current default random engine.
    pub fn default_rand(&self) -> Option<Arc<Engine>> {
        self.state().default_rand.clone()
    }

    /// Clears the default random engine, releasing its functional reference.
    ///
    /// Returns `false` if there was no default.
    ///
    /// # Errors
    ///
    /// The engine's finish error. The engine is restored as default then,
    /// unless another engine took the slot meanwhile: the error is then
    /// [`HostError::Displaced`] and the engine keeps its functional reference
    /// until [`Engine::finish`] is called on it.
    pub fn unregister_default_rand(&self) -> Result<bool, HostError> {
        let Some(previous) = self.state().default_rand.take() else {
            return Ok(false);
        };

        if let Err(e) = previous.finish() {
            return Err(self.restore_default(previous, e));
        }

        debug!("engine {:?} unregistered as default RAND", previous.id());

        Ok(true)
    }

    // Puts back a default whose finish failed. Returns the error to report.
    fn restore_default(&self, previous: Arc<Engine>, error: HostError) -> HostError {
        let mut state = self.state();

        if state.default_rand.is_none() {
            state.default_rand = Some(previous);
            return error;
        }
        drop(state);

        warn!(
            "engine {:?} failed to finish and lost the default slot: {error}",
            previous.id()
        );

        HostError::Displaced {
            id: previous.id().into(),
            source: Box::new(error),
        }
    }

    /// Fills `buf` from the default random engine.
    ///
    /// # Errors
    ///
    /// - [`HostError::NoDefaultRand`] without a default engine.
    /// - The engine's own error otherwise.
    pub fn rand_bytes(&self, buf: &mut [u8]) -> Result<(), HostError> {
        let engine = self.default_rand().ok_or(HostError::NoDefaultRand)?;
        engine.rand().bytes(buf)
    }

    /// Legacy pseudo-random request against the default random engine.
    pub fn rand_pseudo_bytes(&self, buf: &mut [u8]) -> PseudoRandStatus {
        match self.default_rand() {
            Some(engine) => engine.rand().pseudo_bytes(buf),
            None => PseudoRandStatus::HardFailure,
        }
    }

    /// Readiness of the default random engine.
    pub fn rand_status(&self) -> bool {
        self.default_rand()
            .is_some_and(|engine| engine.rand().status())
    }

    /// Closes the registry for further additions, unregisters the default
    /// random engine and drops every engine.
    ///
    /// # Errors
    ///
    /// The default engine's finish error. The registry stays closed, the
    /// engine stays default and nothing is dropped; the call may be retried.
    pub fn cleanup(&self) -> Result<(), HostError> {
        let previous = {
            let mut state = self.state();
            state.closed = true;
            state.default_rand.take()
        };

        if let Some(previous) = previous
            && let Err(e) = previous.finish()
        {
            return Err(self.restore_default(previous, e));
        }

        self.state().engines.clear();

        debug!("registry cleaned up");

        Ok(())
    }
}
