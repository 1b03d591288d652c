// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::backend::{ProviderApi, ProviderHandle};

/// Handle returned by a successful [`MockProviderApi::acquire_context`].
pub const MOCK_HANDLE: ProviderHandle = 0x1000;

/// Byte written by every successful [`MockProviderApi::gen_random`].
pub const MOCK_PROVIDER_BYTE: u8 = 0x3c;

/// Configurable behavior for [`MockProviderApi`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockProviderApiBehaviour {
    /// Every call succeeds.
    None,
    /// Acquiring a context fails with the given code.
    FailAcquire(i32),
    /// Generating fails with the given code.
    FailGenRandom(i32),
    /// Releasing fails with the given code.
    FailRelease(i32),
}

#[derive(Debug)]
struct State {
    behaviour: MockProviderApiBehaviour,
    acquire_count: usize,
    gen_random_count: usize,
    release_count: usize,
}

/// Mock CryptoAPI calls for [`ProviderBackend`](crate::ProviderBackend).
///
/// Clones share behaviour and counters.
#[derive(Debug, Clone)]
pub struct MockProviderApi {
    state: Arc<Mutex<State>>,
}

impl MockProviderApi {
    /// Creates a new mock with the specified behavior.
    pub fn new(behaviour: MockProviderApiBehaviour) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                behaviour,
                acquire_count: 0,
                gen_random_count: 0,
                release_count: 0,
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Changes the mock behavior at runtime.
    pub fn change_behaviour(&self, behaviour: MockProviderApiBehaviour) {
        self.state().behaviour = behaviour;
    }

    /// Number of `acquire_context` calls.
    pub fn acquire_count(&self) -> usize {
        self.state().acquire_count
    }

    /// Number of `gen_random` calls.
    pub fn gen_random_count(&self) -> usize {
        self.state().gen_random_count
    }

    /// Number of `release_context` calls.
    pub fn release_count(&self) -> usize {
        self.state().release_count
    }
}

impl ProviderApi for MockProviderApi {
    fn acquire_context(&self) -> Result<ProviderHandle, i32> {
        let mut state = self.state();
        state.acquire_count += 1;

        let behaviour = state.behaviour;

        match behaviour {
            MockProviderApiBehaviour::FailAcquire(code) => Err(code),
            _ => Ok(MOCK_HANDLE),
        }
    }

    fn gen_random(&self, _handle: ProviderHandle, buf: &mut [u8]) -> Result<(), i32> {
        let mut state = self.state();
        state.gen_random_count += 1;

        let behaviour = state.behaviour;

        match behaviour {
            MockProviderApiBehaviour::FailGenRandom(code) => Err(code),
            _ => {
                buf.fill(MOCK_PROVIDER_BYTE);
                Ok(())
            }
        }
    }

    fn release_context(&self, _handle: ProviderHandle) -> Result<(), i32> {
        let mut state = self.state();
        state.release_count += 1;

        let behaviour = state.behaviour;

        match behaviour {
            MockProviderApiBehaviour::FailRelease(code) => Err(code),
            _ => Ok(()),
        }
    }
}
