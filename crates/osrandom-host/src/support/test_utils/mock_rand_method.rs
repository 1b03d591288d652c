// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::HostError;
use crate::rand::{LifecycleFn, PseudoRandStatus, RandMethod};

/// Byte written by [`MockRandMethod`] on success.
pub const MOCK_FILL_BYTE: u8 = 0x5a;

/// Configurable behavior for [`MockRandMethod`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockRandMethodBehaviour {
    /// Fills every buffer with [`MOCK_FILL_BYTE`].
    None,
    /// Every `bytes` call fails.
    FailBytes,
    /// The init function fails.
    FailInit,
    /// The finish function fails.
    FailFinish,
}

#[derive(Debug, Default)]
struct Counters {
    bytes: AtomicUsize,
    init: AtomicUsize,
    finish: AtomicUsize,
}

/// Mock random method with call counters and lifecycle functions.
///
/// Clones share behaviour and counters.
#[derive(Debug, Clone)]
pub struct MockRandMethod {
    behaviour: Arc<Mutex<MockRandMethodBehaviour>>,
    counters: Arc<Counters>,
}

impl MockRandMethod {
    /// Creates a new mock with the specified behavior.
    pub fn new(behaviour: MockRandMethodBehaviour) -> Self {
        Self {
            behaviour: Arc::new(Mutex::new(behaviour)),
            counters: Arc::new(Counters::default()),
        }
    }

    fn behaviour(&self) -> MockRandMethodBehaviour {
        *self
            .behaviour
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Changes the mock behavior at runtime.
    pub fn change_behaviour(&self, behaviour: MockRandMethodBehaviour) {
        *self
            .behaviour
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = behaviour;
    }

    /// Number of `bytes`/`pseudo_bytes` calls.
    pub fn bytes_count(&self) -> usize {
        self.counters.bytes.load(Ordering::SeqCst)
    }

    /// Number of init function calls.
    pub fn init_count(&self) -> usize {
        self.counters.init.load(Ordering::SeqCst)
    }

    /// Number of finish function calls.
    pub fn finish_count(&self) -> usize {
        self.counters.finish.load(Ordering::SeqCst)
    }

    /// Init function bound to this mock.
    pub fn init_function(&self) -> LifecycleFn {
        let mock = self.clone();

        Arc::new(move || {
            mock.counters.init.fetch_add(1, Ordering::SeqCst);

            match mock.behaviour() {
                MockRandMethodBehaviour::FailInit => Err(HostError::callback_error("init")),
                _ => Ok(()),
            }
        })
    }

    /// Finish function bound to this mock.
    pub fn finish_function(&self) -> LifecycleFn {
        let mock = self.clone();

        Arc::new(move || {
            mock.counters.finish.fetch_add(1, Ordering::SeqCst);

            match mock.behaviour() {
                MockRandMethodBehaviour::FailFinish => Err(HostError::callback_error("finish")),
                _ => Ok(()),
            }
        })
    }
}

impl RandMethod for MockRandMethod {
    fn bytes(&self, buf: &mut [u8]) -> Result<(), HostError> {
        self.counters.bytes.fetch_add(1, Ordering::SeqCst);

        match self.behaviour() {
            MockRandMethodBehaviour::FailBytes => Err(HostError::callback_error("bytes")),
            _ => {
                buf.fill(MOCK_FILL_BYTE);
                Ok(())
            }
        }
    }

    fn pseudo_bytes(&self, buf: &mut [u8]) -> PseudoRandStatus {
        match self.bytes(buf) {
            Ok(()) => PseudoRandStatus::Success,
            Err(_) => PseudoRandStatus::SoftFailure,
        }
    }

    fn status(&self) -> bool {
        self.behaviour() != MockRandMethodBehaviour::FailBytes
    }
}
