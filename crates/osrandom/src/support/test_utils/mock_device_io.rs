// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::ffi::CStr;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::backend::{DeviceIo, RawFd};

/// Descriptor returned by a successful [`MockDeviceIo::open_read_only`].
pub const MOCK_FD: RawFd = 42;

/// Byte written by every successful [`MockDeviceIo::read`].
pub const MOCK_DEVICE_BYTE: u8 = 0xa5;

/// Configurable behavior for [`MockDeviceIo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockDeviceIoBehaviour {
    /// Every call succeeds; reads fill the whole buffer.
    None,
    /// `open` fails with the given errno.
    FailOpen(i32),
    /// `fcntl(F_GETFD)` fails with the given errno.
    FailGetFlags(i32),
    /// `fcntl(F_SETFD)` fails with the given errno.
    FailSetFlags(i32),
    /// The first N reads fail with `EINTR`, later reads fill the whole buffer.
    InterruptReads(usize),
    /// Every read delivers at most N bytes.
    ChunkedReads(usize),
    /// Reads deliver N bytes in total, then report end of stream.
    EofAfter(usize),
    /// Every read fails with the given errno.
    FailRead(i32),
    /// The first N closes fail with `EINTR`, later closes succeed.
    InterruptCloses(usize),
    /// Every close fails with the given errno.
    FailClose(i32),
}

#[derive(Debug)]
struct State {
    behaviour: MockDeviceIoBehaviour,
    open_count: usize,
    get_flags_count: usize,
    set_flags_count: usize,
    read_count: usize,
    close_count: usize,
    interrupts: usize,
    delivered: usize,
    last_flags: Option<libc::c_int>,
}

/// Mock descriptor syscalls for [`DeviceBackend`](crate::DeviceBackend).
///
/// Clones share behaviour and counters, so a test can keep one clone while
/// the backend owns another.
#[derive(Debug, Clone)]
pub struct MockDeviceIo {
    state: Arc<Mutex<State>>,
}

impl MockDeviceIo {
    /// Creates a new mock with the specified behavior.
    pub fn new(behaviour: MockDeviceIoBehaviour) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                behaviour,
                open_count: 0,
                get_flags_count: 0,
                set_flags_count: 0,
                read_count: 0,
                close_count: 0,
                interrupts: 0,
                delivered: 0,
                last_flags: None,
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Changes the mock behavior at runtime and resets the interrupt and
    /// delivery tallies.
    pub fn change_behaviour(&self, behaviour: MockDeviceIoBehaviour) {
        let mut state = self.state();
        state.behaviour = behaviour;
        state.interrupts = 0;
        state.delivered = 0;
    }

    /// Number of `open` calls.
    pub fn open_count(&self) -> usize {
        self.state().open_count
    }

    /// Number of `fcntl(F_GETFD)` calls.
    pub fn get_flags_count(&self) -> usize {
        self.state().get_flags_count
    }

    /// Number of `fcntl(F_SETFD)` calls.
    pub fn set_flags_count(&self) -> usize {
        self.state().set_flags_count
    }

    /// Number of `read` calls, including interrupted ones.
    pub fn read_count(&self) -> usize {
        self.state().read_count
    }

    /// Number of `close` calls, including interrupted ones.
    pub fn close_count(&self) -> usize {
        self.state().close_count
    }

    /// Flags passed to the last successful `fcntl(F_SETFD)`.
    pub fn last_flags(&self) -> Option<libc::c_int> {
        self.state().last_flags
    }
}

impl DeviceIo for MockDeviceIo {
    fn open_read_only(&self, _path: &CStr) -> Result<RawFd, i32> {
        let mut state = self.state();
        state.open_count += 1;

        let behaviour = state.behaviour;

        match behaviour {
            MockDeviceIoBehaviour::FailOpen(errno) => Err(errno),
            _ => Ok(MOCK_FD),
        }
    }

    fn descriptor_flags(&self, _fd: RawFd) -> Result<libc::c_int, i32> {
        let mut state = self.state();
        state.get_flags_count += 1;

        let behaviour = state.behaviour;

        match behaviour {
            MockDeviceIoBehaviour::FailGetFlags(errno) => Err(errno),
            _ => Ok(0),
        }
    }

    fn set_descriptor_flags(&self, _fd: RawFd, flags: libc::c_int) -> Result<(), i32> {
        let mut state = self.state();
        state.set_flags_count += 1;

        let behaviour = state.behaviour;

        match behaviour {
            MockDeviceIoBehaviour::FailSetFlags(errno) => Err(errno),
            _ => {
                state.last_flags = Some(flags);
                Ok(())
            }
        }
    }

    fn read(&self, _fd: RawFd, buf: &mut [u8]) -> Result<usize, i32> {
        let mut state = self.state();
        state.read_count += 1;

        let behaviour = state.behaviour;

        let n = match behaviour {
            MockDeviceIoBehaviour::InterruptReads(n) if state.interrupts < n => {
                state.interrupts += 1;
                return Err(libc::EINTR);
            }
            MockDeviceIoBehaviour::FailRead(errno) => return Err(errno),
            MockDeviceIoBehaviour::ChunkedReads(n) => n.min(buf.len()),
            MockDeviceIoBehaviour::EofAfter(total) => {
                total.saturating_sub(state.delivered).min(buf.len())
            }
            _ => buf.len(),
        };

        buf[..n].fill(MOCK_DEVICE_BYTE);
        state.delivered += n;

        Ok(n)
    }

    fn close(&self, _fd: RawFd) -> Result<(), i32> {
        let mut state = self.state();
        state.close_count += 1;

        let behaviour = state.behaviour;

        match behaviour {
            MockDeviceIoBehaviour::InterruptCloses(n) if state.interrupts < n => {
                state.interrupts += 1;
                Err(libc::EINTR)
            }
            MockDeviceIoBehaviour::FailClose(errno) => Err(errno),
            _ => Ok(()),
        }
    }
}
