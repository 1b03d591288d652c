// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Shared diagnostic error queue.
//!
//! Engines push one [`ErrorRecord`] per I/O failure; consumers drain them with
//! [`ErrorQueue::get`]. The queue is a bounded ring: once full, the oldest
//! record is dropped to make room.

use std::collections::VecDeque;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};

use log::warn;

/// Maximum number of records retained by an [`ErrorQueue`].
pub const ERROR_QUEUE_CAPACITY: usize = 16;

static GLOBAL: LazyLock<Arc<ErrorQueue>> = LazyLock::new(|| Arc::new(ErrorQueue::new()));

/// Library code of an [`ErrorRecord`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorLibrary {
    /// Random number generation.
    Rand = 36,
}

/// Reason code of an [`ErrorRecord`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorReason {
    /// Failure inside the RAND library.
    RandLib = 36,
}

/// A single diagnostic entry.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ErrorRecord {
    /// Library the failure originated in.
    pub library: ErrorLibrary,
    /// Function code. Engines outside the host library report `0`.
    pub function: u32,
    /// Reason for the failure.
    pub reason: ErrorReason,
    /// Static source tag.
    pub file: &'static str,
    /// Source line, `0` when not meaningful.
    pub line: u32,
}

impl ErrorRecord {
    /// Packs library, function and reason into a single code.
    pub fn packed(&self) -> u32 {
        ((self.library as u32 & 0xff) << 24)
            | ((self.function & 0xfff) << 12)
            | (self.reason as u32 & 0xfff)
    }
}

/// Bounded, thread-safe queue of [`ErrorRecord`]s.
#[derive(Debug, Default)]
pub struct ErrorQueue {
    records: Mutex<VecDeque<ErrorRecord>>,
}

impl ErrorQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            records: Mutex::new(VecDeque::with_capacity(ERROR_QUEUE_CAPACITY)),
        }
    }

    /// Returns the process-wide queue.
    pub fn global() -> Arc<ErrorQueue> {
        Arc::clone(&GLOBAL)
    }

    // Records are plain data, a poisoned lock still guards a consistent queue.
    fn lock(&self) -> MutexGuard<'_, VecDeque<ErrorRecord>> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Appends a record, discarding the oldest one if the queue is full.
    pub fn put(&self, record: ErrorRecord) {
        warn!(
            "queued error {:#010x} ({:?}/{:?}) from {}:{}",
            record.packed(),
            record.library,
            record.reason,
            record.file,
            record.line
        );

        let mut records = self.lock();

        if records.len() == ERROR_QUEUE_CAPACITY {
            records.pop_front();
        }

        records.push_back(record);
    }

    /// Removes and returns the oldest record.
    pub fn get(&self) -> Option<ErrorRecord> {
        self.lock().pop_front()
    }

    /// Returns the oldest record without removing it.
    pub fn peek(&self) -> Option<ErrorRecord> {
        self.lock().front().copied()
    }

    /// Returns the most recent record without removing it.
    pub fn peek_last(&self) -> Option<ErrorRecord> {
        self.lock().back().copied()
    }

    /// Drops every record.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of queued records.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if no records are queued.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
