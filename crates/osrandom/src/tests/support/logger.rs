// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Test logger: forwards to `env_logger` and counts warnings per thread.

use std::cell::Cell;
use std::sync::Once;

use log::{Level, LevelFilter, Log, Metadata, Record};

thread_local! {
    static WARNINGS: Cell<usize> = const { Cell::new(0) };
}

struct CountingLogger {
    inner: env_logger::Logger,
}

impl Log for CountingLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= Level::Warn || self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        if record.level() <= Level::Warn {
            WARNINGS.with(|w| w.set(w.get() + 1));
        }

        self.inner.log(record);
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Installs the logger once per test binary.
pub(crate) fn init() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let inner = env_logger::Builder::from_default_env()
            .is_test(true)
            .build();
        let max_level = inner.filter().max(LevelFilter::Warn);

        if log::set_boxed_logger(Box::new(CountingLogger { inner })).is_ok() {
            log::set_max_level(max_level);
        }
    });
}

/// Warnings and errors logged so far on the current thread.
pub(crate) fn warnings() -> usize {
    WARNINGS.with(Cell::get)
}
