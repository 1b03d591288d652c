// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! DeviceBackend against the real kernel.

use crate::backend::{Backend, DeviceBackend, LibcDeviceIo};
use crate::error::BackendError;

#[test]
fn test_urandom_end_to_end() {
    let mut backend = DeviceBackend::new(LibcDeviceIo);
    let mut buf = [0u8; 32];

    backend.acquire().expect("Failed to acquire()");
    backend.read(&mut buf).expect("Failed to read()");
    assert!(backend.status());

    backend.release().expect("Failed to release()");
    assert!(!backend.status());

    // 32 zero bytes from /dev/urandom would be a 2^-256 event.
    assert_ne!(buf, [0u8; 32]);
}

#[test]
fn test_urandom_descriptor_is_close_on_exec() {
    let mut backend = DeviceBackend::new(LibcDeviceIo);

    backend.acquire().expect("Failed to acquire()");
    let fd = backend.descriptor().expect("Failed to descriptor()");
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFD) };

    assert_ne!(flags, -1);
    assert_ne!(flags & libc::FD_CLOEXEC, 0);

    backend.release().expect("Failed to release()");
}

#[test]
fn test_urandom_large_read() {
    let mut backend = DeviceBackend::new(LibcDeviceIo);
    let mut buf = vec![0u8; 1 << 20];

    backend.acquire().expect("Failed to acquire()");
    backend.read(&mut buf).expect("Failed to read()");
    backend.release().expect("Failed to release()");

    assert!(buf.iter().any(|&b| b != 0));
}

#[test]
fn test_missing_device_fails_to_open() {
    let mut backend = DeviceBackend::with_path(LibcDeviceIo, c"/nonexistent/osrandom/urandom");

    let result = backend.acquire();

    assert_eq!(result, Err(BackendError::Open(libc::ENOENT)));
    assert!(!backend.status());
}

#[test]
fn test_dev_null_reports_end_of_stream() {
    let mut backend = DeviceBackend::with_path(LibcDeviceIo, c"/dev/null");
    let mut buf = [0u8; 16];

    backend.acquire().expect("Failed to acquire()");

    assert_eq!(backend.read(&mut buf), Err(BackendError::UnexpectedEof));

    backend.release().expect("Failed to release()");
}
