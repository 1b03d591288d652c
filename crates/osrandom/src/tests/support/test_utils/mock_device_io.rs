// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use crate::backend::DeviceIo;
use crate::support::test_utils::{MOCK_DEVICE_BYTE, MOCK_FD, MockDeviceIo, MockDeviceIoBehaviour};

#[test]
fn test_mock_device_io_behaviour_none() {
    let io = MockDeviceIo::new(MockDeviceIoBehaviour::None);
    let mut buf = [0u8; 16];

    let fd = io.open_read_only(c"/dev/urandom").expect("Failed to open_read_only()");
    let flags = io.descriptor_flags(fd).expect("Failed to descriptor_flags()");
    io.set_descriptor_flags(fd, flags | libc::FD_CLOEXEC)
        .expect("Failed to set_descriptor_flags()");
    let n = io.read(fd, &mut buf).expect("Failed to read()");
    io.close(fd).expect("Failed to close()");

    assert_eq!(fd, MOCK_FD);
    assert_eq!(n, 16);
    assert_eq!(buf, [MOCK_DEVICE_BYTE; 16]);
    assert_eq!(io.last_flags(), Some(libc::FD_CLOEXEC));
    assert_eq!(io.open_count(), 1);
    assert_eq!(io.get_flags_count(), 1);
    assert_eq!(io.set_flags_count(), 1);
    assert_eq!(io.read_count(), 1);
    assert_eq!(io.close_count(), 1);
}

#[test]
fn test_mock_device_io_failures_carry_errno() {
    let io = MockDeviceIo::new(MockDeviceIoBehaviour::FailOpen(libc::EACCES));
    assert_eq!(io.open_read_only(c"/dev/urandom"), Err(libc::EACCES));

    io.change_behaviour(MockDeviceIoBehaviour::FailGetFlags(libc::EBADF));
    assert_eq!(io.descriptor_flags(MOCK_FD), Err(libc::EBADF));

    io.change_behaviour(MockDeviceIoBehaviour::FailSetFlags(libc::EINVAL));
    assert_eq!(io.set_descriptor_flags(MOCK_FD, 0), Err(libc::EINVAL));
    assert_eq!(io.last_flags(), None);

    io.change_behaviour(MockDeviceIoBehaviour::FailRead(libc::EIO));
    assert_eq!(io.read(MOCK_FD, &mut [0u8; 4]), Err(libc::EIO));

    io.change_behaviour(MockDeviceIoBehaviour::FailClose(libc::EIO));
    assert_eq!(io.close(MOCK_FD), Err(libc::EIO));
}

#[test]
fn test_mock_device_io_interrupts_then_succeeds() {
    let io = MockDeviceIo::new(MockDeviceIoBehaviour::InterruptReads(2));
    let mut buf = [0u8; 4];

    assert_eq!(io.read(MOCK_FD, &mut buf), Err(libc::EINTR));
    assert_eq!(io.read(MOCK_FD, &mut buf), Err(libc::EINTR));
    assert_eq!(io.read(MOCK_FD, &mut buf), Ok(4));

    io.change_behaviour(MockDeviceIoBehaviour::InterruptCloses(1));
    assert_eq!(io.close(MOCK_FD), Err(libc::EINTR));
    assert_eq!(io.close(MOCK_FD), Ok(()));
    assert_eq!(io.read_count(), 3);
    assert_eq!(io.close_count(), 2);
}

#[test]
fn test_mock_device_io_chunked_reads() {
    let io = MockDeviceIo::new(MockDeviceIoBehaviour::ChunkedReads(3));
    let mut buf = [0u8; 8];

    assert_eq!(io.read(MOCK_FD, &mut buf), Ok(3));
    assert_eq!(&buf[..3], &[MOCK_DEVICE_BYTE; 3]);
    assert_eq!(&buf[3..], &[0u8; 5]);
    assert_eq!(io.read(MOCK_FD, &mut buf[..2]), Ok(2));
}

#[test]
fn test_mock_device_io_eof_after_total() {
    let io = MockDeviceIo::new(MockDeviceIoBehaviour::EofAfter(5));
    let mut buf = [0u8; 4];

    assert_eq!(io.read(MOCK_FD, &mut buf), Ok(4));
    assert_eq!(io.read(MOCK_FD, &mut buf), Ok(1));
    assert_eq!(io.read(MOCK_FD, &mut buf), Ok(0));

    // Changing behaviour resets the delivered tally.
    io.change_behaviour(MockDeviceIoBehaviour::EofAfter(2));
    assert_eq!(io.read(MOCK_FD, &mut buf), Ok(2));
}
