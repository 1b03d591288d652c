// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! `/dev/urandom` backend.
//!
//! Holds one read-only descriptor marked close-on-exec. Reads loop until the
//! whole buffer is filled, retrying `EINTR`; end of stream or any other
//! error fails the request.

use core::ffi::CStr;

use log::{debug, trace, warn};

use super::Backend;
use crate::error::BackendError;

/// Raw file descriptor.
pub type RawFd = libc::c_int;

/// Kernel entropy device read by [`DeviceBackend`].
pub const URANDOM_PATH: &CStr = c"/dev/urandom";

/// Descriptor syscalls used by [`DeviceBackend`].
///
/// Every method returns the raw `errno` on failure.
pub trait DeviceIo: Send {
    /// `open(path, O_RDONLY)`
    fn open_read_only(&self, path: &CStr) -> Result<RawFd, i32>;

    /// `fcntl(fd, F_GETFD)`
    fn descriptor_flags(&self, fd: RawFd) -> Result<libc::c_int, i32>;

    /// `fcntl(fd, F_SETFD, flags)`
    fn set_descriptor_flags(&self, fd: RawFd, flags: libc::c_int) -> Result<(), i32>;

    /// `read(fd, buf, buf.len())`. `Ok(0)` is end of stream.
    fn read(&self, fd: RawFd, buf: &mut [u8]) -> Result<usize, i32>;

    /// `close(fd)`
    fn close(&self, fd: RawFd) -> Result<(), i32>;
}

/// [`DeviceIo`] over the real `libc` syscalls.
#[derive(Debug, Clone, Copy, Default)]
pub struct LibcDeviceIo;

fn last_errno() -> i32 {
    std::io::Error::last_os_error().raw_os_error().unwrap_or(0)
}

impl DeviceIo for LibcDeviceIo {
    fn open_read_only(&self, path: &CStr) -> Result<RawFd, i32> {
        let fd = unsafe { libc::open(path.as_ptr(), libc::O_RDONLY) };

        if fd < 0 { Err(last_errno()) } else { Ok(fd) }
    }

    fn descriptor_flags(&self, fd: RawFd) -> Result<libc::c_int, i32> {
        let flags = unsafe { libc::fcntl(fd, libc::F_GETFD) };

        if flags == -1 {
            Err(last_errno())
        } else {
            Ok(flags)
        }
    }

    fn set_descriptor_flags(&self, fd: RawFd, flags: libc::c_int) -> Result<(), i32> {
        if unsafe { libc::fcntl(fd, libc::F_SETFD, flags) } == -1 {
            Err(last_errno())
        } else {
            Ok(())
        }
    }

    fn read(&self, fd: RawFd, buf: &mut [u8]) -> Result<usize, i32> {
        let n = unsafe { libc::read(fd, buf.as_mut_ptr().cast::<libc::c_void>(), buf.len()) };

        if n < 0 { Err(last_errno()) } else { Ok(n as usize) }
    }

    fn close(&self, fd: RawFd) -> Result<(), i32> {
        if unsafe { libc::close(fd) } < 0 {
            Err(last_errno())
        } else {
            Ok(())
        }
    }
}

/// Entropy backend reading a kernel random device.
#[derive(Debug)]
pub struct DeviceBackend<I: DeviceIo> {
    io: I,
    path: &'static CStr,
    fd: Option<RawFd>,
}

impl<I: DeviceIo> DeviceBackend<I> {
    /// Creates an unacquired backend reading [`URANDOM_PATH`].
    pub fn new(io: I) -> Self {
        Self::with_path(io, URANDOM_PATH)
    }

    pub(crate) fn with_path(io: I, path: &'static CStr) -> Self {
        Self { io, path, fd: None }
    }

    /// The open descriptor, if acquired.
    pub fn descriptor(&self) -> Option<RawFd> {
        self.fd
    }

    /// The syscall layer.
    pub fn io(&self) -> &I {
        &self.io
    }

    fn mark_close_on_exec(&self, fd: RawFd) -> Result<(), BackendError> {
        let flags = self
            .io
            .descriptor_flags(fd)
            .map_err(BackendError::GetDescriptorFlags)?;

        self.io
            .set_descriptor_flags(fd, flags | libc::FD_CLOEXEC)
            .map_err(BackendError::SetDescriptorFlags)
    }
}

impl<I: DeviceIo> Backend for DeviceBackend<I> {
    fn acquire(&mut self) -> Result<(), BackendError> {
        if self.fd.is_some() {
            return Ok(());
        }

        let fd = self
            .io
            .open_read_only(self.path)
            .map_err(BackendError::Open)?;
        self.fd = Some(fd);

        if let Err(e) = self.mark_close_on_exec(fd) {
            warn!("{e}, closing {:?}", self.path);
            // The acquisition error is what the caller needs to see.
            let _ = self.release();
            return Err(e);
        }

        debug!("opened {:?} as fd {fd}", self.path);

        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<(), BackendError> {
        let fd = self.fd.ok_or(BackendError::NotAcquired)?;
        let mut filled = 0;

        while filled < buf.len() {
            let result = loop {
                match self.io.read(fd, &mut buf[filled..]) {
                    Err(libc::EINTR) => continue,
                    other => break other,
                }
            };

            match result {
                Ok(0) => return Err(BackendError::UnexpectedEof),
                Ok(n) => filled += n.min(buf.len() - filled),
                Err(errno) => return Err(BackendError::Read(errno)),
            }
        }

        trace!("read {filled} bytes from fd {fd}");

        Ok(())
    }

    fn status(&self) -> bool {
        self.fd.is_some()
    }

    fn release(&mut self) -> Result<(), BackendError> {
        // Unconditionally not open afterwards, even if close reports an error.
        let Some(fd) = self.fd.take() else {
            return Ok(());
        };

        let result = loop {
            match self.io.close(fd) {
                Err(libc::EINTR) => continue,
                other => break other,
            }
        };

        debug!("closed fd {fd}");

        result.map_err(BackendError::Close)
    }
}
