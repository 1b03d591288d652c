// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Test utilities for mocking backend syscalls.
//!
//! Provides mock implementations with configurable behavior for testing.

#[cfg(unix)]
mod mock_device_io;
mod mock_provider_api;

#[cfg(unix)]
pub use mock_device_io::{MOCK_DEVICE_BYTE, MOCK_FD, MockDeviceIo, MockDeviceIoBehaviour};
pub use mock_provider_api::{
    MOCK_HANDLE, MOCK_PROVIDER_BYTE, MockProviderApi, MockProviderApiBehaviour,
};
