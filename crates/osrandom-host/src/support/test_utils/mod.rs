// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Test utilities for mocking random methods.
//!
//! Provides mock implementations with configurable behavior for testing.

mod mock_rand_method;

pub use mock_rand_method::{MOCK_FILL_BYTE, MockRandMethod, MockRandMethodBehaviour};
