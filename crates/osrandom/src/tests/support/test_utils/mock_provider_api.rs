// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use crate::backend::ProviderApi;
use crate::support::test_utils::{
    MOCK_HANDLE, MOCK_PROVIDER_BYTE, MockProviderApi, MockProviderApiBehaviour,
};

#[test]
fn test_mock_provider_api_behaviour_none() {
    let api = MockProviderApi::new(MockProviderApiBehaviour::None);
    let mut buf = [0u8; 16];

    let handle = api.acquire_context().expect("Failed to acquire_context()");
    api.gen_random(handle, &mut buf).expect("Failed to gen_random()");
    api.release_context(handle).expect("Failed to release_context()");

    assert_eq!(handle, MOCK_HANDLE);
    assert_eq!(buf, [MOCK_PROVIDER_BYTE; 16]);
    assert_eq!(api.acquire_count(), 1);
    assert_eq!(api.gen_random_count(), 1);
    assert_eq!(api.release_count(), 1);
}

#[test]
fn test_mock_provider_api_failures_carry_code() {
    let api = MockProviderApi::new(MockProviderApiBehaviour::FailAcquire(5));
    let mut buf = [0u8; 4];

    assert_eq!(api.acquire_context(), Err(5));

    api.change_behaviour(MockProviderApiBehaviour::FailGenRandom(87));
    assert_eq!(api.gen_random(MOCK_HANDLE, &mut buf), Err(87));
    assert_eq!(buf, [0u8; 4]);

    api.change_behaviour(MockProviderApiBehaviour::FailRelease(6));
    assert_eq!(api.release_context(MOCK_HANDLE), Err(6));
}

#[test]
fn test_mock_provider_api_clones_share_counters() {
    let api = MockProviderApi::new(MockProviderApiBehaviour::None);
    let clone = api.clone();

    clone.acquire_context().expect("Failed to acquire_context()");
    clone.change_behaviour(MockProviderApiBehaviour::FailRelease(1));

    assert_eq!(api.acquire_count(), 1);
    assert_eq!(api.release_context(MOCK_HANDLE), Err(1));
}
