// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use crate::rand::{PseudoRandStatus, RandMethod};
use crate::support::test_utils::{MOCK_FILL_BYTE, MockRandMethod, MockRandMethodBehaviour};

#[test]
fn test_mock_rand_method_behaviour_none() {
    let mock = MockRandMethod::new(MockRandMethodBehaviour::None);
    let mut buf = [0u8; 8];

    assert!(mock.bytes(&mut buf).is_ok());
    assert_eq!(buf, [MOCK_FILL_BYTE; 8]);
    assert!(mock.status());
    assert_eq!(mock.bytes_count(), 1);
}

#[test]
fn test_mock_rand_method_behaviour_fail_bytes() {
    let mock = MockRandMethod::new(MockRandMethodBehaviour::FailBytes);
    let mut buf = [0u8; 8];

    assert!(mock.bytes(&mut buf).is_err());
    assert_eq!(mock.pseudo_bytes(&mut buf), PseudoRandStatus::SoftFailure);
    assert!(!mock.status());
    assert_eq!(mock.bytes_count(), 2);
}

#[test]
fn test_mock_rand_method_lifecycle_functions_count_calls() {
    let mock = MockRandMethod::new(MockRandMethodBehaviour::None);
    let init = mock.init_function();
    let finish = mock.finish_function();

    assert!(init().is_ok());
    assert!(finish().is_ok());
    assert!(finish().is_ok());

    assert_eq!(mock.init_count(), 1);
    assert_eq!(mock.finish_count(), 2);
}

#[test]
fn test_mock_rand_method_change_behaviour_is_shared_by_clones() {
    let mock = MockRandMethod::new(MockRandMethodBehaviour::None);
    let init = mock.init_function();

    assert!(init().is_ok());

    mock.change_behaviour(MockRandMethodBehaviour::FailInit);
    assert!(init().is_err());

    mock.change_behaviour(MockRandMethodBehaviour::None);
    assert!(init().is_ok());
}
