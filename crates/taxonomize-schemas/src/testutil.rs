//! Shared proptest strategies for schema tests.

use proptest::prelude::*;

/// Strategy for generating declared-name-like identifiers.
pub fn arb_name() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_]{0,19}"
}

/// Strategy for generating element-id-like strings.
pub fn arb_element_id() -> impl Strategy<Value = String> {
    "[0-9a-f]{8}-[0-9a-f]{4}"
}
