mod address;

use crate::address::Geometry;

/// Routes library logs to the test output, safe to call from every test
pub(crate) fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .unwrap_or_default();
}

/// 1024 bytes of memory, 128 byte blocks, 4 ways: 2 sets, 7 offset bits and 1 index bit
pub(crate) fn small_geometry() -> Geometry {
    Geometry::new(1024, 128, 4).unwrap()
}

/// A single set of `ways` 128 byte blocks, so the tag is simply `address >> 7`
pub(crate) fn single_set_geometry(ways: u64) -> Geometry {
    Geometry::new(128 * ways, 128, ways).unwrap()
}

/// Cheap deterministic address stream covering the whole 64-bit range
pub(crate) fn address_stream(count: usize) -> impl Iterator<Item = u64> {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    (0..count).map(move |_| {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        state
    })
}
