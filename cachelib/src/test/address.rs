use crate::address::Geometry;
use crate::config::CacheConfig;
use crate::error::ConfigError;
use crate::simulator::Simulator;
use super::{address_stream, small_geometry};

#[test]
fn derives_bit_widths() {
    let geometry = small_geometry();
    assert_eq!(geometry.num_sets(), 2);
    assert_eq!(geometry.offset_bits(), 7);
    assert_eq!(geometry.index_bits(), 1);
    assert_eq!(geometry.tag_bits(), 56);
    assert_eq!(geometry.block_size(), 128);
    assert_eq!(geometry.associativity(), 4);
}

#[test]
fn offset_is_address_modulo_block_size() {
    let geometry = Geometry::new(1 << 20, 64, 8).unwrap();
    for address in address_stream(10_000).chain([0, 1, 63, 64, u64::MAX]) {
        let decoded = geometry.decode(address);
        assert_eq!(decoded.offset, address % 64);
        assert!(decoded.offset < 64);
    }
}

#[test]
fn index_never_out_of_range() {
    for geometry in [small_geometry(), Geometry::new(1 << 16, 32, 2).unwrap(), Geometry::new(4096, 4096, 1).unwrap()] {
        for address in address_stream(10_000).chain([0, u64::MAX]) {
            assert!(geometry.decode(address).index < geometry.num_sets());
        }
    }
}

#[test]
fn decoding_is_lossless() {
    let geometry = Geometry::new(1 << 16, 32, 2).unwrap();
    for address in address_stream(1_000) {
        let d = geometry.decode(address);
        let rebuilt = (d.tag << (geometry.offset_bits() + geometry.index_bits())) | (d.index << geometry.offset_bits()) | d.offset;
        assert_eq!(rebuilt, address);
    }
}

#[test]
fn offsets_within_a_block_share_a_line() {
    let geometry = small_geometry();
    let base = geometry.decode(0x1_0080);
    for offset in 0..128 {
        let decoded = geometry.decode(0x1_0080 + offset);
        assert_eq!((decoded.index, decoded.tag), (base.index, base.tag));
        assert_eq!(decoded.offset, offset);
    }
    assert_ne!(geometry.decode(0x1_0100).index, base.index);
}

#[test]
fn decodes_top_of_address_space() {
    let geometry = small_geometry();
    let decoded = geometry.decode(u64::MAX);
    assert_eq!(decoded.offset, 127);
    assert_eq!(decoded.index, 1);
    assert_eq!(decoded.tag, u64::MAX >> 8);
    assert_eq!(geometry.next_block(u64::MAX), 127);
    assert_eq!(geometry.block_address(u64::MAX), u64::MAX - 127);
}

#[test]
fn rejects_impossible_geometries() {
    assert!(matches!(Geometry::new(1024, 0, 4), Err(ConfigError::Zero { field: "block size" })));
    assert!(matches!(Geometry::new(0, 128, 4), Err(ConfigError::Zero { field: "memory size" })));
    assert!(matches!(Geometry::new(1024, 128, 0), Err(ConfigError::Zero { field: "associativity" })));
    assert!(matches!(Geometry::new(1024, 96, 4), Err(ConfigError::NotPowerOfTwo { value: 96, .. })));
    // 3072 / (128 * 4) = 6 sets
    assert!(matches!(Geometry::new(3072, 128, 4), Err(ConfigError::NotPowerOfTwo { value: 6, .. })));
    assert!(matches!(Geometry::new(1024, 128, 16), Err(ConfigError::TooSmall { .. })));
    assert!(matches!(Geometry::new(u64::MAX, 1 << 63, 2), Err(ConfigError::Overflow { .. })));
}

#[test]
fn associativity_need_not_be_a_power_of_two() {
    // 1536 / (128 * 3) = 4 sets
    let geometry = CacheConfig { memory_size: 1536, associativity: 3, ..CacheConfig::default() }.geometry().unwrap();
    assert_eq!(geometry.num_sets(), 4);
    assert_eq!(geometry.index_bits(), 2);
}

#[test]
fn rejects_caches_too_large_to_allocate() {
    // A single set of 2^62 one byte ways: valid bit widths, but no room to hold the lines
    let config = CacheConfig { memory_size: 1 << 62, block_size: 1, associativity: 1 << 62, ..CacheConfig::default() };
    assert!(matches!(config.geometry(), Err(ConfigError::TooLarge { lines, .. }) if lines == 1 << 62));
    assert!(matches!(Simulator::new(&config), Err(ConfigError::TooLarge { .. })));
    assert!(matches!(Geometry::new(u64::MAX, 1, 1), Err(ConfigError::NotPowerOfTwo { .. })));
    assert!(matches!(Geometry::new(1 << 63, 1, 1), Err(ConfigError::TooLarge { .. })));
}
