use std::mem::size_of;
use crate::cache::{CacheLine, CacheSet};
use crate::error::ConfigError;

/// The validated shape of a cache, and the masks used to split addresses for it
///
/// Constructed through [`crate::config::CacheConfig::geometry`], so block size and the number of
/// sets are always powers of two and there is always at least one set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    block_size: u64,
    associativity: u64,
    num_sets: u64,
    offset_bits: u32,
    index_bits: u32,
    offset_bit_mask: u64,
    index_bit_mask: u64,
}

/// An address split into its block offset, set index, and tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecodedAddress {
    pub offset: u64,
    pub index: u64,
    pub tag: u64,
}

impl Geometry {
    pub fn new(memory_size: u64, block_size: u64, associativity: u64) -> Result<Self, ConfigError> {
        if memory_size == 0 {
            return Err(ConfigError::Zero { field: "memory size" });
        }
        if block_size == 0 {
            return Err(ConfigError::Zero { field: "block size" });
        }
        if associativity == 0 {
            return Err(ConfigError::Zero { field: "associativity" });
        }
        if !block_size.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo { field: "block size", value: block_size });
        }
        let set_bytes = block_size
            .checked_mul(associativity)
            .ok_or(ConfigError::Overflow { block_size, associativity })?;
        if memory_size < set_bytes {
            return Err(ConfigError::TooSmall { memory_size, block_size, associativity });
        }
        let num_sets = memory_size / set_bytes;
        if !num_sets.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo { field: "number of sets", value: num_sets });
        }
        // Every line is allocated up front, so their total size must stay addressable
        let lines = num_sets * associativity;
        let fits = usize::try_from(lines)
            .ok()
            .and_then(|lines| lines.checked_mul(size_of::<CacheLine>()))
            .and_then(|bytes| bytes.checked_add(num_sets as usize * size_of::<CacheSet>()))
            .map_or(false, |bytes| bytes <= isize::MAX as usize);
        if !fits {
            return Err(ConfigError::TooLarge { lines, block_size });
        }
        // Both are powers of two whose product fits in a u64, so the shifts below stay under 64
        let offset_bits = block_size.trailing_zeros();
        let index_bits = num_sets.trailing_zeros();
        Ok(Self {
            block_size,
            associativity,
            num_sets,
            offset_bits,
            index_bits,
            offset_bit_mask: block_size - 1,
            index_bit_mask: num_sets - 1,
        })
    }

    /// Splits an address into offset, index and tag. Total over every `u64`
    ///
    /// # Examples
    ///
    /// ```
    /// use cachelib::address::Geometry;
    /// let geometry = Geometry::new(1024, 128, 4).unwrap();
    /// let decoded = geometry.decode(0x123456789ABCDEF);
    /// assert_eq!(decoded.offset, 0b1101111);
    /// assert_eq!(decoded.index, 1);
    /// assert_eq!(decoded.tag, 0x123456789ABCDEF >> 8);
    /// ```
    #[inline]
    pub fn decode(&self, address: u64) -> DecodedAddress {
        DecodedAddress {
            offset: address & self.offset_bit_mask,
            index: (address >> self.offset_bits) & self.index_bit_mask,
            tag: address >> (self.offset_bits + self.index_bits),
        }
    }

    /// The address with its block offset cleared
    pub fn block_address(&self, address: u64) -> u64 {
        address & !self.offset_bit_mask
    }

    /// The address one block further on, wrapping at the top of the address space
    pub fn next_block(&self, address: u64) -> u64 {
        address.wrapping_add(self.block_size)
    }

    pub fn block_size(&self) -> u64 {
        self.block_size
    }

    pub fn associativity(&self) -> u64 {
        self.associativity
    }

    pub fn num_sets(&self) -> u64 {
        self.num_sets
    }

    pub fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    pub fn index_bits(&self) -> u32 {
        self.index_bits
    }

    pub fn tag_bits(&self) -> u32 {
        u64::BITS - self.offset_bits - self.index_bits
    }
}
