use crate::address::{DecodedAddress, Geometry};
use crate::replacement_policies::{FirstInFirstOut, LeastRecentlyUsed, ReplacementPolicy};

/// A generic trait for caches
///
/// Technically not required as we're using static dispatch instead of dyn Cache, but it keeps the
/// simulator and prefetcher independent of the replacement policy with no overhead
///
/// Addresses are decoded by the caller with the cache's [`Geometry`], the cache only ever sees
/// `(index, tag)` pairs
pub trait CacheTrait {
    /// The geometry this cache was built with
    fn geometry(&self) -> &Geometry;

    /// Looks for the line in its set, returning the way holding it
    ///
    /// Read-only: recency stamps are untouched, see [`CacheTrait::record_hit`]
    fn lookup(&self, line: &DecodedAddress) -> Option<usize>;

    /// Informs the replacement policy that `way` of the line's set was hit
    fn record_hit(&mut self, line: &DecodedAddress, way: usize);

    /// Places a line which is not currently cached into its set
    ///
    /// An empty way is used if there is one, otherwise the replacement policy picks a victim
    fn insert(&mut self, line: &DecodedAddress) -> Insertion;

    /// Gets the set at `index`
    fn set(&self, index: u64) -> &CacheSet;

    /// Gets the number of lines holding a block
    fn get_valid_line_count(&self) -> usize;

    /// Gets the number of uninitialised cache lines. Useful for analysing cache performance or
    /// debugging
    fn get_uninitialised_line_count(&self) -> usize;

    fn contains(&self, line: &DecodedAddress) -> bool {
        self.lookup(line).is_some()
    }
}

/// A single way of a set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheLine {
    pub valid: bool,
    pub tag: u64,
    /// Logical time of the last stamp, compared by the replacement policy
    pub recency: u64,
}

impl CacheLine {
    /// A valid line holding `tag`
    pub fn new(tag: u64, recency: u64) -> Self {
        Self { valid: true, tag, recency }
    }
}

/// A fixed number of ways, all invalid when created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSet {
    lines: Box<[CacheLine]>,
}

impl CacheSet {
    /// # Panics
    ///
    /// If `ways` is zero
    pub fn new(ways: usize) -> Self {
        assert!(ways > 0, "a cache set needs at least one way");
        Self {
            lines: vec![CacheLine::default(); ways].into_boxed_slice(),
        }
    }

    pub fn ways(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> &[CacheLine] {
        &self.lines
    }

    /// The way holding a valid line with this tag
    pub fn find(&self, tag: u64) -> Option<usize> {
        self.lines.iter().position(|line| line.valid && line.tag == tag)
    }

    /// The lowest empty way
    pub fn first_invalid(&self) -> Option<usize> {
        self.lines.iter().position(|line| !line.valid)
    }

    pub fn is_full(&self) -> bool {
        self.first_invalid().is_none()
    }

    /// Overwrites a way, returning what it held before
    pub fn fill(&mut self, way: usize, line: CacheLine) -> CacheLine {
        std::mem::replace(&mut self.lines[way], line)
    }

    pub fn line_mut(&mut self, way: usize) -> &mut CacheLine {
        &mut self.lines[way]
    }
}

/// Where an inserted line ended up, and the tag it pushed out if the set was full
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Insertion {
    pub way: usize,
    pub evicted: Option<u64>,
}

/// A generic set-associative cache, parameterised by a replacement policy
///
/// We rely on monomorphisation and the inlining of the replacement policy functions, which keeps
/// this close to a specialised implementation for each policy while there is only one to maintain
///
/// The cache owns a logical clock which advances once per recency stamp, on every fill and on
/// every hit the policy refreshes. Stamps are therefore unique within a run
#[derive(Debug)]
pub struct Cache<R: ReplacementPolicy> {
    geometry: Geometry,
    sets: Vec<CacheSet>,
    replacement_policy: R,
    clock: u64,
}

impl<R: ReplacementPolicy> Cache<R> {
    pub fn new(geometry: Geometry, policy: R) -> Self {
        let ways = geometry.associativity() as usize;
        Self {
            geometry,
            sets: vec![CacheSet::new(ways); geometry.num_sets() as usize],
            replacement_policy: policy,
            clock: 0,
        }
    }

    pub fn clock(&self) -> u64 {
        self.clock
    }

    fn tick(&mut self) -> u64 {
        let now = self.clock;
        self.clock += 1;
        now
    }
}

impl<R: ReplacementPolicy> CacheTrait for Cache<R> {
    fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[inline]
    fn lookup(&self, line: &DecodedAddress) -> Option<usize> {
        // Only search the relevant set
        self.sets[line.index as usize].find(line.tag)
    }

    fn record_hit(&mut self, line: &DecodedAddress, way: usize) {
        let now = self.clock;
        let hit_line = self.sets[line.index as usize].line_mut(way);
        debug_assert!(hit_line.valid && hit_line.tag == line.tag);
        if self.replacement_policy.update_on_read(hit_line, now) {
            self.clock += 1;
        }
    }

    fn insert(&mut self, line: &DecodedAddress) -> Insertion {
        debug_assert!(self.lookup(line).is_none(), "tag {:#x} is already in set {}", line.tag, line.index);
        let now = self.tick();
        let set = &mut self.sets[line.index as usize];
        let way = match set.first_invalid() {
            Some(way) => way,
            None => self.replacement_policy.get_victim(set),
        };
        let previous = set.fill(way, CacheLine::new(line.tag, now));
        let evicted = previous.valid.then_some(previous.tag);
        if let Some(tag) = evicted {
            tracing::trace!(set = line.index, way, evicted = tag, inserted = line.tag, "evicted line");
        }
        Insertion { way, evicted }
    }

    fn set(&self, index: u64) -> &CacheSet {
        &self.sets[index as usize]
    }

    fn get_valid_line_count(&self) -> usize {
        self.sets.iter().flat_map(|set| set.lines()).filter(|line| line.valid).count()
    }

    fn get_uninitialised_line_count(&self) -> usize {
        self.sets.iter().flat_map(|set| set.lines()).filter(|line| !line.valid).count()
    }
}

/// Enum for the replacement policies provided by the library
///
/// Trait objects would reduce boilerplate, but they are opaque to the compiler and we would
/// de-reference for each access in the trace. Explicitly branching on every implementation lets
/// the compiler reason about the concrete types and inline the policy
#[derive(Debug)]
pub enum GenericCache {
    Fifo(Cache<FirstInFirstOut>),
    Lru(Cache<LeastRecentlyUsed>),
}

impl From<Cache<FirstInFirstOut>> for GenericCache {
    fn from(value: Cache<FirstInFirstOut>) -> Self {
        Self::Fifo(value)
    }
}

impl From<Cache<LeastRecentlyUsed>> for GenericCache {
    fn from(value: Cache<LeastRecentlyUsed>) -> Self {
        Self::Lru(value)
    }
}

impl CacheTrait for GenericCache {
    fn geometry(&self) -> &Geometry {
        match self {
            GenericCache::Fifo(c) => c.geometry(),
            GenericCache::Lru(c) => c.geometry(),
        }
    }

    fn lookup(&self, line: &DecodedAddress) -> Option<usize> {
        match self {
            GenericCache::Fifo(c) => c.lookup(line),
            GenericCache::Lru(c) => c.lookup(line),
        }
    }

    fn record_hit(&mut self, line: &DecodedAddress, way: usize) {
        match self {
            GenericCache::Fifo(c) => c.record_hit(line, way),
            GenericCache::Lru(c) => c.record_hit(line, way),
        }
    }

    fn insert(&mut self, line: &DecodedAddress) -> Insertion {
        match self {
            GenericCache::Fifo(c) => c.insert(line),
            GenericCache::Lru(c) => c.insert(line),
        }
    }

    fn set(&self, index: u64) -> &CacheSet {
        match self {
            GenericCache::Fifo(c) => c.set(index),
            GenericCache::Lru(c) => c.set(index),
        }
    }

    fn get_valid_line_count(&self) -> usize {
        match self {
            GenericCache::Fifo(c) => c.get_valid_line_count(),
            GenericCache::Lru(c) => c.get_valid_line_count(),
        }
    }

    fn get_uninitialised_line_count(&self) -> usize {
        match self {
            GenericCache::Fifo(c) => c.get_uninitialised_line_count(),
            GenericCache::Lru(c) => c.get_uninitialised_line_count(),
        }
    }
}
