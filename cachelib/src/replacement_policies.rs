use crate::cache::{CacheLine, CacheSet};

/// A generic trait for implementing new replacement policies. Can be used to parameterise a Cache.
///
/// Every line carries a recency stamp taken from the cache's logical clock when it is filled. The
/// default victim search picks the valid line with the oldest stamp, so a policy only needs to
/// decide what a hit does to that stamp
pub trait ReplacementPolicy {
    /// Updates the policy when a cache line is read
    ///
    /// Not applicable for some policies, a default which does nothing is provided
    ///
    /// # Arguments
    ///
    /// * `line`: The line which was hit
    /// * `now`: The current value of the cache's logical clock
    ///
    /// returns: true if the line's recency was refreshed, consuming the clock value
    fn update_on_read(&mut self, _line: &mut CacheLine, _now: u64) -> bool {
        false
    }

    /// Used by the cache to pick the way to overwrite when a full set needs a new line
    ///
    /// Must always return a way in `0..set.ways()`
    ///
    /// # Arguments
    ///
    /// * `set`: The full set
    ///
    /// returns: usize
    fn get_victim(&mut self, set: &CacheSet) -> usize {
        oldest_way(set)
    }
}

/// First in, first out. Lines are stamped only when they are filled and hits leave the stamp
/// alone, so a line that is hit on every access is as evictable as one that never is
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstInFirstOut;

impl ReplacementPolicy for FirstInFirstOut {}

/// Least Recently Used replacement policy
///
/// Every hit re-stamps the line with the current logical time, so the oldest stamp in a set
/// belongs to the line untouched for longest
#[derive(Debug, Default, Clone, Copy)]
pub struct LeastRecentlyUsed;

impl ReplacementPolicy for LeastRecentlyUsed {
    fn update_on_read(&mut self, line: &mut CacheLine, now: u64) -> bool {
        line.recency = now;
        true
    }
}

/// Finds the way holding the oldest recency stamp
///
/// The candidate starts at way 0 and only moves on a strictly smaller stamp, so this always
/// returns a way and ties go to the lowest way index
///
/// # Examples
///
/// ```
/// use cachelib::cache::{CacheLine, CacheSet};
/// use cachelib::replacement_policies::oldest_way;
/// let mut set = CacheSet::new(3);
/// set.fill(0, CacheLine::new(0xA, 5));
/// set.fill(1, CacheLine::new(0xB, 2));
/// set.fill(2, CacheLine::new(0xC, 2));
/// assert_eq!(oldest_way(&set), 1);
/// ```
pub fn oldest_way(set: &CacheSet) -> usize {
    let lines = set.lines();
    let mut victim = 0;
    let mut oldest = lines[0].recency;
    for (way, line) in lines.iter().enumerate().skip(1) {
        if line.recency < oldest {
            oldest = line.recency;
            victim = way;
        }
    }
    victim
}
