use crate::cache::CacheTrait;

/// Single block look-ahead: after a miss, bring in the block that follows it
///
/// This is not a stream predictor, there is no history and it never looks further than one block
#[derive(Debug, Default, Clone, Copy)]
pub struct NextBlockPrefetcher;

impl NextBlockPrefetcher {
    /// Called after `address` missed and was inserted
    ///
    /// Decodes the following block and inserts it if it isn't already cached.
    ///
    /// returns: true if the successor block was absent and has been filled, which the simulator
    /// counts as a second miss for the same access
    pub fn on_miss<C: CacheTrait>(&self, cache: &mut C, address: u64) -> bool {
        let next = cache.geometry().next_block(address);
        let line = cache.geometry().decode(next);
        if cache.contains(&line) {
            return false;
        }
        let insertion = cache.insert(&line);
        tracing::trace!(address = next, set = line.index, way = insertion.way, "prefetched block");
        true
    }
}
