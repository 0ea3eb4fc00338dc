/// Metadata about the access that caused a touch or an insertion
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Access {
    /// The address accessed. Not required to be line aligned
    pub address: u64,
    /// The instruction address which issued the access, if the host knows it
    pub pc: Option<u64>,
}

impl Access {
    pub fn new(address: u64, pc: Option<u64>) -> Self {
        Self { address, pc }
    }
}

/// A generic trait for implementing replacement policies. Can be used to parameterise a Cache.
///
/// Each cache slot owns one `Data` record, created with `instantiate`. The cache keeps these in a
/// flat array in set and way order, and passes them back into the policy on every event for that
/// slot, so the policy itself never holds references to them
pub trait ReplacementPolicy {
    /// The per-line replacement record
    type Data: Default + Clone;

    /// Creates the record for a newly allocated cache slot
    fn instantiate(&self) -> Self::Data {
        Self::Data::default()
    }

    /// Updates the policy when a line is removed from the cache without being replaced
    fn invalidate(&mut self, data: &mut Self::Data);

    /// Updates the policy when a cache line is read, without any access information
    fn touch(&mut self, data: &mut Self::Data);

    /// Updates the policy when a cache line is read
    ///
    /// Policies which do not need access information can rely on the default, which forwards to
    /// `touch`
    ///
    /// # Arguments
    ///
    /// * `data`: The record of the line which was read
    /// * `access`: The access which hit the line
    ///
    /// returns: ()
    fn touch_with(&mut self, data: &mut Self::Data, _access: &Access) {
        self.touch(data)
    }

    /// Updates the policy when a new line is inserted, without any access information
    fn reset(&mut self, data: &mut Self::Data);

    /// Updates the policy when a new line is inserted after a miss
    ///
    /// Implementations should assume that when this method is called, any previous line in the slot
    /// has already been evicted through `get_victim`
    fn reset_with(&mut self, data: &mut Self::Data, _access: &Access) {
        self.reset(data)
    }

    /// Chooses which of the candidates to evict, returning its index in `candidates`
    ///
    /// The cache passes the records of every slot in the set, in way order. The list must not be
    /// empty
    fn get_victim(&mut self, candidates: &[Self::Data]) -> usize;
}

/// Least Recently Used replacement policy, used as a baseline to compare Hawkeye against
///
/// This implementation records when each line was last used against a logical clock, which is
/// updated each time a line is used
#[derive(Debug)]
pub struct LeastRecentlyUsed {
    // Starts at 1, so invalidated lines (tick 0) are always the oldest
    time: u64,
}

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct LeastRecentlyUsedData {
    pub last_touch_tick: u64,
}

impl LeastRecentlyUsed {
    pub fn new() -> Self {
        Self { time: 1 }
    }

    fn tick(&mut self) -> u64 {
        let now = self.time;
        self.time += 1;
        now
    }
}

impl Default for LeastRecentlyUsed {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplacementPolicy for LeastRecentlyUsed {
    type Data = LeastRecentlyUsedData;

    fn invalidate(&mut self, data: &mut Self::Data) {
        data.last_touch_tick = 0;
    }

    fn touch(&mut self, data: &mut Self::Data) {
        data.last_touch_tick = self.tick();
    }

    fn reset(&mut self, data: &mut Self::Data) {
        data.last_touch_tick = self.tick();
    }

    fn get_victim(&mut self, candidates: &[Self::Data]) -> usize {
        assert!(!candidates.is_empty(), "Can't choose a victim from no candidates");
        let mut min_value = u64::MAX;
        let mut min_index = 0;
        let mut index = 0;
        while index < candidates.len() {
            if candidates[index].last_touch_tick < min_value {
                min_value = candidates[index].last_touch_tick;
                min_index = index;
            }
            index += 1;
        }
        min_index
    }
}
