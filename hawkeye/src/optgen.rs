use serde::Serialize;

/// What Belady's optimal policy would have done with a line across a usage interval
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Verdict {
    Hit,
    Miss,
}

/// Access counters for one or more OPTgen instances
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Serialize)]
pub struct OptGenStats {
    pub accesses: u64,
    pub hits: u64,
    pub misses: u64,
}

impl std::ops::AddAssign for OptGenStats {
    fn add_assign(&mut self, rhs: Self) {
        self.accesses += rhs.accesses;
        self.hits += rhs.hits;
        self.misses += rhs.misses;
    }
}

/// Retrospective simulator of Belady's MIN algorithm for a single cache set
///
/// Exact OPT needs the whole future of the access stream. Instead this keeps a circular window of
/// logical time, where each slot counts how many lines OPT would be keeping cached through that
/// instant. When a line is reused, the interval since its previous use is checked: if any instant
/// in it is already at capacity then OPT could not have kept the line too, and the reuse is a
/// miss. Otherwise the line is kept, and every instant in the interval gains one more occupant.
///
/// Timestamps are indices into the window, so they must be below the window size
#[derive(Debug, Clone)]
pub struct OptGen {
    capacity: u32,
    occupancy: Vec<u32>,
    stats: OptGenStats,
}

impl OptGen {
    /// Creates a simulator for a set of `capacity` ways, looking back over `window` logical
    /// timestamps
    pub fn new(capacity: u32, window: usize) -> Self {
        Self {
            capacity,
            occupancy: vec![0; window],
            stats: OptGenStats::default(),
        }
    }

    /// Marks a line as live at `timestamp`
    ///
    /// Must be called once for each timestamp before any decision covering it
    pub fn record_access(&mut self, timestamp: u32) {
        debug_assert!((timestamp as usize) < self.occupancy.len());
        self.stats.accesses += 1;
        self.occupancy[timestamp as usize] = 1;
    }

    /// Decides whether OPT would have hit on a line last used at `prev_timestamp` and reused at
    /// `curr_timestamp`
    ///
    /// The window is walked from `prev_timestamp` up to, but not including, `curr_timestamp`,
    /// wrapping around the end. Each slot is visited at most once. An empty interval is a hit, and
    /// leaves the window untouched
    pub fn decide(&mut self, curr_timestamp: u32, prev_timestamp: u32) -> Verdict {
        if curr_timestamp == prev_timestamp {
            return Verdict::Hit;
        }
        let window = self.occupancy.len();
        let curr = curr_timestamp as usize;
        let prev = prev_timestamp as usize;
        debug_assert!(curr < window && prev < window);

        let mut i = prev;
        while i != curr {
            if self.occupancy[i] >= self.capacity {
                self.stats.misses += 1;
                return Verdict::Miss;
            }
            i = (i + 1) % window;
        }

        let mut i = prev;
        while i != curr {
            self.occupancy[i] += 1;
            i = (i + 1) % window;
        }
        self.stats.hits += 1;
        Verdict::Hit
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn window(&self) -> usize {
        self.occupancy.len()
    }

    pub fn stats(&self) -> OptGenStats {
        self.stats
    }

    #[cfg(test)]
    pub(crate) fn occupancy(&self) -> &[u32] {
        &self.occupancy
    }
}
