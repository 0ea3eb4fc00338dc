use std::collections::HashMap;
use tracing::trace;

/// Signature history counter table, learning per instruction whether its lines tend to be reused
///
/// Each PC maps to a saturating counter in `[0, max_counter]`. Counters at or above the midpoint
/// `(max_counter + 1) / 2` are predicted cache-friendly. Entries are created at the midpoint the
/// first time a PC is trained, and are never removed
#[derive(Debug, Clone)]
pub struct Predictor {
    max_counter: u8,
    table: HashMap<u64, u8>,
}

impl Predictor {
    /// Creates an empty table
    ///
    /// # Arguments
    ///
    /// * `max_counter`: The value counters saturate at
    /// * `size_hint`: The number of PCs expected. Only used to pre-size the table, it is not a bound
    ///
    /// returns: Predictor
    pub fn new(max_counter: u8, size_hint: usize) -> Self {
        Self {
            max_counter,
            table: HashMap::with_capacity(size_hint),
        }
    }

    /// The counter value a PC starts at, and the threshold for predicting it friendly
    pub fn midpoint(&self) -> u8 {
        ((self.max_counter as u16 + 1) / 2) as u8
    }

    /// Predicts whether lines loaded by `pc` are cache-friendly. An unseen PC is borderline, so
    /// friendly
    pub fn predict(&self, pc: u64) -> bool {
        self.counter(pc) >= self.midpoint()
    }

    /// Moves `pc` towards friendly, saturating at the maximum counter value
    pub fn train(&mut self, pc: u64) {
        let max = self.max_counter;
        let counter = self.entry(pc);
        if *counter < max {
            *counter += 1;
        }
        trace!(pc, counter = *counter, "trained predictor");
    }

    /// Moves `pc` towards averse, saturating at 0
    pub fn detrain(&mut self, pc: u64) {
        let counter = self.entry(pc);
        *counter = counter.saturating_sub(1);
        trace!(pc, counter = *counter, "detrained predictor");
    }

    /// The current counter for `pc`, or the midpoint if it has never been trained
    pub fn counter(&self, pc: u64) -> u8 {
        self.table.get(&pc).copied().unwrap_or_else(|| self.midpoint())
    }

    pub fn max_counter(&self) -> u8 {
        self.max_counter
    }

    /// The number of PCs with a materialised counter
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    fn entry(&mut self, pc: u64) -> &mut u8 {
        let midpoint = self.midpoint();
        self.table.entry(pc).or_insert(midpoint)
    }
}
