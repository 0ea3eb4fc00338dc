use serde::Serialize;
use tracing::{debug, warn};
use crate::geometry::Geometry;
use crate::optgen::{OptGen, OptGenStats, Verdict};
use crate::predictor::Predictor;
use crate::replacement_policies::{Access, ReplacementPolicy};

/// The largest re-reference prediction value. Lines at this value are the first to be evicted
pub const MAX_RRPV: u8 = 7;

/// Aging saturates one below the maximum, only an averse prediction or invalidation reaches it
const AGED_RRPV: u8 = MAX_RRPV - 1;

/// Hawkeye's replacement record for a single cache slot
///
/// `set` and `way` are assigned when a line is inserted, and stay valid until it is evicted or
/// invalidated
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct HawkeyeData {
    pc: u64,
    load_timestamp: u32,
    set: u32,
    way: u32,
}

impl HawkeyeData {
    /// The PC which inserted the line, or 0 if it wasn't known
    pub fn pc(&self) -> u64 {
        self.pc
    }

    /// The set's logical time just after the line was last inserted or touched
    pub fn load_timestamp(&self) -> u32 {
        self.load_timestamp
    }

    pub fn set(&self) -> u32 {
        self.set
    }

    pub fn way(&self) -> u32 {
        self.way
    }
}

/// Everything Hawkeye has counted so far, serialisable into the simulation result
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Serialize)]
pub struct HawkeyeStats {
    /// OPTgen counters summed over every set
    pub optgen: OptGenStats,
    pub predictor_entries: u64,
    pub trains: u64,
    pub detrains: u64,
    /// Insertions which found no free way and were forced into way 0
    pub no_free_way: u64,
    /// Victim scans which found no candidate at any RRPV
    pub failed_victim_scans: u64,
}

/// The Hawkeye replacement policy
///
/// Every set keeps an OPTgen instance, a logical clock indexing its OPTgen window, a 3 bit
/// re-reference prediction value (RRPV) for each way, and which ways are free. A single predictor,
/// keyed by PC, is shared by all sets.
///
/// On each touch OPTgen decides whether the optimal policy would have kept the line since its last
/// use. Lines from PCs the predictor thinks are cache-averse go straight to `MAX_RRPV`, the rest
/// are protected at 0, and OPT misses age the rest of the set. Evictions then feed back into the
/// predictor: a victim evicted at `MAX_RRPV` trains its PC, any other victim detrains it.
///
/// All per-set state is stored flat, indexed by `set * ways + way`, mirroring how the cache stores
/// its lines
#[derive(Debug)]
pub struct Hawkeye {
    geometry: Geometry,
    window: u32,
    rrpv: Vec<u8>,
    free_ways: Vec<bool>,
    timestamps: Vec<u32>,
    optgen: Vec<OptGen>,
    predictor: Predictor,
    stats: HawkeyeStats,
}

impl Hawkeye {
    /// Creates the policy for a cache, with every way free and every RRPV saturated
    ///
    /// # Arguments
    ///
    /// * `geometry`: The geometry of the cache this policy will serve
    /// * `window`: The number of logical timestamps each set's OPTgen looks back over
    /// * `max_shct`: The value predictor counters saturate at
    /// * `shct_size`: The expected number of distinct PCs, used to pre-size the predictor
    ///
    /// returns: Hawkeye
    pub fn new(geometry: Geometry, window: usize, max_shct: u8, shct_size: usize) -> Self {
        let lines = geometry.lines() as usize;
        let sets = geometry.sets() as usize;
        Self {
            geometry,
            window: window as u32,
            rrpv: vec![MAX_RRPV; lines],
            free_ways: vec![true; lines],
            timestamps: vec![0; sets],
            optgen: (0..sets).map(|_| OptGen::new(geometry.ways() as u32, window)).collect(),
            predictor: Predictor::new(max_shct, shct_size),
            stats: HawkeyeStats::default(),
        }
    }

    /// The RRPV currently held by a way
    pub fn rrpv(&self, set: u32, way: u32) -> u8 {
        self.rrpv[self.index(set, way)]
    }

    pub fn is_free(&self, set: u32, way: u32) -> bool {
        self.free_ways[self.index(set, way)]
    }

    /// The number of ways in a set currently claimed by a line
    pub fn occupied_ways(&self, set: u32) -> usize {
        self.free_ways[self.geometry.set_range(set as u64)].iter().filter(|free| !**free).count()
    }

    /// The current logical time of a set
    pub fn timestamp(&self, set: u32) -> u32 {
        self.timestamps[set as usize]
    }

    pub fn optgen(&self, set: u32) -> &OptGen {
        &self.optgen[set as usize]
    }

    pub fn predictor(&self) -> &Predictor {
        &self.predictor
    }

    pub fn stats(&self) -> HawkeyeStats {
        let mut stats = self.stats;
        for optgen in &self.optgen {
            stats.optgen += optgen.stats();
        }
        stats.predictor_entries = self.predictor.len() as u64;
        stats
    }

    fn index(&self, set: u32, way: u32) -> usize {
        set as usize * self.geometry.ways() as usize + way as usize
    }

    /// Advances a set's logical clock, returning the time before and after
    fn advance(&mut self, set: usize) -> (u32, u32) {
        let curr = self.timestamps[set];
        let next = (curr + 1) % self.window;
        self.timestamps[set] = next;
        (curr, next)
    }

    /// Applies a prediction to a line's RRPV
    ///
    /// Averse lines are saturated. Friendly lines are protected at 0, after optionally aging every
    /// other line in the set by one, up to `AGED_RRPV`
    fn apply_prediction(&mut self, set: u32, way: u32, friendly: bool, age_set: bool) {
        let index = self.index(set, way);
        if !friendly {
            self.rrpv[index] = MAX_RRPV;
            return;
        }
        if age_set {
            for rrpv in &mut self.rrpv[self.geometry.set_range(set as u64)] {
                if *rrpv < AGED_RRPV {
                    *rrpv += 1;
                }
            }
        }
        self.rrpv[index] = 0;
    }

    /// Frees the way a victim occupies and saturates its RRPV
    fn release(&mut self, data: &HawkeyeData) {
        let index = self.index(data.set, data.way);
        self.free_ways[index] = true;
        self.rrpv[index] = MAX_RRPV;
    }
}

impl ReplacementPolicy for Hawkeye {
    type Data = HawkeyeData;

    fn invalidate(&mut self, data: &mut Self::Data) {
        self.release(data);
    }

    fn touch(&mut self, _data: &mut Self::Data) {
        panic!("Can't train Hawkeye without access information");
    }

    fn touch_with(&mut self, data: &mut Self::Data, _access: &Access) {
        let set = data.set as usize;
        let prev_timestamp = data.load_timestamp;
        let (curr_timestamp, next_timestamp) = self.advance(set);
        data.load_timestamp = next_timestamp;

        self.optgen[set].record_access(curr_timestamp);
        let verdict = self.optgen[set].decide(curr_timestamp, prev_timestamp);
        let friendly = self.predictor.predict(data.pc);
        self.apply_prediction(data.set, data.way, friendly, verdict == Verdict::Miss);
    }

    fn reset(&mut self, _data: &mut Self::Data) {
        panic!("Can't train Hawkeye without access information");
    }

    fn reset_with(&mut self, data: &mut Self::Data, access: &Access) {
        let set = self.geometry.set_of(access.address) as u32;
        let range = self.geometry.set_range(set as u64);
        let way = match self.free_ways[range.clone()].iter().position(|free| *free) {
            Some(way) => way,
            None => {
                warn!(set, address = access.address, "no free way on insertion, forcing way 0");
                self.stats.no_free_way += 1;
                0
            }
        };
        self.free_ways[range.start + way] = false;
        data.set = set;
        data.way = way as u32;

        // Insertion marks the line live both before and after the clock advances, so a hit can
        // always find its baseline occupancy
        let (curr_timestamp, next_timestamp) = self.advance(set as usize);
        self.optgen[set as usize].record_access(curr_timestamp);
        data.load_timestamp = next_timestamp;
        self.optgen[set as usize].record_access(next_timestamp);

        data.pc = access.pc.unwrap_or(0);
        let friendly = self.predictor.predict(data.pc);
        self.apply_prediction(data.set, data.way, friendly, true);
    }

    fn get_victim(&mut self, candidates: &[Self::Data]) -> usize {
        assert!(!candidates.is_empty(), "Can't choose a victim from no candidates");
        for level in (0..=MAX_RRPV).rev() {
            let found = candidates.iter().position(|candidate| self.rrpv(candidate.set, candidate.way) == level);
            if let Some(victim) = found {
                let data = &candidates[victim];
                self.release(data);
                // Evicting at the maximum RRPV trains the PC, anything lower detrains it
                if level == MAX_RRPV {
                    self.predictor.train(data.pc);
                    self.stats.trains += 1;
                } else {
                    self.predictor.detrain(data.pc);
                    self.stats.detrains += 1;
                }
                debug!(set = data.set, way = data.way, rrpv = level, pc = data.pc, "evicting");
                return victim;
            }
        }
        warn!(set = candidates[0].set, "no candidate matched any RRPV, evicting the first");
        self.stats.failed_victim_scans += 1;
        self.release(&candidates[0]);
        0
    }
}

#[cfg(test)]
impl Hawkeye {
    pub(crate) fn set_rrpv(&mut self, set: u32, way: u32, rrpv: u8) {
        let index = self.index(set, way);
        self.rrpv[index] = rrpv;
    }

    pub(crate) fn predictor_mut(&mut self) -> &mut Predictor {
        &mut self.predictor
    }

    pub(crate) fn optgen_mut(&mut self, set: u32) -> &mut OptGen {
        &mut self.optgen[set as usize]
    }
}
