use crate::geometry::Geometry;
use crate::hawkeye::Hawkeye;
use crate::replacement_policies::{Access, LeastRecentlyUsed, ReplacementPolicy};

/// Whether an access was served by the cache
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Outcome {
    Hit,
    Miss,
}

/// A generic trait for caches
///
/// Technically not required as we're using static dispatch through GenericCache instead of
/// dyn Cache, but it keeps the enum and the concrete caches in step
///
/// The trait assumes that ensuring reads spanning multiple cache lines are split properly is the
/// responsibility of the caller
pub trait CacheTrait {
    /// Looks up the line for an access, updating the replacement policy on both hits and misses
    fn access(&mut self, access: &Access) -> Outcome;

    /// Removes the line holding an address, if it is resident. Returns whether it was
    fn invalidate(&mut self, address: u64) -> bool;

    fn geometry(&self) -> &Geometry;

    /// Gets the number of lines which have never been filled, or have been invalidated
    fn get_uninitialised_line_count(&self) -> usize;

    /// Gets the number of valid lines replaced by a miss
    fn get_eviction_count(&self) -> u64;
}

/// A single level set-associative cache, parameterised by a replacement policy
///
/// It only stores tags and valid bits, enough to tell hits from misses and to drive the policy. The
/// policy's per-line records are kept in a flat array alongside the tags, so the records of a set
/// are a contiguous slice which can be handed straight to the policy as victim candidates
///
/// We rely on monomorphisation and the inlining of the replacement policy functions for
/// performance, rather than specialised implementations for each policy
pub struct Cache<R: ReplacementPolicy> {
    geometry: Geometry,
    tags: Vec<u64>,
    valid: Vec<bool>,
    records: Vec<R::Data>,
    replacement_policy: R,
    evictions: u64,
}

impl<R: ReplacementPolicy> Cache<R> {
    pub fn new(geometry: Geometry, policy: R) -> Self {
        let lines = geometry.lines() as usize;
        Self {
            geometry,
            tags: vec![0; lines],
            valid: vec![false; lines],
            records: (0..lines).map(|_| policy.instantiate()).collect(),
            replacement_policy: policy,
            evictions: 0,
        }
    }

    pub fn policy(&self) -> &R {
        &self.replacement_policy
    }

    /// The replacement record of a slot
    pub fn record(&self, slot: usize) -> &R::Data {
        &self.records[slot]
    }

    /// Finds the slot holding a tag within a set
    fn find(&self, range: &std::ops::Range<usize>, tag: u64) -> Option<usize> {
        let mut x = range.start;
        while x < range.end {
            if self.valid[x] && self.tags[x] == tag {
                return Some(x);
            }
            x += 1;
        }
        None
    }
}

impl<R: ReplacementPolicy> CacheTrait for Cache<R> {
    fn access(&mut self, access: &Access) -> Outcome {
        let set = self.geometry.set_of(access.address);
        let tag = self.geometry.tag_of(access.address);
        // Only search the relevant set
        let range = self.geometry.set_range(set);
        if let Some(slot) = self.find(&range, tag) {
            self.replacement_policy.touch_with(&mut self.records[slot], access);
            return Outcome::Hit;
        }
        // Fill empty ways first, the policy only chooses between resident lines
        let slot = match self.valid[range.clone()].iter().position(|valid| !*valid) {
            Some(way) => range.start + way,
            None => {
                self.evictions += 1;
                range.start + self.replacement_policy.get_victim(&self.records[range.clone()])
            }
        };
        self.tags[slot] = tag;
        self.valid[slot] = true;
        self.replacement_policy.reset_with(&mut self.records[slot], access);
        Outcome::Miss
    }

    fn invalidate(&mut self, address: u64) -> bool {
        let range = self.geometry.set_range(self.geometry.set_of(address));
        match self.find(&range, self.geometry.tag_of(address)) {
            Some(slot) => {
                self.valid[slot] = false;
                self.replacement_policy.invalidate(&mut self.records[slot]);
                true
            }
            None => false,
        }
    }

    fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    fn get_uninitialised_line_count(&self) -> usize {
        self.valid.iter().filter(|a| !**a).count()
    }

    fn get_eviction_count(&self) -> u64 {
        self.evictions
    }
}

/// Enum for the policies provided by the library
///
/// Using trait objects reduces boilerplate, but they are opaque to the compiler, and we would be
/// de-referencing for each access in the trace
///
/// It's much faster to explicitly branch on all implementations, as the compiler can reason about
/// the concrete types, perform function inlining etc
pub enum GenericCache {
    Hawkeye(Cache<Hawkeye>),
    LeastRecentlyUsed(Cache<LeastRecentlyUsed>),
}

impl From<Cache<Hawkeye>> for GenericCache {
    fn from(value: Cache<Hawkeye>) -> Self {
        Self::Hawkeye(value)
    }
}

impl From<Cache<LeastRecentlyUsed>> for GenericCache {
    fn from(value: Cache<LeastRecentlyUsed>) -> Self {
        Self::LeastRecentlyUsed(value)
    }
}

impl CacheTrait for GenericCache {
    fn access(&mut self, access: &Access) -> Outcome {
        match self {
            GenericCache::Hawkeye(c) => c.access(access),
            GenericCache::LeastRecentlyUsed(c) => c.access(access),
        }
    }

    fn invalidate(&mut self, address: u64) -> bool {
        match self {
            GenericCache::Hawkeye(c) => c.invalidate(address),
            GenericCache::LeastRecentlyUsed(c) => c.invalidate(address),
        }
    }

    fn geometry(&self) -> &Geometry {
        match self {
            GenericCache::Hawkeye(c) => c.geometry(),
            GenericCache::LeastRecentlyUsed(c) => c.geometry(),
        }
    }

    fn get_uninitialised_line_count(&self) -> usize {
        match self {
            GenericCache::Hawkeye(c) => c.get_uninitialised_line_count(),
            GenericCache::LeastRecentlyUsed(c) => c.get_uninitialised_line_count(),
        }
    }

    fn get_eviction_count(&self) -> u64 {
        match self {
            GenericCache::Hawkeye(c) => c.get_eviction_count(),
            GenericCache::LeastRecentlyUsed(c) => c.get_eviction_count(),
        }
    }
}
