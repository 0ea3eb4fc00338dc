use crate::cache::{Cache, CacheTrait, GenericCache, Outcome};
use crate::geometry::Geometry;
use crate::hawkeye::{Hawkeye, MAX_RRPV};
use crate::replacement_policies::{Access, LeastRecentlyUsed};
use crate::trace::{TraceRecord, RECORD_SIZE};
use crate::util::hot_loop_with_scan;

fn hawkeye_cache(sets: u64, ways: u64) -> Cache<Hawkeye> {
    let geometry = Geometry::new(sets, ways, 64);
    Cache::new(geometry, Hawkeye::new(geometry, 8 * ways as usize, 7, 64))
}

fn replay<C: CacheTrait>(cache: &mut C, trace: &[u8]) -> u64 {
    let mut hits = 0;
    for chunk in trace.chunks_exact(RECORD_SIZE) {
        let record = TraceRecord::parse(chunk.try_into().unwrap());
        if cache.access(&Access::new(record.address, record.pc)) == Outcome::Hit {
            hits += 1;
        }
    }
    hits
}

#[test]
fn geometry_splits_addresses() {
    let geometry = Geometry::new(4, 2, 64);
    assert_eq!(geometry.set_of(0x1C0), 3);
    assert_eq!(geometry.tag_of(0x1C0), 0x100);
    assert_eq!(geometry.align(0x1C7), 0x1C0);
    assert_eq!(geometry.set_range(3), 6..8);
    assert_eq!(geometry.lines(), 8);
    // A single set has no set bits
    let fully_associative = Geometry::new(1, 8, 64);
    assert_eq!(fully_associative.set_of(0xFFFF_FFC0), 0);
    assert_eq!(fully_associative.tag_of(0xFFFF_FFC7), 0xFFFF_FFC0);
}

#[test]
fn second_access_hits() {
    let mut cache = hawkeye_cache(4, 2);
    assert_eq!(cache.access(&Access::new(0x1000, Some(1))), Outcome::Miss);
    assert_eq!(cache.access(&Access::new(0x1008, Some(1))), Outcome::Hit);
    assert_eq!(cache.get_uninitialised_line_count(), 7);
    assert_eq!(cache.get_eviction_count(), 0);
}

#[test]
fn full_set_evicts_through_the_policy() {
    let mut cache = hawkeye_cache(1, 2);
    for line in 0..3u64 {
        assert_eq!(cache.access(&Access::new(line * 64, Some(1))), Outcome::Miss);
    }
    assert_eq!(cache.get_eviction_count(), 1);
    assert_eq!(cache.get_uninitialised_line_count(), 0);
    // The oldest line had aged the furthest
    assert_eq!(cache.access(&Access::new(64, Some(1))), Outcome::Hit);
    assert_eq!(cache.access(&Access::new(0, Some(1))), Outcome::Miss);
}

#[test]
fn invalidate_frees_the_line() {
    let mut cache = hawkeye_cache(1, 2);
    cache.access(&Access::new(0, Some(1)));
    cache.access(&Access::new(64, Some(1)));
    assert!(cache.invalidate(0));
    assert!(!cache.invalidate(0));
    assert!(cache.policy().is_free(0, 0));
    assert_eq!(cache.policy().rrpv(0, 0), MAX_RRPV);
    // Refilled without an eviction
    assert_eq!(cache.access(&Access::new(128, Some(1))), Outcome::Miss);
    assert_eq!(cache.get_eviction_count(), 0);
    assert_eq!(cache.record(0).way(), 0);
}

#[test]
fn policy_state_stays_consistent_with_the_cache() {
    let mut cache = hawkeye_cache(4, 4);
    let trace = hot_loop_with_scan(8, 24, 40, 64);
    for chunk in trace.chunks_exact(RECORD_SIZE) {
        let record = TraceRecord::parse(chunk.try_into().unwrap());
        cache.access(&Access::new(record.address, record.pc));
        let mut occupied = 0;
        for set in 0..4 {
            let ways = cache.policy().occupied_ways(set);
            assert!(ways <= 4);
            occupied += ways;
            for way in 0..4 {
                assert!(cache.policy().rrpv(set, way) <= MAX_RRPV);
            }
        }
        assert_eq!(occupied, 16 - cache.get_uninitialised_line_count());
    }
    // Every slot's record agrees with where the cache put it
    for slot in 0..16 {
        let record = cache.record(slot);
        assert_eq!((record.set() * 4 + record.way()) as usize, slot);
    }
    let stats = cache.policy().stats();
    assert_eq!(stats.no_free_way, 0);
    assert_eq!(stats.failed_victim_scans, 0);
}

#[test]
fn hawkeye_keeps_a_working_set_that_lru_loses_to_a_scan() {
    // Two hot lines and three scanning lines per iteration, in a single 4 way set. Every hot line
    // is reused after four other lines, so LRU never hits
    let trace = hot_loop_with_scan(2, 3, 50, 64);
    let geometry = Geometry::new(1, 4, 64);
    let mut lru = GenericCache::from(Cache::new(geometry, LeastRecentlyUsed::new()));
    let mut hawkeye = GenericCache::from(hawkeye_cache(1, 4));
    let lru_hits = replay(&mut lru, &trace);
    let hawkeye_hits = replay(&mut hawkeye, &trace);
    assert_eq!(lru_hits, 0);
    assert!(hawkeye_hits > lru_hits);
}

#[test]
fn lru_evicts_the_least_recently_used() {
    let mut cache = Cache::new(Geometry::new(1, 2, 64), LeastRecentlyUsed::new());
    cache.access(&Access::new(0, None));
    cache.access(&Access::new(64, None));
    assert_eq!(cache.access(&Access::new(0, None)), Outcome::Hit);
    assert_eq!(cache.access(&Access::new(128, None)), Outcome::Miss);
    assert_eq!(cache.access(&Access::new(0, None)), Outcome::Hit);
    assert_eq!(cache.access(&Access::new(64, None)), Outcome::Miss);
}
