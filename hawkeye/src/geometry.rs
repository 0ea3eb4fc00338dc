/// The shape of a set-associative cache, and the bit arithmetic that maps an address onto it
///
/// Both the host cache and the Hawkeye policy resolve sets through this, so the set a policy
/// assigns a line to always agrees with the set the host stores its tag in
///
/// Sets and line size are assumed to be powers of two, which is checked when the configuration is
/// validated
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Geometry {
    sets: u64,
    ways: u64,
    line_size: u64,
    set_selection_bit_mask: u64,
    tag_selection_bit_mask: u64,
    cache_alignment_bit_mask: u64,
    cache_alignment_bits: u8,
}

impl Geometry {
    pub fn new(sets: u64, ways: u64, line_size: u64) -> Self {
        debug_assert!(sets.is_power_of_two() && line_size.is_power_of_two());
        let cache_alignment_bits = line_size.trailing_zeros() as u8;
        let set_selection_bits = sets.trailing_zeros() as u8;
        let tag_shift = cache_alignment_bits as u32 + set_selection_bits as u32;
        Self {
            sets,
            ways,
            line_size,
            set_selection_bit_mask: (sets - 1) << cache_alignment_bits,
            // Shifting by the full width would overflow, in which case no bits are left for the tag
            tag_selection_bit_mask: u64::MAX.checked_shl(tag_shift).unwrap_or(0),
            cache_alignment_bit_mask: !((1 << (cache_alignment_bits as u32)) - 1),
            cache_alignment_bits,
        }
    }

    /// Resolves the set an address maps to, suitable as an index into a collection of sets
    pub fn set_of(&self, address: u64) -> u64 {
        (address & self.set_selection_bit_mask) >> self.cache_alignment_bits
    }

    /// The tag of an address. Not re-aligned, as it is only ever compared with other tags
    pub fn tag_of(&self, address: u64) -> u64 {
        address & self.tag_selection_bit_mask
    }

    /// The slots belonging to a set, in way order, when all lines are stored in one flat array
    pub fn set_range(&self, set: u64) -> std::ops::Range<usize> {
        let lower = (set * self.ways) as usize;
        lower..lower + self.ways as usize
    }

    /// Aligns an address down to the start of its cache line
    pub fn align(&self, address: u64) -> u64 {
        address & self.cache_alignment_bit_mask
    }

    pub fn sets(&self) -> u64 {
        self.sets
    }

    pub fn ways(&self) -> u64 {
        self.ways
    }

    pub fn line_size(&self) -> u64 {
        self.line_size
    }

    pub fn lines(&self) -> u64 {
        self.sets * self.ways
    }
}
