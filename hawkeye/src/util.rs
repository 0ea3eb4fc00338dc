/// The PC used for the reusable half of the synthetic workloads
pub const HOT_PC: u64 = 0x40_0100;
/// The PC used for the streaming half of the synthetic workloads
pub const SCAN_PC: u64 = 0x40_0200;

const HOT_BASE: u64 = 0x1000_0000;
const SCAN_BASE: u64 = 0x8000_0000;

/// Builds traces in the 40 byte record format
#[derive(Debug, Default, Clone)]
pub struct TraceBuilder {
    bytes: Vec<u8>,
}

impl TraceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a read. Sizes above 999 bytes don't fit the format and are clamped
    pub fn read(&mut self, pc: u64, address: u64, size: u16) -> &mut Self {
        self.record(pc, address, 'R', size)
    }

    pub fn write(&mut self, pc: u64, address: u64, size: u16) -> &mut Self {
        self.record(pc, address, 'W', size)
    }

    fn record(&mut self, pc: u64, address: u64, mode: char, size: u16) -> &mut Self {
        let line = format!("{pc:016X} {address:016X} {mode} {:03}\n", size.min(999));
        self.bytes.extend_from_slice(line.as_bytes());
        self
    }

    /// The number of records so far
    pub fn len(&self) -> usize {
        self.bytes.len() / crate::trace::RECORD_SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}

/// A working set that is reused every iteration, interleaved with a stream that never is
///
/// Each iteration reads every hot line from `HOT_PC`, then `scan_lines` lines never seen before from
/// `SCAN_PC`. Recency based policies let the stream flush the working set whenever the two together
/// exceed the cache, which Hawkeye should learn to avoid
pub fn hot_loop_with_scan(hot_lines: u64, scan_lines: u64, iterations: u64, line_size: u64) -> Vec<u8> {
    let mut builder = TraceBuilder::new();
    let mut next_scan = SCAN_BASE;
    for _ in 0..iterations {
        for line in 0..hot_lines {
            builder.read(HOT_PC, HOT_BASE + line * line_size, 8);
        }
        for _ in 0..scan_lines {
            builder.read(SCAN_PC, next_scan, 8);
            next_scan += line_size;
        }
    }
    builder.build()
}

/// Reads `lines` consecutive lines in order, `iterations` times over, all from one PC
pub fn cyclic(lines: u64, iterations: u64, line_size: u64, pc: u64) -> Vec<u8> {
    let mut builder = TraceBuilder::new();
    for _ in 0..iterations {
        for line in 0..lines {
            builder.read(pc, HOT_BASE + line * line_size, 8);
        }
    }
    builder.build()
}
