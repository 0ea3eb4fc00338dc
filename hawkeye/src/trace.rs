use lazy_static::lazy_static;
use regex::bytes::Regex;
use crate::error::TraceError;
use crate::hex::HEX_LOOKUP;

/// Every record is exactly this long, newline included
pub const RECORD_SIZE: usize = 40;
const PC_OFFSET: usize = 0;
const PC_UPPER: usize = PC_OFFSET + 16;
const ADDRESS_OFFSET: usize = PC_UPPER + 1;
const ADDRESS_UPPER: usize = ADDRESS_OFFSET + 16;
const RW_MODE: usize = ADDRESS_UPPER + 1;
const SIZE: usize = RW_MODE + 2;

lazy_static! {
    static ref RECORD_PATTERN: Regex = Regex::new(r"^[0-9A-Fa-f]{16} [0-9A-Fa-f]{16} [RW] [0-9]{3}\n$").unwrap();
}

/// A single memory access from a trace
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TraceRecord {
    /// The issuing instruction, None when the trace has no PC for it (written as zero)
    pub pc: Option<u64>,
    pub address: u64,
    pub write: bool,
    pub size: u16,
}

impl TraceRecord {
    /// Parses a record without checking its format, see `validate_trace`
    pub fn parse(buffer: &[u8; RECORD_SIZE]) -> Self {
        let pc = parse_address(&field(buffer, PC_OFFSET));
        Self {
            pc: if pc == 0 { None } else { Some(pc) },
            address: parse_address(&field(buffer, ADDRESS_OFFSET)),
            write: buffer[RW_MODE] == b'W',
            size: parse_size(&field(buffer, SIZE)),
        }
    }
}

/// Copies a fixed width field out of a record
fn field<const N: usize>(buffer: &[u8; RECORD_SIZE], offset: usize) -> [u8; N] {
    std::array::from_fn(|i| buffer[offset + i])
}

/// Checks every record of a trace is well formed
///
/// Simulation skips these checks for speed, so traces from untrusted sources should be validated
/// first. Records are numbered from 1
pub fn validate_trace(bytes: &[u8]) -> Result<(), TraceError> {
    if bytes.len() % RECORD_SIZE != 0 {
        return Err(TraceError::PartialRecord(bytes.len()));
    }
    for (index, record) in bytes.chunks_exact(RECORD_SIZE).enumerate() {
        if !RECORD_PATTERN.is_match(record) {
            return Err(TraceError::MalformedRecord {
                line: index + 1,
                content: String::from_utf8_lossy(record).trim_end().to_string(),
            });
        }
    }
    Ok(())
}

/// Parses a 64-bit value from 16 hexadecimal digits
///
/// Parsing with the standard library becomes the bottleneck for small caches, so we use a lookup
/// table of 2^16 bytes which maps each pair of hex digits to a byte. This omits checks for the
/// input format; while it is guaranteed not to panic, malformed input gives incorrect results.
///
/// The lookup table is generated by build.rs, as a const fn takes too long to evaluate. Only 256
/// entries of it are ever used for well-formed input
///
/// # Arguments
///
/// * `buf`: The byte buffer
///
/// returns: u64
///
/// # Examples
///
/// ```
/// use hawkeye::trace::parse_address;
/// let address = b"000000000000000A";
/// assert_eq!(parse_address(&address), 10)
/// ```
pub fn parse_address(buf: &[u8; 16]) -> u64 {
    let mut res: u64 = 0;
    let mut x = 0;
    while x < 15 {
        res <<= 8;
        res |= HEX_LOOKUP[buf[x] as usize][buf[x + 1] as usize] as u64;
        x += 2;
    }
    res
}

/// Parses a three digit decimal size
///
/// # Examples
///
/// ```
/// use hawkeye::trace::parse_size;
/// let size = b"010";
/// assert_eq!(parse_size(&size), 10);
/// ```
pub fn parse_size(buf: &[u8; 3]) -> u16 {
    let mut res = buf[2].wrapping_sub(b'0') as u16;
    res += 10u16 * buf[1].wrapping_sub(b'0') as u16;
    res += 100u16 * buf[0].wrapping_sub(b'0') as u16;
    res
}
