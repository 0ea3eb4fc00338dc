use std::fmt::Write as _;

fn main() -> std::io::Result<()> {
    println!("cargo:rerun-if-changed=build.rs");
    // The table is too large to build with a const fn, and generating it here means it is only
    // rebuilt when this file changes
    let out_dir = std::env::var_os("OUT_DIR").ok_or_else(|| std::io::Error::other("OUT_DIR is not set"))?;
    let path = std::path::Path::new(&out_dir).join("hex.rs");
    let mut table = String::from("pub const HEX_LOOKUP: [[u8; 256]; 256] = [");
    for high in 0..=u8::MAX {
        table.push('[');
        for low in 0..=u8::MAX {
            // Writing into a String can't fail
            let _ = write!(table, "{},", hex_digit(high) << 4 | hex_digit(low));
        }
        table.push_str("],");
    }
    table.push_str("];\n");
    std::fs::write(path, table)
}

/// The value of an ASCII hex digit, either case. Anything else maps to 0
fn hex_digit(input: u8) -> u8 {
    match input {
        b'0'..=b'9' => input - b'0',
        b'A'..=b'F' => input - b'A' + 10,
        b'a'..=b'f' => input - b'a' + 10,
        _ => 0,
    }
}
