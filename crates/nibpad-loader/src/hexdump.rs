use std::fmt::Write;

const BYTES_PER_ROW: usize = 16;

/// Renders bytes as a canonical hex dump: hex offset, 16 bytes per row in
/// two groups of 8, and an ASCII gutter where anything outside the
/// printable range shows as `.`.
pub fn hex_dump(bytes: &[u8]) -> String {
    // 78 output chars per full row.
    let mut out = String::with_capacity((bytes.len() / BYTES_PER_ROW + 1) * 80);
    for (row, chunk) in bytes.chunks(BYTES_PER_ROW).enumerate() {
        let _ = write!(out, "{:08x} ", row * BYTES_PER_ROW);
        for (i, b) in chunk.iter().enumerate() {
            if i % 8 == 0 {
                out.push(' ');
            }
            let _ = write!(out, "{b:02x} ");
        }
        for i in chunk.len()..BYTES_PER_ROW {
            if i % 8 == 0 {
                out.push(' ');
            }
            out.push_str("   ");
        }
        out.push_str(" |");
        for &b in chunk {
            out.push(if (0x20..0x7F).contains(&b) { b as char } else { '.' });
        }
        out.push_str("|\n");
    }
    out
}
