// Single-pass pre-decode scan: null detection, wide-encoding signals from
// the first four bytes, and the huge-line cutoff.

/// Longest line kept when the content is byte-oriented.
const LINE_LIMIT: usize = 500_000;
/// Wide content gets a limit that is a multiple of 4 so the cutoff can sit
/// on a code-unit boundary.
const LINE_LIMIT_WIDE: usize = 500_004;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub has_null: bool,
    pub likely_utf16: bool,
    pub likely_utf32: bool,
    /// Bytes to keep from the start of the buffer, set at the first line
    /// that overruns the limit. Later huge lines are never looked at.
    pub cutoff: Option<usize>,
}

/// Scans `bytes` once. `enforced` marks an explicit caller-chosen charset:
/// it suppresses the wide-encoding sniffing and widens the line limit,
/// since the content may legitimately be wide.
pub fn scan_buffer(bytes: &[u8], enforced: bool) -> ScanResult {
    let mut result = ScanResult::default();
    if !enforced {
        sniff_wide(bytes, &mut result);
    }

    let wide = enforced || result.likely_utf16 || result.likely_utf32;
    let limit = if wide { LINE_LIMIT_WIDE } else { LINE_LIMIT };

    let mut line_len = 0usize;
    for (i, &b) in bytes.iter().enumerate() {
        if b == 0 {
            result.has_null = true;
        }
        if b == b'\n' || b == b'\r' {
            line_len = 0;
            continue;
        }
        line_len += 1;
        if line_len > limit {
            // Wide code units must not be split mid-unit.
            result.cutoff = Some(if wide { i & !3 } else { i });
            break;
        }
    }
    result
}

fn sniff_wide(bytes: &[u8], result: &mut ScanResult) {
    match *bytes {
        // Four-byte marks first; `FF FE 00 00` would otherwise read as a
        // 16-bit mark.
        [0xFF, 0xFE, 0x00, 0x00, ..] | [0x00, 0x00, 0xFE, 0xFF, ..] => {
            result.likely_utf32 = true;
        }
        [0xFF, 0xFE, ..] | [0xFE, 0xFF, ..] => {
            // Only a two-byte mark was recognizable. Probe the null
            // density just behind it: a 32-bit stream drowns in nulls, a
            // 16-bit one does not.
            let probe = &bytes[2..bytes.len().min(10)];
            let nulls = probe.iter().filter(|&&b| b == 0).count();
            if probe.len() >= 2 && nulls * 2 > probe.len() {
                result.likely_utf32 = true;
            } else {
                result.likely_utf16 = true;
            }
        }
        // No mark: look for the periodic null placement of Latin-heavy
        // wide text in the first two code units.
        [b0, b1, b2, b3, ..] => {
            let alternating_16 = (b0 != 0 && b1 == 0 && b2 != 0 && b3 == 0)
                || (b0 == 0 && b1 != 0 && b2 == 0 && b3 != 0);
            let paired_32 = (b0 == 0 && b1 == 0 && (b2 != 0 || b3 != 0))
                || ((b0 != 0 || b1 != 0) && b2 == 0 && b3 == 0);
            if alternating_16 {
                result.likely_utf16 = true;
            } else if paired_32 {
                result.likely_utf32 = true;
            }
        }
        _ => {}
    }
}
