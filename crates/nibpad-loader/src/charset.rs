use std::str::FromStr;

/// Charset labels the loader can resolve to. The bare `Utf16`/`Utf32`
/// variants come from buffer heuristics that never pin the byte order
/// down; their decoders settle endianness from a mark, defaulting to
/// little-endian. `Hex` is not an encoding at all but a rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    Utf8,
    Utf16,
    Utf16Be,
    Utf16Le,
    Utf32,
    Utf32Be,
    Utf32Le,
    Latin1,
    Hex,
}

impl Charset {
    pub fn label(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Utf16 => "UTF-16",
            Self::Utf16Be => "UTF-16BE",
            Self::Utf16Le => "UTF-16LE",
            Self::Utf32 => "UTF-32",
            Self::Utf32Be => "UTF-32BE",
            Self::Utf32Le => "UTF-32LE",
            Self::Latin1 => "ISO-8859-1",
            Self::Hex => "Hex",
        }
    }

    /// Whether code units are wider than one byte.
    pub fn is_wide(self) -> bool {
        matches!(
            self,
            Self::Utf16 | Self::Utf16Be | Self::Utf16Le | Self::Utf32 | Self::Utf32Be | Self::Utf32Le
        )
    }
}

impl FromStr for Charset {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Self::Utf8),
            "utf16" | "utf-16" => Ok(Self::Utf16),
            "utf16be" | "utf-16be" | "utf16-be" => Ok(Self::Utf16Be),
            "utf16le" | "utf-16le" | "utf16-le" => Ok(Self::Utf16Le),
            "utf32" | "utf-32" => Ok(Self::Utf32),
            "utf32be" | "utf-32be" | "utf32-be" => Ok(Self::Utf32Be),
            "utf32le" | "utf-32le" | "utf32-le" => Ok(Self::Utf32Le),
            "iso-8859-1" | "iso8859-1" | "latin1" | "latin-1" => Ok(Self::Latin1),
            "hex" => Ok(Self::Hex),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Charset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Classifies a byte buffer's encoding. Total: anything that defeats the
/// probes decodes as Latin-1, which accepts every byte sequence.
///
/// Order matters twice over: byte-order marks beat content inspection, and
/// the four-byte marks beat the two-byte marks they contain as a prefix.
pub fn detect_charset(bytes: &[u8]) -> Charset {
    if bytes.starts_with(&[0x00, 0x00, 0xFE, 0xFF]) {
        return Charset::Utf32Be;
    }
    if bytes.starts_with(&[0xFF, 0xFE, 0x00, 0x00]) {
        return Charset::Utf32Le;
    }
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return Charset::Utf8;
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return Charset::Utf16Be;
    }
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return Charset::Utf16Le;
    }

    // `from_utf8` enforces strict UTF-8: overlong forms, surrogate code
    // points, and lead bytes C0/C1/F5..FF all fail, and pure-ASCII runs
    // are skipped in bulk without changing the outcome.
    if std::str::from_utf8(bytes).is_ok() {
        return Charset::Utf8;
    }

    if bytes.len() >= 4 {
        if let Some(wide) = guess_wide(bytes) {
            return wide;
        }
    }

    Charset::Latin1
}

/// Zero-byte placement heuristic for BOM-less wide encodings. Wide text
/// with a Latin-heavy payload leaves its null bytes in a periodic pattern;
/// the guess is kept only when its confidence clears 0.45.
fn guess_wide(bytes: &[u8]) -> Option<Charset> {
    let len = bytes.len();
    let mut zeros_mod4 = [0usize; 4];
    let mut zeros_even = 0usize;
    let mut zeros_odd = 0usize;
    for (i, &b) in bytes.iter().enumerate() {
        if b != 0 {
            continue;
        }
        zeros_mod4[i % 4] += 1;
        if i % 2 == 0 {
            zeros_even += 1;
        } else {
            zeros_odd += 1;
        }
    }

    // Each ratio is relative to how many positions fall in its class.
    let class4 = |k: usize| ((len + 3 - k) / 4).max(1) as f64;
    let ratio0 = zeros_mod4[0] as f64 / class4(0);
    let ratio2 = zeros_mod4[2] as f64 / class4(2);
    let even = zeros_even as f64 / (len.div_ceil(2).max(1) as f64);
    let odd = zeros_odd as f64 / ((len / 2).max(1) as f64);

    let (charset, confidence) = if ratio0 > 0.25 && ratio2 > 0.25 {
        (Charset::Utf32Be, (ratio0 + ratio2) / 2.0)
    } else if even > 0.40 && odd < 0.15 {
        (Charset::Utf16Be, even)
    } else {
        (Charset::Utf16Le, odd)
    };
    (confidence > 0.45).then_some(charset)
}
