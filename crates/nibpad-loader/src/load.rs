use std::path::Path;

use crate::charset::{detect_charset, Charset};
use crate::hexdump::hex_dump;
use crate::scan::scan_buffer;

pub const MAX_TEXT_BYTES: u64 = 100 * 1024 * 1024;
pub const MAX_HEX_BYTES: u64 = 32 * 1024 * 1024;

/// Appended verbatim to the decoded text when a cutoff was applied. The
/// exact bytes are load-bearing for downstream consumers.
pub const HUGE_LINE_SENTINEL: &str =
    "    HUGE LINE TRUNCATED: NO LINE WITH MORE THAN 500000 CHARACTERS";

const DECODE_CHUNK: usize = 1024 * 1024;

#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Explicit charset override; `None` auto-detects.
    pub charset: Option<Charset>,
    /// When set, a BOM-less buffer containing null bytes is skipped
    /// outright instead of being presented read-only.
    pub skip_non_text: bool,
}

/// Outcome of a load. Failures are encoded in the shape rather than an
/// error channel: empty text with an empty `file_name` means the source
/// does not exist, empty text with a nonempty `file_name` means it was
/// rejected (oversized, or skipped as non-text).
#[derive(Debug, Clone, Default)]
pub struct LoadResult {
    pub text: String,
    pub file_name: String,
    pub charset: Option<Charset>,
    pub enforced_encoding: bool,
    pub force_uneditable: bool,
    pub truncated: bool,
}

impl LoadResult {
    fn missing() -> Self {
        Self::default()
    }

    fn rejected(file_name: String) -> Self {
        Self {
            file_name,
            ..Self::default()
        }
    }

    pub fn is_missing(&self) -> bool {
        self.text.is_empty() && self.file_name.is_empty()
    }

    pub fn is_rejected(&self) -> bool {
        self.text.is_empty() && !self.file_name.is_empty() && self.charset.is_none()
    }
}

/// Reads and decodes a file. Never fails; see [`LoadResult`] for how
/// missing and oversized sources are reported.
pub fn load(path: &Path, options: &LoadOptions) -> LoadResult {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let Ok(meta) = std::fs::metadata(path) else {
        return LoadResult::missing();
    };
    if !meta.is_file() {
        return LoadResult::missing();
    }
    if meta.len() > size_ceiling(options) {
        tracing::warn!(
            "{}: {} bytes exceeds the load ceiling",
            path.display(),
            meta.len()
        );
        return LoadResult::rejected(file_name);
    }
    let Ok(bytes) = std::fs::read(path) else {
        return LoadResult::missing();
    };
    load_bytes(&bytes, file_name, options)
}

/// Byte-source variant of [`load`], for callers that already hold the
/// buffer.
pub fn load_bytes(bytes: &[u8], file_name: String, options: &LoadOptions) -> LoadResult {
    if bytes.len() as u64 > size_ceiling(options) {
        tracing::warn!("{file_name}: {} bytes exceeds the load ceiling", bytes.len());
        return LoadResult::rejected(file_name);
    }

    if options.charset == Some(Charset::Hex) {
        return LoadResult {
            text: hex_dump(bytes),
            file_name,
            charset: Some(Charset::Hex),
            enforced_encoding: true,
            force_uneditable: true,
            truncated: false,
        };
    }

    let enforced = options.charset.is_some();
    let scan = scan_buffer(bytes, enforced);

    // Wide-looking buffers carry null bytes by nature, so the wide signals
    // are consulted before nulls get to call the buffer binary.
    let likely_wide = scan.likely_utf16 || scan.likely_utf32;

    if !enforced && scan.has_null && !likely_wide && options.skip_non_text {
        return LoadResult {
            file_name,
            charset: Some(Charset::Utf8),
            ..LoadResult::default()
        };
    }

    let mut force_uneditable = false;
    let charset = match options.charset {
        Some(charset) => charset,
        None => {
            if scan.likely_utf16 {
                Charset::Utf16
            } else if scan.likely_utf32 {
                Charset::Utf32
            } else if scan.has_null {
                // Binary-but-viewable: decode as UTF-8, lock the buffer.
                force_uneditable = true;
                Charset::Utf8
            } else {
                detect_charset(bytes)
            }
        }
    };
    tracing::debug!("{file_name}: resolved as {charset}");

    let kept = match scan.cutoff {
        Some(cutoff) => &bytes[..cutoff.min(bytes.len())],
        None => bytes,
    };
    let mut text = decode_stream(kept, charset);

    let truncated = scan.cutoff.is_some();
    if truncated {
        text.push_str(HUGE_LINE_SENTINEL);
        force_uneditable = true;
    }

    LoadResult {
        text,
        file_name,
        charset: Some(charset),
        enforced_encoding: enforced,
        force_uneditable,
        truncated,
    }
}

fn size_ceiling(options: &LoadOptions) -> u64 {
    if options.charset == Some(Charset::Hex) {
        MAX_HEX_BYTES
    } else {
        MAX_TEXT_BYTES
    }
}

fn decode_stream(bytes: &[u8], charset: Charset) -> String {
    match charset {
        Charset::Utf8 => decode_with(encoding_rs::UTF_8, bytes),
        Charset::Utf16Be => decode_with(encoding_rs::UTF_16BE, bytes),
        Charset::Utf16Le => decode_with(encoding_rs::UTF_16LE, bytes),
        Charset::Utf16 => {
            // Endianness was never pinned down; a big-endian mark is the
            // only counter-signal to the little-endian default.
            if bytes.starts_with(&[0xFE, 0xFF]) {
                decode_with(encoding_rs::UTF_16BE, bytes)
            } else {
                decode_with(encoding_rs::UTF_16LE, bytes)
            }
        }
        Charset::Utf32Be => decode_utf32(bytes, true),
        Charset::Utf32Le => decode_utf32(bytes, false),
        Charset::Utf32 => decode_utf32(bytes, bytes.starts_with(&[0x00, 0x00, 0xFE, 0xFF])),
        Charset::Latin1 => {
            // Stateless single-byte decode; chunking only bounds the
            // temporary copies.
            let mut out = String::with_capacity(bytes.len());
            for chunk in bytes.chunks(DECODE_CHUNK) {
                out.push_str(&encoding_rs::mem::decode_latin1(chunk));
            }
            out
        }
        Charset::Hex => hex_dump(bytes),
    }
}

/// Incremental decode in fixed-size chunks, flushing the decoder at
/// end-of-input so a dangling partial sequence still produces output.
fn decode_with(encoding: &'static encoding_rs::Encoding, bytes: &[u8]) -> String {
    let mut decoder = encoding.new_decoder_with_bom_removal();
    let mut out = String::new();
    let mut offset = 0usize;
    loop {
        let remaining = &bytes[offset..];
        let take = remaining.len().min(DECODE_CHUNK);
        let last = take == remaining.len();
        let chunk = &remaining[..take];
        if let Some(needed) = decoder.max_utf8_buffer_length(chunk.len()) {
            out.reserve(needed);
        }
        let (result, read, _had_errors) = decoder.decode_to_string(chunk, &mut out, last);
        offset += read;
        if last && matches!(result, encoding_rs::CoderResult::InputEmpty) {
            return out;
        }
    }
}

/// UTF-32 sits outside the Encoding Standard, so `encoding_rs` has no
/// decoder for it; code units are carried by hand. Invalid scalar values
/// and a dangling partial unit decode to U+FFFD.
fn decode_utf32(bytes: &[u8], big_endian: bool) -> String {
    let mut out = String::with_capacity(bytes.len() / 4 + 1);
    let mut units = bytes.chunks_exact(4);
    let mut at_start = true;
    for unit in &mut units {
        let raw = [unit[0], unit[1], unit[2], unit[3]];
        let value = if big_endian {
            u32::from_be_bytes(raw)
        } else {
            u32::from_le_bytes(raw)
        };
        let ch = char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER);
        if at_start && ch == '\u{FEFF}' {
            at_start = false;
            continue;
        }
        at_start = false;
        out.push(ch);
    }
    if !units.remainder().is_empty() {
        out.push(char::REPLACEMENT_CHARACTER);
    }
    out
}
