mod charset;
mod hexdump;
mod load;
mod scan;
mod worker;

pub use charset::{detect_charset, Charset};
pub use hexdump::hex_dump;
pub use load::{
    load, load_bytes, LoadOptions, LoadResult, HUGE_LINE_SENTINEL, MAX_HEX_BYTES, MAX_TEXT_BYTES,
};
pub use scan::{scan_buffer, ScanResult};
pub use worker::{LoadMessage, LoadWorker};
