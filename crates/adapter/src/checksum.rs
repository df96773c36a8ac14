//! CRC-32 checksums for board snapshots

const POLY: u32 = 0xEDB8_8320;

const CRC32_TABLE: [u32; 256] = build_table();

const fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut c = i as u32;
        let mut j = 0;
        while j < 8 {
            c = if c & 1 != 0 { (c >> 1) ^ POLY } else { c >> 1 };
            j += 1;
        }
        table[i] = c;
        i += 1;
    }
    table
}

/// Upper-case, zero-padded CRC-32 of `text`
///
/// Each UTF-16 code unit contributes its low byte only, so ASCII input hashes
/// like plain CRC-32. Empty input yields `"00000000"`.
pub fn crc32_hex(text: &str) -> String {
    if text.is_empty() {
        return "00000000".to_string();
    }
    let mut crc = 0xFFFF_FFFFu32;
    for unit in text.encode_utf16() {
        let byte = u32::from(unit & 0xFF);
        let idx = ((crc ^ byte) & 0xFF) as usize;
        crc = (crc >> 8) ^ CRC32_TABLE[idx];
    }
    format!("{:08X}", crc ^ 0xFFFF_FFFF)
}
