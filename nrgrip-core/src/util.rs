/// Format a byte count with fractional KB/MB (e.g., "1.5 KB", "2.3 MB").
pub fn format_bytes_approx(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

/// Decode a fixed ASCII field (catalog numbers, ISRCs).
///
/// Stops at the first NUL, drops non-printable bytes and trims. Returns
/// `None` when nothing printable remains, which is how unset fields appear.
pub fn read_ascii_field(buf: &[u8]) -> Option<String> {
    let s: String = buf
        .iter()
        .take_while(|&&b| b != 0)
        .filter(|&&b| (0x20..0x7F).contains(&b))
        .map(|&b| b as char)
        .collect();
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Whole sectors covered by `length` bytes, rounding up.
pub fn sector_count(length: u64, sector_size: u32) -> u64 {
    if sector_size == 0 {
        return 0;
    }
    length.div_ceil(sector_size as u64)
}
