const UNITS: [&str; 5] = ["B", "K", "M", "G", "T"];

/// Renders a byte count with a binary-prefix suffix and two decimals,
/// e.g. `1536` -> `"1.50K"`. Anything past TiB stays in `T`.
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut pow = 0;

    while size >= 1024.0 && pow < UNITS.len() - 1 {
        size /= 1024.0;
        pow += 1;
    }

    format!("{:.2}{}", size, UNITS[pow])
}

#[cfg(test)]
mod tests {
    use super::format_size;

    #[test]
    fn formats_each_unit() {
        assert_eq!(format_size(0), "0.00B");
        assert_eq!(format_size(1023), "1023.00B");
        assert_eq!(format_size(1024), "1.00K");
        assert_eq!(format_size(1536), "1.50K");
        assert_eq!(format_size(1024 * 1024), "1.00M");
        assert_eq!(format_size(5 * 1024 * 1024 * 1024), "5.00G");
        assert_eq!(format_size(1u64 << 40), "1.00T");
    }

    #[test]
    fn caps_at_terabytes() {
        assert_eq!(format_size(1u64 << 50), "1024.00T");
    }
}
