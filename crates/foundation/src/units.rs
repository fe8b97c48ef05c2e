pub const KIB: u64 = 1024;
pub const MIB: u64 = 1024 * KIB;
pub const GIB: u64 = 1024 * MIB;

/// Human-readable size: `"512 Bytes"`, `"1.50 KB"`, `"2.00 MB"`, `"1.25 GB"`.
///
/// Thresholds are base-1024; fractions are rounded half-up to two places.
pub fn format_byte_size(bytes: u64) -> String {
    if bytes < KIB {
        return format!("{bytes} Bytes");
    }
    let (value, unit) = if bytes < MIB {
        (bytes as f64 / KIB as f64, "KB")
    } else if bytes < GIB {
        (bytes as f64 / MIB as f64, "MB")
    } else {
        (bytes as f64 / GIB as f64, "GB")
    };
    format!("{:.2} {unit}", round2(value))
}

/// Two decimals for display.
pub fn format_fixed2(v: f64) -> String {
    format!("{:.2}", round2(v))
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
