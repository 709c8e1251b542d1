//! Display helpers shared by views and logs.

/// Abbreviate large figures with two decimals: `1.23B`, `4.56M`, `7.89K`.
/// Values below a thousand keep two decimals without suffix.
pub fn compact_number(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.2}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("{:.2}K", value / 1e3)
    } else {
        format!("{value:.2}")
    }
}
