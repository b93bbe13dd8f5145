//! Display helpers for amounts held in minor units.

/// Render cents as dollars, e.g. `45` as `$0.45`.
///
/// ```rust
/// assert_eq!(coinbox::money::format_dollars(45), "$0.45");
/// assert_eq!(coinbox::money::format_dollars(200), "$2.00");
/// ```
pub fn format_dollars(cents: u32) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}
