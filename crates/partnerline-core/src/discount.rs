//! # Discount Tiers
//!
//! Maps the cumulative quantity sold to a partner onto the discount that
//! partner earns.
//!
//! ```text
//!   total quantity      0     10k        50k       100k          500k
//!                       ├──────┼──────────┼──────────┼─────────────┼──────►
//!   discount            │  0 % │   3 %    │   5 %    │     7 %     │ 10 %
//! ```
//!
//! Each tier starts at its lower bound (inclusive). The documentation of the
//! older partner module quoted 0/5/10/15 %; the figures applied in practice
//! were 0/3/5/7/10 %, and those are what this table reproduces.

/// Tier table: `(lower bound inclusive, discount percent)`, ascending.
pub const DISCOUNT_TIERS: [(i64, u8); 5] = [
    (0, 0),
    (10_000, 3),
    (50_000, 5),
    (100_000, 7),
    (500_000, 10),
];

/// Returns the discount percent for a cumulative sold quantity.
///
/// Negative totals are not produced by the sales query; they land in the
/// first tier.
///
/// ## Example
/// ```rust
/// use partnerline_core::discount::discount_percent;
///
/// assert_eq!(discount_percent(9_999), 0);
/// assert_eq!(discount_percent(10_000), 3);
/// assert_eq!(discount_percent(500_000), 10);
/// ```
pub fn discount_percent(total_quantity: i64) -> u8 {
    DISCOUNT_TIERS
        .iter()
        .rev()
        .find(|(lower, _)| total_quantity >= *lower)
        .map(|(_, pct)| *pct)
        .unwrap_or(0)
}
