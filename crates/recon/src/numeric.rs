//! Lenient numeric coercion for export cells.
//!
//! A cell that does not parse is data-quality noise, not a failure: it reads as zero.

/// Parse a cell as a decimal amount. Blank, non-numeric and non-finite cells give `0.0`.
pub fn coerce_amount(cell: &str) -> f64 {
    match cell.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Largest unit count a single cell may carry; anything beyond reads as zero.
pub const MAX_QUANTITY: i64 = 1_000_000_000_000;

/// Parse a cell as a unit count, rounding fractional exports ("2.0") to the nearest integer.
/// Counts beyond `MAX_QUANTITY` in either direction are noise and give `0`.
pub fn coerce_quantity(cell: &str) -> i64 {
    let value = coerce_amount(cell).round();
    if value.abs() > MAX_QUANTITY as f64 {
        0
    } else {
        value as i64
    }
}

/// Round half away from zero to 2 decimal places, normalizing `-0.0` to `0.0`.
pub fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
