use fixed::types::I32F32;

/// Q32.32 fixed-point: 32 integer bits, 32 fractional bits. All simulated
/// time (craft times, tick deltas, elapsed progress) uses this type.
pub type Fixed64 = I32F32;

/// Count of completed engine ticks.
pub type Ticks = u64;

/// Convert an f64 to Fixed64. Use only at the data boundary, never in the tick loop.
///
/// Returns `None` for NaN, infinities and values outside the Q32.32 range.
#[inline]
pub fn f64_to_fixed64(v: f64) -> Option<Fixed64> {
    Fixed64::checked_from_num(v)
}

/// Convert an f64 to Fixed64, clamping out-of-range values (infinities
/// included) to the nearest bound. Returns `None` only for NaN.
#[inline]
pub fn f64_to_fixed64_saturating(v: f64) -> Option<Fixed64> {
    (!v.is_nan()).then(|| Fixed64::saturating_from_num(v))
}

/// Convert Fixed64 to f64. Use only for display and logging.
#[inline]
pub fn fixed64_to_f64(v: Fixed64) -> f64 {
    v.to_num::<f64>()
}

/// Shorthand for building a Fixed64 from a whole number of seconds.
#[inline]
pub fn secs(v: i32) -> Fixed64 {
    Fixed64::from_num(v)
}
