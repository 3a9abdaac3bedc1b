//! Adapter layer: converts between the f64 match clock and Decimal points.

use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::Points;

/// Convert f64 to Decimal (lossy but sufficient for clock seconds).
pub fn to_decimal(v: f64) -> Decimal {
    Decimal::from_f64(v).unwrap_or(Decimal::ZERO)
}

/// Convert Decimal to f64.
pub fn from_decimal(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

/// Points accrued at `rate` points per second over `seconds`.
pub fn points_over(rate: Decimal, seconds: f64) -> Points {
    Points(rate * to_decimal(seconds))
}

/// `numerator / seconds`, or `None` when the divisor is not positive.
pub fn per_second(numerator: Points, seconds: f64) -> Option<Decimal> {
    let secs = to_decimal(seconds);
    if secs <= Decimal::ZERO {
        return None;
    }
    numerator.0.checked_div(secs)
}

/// Nearest whole point, halves rounded up (away from zero).
pub fn round_whole(p: Points) -> Points {
    Points(p.0.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
}
