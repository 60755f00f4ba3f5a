//! Checked decimal arithmetic and the rounding conventions for money.
//!
//! Every money and rate computation goes through these helpers so that an
//! overflow becomes a typed error instead of a panic. Money is rounded to
//! cents with midpoint-away-from-zero, the convention payroll uses.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::GeneratorError;

/// `a * b`, or an overflow error naming `context`.
pub fn mul(a: Decimal, b: Decimal, context: &str) -> Result<Decimal, GeneratorError> {
    a.checked_mul(b).ok_or_else(|| GeneratorError::overflow(context))
}

/// `a + b`, or an overflow error naming `context`.
pub fn add(a: Decimal, b: Decimal, context: &str) -> Result<Decimal, GeneratorError> {
    a.checked_add(b).ok_or_else(|| GeneratorError::overflow(context))
}

/// `a - b`, or an overflow error naming `context`.
pub fn sub(a: Decimal, b: Decimal, context: &str) -> Result<Decimal, GeneratorError> {
    a.checked_sub(b).ok_or_else(|| GeneratorError::overflow(context))
}

/// `a / b`, or an error naming `context` on overflow or division by zero.
pub fn div(a: Decimal, b: Decimal, context: &str) -> Result<Decimal, GeneratorError> {
    a.checked_div(b).ok_or_else(|| GeneratorError::overflow(context))
}

/// Round a money amount to cents.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to the nearest whole count (midpoint away from zero).
pub fn round_count(value: Decimal, context: &str) -> Result<u64, GeneratorError> {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .ok_or_else(|| GeneratorError::overflow(context))
}

/// Smallest whole count not below `value`.
pub fn ceil_count(value: Decimal, context: &str) -> Result<u64, GeneratorError> {
    value
        .ceil()
        .to_u64()
        .ok_or_else(|| GeneratorError::overflow(context))
}

/// Map a draw in `[0, 1)` onto `0..n`.
///
/// Returns zero when `n` is zero.
pub fn scale_draw(draw: Decimal, n: u32) -> u32 {
    if n == 0 {
        return 0;
    }
    draw.checked_mul(Decimal::from(n))
        .and_then(|v| v.floor().to_u32())
        .map_or(0, |i| i.min(n.saturating_sub(1)))
}
