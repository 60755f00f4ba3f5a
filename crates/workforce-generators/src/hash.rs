//! Stable per-employee draws.
//!
//! A random decision for employee X in year Y is a pure function of
//! `(seed, X, Y, salt)`: SHA-256 over the pipe-joined key, first eight bytes
//! read big-endian and divided by 2^64. The salt separates decision
//! families so that, for example, the termination and promotion draws of
//! the same employee are independent.

use rust_decimal::Decimal;
use sha2::{Digest, Sha256};

/// 2^64, the exclusive upper bound of the hashed integer.
const TWO_POW_64: i128 = 18_446_744_073_709_551_616;

/// Uniform draw in `[0, 1)` for one employee, year and decision family.
pub fn stable_uniform(seed: u64, employee_id: &str, simulation_year: i32, salt: &str) -> Decimal {
    let key = format!("{seed}|{employee_id}|{simulation_year}|{salt}");
    let digest = Sha256::digest(key.as_bytes());
    let head = digest
        .as_slice()
        .first_chunk::<8>()
        .map_or(0, |bytes| u64::from_be_bytes(*bytes));
    Decimal::from(head)
        .checked_div(Decimal::from_i128_with_scale(TWO_POW_64, 0))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_are_reproducible_and_in_range() {
        let a = stable_uniform(42, "EMP_000001", 2025, "termination");
        let b = stable_uniform(42, "EMP_000001", 2025, "termination");
        assert_eq!(a, b);
        assert!(a >= Decimal::ZERO && a < Decimal::ONE);
    }

    #[test]
    fn every_key_component_changes_the_draw() {
        let base = stable_uniform(42, "EMP_000001", 2025, "termination");
        assert_ne!(base, stable_uniform(43, "EMP_000001", 2025, "termination"));
        assert_ne!(base, stable_uniform(42, "EMP_000002", 2025, "termination"));
        assert_ne!(base, stable_uniform(42, "EMP_000001", 2026, "termination"));
        assert_ne!(base, stable_uniform(42, "EMP_000001", 2025, "promotion"));
    }

    #[test]
    fn draws_spread_across_the_unit_interval() {
        let below_half = (0..1_000)
            .filter(|i| stable_uniform(7, &format!("E{i}"), 2025, "spread") < Decimal::new(5, 1))
            .count();
        assert!((400..600).contains(&below_half));
    }
}
