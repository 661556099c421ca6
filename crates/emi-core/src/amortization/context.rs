//! Fixed-significance decimal arithmetic for the amortization walk.
//!
//! Every intermediate result is rounded to a fixed number of significant
//! digits (ties to even), independent of where the decimal point falls. A
//! repeating monthly rate such as `19.6 / 1200` therefore keeps the same
//! number of digits as any other value, and products like `balance × rate`
//! land on the same side of a half-cent tie wherever the magnitude sits.

use bigdecimal::{BigDecimal, RoundingMode, Zero};
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;

use crate::{types::Money, EmiError, EmiResult};

/// Working precision and currency quantization for a calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precision {
    /// Significant digits kept by every arithmetic step
    pub significant_digits: u64,
    /// Decimal places of every currency amount
    pub decimal_places: i64,
    /// Tie-breaking used when quantizing currency
    pub rounding: RoundingMode,
}

impl Precision {
    /// 28 significant digits; cents, ties rounded away from zero (round-half-up).
    pub const CURRENCY: Precision = Precision {
        significant_digits: 28,
        decimal_places: 2,
        rounding: RoundingMode::HalfUp,
    };

    /// Round to the working precision.
    pub fn round(&self, value: BigDecimal) -> BigDecimal {
        let limit = self.significant_digits.max(1);
        let digits = value.digits();
        if digits <= limit {
            return value;
        }
        let (_, scale) = value.as_bigint_and_exponent();
        let excess = (digits - limit) as i64;
        value.with_scale_round(scale - excess, RoundingMode::HalfEven)
    }

    pub fn add(&self, a: &BigDecimal, b: &BigDecimal) -> BigDecimal {
        self.round(a + b)
    }

    pub fn sub(&self, a: &BigDecimal, b: &BigDecimal) -> BigDecimal {
        self.round(a - b)
    }

    pub fn mul(&self, a: &BigDecimal, b: &BigDecimal) -> BigDecimal {
        self.round(a * b)
    }

    pub fn div(&self, a: &BigDecimal, b: &BigDecimal, context: &str) -> EmiResult<BigDecimal> {
        if b.is_zero() {
            return Err(EmiError::DivisionByZero {
                context: context.to_string(),
            });
        }
        Ok(self.round(a / b))
    }

    /// `base^exp` by binary exponentiation carried at extra precision, then
    /// rounded once to the working precision.
    pub fn powu(&self, base: &BigDecimal, exp: u64) -> BigDecimal {
        let exp_digits = exp.checked_ilog10().map_or(1, |d| u64::from(d) + 1);
        let work = Precision {
            significant_digits: self.significant_digits + exp_digits + 2,
            ..*self
        };

        let mut result = BigDecimal::from(1u32);
        let mut square = base.clone();
        let mut n = exp;
        while n > 0 {
            if n & 1 == 1 {
                result = work.mul(&result, &square);
            }
            n >>= 1;
            if n > 0 {
                square = work.mul(&square, &square);
            }
        }
        self.round(result)
    }

    /// Quantize a currency amount to `decimal_places` using `rounding`.
    pub fn quantize(&self, value: &BigDecimal) -> BigDecimal {
        value.with_scale_round(self.decimal_places, self.rounding)
    }

    /// Zero carrying the currency scale, so it renders as `0.00`.
    pub fn zero_money(&self) -> Money {
        Decimal::new(0, self.decimal_places.clamp(0, 28) as u32)
    }
}

impl Default for Precision {
    fn default() -> Self {
        Precision::CURRENCY
    }
}

pub fn to_big(value: Decimal) -> BigDecimal {
    BigDecimal::new(BigInt::from(value.mantissa()), i64::from(value.scale()))
}

/// Convert a quantized amount back into `Money`.
pub fn to_money(value: &BigDecimal) -> EmiResult<Money> {
    let (mantissa, scale) = value.as_bigint_and_exponent();
    let (mantissa, scale) = if scale < 0 {
        let shift = u32::try_from(-scale).map_err(|_| EmiError::overflow("currency conversion"))?;
        (mantissa * BigInt::from(10u32).pow(shift), 0)
    } else {
        (mantissa, scale)
    };

    let mantissa = mantissa
        .to_i128()
        .ok_or_else(|| EmiError::overflow("currency conversion"))?;
    let scale = u32::try_from(scale).map_err(|_| EmiError::overflow("currency conversion"))?;
    Decimal::try_from_i128_with_scale(mantissa, scale)
        .map_err(|_| EmiError::overflow("currency conversion"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    fn big(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_round_keeps_significant_digits() {
        let p = Precision::CURRENCY;
        let third = p.div(&big("1"), &big("3"), "test").unwrap();
        assert_eq!(third, big("0.3333333333333333333333333333"));
        assert_eq!(third.digits(), 28);

        let small = p.div(&big("0.01"), &big("3"), "test").unwrap();
        assert_eq!(small, big("0.003333333333333333333333333333"));
    }

    #[test]
    fn test_repeating_rate_product_reaches_half_cent() {
        // 105 × 19.6% / 12 is exactly 1.715; the stored rate is a hair short
        // of 19.6 / 1200, and rounding the product back to 28 digits restores
        // the tie so it quantizes up.
        let p = Precision::CURRENCY;
        let monthly = p.div(&big("19.6"), &big("12"), "test").unwrap();
        let rate = p.div(&monthly, &big("100"), "test").unwrap();
        assert!(rate < big("19.6") / big("1200"));

        let interest = p.mul(&big("105"), &rate);
        assert_eq!(interest, big("1.715"));
        assert_eq!(p.quantize(&interest), big("1.72"));
    }

    #[test]
    fn test_quantize_half_up() {
        let p = Precision::CURRENCY;
        assert_eq!(p.quantize(&big("2.345")), big("2.35"));
        assert_eq!(p.quantize(&big("-2.345")), big("-2.35"));
        assert_eq!(p.quantize(&big("2.344999")), big("2.34"));
    }

    #[test]
    fn test_powu() {
        let p = Precision::CURRENCY;
        assert_eq!(p.powu(&big("1.1"), 3), big("1.331"));
        assert_eq!(p.powu(&big("2"), 0), big("1"));
        assert_eq!(p.powu(&big("1.01"), 12), big("1.126825030131969720661201"));
    }

    #[test]
    fn test_division_by_zero() {
        let err = Precision::CURRENCY
            .div(&big("1"), &big("0"), "annuity factor")
            .unwrap_err();
        assert!(matches!(err, EmiError::DivisionByZero { .. }));
    }

    #[test]
    fn test_money_conversion() {
        let p = Precision::CURRENCY;
        let amount = to_money(&p.quantize(&to_big(dec!(8791.588723)))).unwrap();
        assert_eq!(amount.to_string(), "8791.59");
        assert_eq!(to_money(&big("1.2E+3")).unwrap(), dec!(1200));
        assert_eq!(p.zero_money().to_string(), "0.00");
    }
}
