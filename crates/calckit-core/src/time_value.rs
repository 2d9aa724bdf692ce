use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::CalcError;
use crate::types::{CheckedArith, Money, Rate};
use crate::CalcResult;

/// Compound growth factor (1 + r)^periods.
///
/// Whole-number exponents are evaluated by repeated squaring so the
/// common cases (months, quarters, days) stay exact to 28 digits;
/// fractional exponents fall back to `powd`.
pub fn growth_factor(rate_per_period: Rate, periods: Decimal) -> CalcResult<Decimal> {
    let base = Decimal::ONE.add_checked(rate_per_period, "rate")?;
    if base <= Decimal::ZERO {
        return Err(CalcError::InvalidInput {
            field: "rate".into(),
            reason: "Periodic rate must be greater than -100%".into(),
        });
    }
    if periods < Decimal::ZERO {
        return Err(CalcError::InvalidInput {
            field: "periods".into(),
            reason: "Number of periods cannot be negative".into(),
        });
    }

    let factor = if periods.fract().is_zero() {
        periods.to_u64().and_then(|n| base.checked_powu(n))
    } else {
        base.checked_powd(periods)
    };

    factor.ok_or_else(|| CalcError::InvalidInput {
        field: "periods".into(),
        reason: format!("Growth factor overflows for {periods} periods"),
    })
}

/// Level payment that fully amortises `principal` over `periods`:
/// P * r(1+r)^n / ((1+r)^n - 1), or P / n when the rate is zero.
pub fn amortizing_payment(principal: Money, rate_per_period: Rate, periods: u32) -> CalcResult<Money> {
    if periods == 0 {
        return Err(CalcError::InvalidInput {
            field: "periods".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if rate_per_period.is_zero() {
        return principal.div_checked(Decimal::from(periods), "principal");
    }

    let factor = growth_factor(rate_per_period, Decimal::from(periods))?;
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Err(CalcError::DivisionByZero {
            context: "amortizing payment denominator".into(),
        });
    }

    // Divide before multiplying by the (possibly huge) growth factor.
    principal
        .mul_checked(rate_per_period, "principal")?
        .mul_checked(factor.div_checked(denominator, "periods")?, "principal")
}

/// Principal that a level `payment` can service over `periods`:
/// PMT * ((1+r)^n - 1) / (r(1+r)^n), or PMT * n when the rate is zero.
pub fn annuity_present_value(payment: Money, rate_per_period: Rate, periods: u32) -> CalcResult<Money> {
    if rate_per_period.is_zero() {
        return payment.mul_checked(Decimal::from(periods), "payment");
    }

    let factor = growth_factor(rate_per_period, Decimal::from(periods))?;
    let denominator = rate_per_period.mul_checked(factor, "rate")?;
    if denominator.is_zero() {
        return Err(CalcError::DivisionByZero {
            context: "annuity present value denominator".into(),
        });
    }

    let annuity_factor = (factor - Decimal::ONE).div_checked(denominator, "rate")?;
    payment.mul_checked(annuity_factor, "payment")
}

/// Future value of an ordinary annuity: PMT * ((1+r)^n - 1) / r.
pub fn annuity_future_value(payment: Money, rate_per_period: Rate, periods: Decimal) -> CalcResult<Money> {
    if rate_per_period.is_zero() {
        return payment.mul_checked(periods, "payment");
    }

    let factor = growth_factor(rate_per_period, periods)?;
    let annuity_factor = (factor - Decimal::ONE).div_checked(rate_per_period, "rate")?;
    payment.mul_checked(annuity_factor, "payment")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_growth_factor_whole_periods() {
        assert_eq!(growth_factor(dec!(0.1), dec!(2)).unwrap(), dec!(1.21));
        assert_eq!(growth_factor(dec!(0.05), Decimal::ZERO).unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_growth_factor_fractional_periods() {
        // 1.21^0.5 = 1.1
        let f = growth_factor(dec!(0.21), dec!(0.5)).unwrap();
        assert!((f - dec!(1.1)).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_growth_factor_rejects_total_loss_rate() {
        assert!(growth_factor(dec!(-1), dec!(3)).is_err());
    }

    #[test]
    fn test_amortizing_payment_basic() {
        // 100k over 360 months at 0.5%/month ≈ 599.55
        let pmt = amortizing_payment(dec!(100_000), dec!(0.005), 360).unwrap();
        assert!((pmt - dec!(599.55)).abs() < dec!(0.01));
    }

    #[test]
    fn test_amortizing_payment_zero_rate() {
        let pmt = amortizing_payment(dec!(1200), Decimal::ZERO, 12).unwrap();
        assert_eq!(pmt, dec!(100));
    }

    #[test]
    fn test_amortizing_payment_zero_periods() {
        assert!(amortizing_payment(dec!(1000), dec!(0.01), 0).is_err());
    }

    #[test]
    fn test_present_value_inverts_payment() {
        let pmt = amortizing_payment(dec!(250_000), dec!(0.004), 300).unwrap();
        let pv = annuity_present_value(pmt, dec!(0.004), 300).unwrap();
        assert!((pv - dec!(250_000)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_annuity_future_value() {
        // 100/period for 3 periods at 10%: 100 + 110 + 121 = 331
        let fv = annuity_future_value(dec!(100), dec!(0.1), dec!(3)).unwrap();
        assert_eq!(fv, dec!(331));
    }

    #[test]
    fn test_huge_values_are_errors() {
        assert!(growth_factor(Decimal::MAX, Decimal::ONE).is_err());
        assert!(growth_factor(dec!(1), dec!(200)).is_err());
        assert!(amortizing_payment(Decimal::MAX, dec!(2), 12).is_err());
        assert!(annuity_present_value(Decimal::MAX, Decimal::ZERO, 360).is_err());
        assert!(annuity_future_value(Decimal::MAX, dec!(0.01), dec!(120)).is_err());
    }
}
