use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcError;
use crate::types::{with_metadata, CheckedArith, ComputationOutput};
use crate::CalcResult;

const CM_PER_INCH: Decimal = dec!(2.54);
const KG_PER_LB: Decimal = dec!(0.453592);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "system", rename_all = "lowercase")]
pub enum BmiInput {
    Metric {
        height_cm: Decimal,
        weight_kg: Decimal,
    },
    Imperial {
        feet: Decimal,
        #[serde(default)]
        inches: Decimal,
        weight_lb: Decimal,
    },
}

impl BmiInput {
    /// Height in centimetres and weight in kilograms.
    fn metric(&self) -> CalcResult<(Decimal, Decimal)> {
        match *self {
            BmiInput::Metric { height_cm, weight_kg } => Ok((height_cm, weight_kg)),
            BmiInput::Imperial {
                feet,
                inches,
                weight_lb,
            } => {
                let height_cm = feet
                    .mul_checked(dec!(12), "height")?
                    .add_checked(inches, "height")?
                    .mul_checked(CM_PER_INCH, "height")?;
                Ok((height_cm, weight_lb.mul_checked(KG_PER_LB, "weight")?))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn classify(bmi: Decimal) -> Self {
        if bmi < dec!(18.5) {
            BmiCategory::Underweight
        } else if bmi < dec!(25) {
            BmiCategory::Normal
        } else if bmi < dec!(30) {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BmiOutput {
    pub bmi: Decimal,
    pub bmi_rounded: Decimal,
    pub category: BmiCategory,
    pub height_cm: Decimal,
    pub weight_kg: Decimal,
}

/// Body-mass index, weight (kg) over height (m) squared.
pub fn compute_bmi(input: &BmiInput) -> CalcResult<ComputationOutput<BmiOutput>> {
    let start = Instant::now();
    let (height_cm, weight_kg) = input.metric()?;

    if height_cm <= Decimal::ZERO {
        return Err(CalcError::invalid("height", "Height must be positive"));
    }
    if weight_kg <= Decimal::ZERO {
        return Err(CalcError::invalid("weight", "Weight must be positive"));
    }

    tracing::debug!(%height_cm, %weight_kg, "computing BMI");

    let height_m = height_cm / dec!(100);
    let height_sq = height_m.mul_checked(height_m, "height")?;
    // Squares below the decimal's smallest step round to zero.
    if height_sq.is_zero() {
        return Err(CalcError::invalid("height", "Height is too small to calculate with"));
    }
    let bmi = weight_kg.div_checked(height_sq, "weight")?;
    let category = BmiCategory::classify(bmi);

    let mut warnings = Vec::new();
    if !(dec!(50)..=dec!(272)).contains(&height_cm) {
        warnings.push(format!("Height of {} cm is outside the usual adult range", height_cm.round_dp(1)));
    }

    let output = BmiOutput {
        bmi,
        bmi_rounded: bmi.round_dp(1),
        category,
        height_cm,
        weight_kg,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "BMI = kg / m^2, WHO adult categories",
        input,
        warnings,
        elapsed,
        output,
    ))
}
