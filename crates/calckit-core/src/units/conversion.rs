//! Length, weight and temperature conversion.
//!
//! Length and weight are linear: every unit has an exact size in a
//! canonical unit (centimetres, grams) and a conversion goes through it.
//! Temperature scales are affine, so they pivot through Celsius with
//! explicit formulas instead of a rate table.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use crate::error::CalcError;
use crate::types::{with_metadata, CheckedArith, ComputationOutput};
use crate::CalcResult;

const ABSOLUTE_ZERO_C: Decimal = dec!(-273.15);

// ---------------------------------------------------------------------------
// Units
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitCategory {
    Length,
    Weight,
    Temperature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Millimeter,
    Centimeter,
    Meter,
    Kilometer,
    Inch,
    Foot,
    Yard,
    Mile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightUnit {
    Gram,
    Kilogram,
    Ounce,
    Pound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
    Kelvin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Length(LengthUnit),
    Weight(WeightUnit),
    Temperature(TemperatureUnit),
}

impl LengthUnit {
    /// Exact size of one unit in centimetres.
    pub fn centimeters(self) -> Decimal {
        match self {
            LengthUnit::Millimeter => dec!(0.1),
            LengthUnit::Centimeter => Decimal::ONE,
            LengthUnit::Meter => dec!(100),
            LengthUnit::Kilometer => dec!(100_000),
            LengthUnit::Inch => dec!(2.54),
            LengthUnit::Foot => dec!(30.48),
            LengthUnit::Yard => dec!(91.44),
            LengthUnit::Mile => dec!(160_934.4),
        }
    }
}

impl WeightUnit {
    /// Exact size of one unit in grams (international avoirdupois).
    pub fn grams(self) -> Decimal {
        match self {
            WeightUnit::Gram => Decimal::ONE,
            WeightUnit::Kilogram => dec!(1000),
            WeightUnit::Ounce => dec!(28.349523125),
            WeightUnit::Pound => dec!(453.59237),
        }
    }
}

impl TemperatureUnit {
    pub fn to_celsius(self, value: Decimal) -> CalcResult<Decimal> {
        match self {
            TemperatureUnit::Celsius => Ok(value),
            TemperatureUnit::Fahrenheit => value
                .sub_checked(dec!(32), "value")?
                .mul_checked(dec!(5), "value")?
                .div_checked(dec!(9), "value"),
            TemperatureUnit::Kelvin => value.add_checked(ABSOLUTE_ZERO_C, "value"),
        }
    }

    pub fn from_celsius(self, celsius: Decimal) -> CalcResult<Decimal> {
        match self {
            TemperatureUnit::Celsius => Ok(celsius),
            TemperatureUnit::Fahrenheit => celsius
                .mul_checked(dec!(9), "value")?
                .div_checked(dec!(5), "value")?
                .add_checked(dec!(32), "value"),
            TemperatureUnit::Kelvin => celsius.sub_checked(ABSOLUTE_ZERO_C, "value"),
        }
    }
}

impl Unit {
    pub fn category(self) -> UnitCategory {
        match self {
            Unit::Length(_) => UnitCategory::Length,
            Unit::Weight(_) => UnitCategory::Weight,
            Unit::Temperature(_) => UnitCategory::Temperature,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Length(LengthUnit::Millimeter) => "mm",
            Unit::Length(LengthUnit::Centimeter) => "cm",
            Unit::Length(LengthUnit::Meter) => "m",
            Unit::Length(LengthUnit::Kilometer) => "km",
            Unit::Length(LengthUnit::Inch) => "in",
            Unit::Length(LengthUnit::Foot) => "ft",
            Unit::Length(LengthUnit::Yard) => "yd",
            Unit::Length(LengthUnit::Mile) => "mi",
            Unit::Weight(WeightUnit::Gram) => "g",
            Unit::Weight(WeightUnit::Kilogram) => "kg",
            Unit::Weight(WeightUnit::Ounce) => "oz",
            Unit::Weight(WeightUnit::Pound) => "lb",
            Unit::Temperature(TemperatureUnit::Celsius) => "°C",
            Unit::Temperature(TemperatureUnit::Fahrenheit) => "°F",
            Unit::Temperature(TemperatureUnit::Kelvin) => "K",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Unit {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unit = match s.trim().to_ascii_lowercase().as_str() {
            "mm" | "millimeter" | "millimeters" | "millimetre" => Unit::Length(LengthUnit::Millimeter),
            "cm" | "centimeter" | "centimeters" | "centimetre" => Unit::Length(LengthUnit::Centimeter),
            "m" | "meter" | "meters" | "metre" => Unit::Length(LengthUnit::Meter),
            "km" | "kilometer" | "kilometers" | "kilometre" => Unit::Length(LengthUnit::Kilometer),
            "in" | "inch" | "inches" => Unit::Length(LengthUnit::Inch),
            "ft" | "foot" | "feet" => Unit::Length(LengthUnit::Foot),
            "yd" | "yard" | "yards" => Unit::Length(LengthUnit::Yard),
            "mi" | "mile" | "miles" => Unit::Length(LengthUnit::Mile),
            "g" | "gram" | "grams" => Unit::Weight(WeightUnit::Gram),
            "kg" | "kilogram" | "kilograms" => Unit::Weight(WeightUnit::Kilogram),
            "oz" | "ounce" | "ounces" => Unit::Weight(WeightUnit::Ounce),
            "lb" | "lbs" | "pound" | "pounds" => Unit::Weight(WeightUnit::Pound),
            "c" | "°c" | "celsius" => Unit::Temperature(TemperatureUnit::Celsius),
            "f" | "°f" | "fahrenheit" => Unit::Temperature(TemperatureUnit::Fahrenheit),
            "k" | "kelvin" => Unit::Temperature(TemperatureUnit::Kelvin),
            other => {
                return Err(CalcError::InvalidInput {
                    field: "unit".into(),
                    reason: format!("Unknown unit '{other}'"),
                })
            }
        };
        Ok(unit)
    }
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

/// Convert between two units of the same category.
pub fn convert_value(value: Decimal, from: Unit, to: Unit) -> CalcResult<Decimal> {
    match (from, to) {
        (Unit::Length(f), Unit::Length(t)) => value
            .mul_checked(f.centimeters(), "value")?
            .div_checked(t.centimeters(), "value"),
        (Unit::Weight(f), Unit::Weight(t)) => value
            .mul_checked(f.grams(), "value")?
            .div_checked(t.grams(), "value"),
        (Unit::Temperature(f), Unit::Temperature(t)) => {
            let celsius = f.to_celsius(value)?;
            if celsius < ABSOLUTE_ZERO_C {
                return Err(CalcError::InvalidInput {
                    field: "value".into(),
                    reason: format!("{value} {from} is below absolute zero"),
                });
            }
            t.from_celsius(celsius)
        }
        _ => Err(CalcError::InvalidInput {
            field: "to".into(),
            reason: format!("Cannot convert {from} to {to}: different quantities"),
        }),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionInput {
    pub category: UnitCategory,
    pub from: String,
    pub to: String,
    pub value: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    pub category: UnitCategory,
    pub from: String,
    pub to: String,
    pub value: Decimal,
    pub result: Decimal,
    pub explanation: String,
}

/// Resolve the named units within `category` and convert `value`.
pub fn convert_units(input: &ConversionInput) -> CalcResult<ComputationOutput<ConversionOutput>> {
    let start = Instant::now();
    let from = resolve(&input.from, input.category, "from")?;
    let to = resolve(&input.to, input.category, "to")?;

    tracing::debug!(value = %input.value, %from, %to, "converting units");

    let result = convert_value(input.value, from, to)?;

    let methodology = match input.category {
        UnitCategory::Temperature => "Affine conversion via Celsius",
        UnitCategory::Length => "Linear conversion via centimetres",
        UnitCategory::Weight => "Linear conversion via grams",
    };

    let output = ConversionOutput {
        category: input.category,
        from: from.symbol().to_string(),
        to: to.symbol().to_string(),
        value: input.value,
        result,
        explanation: format!(
            "{} {} = {} {}",
            input.value.normalize(),
            from,
            result.round_dp(6).normalize(),
            to
        ),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, input, Vec::new(), elapsed, output))
}

fn resolve(name: &str, category: UnitCategory, field: &str) -> CalcResult<Unit> {
    let unit: Unit = name.parse().map_err(|_| CalcError::InvalidInput {
        field: field.into(),
        reason: format!("Unknown unit '{name}'"),
    })?;
    if unit.category() != category {
        return Err(CalcError::InvalidInput {
            field: field.into(),
            reason: format!("'{name}' is not a {category:?} unit").to_lowercase(),
        });
    }
    Ok(unit)
}
