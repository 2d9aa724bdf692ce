mod envelope;

use chrono::NaiveDate;
use napi::Result as NapiResult;
use napi_derive::napi;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use calckit_core::dates::age::{calculate_age, calculate_age_today, AgeInput};
use calckit_core::health::bmi::{compute_bmi, BmiInput};
use calckit_core::loan::payment::{compute_loan_payment, LoanInput};
use calckit_core::loan::schedule;
use calckit_core::percent::operations::{compute_percent, PercentInput};
use calckit_core::percent::tip::{split_bill as split, TipInput};
use calckit_core::savings::compound::{compute_compound_growth, CompoundInput};
use calckit_core::units::conversion::{convert_units as convert, ConversionInput};
use calckit_core::{CalcResult, ComputationOutput};
use envelope::{affordability_for_locale, envelope, net_pay_for_locale};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn respond<I, O, F>(input_json: &str, calculate: F) -> NapiResult<String>
where
    I: DeserializeOwned,
    O: Serialize,
    F: FnOnce(I) -> CalcResult<ComputationOutput<O>>,
{
    serde_json::to_string(&envelope(input_json, calculate)).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Loans and savings
// ---------------------------------------------------------------------------

#[napi]
pub fn loan_payment(input_json: String) -> NapiResult<String> {
    respond(&input_json, |input: LoanInput| compute_loan_payment(&input))
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    respond(&input_json, |input: LoanInput| schedule::amortization_schedule(&input))
}

#[napi]
pub fn compound_growth(input_json: String) -> NapiResult<String> {
    respond(&input_json, |input: CompoundInput| compute_compound_growth(&input))
}

// ---------------------------------------------------------------------------
// Housing and payroll
// ---------------------------------------------------------------------------

/// `max_dti_ratio` may be omitted in favour of `locale`.
#[napi]
pub fn affordability(input_json: String) -> NapiResult<String> {
    respond(&input_json, affordability_for_locale)
}

/// `jurisdiction` may be omitted in favour of `locale`.
#[napi]
pub fn net_pay(input_json: String) -> NapiResult<String> {
    respond(&input_json, net_pay_for_locale)
}

// ---------------------------------------------------------------------------
// Everyday calculators
// ---------------------------------------------------------------------------

#[napi]
pub fn percent(input_json: String) -> NapiResult<String> {
    respond(&input_json, |input: PercentInput| compute_percent(&input))
}

#[napi]
pub fn split_bill(input_json: String) -> NapiResult<String> {
    respond(&input_json, |input: TipInput| split(&input))
}

#[napi]
pub fn convert_units(input_json: String) -> NapiResult<String> {
    respond(&input_json, |input: ConversionInput| convert(&input))
}

#[derive(Deserialize)]
struct AgeRequest {
    #[serde(flatten)]
    birth: AgeInput,
    /// Reference date; the host's local date when absent.
    #[serde(default)]
    as_of: Option<NaiveDate>,
}

#[napi]
pub fn age(input_json: String) -> NapiResult<String> {
    respond(&input_json, |request: AgeRequest| match request.as_of {
        Some(today) => calculate_age(&request.birth, today),
        None => calculate_age_today(&request.birth),
    })
}

#[napi]
pub fn bmi(input_json: String) -> NapiResult<String> {
    respond(&input_json, |input: BmiInput| compute_bmi(&input))
}
