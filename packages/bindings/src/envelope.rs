use calckit_core::housing::affordability::{compute_affordability, AffordabilityInput, AffordabilityOutput};
use calckit_core::payroll::net_pay::{compute_net_pay, PayrollInput, PayrollOutput};
use calckit_core::{CalcError, CalcResult, ComputationOutput, ErrorReport, Locale};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

/// Run a calculator on a JSON request and wrap the outcome as
/// `{"ok":true,"output":..}` or `{"ok":false,"error":ErrorReport}`.
pub fn envelope<I, O, F>(input_json: &str, calculate: F) -> Value
where
    I: DeserializeOwned,
    O: Serialize,
    F: FnOnce(I) -> CalcResult<ComputationOutput<O>>,
{
    let outcome = serde_json::from_str::<I>(input_json)
        .map_err(CalcError::from)
        .and_then(calculate);
    match outcome {
        Ok(output) => json!({ "ok": true, "output": output }),
        Err(e) => json!({ "ok": false, "error": ErrorReport::from(&e) }),
    }
}

/// Affordability where `max_dti_ratio` may be replaced by `locale`.
pub fn affordability_for_locale(request: Value) -> CalcResult<ComputationOutput<AffordabilityOutput>> {
    let request = with_locale_default(request, "max_dti_ratio", |l| json!(l.profile().max_dti_ratio))?;
    let input: AffordabilityInput = serde_json::from_value(request)?;
    compute_affordability(&input)
}

/// Net pay where `jurisdiction` may be replaced by `locale`.
pub fn net_pay_for_locale(request: Value) -> CalcResult<ComputationOutput<PayrollOutput>> {
    let request = with_locale_default(request, "jurisdiction", |l| json!(l.profile().jurisdiction))?;
    let input: PayrollInput = serde_json::from_value(request)?;
    compute_net_pay(&input)
}

/// Fill a missing field from the request's `locale` (default `en`).
/// An explicit field always wins over the locale.
fn with_locale_default(mut request: Value, field: &str, pick: impl Fn(Locale) -> Value) -> CalcResult<Value> {
    if let Value::Object(map) = &mut request {
        let locale = match map.remove("locale") {
            Some(v) => serde_json::from_value::<Locale>(v)?,
            None => Locale::default(),
        };
        map.entry(field).or_insert_with(|| pick(locale));
    }
    Ok(request)
}
