use serde_json::Value;

/// Headline figure of each calculator, in lookup order.
const HEADLINE_KEYS: [&str; 8] = [
    "monthly_payment",
    "future_value",
    "max_home_price",
    "net_pay",
    "per_person_total",
    "international_age",
    "bmi_rounded",
    "result",
];

/// Print just the headline answer.
pub fn print_minimal(value: &Value) {
    println!("{}", headline(value));
}

/// Known headline key first, then the first field of the result.
fn headline(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // Schedules: the last row carries the closing balance.
    let result_obj = match result_obj {
        Value::Array(rows) => rows.last().unwrap_or(result_obj),
        other => other,
    };

    if let Value::Object(map) = result_obj {
        if let Some(val) = HEADLINE_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find(|val| !val.is_null())
        {
            return format_minimal(val);
        }
        if let Some(val) = map.get("ending_balance") {
            return format_minimal(val);
        }
        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_minimal(val));
        }
    }

    format_minimal(result_obj)
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_headline_prefers_calculator_answer() {
        let loan = json!({"result": {"monthly_rate": "0.00375", "monthly_payment": "316324.69"}});
        assert_eq!(headline(&loan), "316324.69");
    }

    #[test]
    fn test_headline_of_schedule_is_last_balance() {
        let schedule = json!({"result": [{"year": 1, "ending_balance": "10"}, {"year": 2, "ending_balance": "0"}]});
        assert_eq!(headline(&schedule), "0");
    }

    #[test]
    fn test_headline_falls_back_to_first_field() {
        let table = json!({"jurisdiction": "KR", "basis": "monthly"});
        let line = headline(&table);
        assert!(line.ends_with(": KR") || line.ends_with(": monthly"), "{line}");
    }
}
