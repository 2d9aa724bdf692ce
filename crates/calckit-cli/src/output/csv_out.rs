use serde_json::{Map, Value};
use std::io;

/// Write a command's output as CSV on stdout.
pub fn print_csv(value: &Value) {
    let mut wtr = csv::Writer::from_writer(io::stdout().lock());
    let written = records(value)
        .iter()
        .try_for_each(|record| wtr.write_record(record))
        .and_then(|()| wtr.flush().map_err(csv::Error::from));
    if let Err(e) = written {
        tracing::error!(error = %e, "failed to write CSV output");
    }
}

/// Rows for `value`, header first.
///
/// A single result becomes `field,value` pairs. Arrays of `{name, amount}`
/// objects inside it are itemised as `<item>:<name>,<amount>`, one row per
/// line, and warnings follow as `warning,<text>`. A list result (the
/// amortization schedule) becomes one row per element under the keys of
/// the first.
pub fn records(value: &Value) -> Vec<Vec<String>> {
    let Value::Object(envelope) = value else {
        return match value {
            Value::Array(rows) => list_records(rows),
            other => vec![vec![cell(other)]],
        };
    };

    let mut out = match envelope.get("result") {
        Some(Value::Object(result)) => field_records(result),
        Some(Value::Array(rows)) => return list_records(rows),
        _ => field_records(envelope),
    };

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        out.extend(warnings.iter().map(|w| vec!["warning".to_string(), cell(w)]));
    }
    out
}

fn field_records(fields: &Map<String, Value>) -> Vec<Vec<String>> {
    let mut out = vec![vec!["field".to_string(), "value".to_string()]];
    for (key, val) in fields {
        match line_items(val) {
            Some(items) => {
                let label = key.strip_suffix('s').unwrap_or(key);
                out.extend(
                    items
                        .into_iter()
                        .map(|(name, amount)| vec![format!("{label}:{name}"), amount]),
                );
            }
            None => out.push(vec![key.clone(), cell(val)]),
        }
    }
    out
}

/// `(name, amount)` pairs when `value` is a list of named amounts.
fn line_items(value: &Value) -> Option<Vec<(String, String)>> {
    let Value::Array(items) = value else {
        return None;
    };
    items
        .iter()
        .map(|item| {
            let name = item.get("name")?.as_str()?;
            let amount = item.get("amount")?;
            Some((name.to_string(), cell(amount)))
        })
        .collect()
}

fn list_records(rows: &[Value]) -> Vec<Vec<String>> {
    let Some(Value::Object(first)) = rows.first() else {
        return rows.iter().map(|v| vec![cell(v)]).collect();
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut out = vec![headers.clone()];
    out.extend(rows.iter().map(|row| {
        headers
            .iter()
            .map(|h| row.get(h).map(cell).unwrap_or_default())
            .collect()
    }));
    out
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(_) | Value::Bool(_) => value.to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
