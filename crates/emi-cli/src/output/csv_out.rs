use serde_json::Value;
use std::io;

use super::{format_scalar, split_rows, ROW_COLUMNS};

/// Write output as CSV to stdout.
///
/// Schedules print one record per month; plain results print field/value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    write_csv(&mut wtr, value);
    let _ = wtr.flush();
}

fn write_csv<W: io::Write>(wtr: &mut csv::Writer<W>, value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => match split_rows(map) {
            (_, Some(rows)) => write_array_csv(wtr, rows),
            (scalars, None) => {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in scalars {
                    let _ = wtr.write_record([key.as_str(), &format_scalar(val)]);
                }
            }
        },
        Value::Array(arr) => write_array_csv(wtr, arr),
        _ => {
            let _ = wtr.write_record([&format_scalar(result)]);
        }
    }
}

fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([&format_scalar(item)]);
        }
        return;
    };

    let headers: Vec<&str> = if ROW_COLUMNS.iter().all(|(key, _)| first.contains_key(*key)) {
        ROW_COLUMNS.iter().map(|(key, _)| *key).collect()
    } else {
        first.keys().map(String::as_str).collect()
    };
    let _ = wtr.write_record(&headers);

    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_scalar).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: &Value) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_csv(&mut wtr, value);
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_schedule_rows_keep_column_order() {
        let out = render(&json!({
            "result": {
                "emi": "340.02",
                "rows": [{
                    "balance": "669.98",
                    "interest_component": "10.00",
                    "month": 1,
                    "payment": "340.02",
                    "principal_component": "330.02"
                }]
            }
        }));
        let mut lines = out.lines();
        assert_eq!(
            lines.next(),
            Some("month,payment,principal_component,interest_component,balance")
        );
        assert_eq!(lines.next(), Some("1,340.02,330.02,10.00,669.98"));
    }

    #[test]
    fn test_other_arrays_use_their_own_keys() {
        let out = render(&json!([{ "b": 2, "a": 1 }]));
        assert_eq!(out.lines().next(), Some("a,b"));
    }

    #[test]
    fn test_scalar_result_prints_field_value_pairs() {
        let out = render(&json!({ "result": { "emi": "8791.59" } }));
        assert_eq!(out, "field,value\nemi,8791.59\n");
    }
}
