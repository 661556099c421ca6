pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Column order for schedule rows; serde_json maps iterate alphabetically.
pub(crate) const ROW_COLUMNS: [(&str, &str); 5] = [
    ("month", "Month"),
    ("payment", "Payment"),
    ("principal_component", "Principal"),
    ("interest_component", "Interest"),
    ("balance", "Balance"),
];

/// Split a result object into its scalar fields and its schedule rows, if any.
pub(crate) fn split_rows(
    result: &serde_json::Map<String, Value>,
) -> (Vec<(&String, &Value)>, Option<&Vec<Value>>) {
    let scalars = result.iter().filter(|(k, _)| k.as_str() != "rows").collect();
    let rows = result.get("rows").and_then(Value::as_array);
    (scalars, rows)
}

pub(crate) fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_rows_separates_schedule() {
        let result = json!({
            "emi": "340.02",
            "total_paid": "1020.07",
            "rows": [{ "month": 1 }, { "month": 2 }]
        });
        let (scalars, rows) = split_rows(result.as_object().unwrap());
        assert_eq!(scalars.len(), 2);
        assert!(scalars.iter().all(|(k, _)| k.as_str() != "rows"));
        assert_eq!(rows.map(Vec::len), Some(2));
    }

    #[test]
    fn test_format_scalar() {
        assert_eq!(format_scalar(&json!("8791.59")), "8791.59");
        assert_eq!(format_scalar(&json!(12)), "12");
        assert_eq!(format_scalar(&Value::Null), "");
    }
}
