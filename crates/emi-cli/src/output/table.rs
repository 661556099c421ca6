use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{format_scalar, split_rows, ROW_COLUMNS};

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => print_result_table(result, map),
            _ => print_fields(map.iter().collect()),
        },
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Map<String, Value>, envelope: &Map<String, Value>) {
    let (scalars, rows) = split_rows(result);

    if let Some(rows) = rows {
        print_schedule(rows);
        println!();
    }
    print_fields(scalars);

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_fields(fields: Vec<(&String, &Value)>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in fields {
        builder.push_record([key.as_str(), &format_scalar(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_schedule(rows: &[Value]) {
    if rows.is_empty() {
        println!("(no payments)");
        return;
    }

    let mut builder = Builder::default();
    builder.push_record(ROW_COLUMNS.iter().map(|(_, title)| *title));
    for row in rows.iter().filter_map(Value::as_object) {
        builder.push_record(
            ROW_COLUMNS
                .iter()
                .map(|(key, _)| row.get(*key).map(format_scalar).unwrap_or_default()),
        );
    }
    println!("{}", Table::from(builder));
}
