use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a loan request file as a generic serde_json::Value.
///
/// Requests keep their wire shape (`loan_amount`, `interest_rate`,
/// `loan_tenure`) so the same files can be posted to the server.
pub fn read_json_value(path: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let value: Value = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
    Ok(value)
}

fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.is_file() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    Ok(canonical)
}
