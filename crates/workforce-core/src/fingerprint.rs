//! State fingerprints.
//!
//! A fingerprint is the lowercase hex SHA-256 of canonical JSON. Rows are
//! serialized one by one with sorted keys and the serialized rows are
//! sorted before hashing, so the fingerprint of a table partition does not
//! depend on the order a backend returns rows in.

use serde::Serialize;
use sha2::{Digest, Sha256};
use workforce_db::Row;

/// Fingerprint of any serializable value.
pub fn fingerprint_value<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    // Round-trip through `Value` so map keys come out sorted.
    let canonical = serde_json::to_value(value)?;
    Ok(hex(&Sha256::digest(serde_json::to_vec(&canonical)?)))
}

/// Order-independent fingerprint of a set of rows.
pub fn fingerprint_rows<'a, I>(rows: I) -> Result<String, serde_json::Error>
where
    I: IntoIterator<Item = &'a Row>,
{
    let mut lines = rows
        .into_iter()
        .map(serde_json::to_string)
        .collect::<Result<Vec<_>, _>>()?;
    lines.sort_unstable();
    let mut hasher = Sha256::new();
    for line in &lines {
        hasher.update(line.as_bytes());
        hasher.update(b"\n");
    }
    Ok(hex(&hasher.finalize()))
}

fn hex(bytes: &[u8]) -> String {
    use std::fmt::Write;
    bytes.iter().fold(String::with_capacity(64), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => Row::new(),
        }
    }

    #[test]
    fn row_order_does_not_matter() {
        let a = row(json!({"employee_id": "A", "simulation_year": 2025}));
        let b = row(json!({"employee_id": "B", "simulation_year": 2025}));
        let forward = fingerprint_rows([&a, &b]).unwrap();
        let backward = fingerprint_rows([&b, &a]).unwrap();
        assert_eq!(forward, backward);
        assert_eq!(forward.len(), 64);
    }

    #[test]
    fn content_changes_the_fingerprint() {
        let a = row(json!({"employee_id": "A", "level": 1}));
        let b = row(json!({"employee_id": "A", "level": 2}));
        assert_ne!(fingerprint_rows([&a]).unwrap(), fingerprint_rows([&b]).unwrap());
    }

    #[test]
    fn empty_input_is_the_empty_digest() {
        let empty: [&Row; 0] = [];
        assert_eq!(
            fingerprint_rows(empty).unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
