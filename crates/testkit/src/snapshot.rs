//! Canonical JSON reports and golden-file snapshots.
//!
//! Reports are serialized as pretty JSON with object keys sorted, so two runs
//! with the same inputs produce byte-identical files.
//!
//! Snapshot assertions compare against the file on disk. To update goldens,
//! rerun with `TILECRAFT_UPDATE_SNAPSHOTS=1`.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Environment variable that enables snapshot updates.
pub const UPDATE_SNAPSHOTS_ENV: &str = "TILECRAFT_UPDATE_SNAPSHOTS";

/// Assert that `value` matches the JSON snapshot stored at `path`.
///
/// If `TILECRAFT_UPDATE_SNAPSHOTS=1` is set, the snapshot file is
/// written/overwritten with the current value instead.
pub fn assert_json_snapshot<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<()> {
    let path = path.as_ref();
    let actual = canonical_json(value)?;

    if should_update_snapshots() {
        write_text(path, &actual)?;
        return Ok(());
    }

    let expected = fs::read_to_string(path).with_context(|| {
        format!(
            "Snapshot missing at {} (run with {}=1 to create/update)",
            path.display(),
            UPDATE_SNAPSHOTS_ENV
        )
    })?;

    if expected != actual {
        anyhow::bail!(
            "Snapshot mismatch at {} (run with {}=1 to update)",
            path.display(),
            UPDATE_SNAPSHOTS_ENV
        );
    }

    Ok(())
}

/// Write `value` to `path` as canonical JSON, creating parent dirs if needed.
pub fn write_json_report<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<()> {
    write_text(path.as_ref(), &canonical_json(value)?)
}

/// Serialize `value` as pretty JSON with sorted object keys and a trailing newline.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String> {
    let value = serde_json::to_value(value).context("Failed to serialize report value")?;
    let value = canonicalize_value(value);
    let mut s = serde_json::to_string_pretty(&value).context("Failed to format report JSON")?;
    s.push('\n');
    Ok(s)
}

fn should_update_snapshots() -> bool {
    matches!(
        std::env::var(UPDATE_SNAPSHOTS_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE") | Ok("yes") | Ok("YES")
    )
}

fn write_text(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

fn canonicalize_value(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut out = serde_json::Map::with_capacity(entries.len());
            for (k, v) in entries {
                out.insert(k, canonicalize_value(v));
            }
            Value::Object(out)
        }
        Value::Array(values) => Value::Array(values.into_iter().map(canonicalize_value).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keys_are_sorted_at_every_level() {
        let text = canonical_json(&json!({ "b": 1, "a": { "z": true, "m": [ { "y": 0, "x": 1 } ] } }))
            .unwrap();
        let a = text.find("\"a\"").unwrap();
        let b = text.find("\"b\"").unwrap();
        let m = text.find("\"m\"").unwrap();
        let z = text.find("\"z\"").unwrap();
        let x = text.find("\"x\"").unwrap();
        let y = text.find("\"y\"").unwrap();
        assert!(a < b && m < z && x < y);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn written_report_matches_its_snapshot() {
        let path = std::env::temp_dir()
            .join(format!("tilecraft-report-{}", std::process::id()))
            .join("report.json");
        let report = json!({ "ticks": 3, "health": 100 });
        write_json_report(&path, &report).unwrap();
        assert_json_snapshot(&path, &report).unwrap();
        assert!(assert_json_snapshot(&path, &json!({ "ticks": 4 })).is_err() || should_update_snapshots());
    }
}
