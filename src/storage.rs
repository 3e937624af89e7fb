use crate::models::ValueMap;
use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use serde::Deserialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ValueRow {
    name: String,
    value: f64,
}

/// Save values as CSV with a `name,value` header.
pub fn save_csv<P: AsRef<Path>>(values: &ValueMap, path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.write_record(["name", "value"])?;
    for (name, value) in values.iter() {
        wtr.serialize((name, value))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save values as a pretty JSON object `{ "name": value, ... }`.
pub fn save_json<P: AsRef<Path>>(values: &ValueMap, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(values)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Load a `name,value` CSV. Decimal values are rounded and clamped into `0..=100`.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<ValueMap> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("open {}", path.display()))?;

    let mut out = ValueMap::new();
    for (i, row) in rdr.deserialize::<ValueRow>().enumerate() {
        // +2: header line and 1-based numbering
        let row = row.with_context(|| format!("{} line {}", path.display(), i + 2))?;
        if !(0.0..=100.0).contains(&row.value) {
            log::warn!("value {} for '{}' clamped into 0..=100", row.value, row.name);
        }
        out.insert(row.name, row.value.clamp(0.0, 100.0).round() as u32);
    }
    Ok(out)
}

/// Load a JSON object written by [`save_json`].
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<ValueMap> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let values = serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))?;
    Ok(values)
}
