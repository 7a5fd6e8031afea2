use std::io::{BufRead, Write};
use serde_json::{Map, Value};

use crate::errors::AssetIntelError;
use crate::models::AssetRow;
use crate::normalize::coerce;

pub fn write<W: Write>(mut writer: W, rows: &[AssetRow]) -> Result<(), AssetIntelError> {
    serde_json::to_writer_pretty(&mut writer, rows)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn write_lines<W: Write>(mut writer: W, rows: &[AssetRow]) -> Result<(), AssetIntelError> {
    for row in rows {
        serde_json::to_writer(&mut writer, row)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Accepts either a row array (`[{...}, ...]`) or a column object
/// (`{"id": [...], "hostname": [...], ...}`).
pub fn read(content: &str) -> Result<Vec<AssetRow>, AssetIntelError> {
    match serde_json::from_str::<Value>(content)? {
        Value::Array(items) => items
            .into_iter()
            .map(row_from_value)
            .collect(),
        Value::Object(columns) => rows_from_columns(columns),
        _ => Err(AssetIntelError::Internal("expected a row array or a column object".into())),
    }
}

pub fn read_lines<R: BufRead>(reader: R) -> Result<Vec<AssetRow>, AssetIntelError> {
    let mut rows = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        rows.push(row_from_value(serde_json::from_str(&line)?)?);
    }
    Ok(rows)
}

fn rows_from_columns(columns: Map<String, Value>) -> Result<Vec<AssetRow>, AssetIntelError> {
    let len = match columns.get("id") {
        Some(Value::Array(ids)) => ids.len(),
        _ => return Err(AssetIntelError::Internal("column object has no 'id' array".into())),
    };

    let mut records = vec![Map::new(); len];
    for (name, column) in columns {
        let Value::Array(values) = column else {
            return Err(AssetIntelError::Internal(format!("column '{}' is not an array", name)));
        };
        if values.len() != len {
            return Err(AssetIntelError::Internal(format!(
                "column '{}' has {} entries, expected {}",
                name,
                values.len(),
                len
            )));
        }
        for (record, value) in records.iter_mut().zip(values) {
            record.insert(name.clone(), value);
        }
    }

    records
        .into_iter()
        .map(|record| row_from_value(Value::Object(record)))
        .collect()
}

/// Deserialize one row, nulling scores that fall outside their domain
/// instead of failing the whole store.
fn row_from_value(mut item: Value) -> Result<AssetRow, AssetIntelError> {
    if let Value::Object(record) = &mut item {
        let exposure = coerce::exposure_score(record.get("exposure_score"));
        let acr = coerce::acr_score(record.get("acr_score"));
        record.insert("exposure_score".into(), exposure.map(Value::from).unwrap_or(Value::Null));
        record.insert("acr_score".into(), acr.map(Value::from).unwrap_or(Value::Null));
    }
    Ok(serde_json::from_value(item)?)
}
