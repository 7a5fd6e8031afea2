use std::path::Path;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OpenFlags};
use serde_json::Value;

use crate::errors::AssetIntelError;
use crate::models::AssetRow;
use crate::normalize::coerce;

pub const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS assets (
    position INTEGER PRIMARY KEY,
    id TEXT NOT NULL,
    ipv4 TEXT NOT NULL DEFAULT '[]',
    ipv6 TEXT NOT NULL DEFAULT '[]',
    mac TEXT NOT NULL DEFAULT '[]',
    hostname TEXT NOT NULL DEFAULT '',
    fqdn TEXT NOT NULL DEFAULT '',
    os TEXT NOT NULL DEFAULT '',
    exposure_score REAL,
    acr_score INTEGER,
    tags TEXT NOT NULL DEFAULT '[]',
    first_seen TEXT,
    last_seen TEXT,
    last_scan TEXT
);

CREATE INDEX IF NOT EXISTS idx_assets_id ON assets(id);
CREATE INDEX IF NOT EXISTS idx_assets_exposure ON assets(exposure_score);
";

fn db_err(context: &str) -> impl Fn(rusqlite::Error) -> AssetIntelError + '_ {
    move |e| AssetIntelError::Database(format!("{}: {}", context, e))
}

pub fn write(path: &Path, rows: &[AssetRow]) -> Result<(), AssetIntelError> {
    let mut conn = Connection::open(path).map_err(db_err("Failed to open database"))?;
    conn.execute_batch(CREATE_TABLES).map_err(db_err("Failed to create tables"))?;

    let tx = conn.transaction().map_err(db_err("Failed to begin transaction"))?;
    {
        let mut stmt = tx
            .prepare(
                "INSERT INTO assets (position, id, ipv4, ipv6, mac, hostname, fqdn, os, exposure_score, acr_score, tags, first_seen, last_seen, last_scan) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            )
            .map_err(db_err("Failed to prepare insert"))?;

        for (position, row) in rows.iter().enumerate() {
            stmt.execute(params![
                position as i64,
                row.id,
                serde_json::to_string(&row.ipv4)?,
                serde_json::to_string(&row.ipv6)?,
                serde_json::to_string(&row.mac)?,
                row.hostname,
                row.fqdn,
                row.os,
                row.exposure_score,
                row.acr_score,
                serde_json::to_string(&row.tags)?,
                row.first_seen.map(|t| t.to_rfc3339()),
                row.last_seen.map(|t| t.to_rfc3339()),
                row.last_scan.map(|t| t.to_rfc3339()),
            ])
            .map_err(db_err("Failed to insert asset"))?;
        }
    }
    tx.commit().map_err(db_err("Failed to commit assets"))?;
    Ok(())
}

pub fn read(path: &Path) -> Result<Vec<AssetRow>, AssetIntelError> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .map_err(db_err("Failed to open database"))?;

    let mut stmt = conn
        .prepare(
            "SELECT id, ipv4, ipv6, mac, hostname, fqdn, os, exposure_score, acr_score, tags, first_seen, last_seen, last_scan FROM assets ORDER BY position",
        )
        .map_err(db_err("Query failed"))?;

    let raw_rows = stmt
        .query_map([], |row: &rusqlite::Row| {
            Ok(RawRow {
                id: row.get(0)?,
                ipv4: row.get(1)?,
                ipv6: row.get(2)?,
                mac: row.get(3)?,
                hostname: row.get(4)?,
                fqdn: row.get(5)?,
                os: row.get(6)?,
                exposure_score: row.get(7)?,
                acr_score: row.get(8)?,
                tags: row.get(9)?,
                first_seen: row.get(10)?,
                last_seen: row.get(11)?,
                last_scan: row.get(12)?,
            })
        })
        .map_err(db_err("Query error"))?;

    let mut rows = Vec::new();
    for raw in raw_rows {
        rows.push(raw.map_err(db_err("Row error"))?.into_asset()?);
    }
    Ok(rows)
}

struct RawRow {
    id: String,
    ipv4: String,
    ipv6: String,
    mac: String,
    hostname: String,
    fqdn: String,
    os: String,
    exposure_score: Option<f64>,
    acr_score: Option<f64>,
    tags: String,
    first_seen: Option<String>,
    last_seen: Option<String>,
    last_scan: Option<String>,
}

impl RawRow {
    fn into_asset(self) -> Result<AssetRow, AssetIntelError> {
        Ok(AssetRow {
            id: self.id,
            ipv4: serde_json::from_str(&self.ipv4)?,
            ipv6: serde_json::from_str(&self.ipv6)?,
            mac: serde_json::from_str(&self.mac)?,
            hostname: self.hostname,
            fqdn: self.fqdn,
            os: self.os,
            exposure_score: coerce::exposure_score(self.exposure_score.map(Value::from).as_ref()),
            acr_score: coerce::acr_score(self.acr_score.map(Value::from).as_ref()),
            tags: serde_json::from_str(&self.tags)?,
            first_seen: parse_time(self.first_seen),
            last_seen: parse_time(self.last_seen),
            last_scan: parse_time(self.last_scan),
        })
    }
}

fn parse_time(value: Option<String>) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value?.as_str()).ok().map(|t| t.with_timezone(&Utc))
}
