/// Key-value record access on top of the `records` table.
use anyhow::Result;
use chrono::Local;
use rusqlite::Connection;
use serde::{Serialize, de::DeserializeOwned};

pub fn get_record(key: &str, conn: &Connection) -> Result<Option<String>> {
    let mut stmt = conn.prepare("SELECT value FROM records WHERE key = ?1")?;
    let mut rows = stmt.query([key])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row.get(0)?))
    } else {
        Ok(None)
    }
}

pub fn put_record(key: &str, value: &str, conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT INTO records (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        (key, value, Local::now().to_rfc3339()),
    )?;
    Ok(())
}

/// Reads and decodes a record. Missing, unreadable and corrupt records all
/// come back as `None`; the latter two are logged.
pub fn read_record<T: DeserializeOwned>(key: &str, conn: &Connection) -> Option<T> {
    let raw = match get_record(key, conn) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            log::warn!("storage read error for {key}: {err}");
            return None;
        }
    };
    if raw.trim().is_empty() {
        return None;
    }
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("discarding unreadable record {key}: {err}");
            None
        }
    }
}

/// Encodes and writes a record. Failures are logged and otherwise ignored.
pub fn write_record<T: Serialize + ?Sized>(key: &str, value: &T, conn: &Connection) {
    let result = serde_json::to_string(value)
        .map_err(anyhow::Error::from)
        .and_then(|raw| put_record(key, &raw, conn));
    if let Err(err) = result {
        log::warn!("storage write error for {key}: {err}");
    }
}
