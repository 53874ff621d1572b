/// Durable key-value store for the serialized collections and timer state.
mod migrations;
mod records;

use std::path::Path;

use anyhow::Result;
use rusqlite::Connection;
use serde::{Serialize, de::DeserializeOwned};

pub const LOOPS_KEY: &str = "loopos_loops";
pub const ENTRIES_KEY: &str = "loopos_entries";
pub const IDEAS_KEY: &str = "loopos_ideas";
pub const MODE_KEY: &str = "loopos_mode";
pub const FOCUS_KEY: &str = "loopos_focus_timer";

pub const STORE_FILE_NAME: &str = "loopos.db";

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens (or creates) the store file and runs migrations.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        migrations::run_migrations(&conn)?;
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        migrations::run_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Raw stored text for `key`, bypassing decoding.
    #[cfg(test)]
    pub fn get_raw(&self, key: &str) -> Result<Option<String>> {
        records::get_record(key, &self.conn)
    }

    #[cfg(test)]
    pub fn put_raw(&self, key: &str, value: &str) -> Result<()> {
        records::put_record(key, value, &self.conn)
    }

    /// Removes the backing table so every later read and write fails.
    #[cfg(test)]
    pub fn break_storage(&self) -> Result<()> {
        self.conn.execute_batch("DROP TABLE records")?;
        Ok(())
    }

    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        records::read_record(key, &self.conn)
    }

    /// Best effort: a failed write is logged and the caller carries on.
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        records::write_record(key, value, &self.conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Mode;

    #[test]
    fn missing_record_reads_as_none() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.read::<Mode>(MODE_KEY), None);
    }

    #[test]
    fn corrupt_record_reads_as_none() {
        let store = Store::open_in_memory().unwrap();
        store.put_raw(LOOPS_KEY, "{not json").unwrap();
        assert_eq!(store.read::<Vec<String>>(LOOPS_KEY), None);
    }

    #[test]
    fn write_overwrites_previous_value() {
        let store = Store::open_in_memory().unwrap();
        store.write(MODE_KEY, &Mode::Overload);
        store.write(MODE_KEY, &Mode::Operator);
        assert_eq!(store.read::<Mode>(MODE_KEY), Some(Mode::Operator));
        assert_eq!(
            store.get_raw(MODE_KEY).unwrap().as_deref(),
            Some("\"operator\"")
        );
    }

    #[test]
    fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORE_FILE_NAME);
        {
            let store = Store::open(&path).unwrap();
            store.write(MODE_KEY, &Mode::Overload);
        }
        let store = Store::open(&path).unwrap();
        assert_eq!(store.read::<Mode>(MODE_KEY), Some(Mode::Overload));
    }
}
