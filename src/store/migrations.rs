/// Store schema management.
use anyhow::Result;
use rusqlite::Connection;

/// Creates the record table if it doesn't exist yet.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS records (
            key         TEXT    PRIMARY KEY,
            value       TEXT    NOT NULL,
            updated_at  TEXT    NOT NULL
        );
        ",
    )?;
    migrate_records_add_updated_at(conn)?;
    Ok(())
}

// Early builds created the table without the bookkeeping column.
fn migrate_records_add_updated_at(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare("PRAGMA table_info(records)")?;
    let rows = stmt.query_map([], |row| {
        let name: String = row.get(1)?;
        Ok(name)
    })?;
    for row in rows {
        if row? == "updated_at" {
            return Ok(());
        }
    }

    conn.execute(
        "ALTER TABLE records ADD COLUMN updated_at TEXT NOT NULL DEFAULT ''",
        [],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn adds_missing_updated_at_column() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE records (key TEXT PRIMARY KEY, value TEXT NOT NULL);
             INSERT INTO records (key, value) VALUES ('loopos_mode', '\"overload\"');",
        )
        .unwrap();
        run_migrations(&conn).unwrap();
        let value: String = conn
            .query_row(
                "SELECT value FROM records WHERE key = 'loopos_mode'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(value, "\"overload\"");
    }
}
