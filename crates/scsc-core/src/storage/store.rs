use crate::model::{LogRecord, NewLogRecord};
use anyhow::Context;
use rusqlite::{params, Connection, OpenFlags};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Append-only evaluation log. Rows are inserted and listed; there is no
/// update or delete.
#[derive(Clone)]
pub struct Store {
    pub(crate) conn: Arc<Mutex<Connection>>,
}

impl Store {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open sqlite db {}", path.display()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Opens an existing database without write access (dashboard side).
    pub fn open_read_only(path: &Path) -> anyhow::Result<Self> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .with_context(|| format!("failed to open sqlite db {} read-only", path.display()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory sqlite db")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn init_schema(&self) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(crate::storage::schema::DDL)?;
        Ok(())
    }

    pub fn insert(&self, rec: &NewLogRecord) -> anyhow::Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO logs(text, risk, categories, highlights, rewrites, ok, text_sha256, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                rec.text,
                rec.risk,
                rec.categories,
                rec.highlights,
                rec.rewrites,
                rec.ok,
                rec.text_sha256,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        let id = conn.last_insert_rowid();
        tracing::debug!(event = "scsc.store.insert", id, ok = rec.ok);
        Ok(id)
    }

    /// Most recent rows first.
    pub fn list_recent(&self, limit: u32) -> anyhow::Result<Vec<LogRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, text, risk, categories, highlights, rewrites, ok, text_sha256, created_at
             FROM logs
             ORDER BY id DESC
             LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit], |row| {
            Ok(LogRecord {
                id: row.get(0)?,
                text: row.get(1)?,
                risk: row.get(2)?,
                categories: row.get(3)?,
                highlights: row.get(4)?,
                rewrites: row.get(5)?,
                ok: row.get(6)?,
                text_sha256: row.get(7)?,
                created_at: row.get(8)?,
            })
        })?;

        let mut records = Vec::new();
        for r in rows {
            records.push(r?);
        }
        Ok(records)
    }

    pub fn count(&self) -> anyhow::Result<u64> {
        let conn = self.conn.lock().unwrap();
        let n: i64 = conn.query_row("SELECT count(*) FROM logs", [], |r| r.get(0))?;
        Ok(n as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(text: &str, risk: f64) -> NewLogRecord {
        NewLogRecord {
            text: text.to_string(),
            risk,
            categories: "safe".into(),
            highlights: r#"[{"category":"safe","score":0.0}]"#.into(),
            rewrites: "a|b|c".into(),
            ok: true,
            text_sha256: crate::fingerprint::sha256_hex(text),
        }
    }

    #[test]
    fn test_insert_assigns_increasing_ids() -> anyhow::Result<()> {
        let store = Store::memory()?;
        store.init_schema()?;
        let a = store.insert(&record("one", 1.0))?;
        let b = store.insert(&record("two", 2.0))?;
        assert!(b > a);
        assert_eq!(store.count()?, 2);
        Ok(())
    }

    #[test]
    fn test_list_recent_newest_first_and_limited() -> anyhow::Result<()> {
        let store = Store::memory()?;
        store.init_schema()?;
        for i in 0..5 {
            store.insert(&record(&format!("t{}", i), i as f64))?;
        }
        let rows = store.list_recent(3)?;
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].text, "t4");
        assert_eq!(rows[2].text, "t2");
        assert_eq!(rows[0].risk, 4.0);
        assert!(rows[0].ok);
        assert!(chrono::DateTime::parse_from_rfc3339(&rows[0].created_at).is_ok());
        Ok(())
    }

    #[test]
    fn test_init_schema_is_idempotent() -> anyhow::Result<()> {
        let store = Store::memory()?;
        store.init_schema()?;
        store.insert(&record("kept", 0.0))?;
        store.init_schema()?;
        assert_eq!(store.count()?, 1);
        Ok(())
    }

    #[test]
    fn test_insert_without_schema_fails() -> anyhow::Result<()> {
        let store = Store::memory()?;
        assert!(store.insert(&record("x", 0.0)).is_err());
        Ok(())
    }
}
