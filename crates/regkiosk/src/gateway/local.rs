//! Local storage gateway.
//!
//! Persists the whole record collection as one JSON document under a
//! single key in a `SQLite`-backed key-value table. Reads parse the full
//! document; every mutation re-serializes and rewrites it. There are no
//! partial updates.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use super::{sort_newest_first, Gateway};
use crate::error::{Error, Result};
use crate::registrant::Registrant;

/// The single key the record collection lives under.
const DOCUMENT_KEY: &str = "registrants";

/// Key-value table backing the store.
const CREATE_KIOSK_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS kiosk (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// Gateway backed by a local `SQLite` file.
///
/// Calls complete synchronously; the async trait surface never suspends.
#[derive(Debug)]
pub struct LocalGateway {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection, serialized behind a lock.
    conn: Mutex<Connection>,
}

impl LocalGateway {
    /// Open or create a store at the given path.
    ///
    /// Creates the parent directories and database file if they don't
    /// exist, and the key-value table on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening kiosk store at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        conn.execute(CREATE_KIOSK_TABLE, [])?;

        info!("Kiosk store opened at {}", path.display());
        Ok(Self {
            path,
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        conn.execute(CREATE_KIOSK_TABLE, [])?;
        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Mutex::new(conn),
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Parse the full record document. A missing key is an empty
    /// collection.
    fn read_document(conn: &Connection) -> Result<Vec<Registrant>> {
        let document: Option<String> = conn
            .query_row(
                "SELECT value FROM kiosk WHERE key = ?1",
                [DOCUMENT_KEY],
                |row| row.get(0),
            )
            .optional()?;

        match document {
            Some(text) => Ok(serde_json::from_str(&text)?),
            None => Ok(Vec::new()),
        }
    }

    /// Re-serialize and rewrite the full record document.
    fn write_document(conn: &Connection, records: &[Registrant]) -> Result<()> {
        let text = serde_json::to_string(records)?;
        conn.execute(
            "INSERT OR REPLACE INTO kiosk (key, value) VALUES (?1, ?2)",
            (DOCUMENT_KEY, text),
        )?;
        Ok(())
    }
}

#[async_trait]
impl Gateway for LocalGateway {
    async fn exists(&self, key: &str) -> Result<bool> {
        let conn = self.lock();
        let records = Self::read_document(&conn)?;
        Ok(records.iter().any(|r| r.id == key))
    }

    async fn create(&self, record: &Registrant) -> Result<()> {
        let conn = self.lock();
        let mut records = Self::read_document(&conn)?;
        if records.iter().any(|r| r.id == record.id) {
            return Err(Error::duplicate_key(&record.id));
        }
        records.push(record.clone());
        Self::write_document(&conn, &records)?;
        debug!(id = %record.id, "Registrant stored");
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let conn = self.lock();
        let mut records = Self::read_document(&conn)?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() < before {
            Self::write_document(&conn, &records)?;
            info!(id = %id, "Registrant deleted");
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<()> {
        let conn = self.lock();
        let affected = conn.execute("DELETE FROM kiosk WHERE key = ?1", [DOCUMENT_KEY])?;
        if affected > 0 {
            info!("All registrants deleted");
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Registrant>> {
        let conn = self.lock();
        let mut records = Self::read_document(&conn)?;
        sort_newest_first(&mut records);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registrant::Department;
    use chrono::{TimeZone, Utc};

    fn create_test_gateway() -> LocalGateway {
        LocalGateway::open_in_memory().expect("failed to create test gateway")
    }

    fn test_record(id: &str, hour: u32) -> Registrant {
        Registrant {
            id: id.to_string(),
            first_name: "Ana".to_string(),
            middle_name: None,
            last_name: "Cruz".to_string(),
            department: Department::It,
            section: Some("A-1".to_string()),
            registered_at: Utc.with_ymd_and_hms(2026, 8, 25, hour, 0, 0).unwrap(),
            signature_image: "data:image/x-portable-graymap;base64,UDU=".to_string(),
        }
    }

    #[tokio::test]
    async fn test_open_in_memory() {
        let gateway = LocalGateway::open_in_memory();
        assert!(gateway.is_ok());
    }

    #[tokio::test]
    async fn test_list_empty() {
        let gateway = create_test_gateway();
        assert!(gateway.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let gateway = create_test_gateway();
        let record = test_record("ana--cruz", 9);

        gateway.create(&record).await.unwrap();
        let records = gateway.list().await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0], record);
    }

    #[tokio::test]
    async fn test_create_duplicate_fails_and_leaves_collection_unchanged() {
        let gateway = create_test_gateway();
        gateway.create(&test_record("ana--cruz", 9)).await.unwrap();

        let err = gateway
            .create(&test_record("ana--cruz", 10))
            .await
            .unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(gateway.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_exists_tracks_create_and_delete() {
        let gateway = create_test_gateway();
        assert!(!gateway.exists("ana--cruz").await.unwrap());

        gateway.create(&test_record("ana--cruz", 9)).await.unwrap();
        assert!(gateway.exists("ana--cruz").await.unwrap());

        gateway.delete("ana--cruz").await.unwrap();
        assert!(!gateway.exists("ana--cruz").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_absent_is_noop() {
        let gateway = create_test_gateway();
        gateway.create(&test_record("ana--cruz", 9)).await.unwrap();

        gateway.delete("nobody").await.unwrap();
        assert_eq!(gateway.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_all() {
        let gateway = create_test_gateway();
        for i in 0..5 {
            gateway
                .create(&test_record(&format!("person-{i}"), i))
                .await
                .unwrap();
        }
        assert_eq!(gateway.list().await.unwrap().len(), 5);

        gateway.delete_all().await.unwrap();
        assert!(gateway.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_all_on_empty_store() {
        let gateway = create_test_gateway();
        gateway.delete_all().await.unwrap();
        assert!(gateway.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_orders_newest_first_regardless_of_insert_order() {
        let gateway = create_test_gateway();
        gateway.create(&test_record("early", 8)).await.unwrap();
        gateway.create(&test_record("late", 15)).await.unwrap();
        gateway.create(&test_record("middle", 11)).await.unwrap();

        let ids: Vec<String> = gateway
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["late", "middle", "early"]);
    }

    #[tokio::test]
    async fn test_fields_survive_round_trip_verbatim() {
        let gateway = create_test_gateway();
        let mut record = test_record("jo-q-public", 9);
        record.first_name = "Jo, \"JJ\"".to_string();
        record.middle_name = Some("Q".to_string());

        gateway.create(&record).await.unwrap();
        assert_eq!(gateway.list().await.unwrap()[0], record);
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("kiosk.db");

        {
            let gateway = LocalGateway::open(&db_path).unwrap();
            gateway.create(&test_record("ana--cruz", 9)).await.unwrap();
        }

        let gateway = LocalGateway::open(&db_path).unwrap();
        let records = gateway.list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "ana--cruz");
    }

    #[tokio::test]
    async fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested/deeper/kiosk.db");

        let gateway = LocalGateway::open(&nested).unwrap();
        assert!(nested.exists());
        assert_eq!(gateway.path(), nested);
    }
}
