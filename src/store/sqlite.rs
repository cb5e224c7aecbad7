//! SQLite-backed note store.
//!
//! A connection is opened per operation against a fixed schema; the schema is
//! created on first use. Updates are read-modify-write inside a transaction
//! so concurrent field updates cannot clobber each other.

use crate::audio::AudioBlob;
use crate::store::note::{NewNote, NoteFields, NoteRecord, PROCESSING};
use crate::{Result, VoxnoteError};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use tracing::debug;

const SCHEMA_VERSION: i32 = 1;

/// Durable local store of note records, keyed by auto-increment id.
#[derive(Debug, Clone)]
pub struct NoteStore {
    db_path: PathBuf,
}

impl NoteStore {
    /// Open or create the store at the given path
    pub fn new(db_path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self {
            db_path: db_path.into(),
        };
        store.init()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn open(&self) -> Result<Connection> {
        Connection::open_with_flags(
            &self.db_path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        )
        .map_err(storage_err)
    }

    fn init(&self) -> Result<()> {
        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = self.open()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS notes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                audio BLOB NOT NULL,
                mime TEXT NOT NULL,
                title TEXT NOT NULL,
                transcript TEXT NOT NULL,
                created_at_ms INTEGER NOT NULL,
                duration_label TEXT NOT NULL
            );
            "#,
        )
        .map_err(storage_err)?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)
            .map_err(storage_err)?;

        debug!("Note store ready at {}", self.db_path.display());
        Ok(())
    }

    /// Insert a new note with processing placeholders; returns the new id
    pub fn save(&self, note: NewNote) -> Result<i64> {
        let created_at_ms = chrono::Utc::now().timestamp_millis();

        let conn = self.open()?;
        conn.execute(
            "INSERT INTO notes (audio, mime, title, transcript, created_at_ms, duration_label)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                note.audio.bytes,
                note.audio.mime,
                PROCESSING,
                PROCESSING,
                created_at_ms,
                note.duration_label,
            ],
        )
        .map_err(storage_err)?;

        let id = conn.last_insert_rowid();
        debug!("Saved note {} ({} bytes)", id, note.audio.bytes.len());
        Ok(id)
    }

    /// Fetch one note by id
    pub fn get(&self, id: i64) -> Result<NoteRecord> {
        let conn = self.open()?;
        conn.query_row(
            "SELECT id, audio, mime, title, transcript, created_at_ms, duration_label
             FROM notes WHERE id = ?1",
            params![id],
            row_to_record,
        )
        .optional()
        .map_err(storage_err)?
        .ok_or(VoxnoteError::NotFound(id))
    }

    /// Merge title/transcript fields into an existing note.
    /// Read-modify-write inside one transaction.
    pub fn update(&self, id: i64, fields: NoteFields) -> Result<NoteRecord> {
        let mut conn = self.open()?;
        let tx = conn.transaction().map_err(storage_err)?;

        let mut record = tx
            .query_row(
                "SELECT id, audio, mime, title, transcript, created_at_ms, duration_label
                 FROM notes WHERE id = ?1",
                params![id],
                row_to_record,
            )
            .optional()
            .map_err(storage_err)?
            .ok_or(VoxnoteError::NotFound(id))?;

        if let Some(title) = fields.title {
            record.title = title;
        }
        if let Some(transcript) = fields.transcript {
            record.transcript = transcript;
        }

        tx.execute(
            "UPDATE notes SET title = ?1, transcript = ?2 WHERE id = ?3",
            params![record.title, record.transcript, id],
        )
        .map_err(storage_err)?;
        tx.commit().map_err(storage_err)?;

        debug!("Updated note {}", id);
        Ok(record)
    }

    /// Delete a note. Deleting a missing id reports `NotFound`, which
    /// callers treat as a no-op condition.
    pub fn delete(&self, id: i64) -> Result<()> {
        let conn = self.open()?;
        let affected = conn
            .execute("DELETE FROM notes WHERE id = ?1", params![id])
            .map_err(storage_err)?;

        if affected == 0 {
            return Err(VoxnoteError::NotFound(id));
        }
        debug!("Deleted note {}", id);
        Ok(())
    }

    /// All notes, newest first. The ordering is a hard contract: the UI's
    /// list and calendar grouping both rely on it.
    pub fn list_all(&self) -> Result<Vec<NoteRecord>> {
        let conn = self.open()?;
        let mut statement = conn
            .prepare(
                "SELECT id, audio, mime, title, transcript, created_at_ms, duration_label
                 FROM notes ORDER BY created_at_ms DESC, id DESC",
            )
            .map_err(storage_err)?;

        let records = statement
            .query_map([], row_to_record)
            .map_err(storage_err)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(storage_err)?;

        Ok(records)
    }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<NoteRecord> {
    Ok(NoteRecord {
        id: row.get(0)?,
        audio: AudioBlob {
            bytes: row.get(1)?,
            mime: row.get(2)?,
        },
        title: row.get(3)?,
        transcript: row.get(4)?,
        created_at_ms: row.get(5)?,
        duration_label: row.get(6)?,
    })
}

fn storage_err(e: rusqlite::Error) -> VoxnoteError {
    VoxnoteError::StorageError(e.to_string())
}
