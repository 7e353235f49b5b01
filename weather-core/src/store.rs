//! Append-only SQLite log of successful lookups.
use std::path::{Path, PathBuf};

use chrono::Local;
use sqlx::{ConnectOptions, Connection, SqliteConnection, sqlite::SqliteConnectOptions};
use tracing::{debug, info, warn};

use crate::{LogEntry, StoreError, WeatherRecord, config::DEFAULT_DATABASE_FILE};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Column order is relied on by external report scripts.
const CREATE_LOGS: &str = r#"
    CREATE TABLE IF NOT EXISTS logs (
        id INTEGER PRIMARY KEY,
        city TEXT,
        temp REAL,
        humidity INTEGER,
        condition TEXT,
        timestamp TEXT
    )"#;

const INSERT_LOG: &str = r#"
    INSERT INTO logs (city, temp, humidity, condition, timestamp)
    VALUES (?, ?, ?, ?, ?)"#;

/// Holds one connection for its whole lifetime; dropping it releases the
/// connection.
#[derive(Debug)]
pub struct WeatherLogger {
    path: PathBuf,
    conn: Option<SqliteConnection>,
}

impl WeatherLogger {
    /// Open (creating if needed) the store at `path` and make sure the
    /// `logs` table exists.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = resolve_path(path.as_ref());

        let mut conn = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .connect()
            .await?;

        sqlx::query(CREATE_LOGS).execute(&mut conn).await?;
        info!(path = %path.display(), "weather log ready");

        Ok(Self {
            path,
            conn: Some(conn),
        })
    }

    /// Path of the database file actually in use.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `record` as one row, stamped with the local time.
    pub async fn log(&mut self, record: &WeatherRecord) -> Result<LogEntry, StoreError> {
        let conn = self.conn.as_mut().ok_or(StoreError::Closed)?;
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();

        let mut tx = conn.begin().await?;
        let result = sqlx::query(INSERT_LOG)
            .bind(&record.city)
            .bind(record.temp.celsius())
            .bind(i64::from(record.humidity))
            .bind(record.condition.as_deref())
            .bind(&timestamp)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        let id = result.last_insert_rowid();
        debug!(id, city = %record.city, "logged weather record");

        Ok(LogEntry {
            id,
            record: record.clone(),
            timestamp,
        })
    }

    /// Release the connection. Safe to call more than once.
    pub async fn close(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err(err) = conn.close().await {
                debug!(error = %err, "ignoring error while closing weather log");
            }
        }
    }
}

/// Ensure the parent directory exists; if it can't be created, fall back to
/// the bare file name in the working directory.
fn resolve_path(path: &Path) -> PathBuf {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return path.to_path_buf();
    };

    match std::fs::create_dir_all(parent) {
        Ok(()) => path.to_path_buf(),
        Err(err) => {
            let fallback = path
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_FILE));
            warn!(
                dir = %parent.display(),
                error = %err,
                fallback = %fallback.display(),
                "could not create database directory, using working directory"
            );
            fallback
        }
    }
}
