//! Transport-agnostic application state shared by every request handler.
//!
//! Holds the read-only scoring engine, the database location, and the
//! buffered audit / prediction-log writers. Wrapped in `Arc` at startup.

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config;
use crate::db::{self, DatabaseError};
use crate::engine::Engine;

/// Audit entries older than this are pruned at flush time.
const AUDIT_RETENTION_DAYS: u32 = 90;

/// Maximum audit buffer size before flush.
const AUDIT_BUFFER_CAPACITY: usize = 100;

/// Maximum prediction-log buffer size before flush.
const PREDICTION_BUFFER_CAPACITY: usize = 50;

// ═══════════════════════════════════════════════════════════
// CoreState
// ═══════════════════════════════════════════════════════════

pub struct CoreState {
    /// SQLite file backing all repositories. Connections are opened per
    /// operation; SQLite serializes writers itself.
    db_path: PathBuf,
    /// Scoring engine. Immutable after startup, safe for concurrent reads.
    engine: Engine,
    /// Access audit trail buffer.
    audit: AuditLogger,
    /// Append-only log of engine outputs (the engine itself stays pure).
    predictions: PredictionLog,
}

impl CoreState {
    /// Create state against the configured database location.
    pub fn new(engine: Engine) -> Self {
        Self::with_db_path(engine, config::database_path())
    }

    /// Create state against an explicit database file (tests use a tempdir).
    pub fn with_db_path(engine: Engine, db_path: PathBuf) -> Self {
        Self {
            db_path,
            engine,
            audit: AuditLogger::new(),
            predictions: PredictionLog::new(),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn db_path(&self) -> &PathBuf {
        &self.db_path
    }

    /// Open a database connection, running migrations when needed.
    pub fn open_db(&self) -> Result<rusqlite::Connection, CoreError> {
        db::open_database(&self.db_path).map_err(CoreError::Database)
    }

    // ── Access audit ────────────────────────────────────────

    /// Log an access event. Auto-flushes to the database when the buffer
    /// reaches capacity.
    pub fn log_access(&self, nurse_id: Option<Uuid>, action: &str, entity: &str) {
        let needs_flush = self.audit.log(nurse_id, action, entity);
        if needs_flush {
            if let Err(e) = self.flush_and_prune_audit() {
                tracing::warn!("Auto-flush audit failed: {e}");
            }
        }
    }

    /// Current audit buffer contents (for testing/flush).
    pub fn audit_entries(&self) -> Vec<AuditEntry> {
        self.audit.entries()
    }

    /// Flush the audit buffer and prune entries past retention.
    pub fn flush_and_prune_audit(&self) -> Result<(), CoreError> {
        let conn = self.open_db()?;
        self.audit.flush_to_db(&conn)?;
        if let Err(e) = db::repository::prune_audit_log(&conn, AUDIT_RETENTION_DAYS) {
            tracing::warn!("Failed to prune audit log: {e}");
        }
        Ok(())
    }

    // ── Prediction log ──────────────────────────────────────

    /// Append an engine-output summary. Auto-flushes at capacity.
    pub fn log_prediction(&self, entry: PredictionEntry) {
        let needs_flush = self.predictions.log(entry);
        if needs_flush {
            if let Err(e) = self.flush_predictions() {
                tracing::warn!("Auto-flush prediction log failed: {e}");
            }
        }
    }

    /// Current prediction buffer contents (for testing/flush).
    pub fn prediction_entries(&self) -> Vec<PredictionEntry> {
        self.predictions.entries()
    }

    /// Flush buffered prediction summaries to the database.
    pub fn flush_predictions(&self) -> Result<(), CoreError> {
        let conn = self.open_db()?;
        self.predictions.flush_to_db(&conn)?;
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════
// Error types
// ═══════════════════════════════════════════════════════════

/// Errors from CoreState operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

// ═══════════════════════════════════════════════════════════
// Audit logger
// ═══════════════════════════════════════════════════════════

/// A single audit log entry.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub nurse_id: Option<Uuid>,
    pub action: String,
    pub entity: String,
}

/// In-memory audit buffer. Entries are flushed to SQLite when the buffer
/// reaches capacity or on explicit flush.
pub struct AuditLogger {
    buffer: Mutex<Vec<AuditEntry>>,
}

impl AuditLogger {
    pub fn new() -> Self {
        Self {
            buffer: Mutex::new(Vec::with_capacity(AUDIT_BUFFER_CAPACITY)),
        }
    }

    /// Log an access event. Returns `true` when the buffer has reached the
    /// flush threshold.
    pub fn log(&self, nurse_id: Option<Uuid>, action: &str, entity: &str) -> bool {
        if let Ok(mut buf) = self.buffer.lock() {
            buf.push(AuditEntry {
                timestamp: Utc::now(),
                nurse_id,
                action: action.to_string(),
                entity: entity.to_string(),
            });
            buf.len() >= AUDIT_BUFFER_CAPACITY
        } else {
            false
        }
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.buffer
            .lock()
            .map(|buf| buf.clone())
            .unwrap_or_default()
    }

    pub fn drain(&self) -> Vec<AuditEntry> {
        self.buffer
            .lock()
            .map(|mut buf| buf.drain(..).collect())
            .unwrap_or_default()
    }

    pub fn buffer_len(&self) -> usize {
        self.buffer.lock().map(|buf| buf.len()).unwrap_or(0)
    }

    /// Flush buffered entries to SQLite.
    pub fn flush_to_db(&self, conn: &rusqlite::Connection) -> Result<usize, CoreError> {
        let entries = self.drain();
        if entries.is_empty() {
            return Ok(0);
        }

        let tuples: Vec<(String, Option<String>, String, String)> = entries
            .iter()
            .map(|e| {
                (
                    e.timestamp.to_rfc3339(),
                    e.nurse_id.map(|id| id.to_string()),
                    e.action.clone(),
                    e.entity.clone(),
                )
            })
            .collect();

        let count = tuples.len();
        db::repository::insert_audit_entries(conn, &tuples)?;

        tracing::debug!(count, "Flushed audit entries to database");
        Ok(count)
    }
}

impl Default for AuditLogger {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════
// Prediction log
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionKind {
    Diagnosis,
    Predictive,
}

impl PredictionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Diagnosis => "diagnosis",
            Self::Predictive => "predictive",
        }
    }
}

/// Summary of one engine call, destined for the append-only log.
#[derive(Debug, Clone)]
pub struct PredictionEntry {
    pub timestamp: DateTime<Utc>,
    pub kind: PredictionKind,
    pub nurse_id: Option<Uuid>,
    pub condition: Option<String>,
    pub confidence: f64,
    pub summary: serde_json::Value,
}

/// Buffered writer for engine-output summaries, mirroring the audit buffer.
pub struct PredictionLog {
    buffer: Mutex<Vec<PredictionEntry>>,
}

impl PredictionLog {
    pub fn new() -> Self {
        Self {
            buffer: Mutex::new(Vec::with_capacity(PREDICTION_BUFFER_CAPACITY)),
        }
    }

    /// Append an entry. Returns `true` at the flush threshold.
    pub fn log(&self, entry: PredictionEntry) -> bool {
        if let Ok(mut buf) = self.buffer.lock() {
            buf.push(entry);
            buf.len() >= PREDICTION_BUFFER_CAPACITY
        } else {
            false
        }
    }

    pub fn entries(&self) -> Vec<PredictionEntry> {
        self.buffer
            .lock()
            .map(|buf| buf.clone())
            .unwrap_or_default()
    }

    pub fn drain(&self) -> Vec<PredictionEntry> {
        self.buffer
            .lock()
            .map(|mut buf| buf.drain(..).collect())
            .unwrap_or_default()
    }

    pub fn buffer_len(&self) -> usize {
        self.buffer.lock().map(|buf| buf.len()).unwrap_or(0)
    }

    /// Flush buffered entries to SQLite.
    pub fn flush_to_db(&self, conn: &rusqlite::Connection) -> Result<usize, CoreError> {
        let entries = self.drain();
        if entries.is_empty() {
            return Ok(0);
        }

        let tuples: Vec<(String, String, Option<String>, Option<String>, f64, String)> = entries
            .iter()
            .map(|e| {
                (
                    e.timestamp.to_rfc3339(),
                    e.kind.as_str().to_string(),
                    e.nurse_id.map(|id| id.to_string()),
                    e.condition.clone(),
                    e.confidence,
                    e.summary.to_string(),
                )
            })
            .collect();

        let count = tuples.len();
        db::repository::insert_prediction_entries(conn, &tuples)?;

        tracing::debug!(count, "Flushed prediction entries to database");
        Ok(count)
    }
}

impl Default for PredictionLog {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
