//! Batch session types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Constants
// ============================================================================

/// Default maximum number of files per batch
pub const DEFAULT_MAX_BATCH_FILES: usize = 100;

/// Default multipart request size limit: 200MB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 200 * 1024 * 1024;

/// Default session expiry: 30 minutes
pub const DEFAULT_SESSION_EXPIRY_MINUTES: i64 = 30;

// ============================================================================
// Input Types
// ============================================================================

/// One uploaded file, held only for the duration of its batch run
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Original filename; used for logging and per-file reporting,
    /// never for output naming
    pub file_name: String,

    /// Raw bytes exactly as uploaded
    pub bytes: Vec<u8>,

    /// Zero-based position in the batch
    pub index: usize,
}

// ============================================================================
// Session Types
// ============================================================================

/// Outcome of one processed file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileOutcome {
    /// Zero-based position in the batch
    pub index: usize,

    /// Original filename as uploaded
    pub file_name: String,

    /// Derived archive entry name
    pub entry_name: String,

    /// Whether the policy number was matched (false = positional fallback)
    pub matched: bool,
}

/// Batch session state
#[derive(Debug, Clone)]
pub struct BatchSession {
    /// Unique batch ID
    pub id: Uuid,

    /// Current status
    pub status: BatchStatus,

    /// Number of files in the batch
    pub total_files: usize,

    /// Number of files fully processed so far
    pub processed_files: usize,

    /// Per-file outcomes, in batch order
    pub outcomes: Vec<FileOutcome>,

    /// Failure message when status is `Failed`
    pub error: Option<String>,

    /// Session creation time
    pub created_at: DateTime<Utc>,

    /// Session expiry time
    pub expires_at: DateTime<Utc>,

    /// Finished archive bytes, present between completion and delivery
    pub archive: Option<Vec<u8>>,

    /// Whether the archive has already been retrieved
    pub archive_delivered: bool,
}

impl BatchSession {
    /// Create a new session for a batch of `total_files` files
    pub fn new(total_files: usize, expiry_minutes: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            status: BatchStatus::Pending,
            total_files,
            processed_files: 0,
            outcomes: Vec::new(),
            error: None,
            created_at: now,
            expires_at: now + chrono::Duration::minutes(expiry_minutes),
            archive: None,
            archive_delivered: false,
        }
    }

    /// Fractional completion in [0, 1], updated once per processed file
    pub fn progress(&self) -> f64 {
        if self.total_files == 0 {
            return 0.0;
        }
        (self.processed_files as f64 / self.total_files as f64).clamp(0.0, 1.0)
    }

    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Whether the finished archive is ready for retrieval
    pub fn archive_ready(&self) -> bool {
        self.archive.is_some()
    }
}

/// Session status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    /// Created, processing not yet started
    Pending,
    /// Pipeline running
    Processing,
    /// Archive built; ready for (or already past) delivery
    Complete,
    /// Aborted, no archive produced
    Failed,
}

// ============================================================================
// Error Types
// ============================================================================

/// Batch session error types
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Batch not found: {0}")]
    NotFound(String),

    #[error("Archive not ready")]
    ArchiveNotReady,

    #[error("Archive already retrieved")]
    ArchiveTaken,
}
