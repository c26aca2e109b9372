//! Batch Session Manager
//!
//! Manages batch sessions with:
//! - In-memory session storage behind an async RwLock
//! - Progress bookkeeping updated once per processed file
//! - Exactly-once archive handoff
//! - Automatic expiry cleanup

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::types::{BatchError, BatchSession, BatchStatus, FileOutcome};

/// Manages batch sessions
#[derive(Clone)]
pub struct BatchManager {
    inner: Arc<BatchManagerInner>,
}

struct BatchManagerInner {
    /// Active sessions indexed by ID
    sessions: RwLock<HashMap<Uuid, BatchSession>>,

    /// Minutes a session lives before the sweep removes it
    expiry_minutes: i64,
}

impl BatchManager {
    /// Create a new batch manager
    pub fn new(expiry_minutes: i64) -> Self {
        Self {
            inner: Arc::new(BatchManagerInner {
                sessions: RwLock::new(HashMap::new()),
                expiry_minutes,
            }),
        }
    }

    // ========================================================================
    // Session Lifecycle
    // ========================================================================

    /// Create a new session for a batch of `total_files` files
    pub async fn create_session(&self, total_files: usize) -> BatchSession {
        let session = BatchSession::new(total_files, self.inner.expiry_minutes);
        let id = session.id;

        {
            let mut sessions = self.inner.sessions.write().await;
            sessions.insert(id, session.clone());
        }

        tracing::info!(
            batch_id = %id,
            total_files = total_files,
            "Created batch session"
        );

        session
    }

    /// Get a session by ID
    pub async fn get_session(&self, id: Uuid) -> Result<BatchSession, BatchError> {
        let sessions = self.inner.sessions.read().await;
        sessions
            .get(&id)
            .cloned()
            .ok_or_else(|| BatchError::NotFound(id.to_string()))
    }

    /// Mark a session as processing
    pub async fn mark_processing(&self, id: Uuid) -> Result<(), BatchError> {
        let mut sessions = self.inner.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| BatchError::NotFound(id.to_string()))?;

        session.status = BatchStatus::Processing;
        Ok(())
    }

    /// Record one processed file and advance progress
    pub async fn record_file(&self, id: Uuid, outcome: FileOutcome) -> Result<(), BatchError> {
        let mut sessions = self.inner.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| BatchError::NotFound(id.to_string()))?;

        session.processed_files += 1;
        session.outcomes.push(outcome);

        tracing::debug!(
            batch_id = %id,
            processed = session.processed_files,
            total = session.total_files,
            progress = format!("{:.2}", session.progress()),
            "File recorded"
        );

        Ok(())
    }

    /// Attach the finished archive and mark the session complete
    pub async fn complete(&self, id: Uuid, archive: Vec<u8>) -> Result<(), BatchError> {
        let mut sessions = self.inner.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| BatchError::NotFound(id.to_string()))?;

        session.status = BatchStatus::Complete;
        session.archive = Some(archive);

        tracing::info!(batch_id = %id, "Batch session completed");
        Ok(())
    }

    /// Mark the session failed; no archive will be produced
    pub async fn fail(&self, id: Uuid, error: String) -> Result<(), BatchError> {
        let mut sessions = self.inner.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| BatchError::NotFound(id.to_string()))?;

        session.status = BatchStatus::Failed;
        session.error = Some(error);
        session.archive = None;

        Ok(())
    }

    /// Take the finished archive out of a session.
    ///
    /// The archive is handed over exactly once; repeat calls report
    /// `ArchiveTaken`.
    pub async fn take_archive(&self, id: Uuid) -> Result<Vec<u8>, BatchError> {
        let mut sessions = self.inner.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| BatchError::NotFound(id.to_string()))?;

        match session.archive.take() {
            Some(bytes) => {
                session.archive_delivered = true;
                Ok(bytes)
            }
            None if session.archive_delivered => Err(BatchError::ArchiveTaken),
            None => Err(BatchError::ArchiveNotReady),
        }
    }

    // ========================================================================
    // Query Methods
    // ========================================================================

    /// Get session count
    pub async fn session_count(&self) -> usize {
        let sessions = self.inner.sessions.read().await;
        sessions.len()
    }

    // ========================================================================
    // Cleanup
    // ========================================================================

    /// Remove expired sessions.
    ///
    /// Returns the number of sessions removed.
    pub async fn cleanup_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.inner.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.expires_at >= now);
        let count = before - sessions.len();

        if count > 0 {
            tracing::info!(count = count, "Cleaned up expired batch sessions");
        }

        count
    }

    /// Start the background cleanup task
    pub fn start_cleanup_task(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));

            loop {
                interval.tick().await;
                self.cleanup_expired().await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(index: usize) -> FileOutcome {
        FileOutcome {
            index,
            file_name: format!("doc{}.pdf", index),
            entry_name: format!("Poliza_{}.pdf", index),
            matched: true,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_session() {
        let manager = BatchManager::new(30);
        let session = manager.create_session(3).await;

        assert_eq!(session.status, BatchStatus::Pending);
        assert_eq!(session.total_files, 3);
        assert_eq!(session.progress(), 0.0);

        let fetched = manager.get_session(session.id).await.unwrap();
        assert_eq!(fetched.id, session.id);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let manager = BatchManager::new(30);
        let result = manager.get_session(Uuid::new_v4()).await;
        assert!(matches!(result, Err(BatchError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_record_file_advances_progress() {
        let manager = BatchManager::new(30);
        let session = manager.create_session(2).await;
        manager.mark_processing(session.id).await.unwrap();

        manager.record_file(session.id, outcome(0)).await.unwrap();
        let mid = manager.get_session(session.id).await.unwrap();
        assert_eq!(mid.status, BatchStatus::Processing);
        assert_eq!(mid.processed_files, 1);
        assert_eq!(mid.progress(), 0.5);

        manager.record_file(session.id, outcome(1)).await.unwrap();
        let done = manager.get_session(session.id).await.unwrap();
        assert_eq!(done.progress(), 1.0);
        assert_eq!(done.outcomes.len(), 2);
    }

    #[tokio::test]
    async fn test_archive_is_taken_exactly_once() {
        let manager = BatchManager::new(30);
        let session = manager.create_session(1).await;

        // not ready before completion
        assert!(matches!(
            manager.take_archive(session.id).await,
            Err(BatchError::ArchiveNotReady)
        ));

        manager.complete(session.id, b"zip-bytes".to_vec()).await.unwrap();
        let fetched = manager.get_session(session.id).await.unwrap();
        assert_eq!(fetched.status, BatchStatus::Complete);
        assert!(fetched.archive_ready());

        let bytes = manager.take_archive(session.id).await.unwrap();
        assert_eq!(bytes, b"zip-bytes");

        assert!(matches!(
            manager.take_archive(session.id).await,
            Err(BatchError::ArchiveTaken)
        ));
    }

    #[tokio::test]
    async fn test_failed_session_has_no_archive() {
        let manager = BatchManager::new(30);
        let session = manager.create_session(2).await;
        manager
            .fail(session.id, "Failed to extract text from \"b.pdf\"".to_string())
            .await
            .unwrap();

        let fetched = manager.get_session(session.id).await.unwrap();
        assert_eq!(fetched.status, BatchStatus::Failed);
        assert!(fetched.error.as_ref().unwrap().contains("b.pdf"));
        assert!(!fetched.archive_ready());

        assert!(matches!(
            manager.take_archive(session.id).await,
            Err(BatchError::ArchiveNotReady)
        ));
    }

    #[tokio::test]
    async fn test_cleanup_removes_expired_sessions() {
        // negative expiry puts expires_at in the past
        let manager = BatchManager::new(-1);
        let session = manager.create_session(1).await;
        assert!(session.is_expired());
        assert_eq!(manager.session_count().await, 1);

        let removed = manager.cleanup_expired().await;
        assert_eq!(removed, 1);
        assert_eq!(manager.session_count().await, 0);

        let fresh = BatchManager::new(30);
        fresh.create_session(1).await;
        assert_eq!(fresh.cleanup_expired().await, 0);
        assert_eq!(fresh.session_count().await, 1);
    }
}
