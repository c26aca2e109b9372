//! Sequential batch pipeline
//!
//! One batch flows through here as a strictly sequential loop: each file
//! is fully processed (extract text → match identifier → stage archive
//! entry) before the next begins, and progress advances once per file.
//! Any extraction failure aborts the whole batch: the session is marked
//! failed and no archive is produced.

use uuid::Uuid;

use crate::archive::ArchiveBuilder;
use crate::extract::TextExtractor;
use crate::matcher::PolicyMatcher;

use super::manager::BatchManager;
use super::types::{FileOutcome, UploadedFile};

/// Process one batch to completion (or failure).
pub async fn process_batch(
    manager: &BatchManager,
    batch_id: Uuid,
    files: Vec<UploadedFile>,
    matcher: &PolicyMatcher,
    extractor: &dyn TextExtractor,
) {
    if let Err(e) = manager.mark_processing(batch_id).await {
        tracing::error!(batch_id = %batch_id, error = %e, "Failed to start batch");
        return;
    }

    let total = files.len();
    let mut archive = ArchiveBuilder::new();

    for file in files {
        let text = match extractor.extract_text(&file.bytes).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(
                    batch_id = %batch_id,
                    file_name = %file.file_name,
                    index = file.index,
                    error = %e,
                    "Extraction failed, aborting batch"
                );
                let message = format!(
                    "Failed to extract text from \"{}\" (file {} of {}): {}",
                    file.file_name,
                    file.index + 1,
                    total,
                    e
                );
                let _ = manager.fail(batch_id, message).await;
                return;
            }
        };

        let identifier = matcher.identify(&text, file.index);
        let entry_name = identifier.entry_name();

        tracing::debug!(
            batch_id = %batch_id,
            file_name = %file.file_name,
            index = file.index,
            entry = %entry_name,
            matched = identifier.is_matched(),
            "File processed"
        );

        let outcome = FileOutcome {
            index: file.index,
            file_name: file.file_name,
            entry_name: entry_name.clone(),
            matched: identifier.is_matched(),
        };

        archive.add_entry(entry_name, file.bytes);

        if let Err(e) = manager.record_file(batch_id, outcome).await {
            tracing::error!(batch_id = %batch_id, error = %e, "Failed to record file");
            return;
        }
    }

    match archive.finish() {
        Ok(bytes) => {
            tracing::info!(
                batch_id = %batch_id,
                files = total,
                archive_bytes = bytes.len(),
                "Batch complete"
            );
            if let Err(e) = manager.complete(batch_id, bytes).await {
                tracing::error!(batch_id = %batch_id, error = %e, "Failed to complete batch");
            }
        }
        Err(e) => {
            tracing::error!(batch_id = %batch_id, error = %e, "Failed to build archive");
            let _ = manager
                .fail(batch_id, format!("Failed to build archive: {}", e))
                .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use async_trait::async_trait;
    use zip::ZipArchive;

    use super::*;
    use crate::batch::types::BatchStatus;
    use crate::extract::ExtractError;

    /// Test double: treats the "document" bytes as UTF-8 text, and fails
    /// on anything starting with the `BROKEN` marker.
    struct Utf8Extractor;

    #[async_trait]
    impl TextExtractor for Utf8Extractor {
        async fn extract_text(&self, data: &[u8]) -> Result<String, ExtractError> {
            if data.starts_with(b"BROKEN") {
                return Err(ExtractError::Parse("unreadable document".to_string()));
            }
            Ok(String::from_utf8_lossy(data).into_owned())
        }
    }

    fn batch_file(index: usize, text: &str) -> UploadedFile {
        UploadedFile {
            file_name: format!("upload_{}.pdf", index),
            bytes: text.as_bytes().to_vec(),
            index,
        }
    }

    fn entry_names(archive_bytes: &[u8]) -> Vec<String> {
        let archive = ZipArchive::new(Cursor::new(archive_bytes)).unwrap();
        archive.file_names().map(str::to_string).collect()
    }

    fn read_entry(archive_bytes: &[u8], name: &str) -> Vec<u8> {
        let mut archive = ZipArchive::new(Cursor::new(archive_bytes)).unwrap();
        let mut entry = archive.by_name(name).unwrap();
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).unwrap();
        bytes
    }

    async fn run(files: Vec<UploadedFile>) -> (BatchManager, Uuid) {
        let manager = BatchManager::new(30);
        let session = manager.create_session(files.len()).await;
        let matcher = PolicyMatcher::default();
        process_batch(&manager, session.id, files, &matcher, &Utf8Extractor).await;
        (manager, session.id)
    }

    #[tokio::test]
    async fn example_batch_derives_expected_entry_names() {
        // matched, fallback, matched - the canonical three-file batch
        let files = vec![
            batch_file(0, "Contrato de seguro. Poliza No:4521 vigente."),
            batch_file(1, "sin dato"),
            batch_file(2, "Renovación Póliza NO: 778"),
        ];
        let (manager, id) = run(files).await;

        let session = manager.get_session(id).await.unwrap();
        assert_eq!(session.status, BatchStatus::Complete);
        assert_eq!(session.processed_files, 3);
        assert_eq!(session.progress(), 1.0);

        let expected = ["Poliza_4521.pdf", "Poliza_Desconocida_1.pdf", "Poliza_778.pdf"];
        for (outcome, name) in session.outcomes.iter().zip(expected) {
            assert_eq!(outcome.entry_name, name);
        }
        assert!(session.outcomes[0].matched);
        assert!(!session.outcomes[1].matched);
        assert!(session.outcomes[2].matched);

        let archive = manager.take_archive(id).await.unwrap();
        let mut names = entry_names(&archive);
        names.sort();
        let mut expected_sorted: Vec<_> = expected.iter().map(|s| s.to_string()).collect();
        expected_sorted.sort();
        assert_eq!(names, expected_sorted);
    }

    #[tokio::test]
    async fn archive_entries_keep_original_bytes() {
        let text = "Poliza No: 31415 - contenido original";
        let files = vec![batch_file(0, text)];
        let (manager, id) = run(files).await;

        let archive = manager.take_archive(id).await.unwrap();
        assert_eq!(read_entry(&archive, "Poliza_31415.pdf"), text.as_bytes());
    }

    #[tokio::test]
    async fn duplicate_identifiers_collapse_to_single_entry() {
        // both resolve to 123; the later file's bytes survive
        let files = vec![
            batch_file(0, "Póliza No: 123 primera"),
            batch_file(1, "Póliza No: 123 segunda"),
        ];
        let (manager, id) = run(files).await;

        let session = manager.get_session(id).await.unwrap();
        assert_eq!(session.status, BatchStatus::Complete);
        assert_eq!(session.processed_files, 2);

        let archive = manager.take_archive(id).await.unwrap();
        assert_eq!(entry_names(&archive), vec!["Poliza_123.pdf".to_string()]);
        assert_eq!(
            read_entry(&archive, "Poliza_123.pdf"),
            "Póliza No: 123 segunda".as_bytes()
        );
    }

    #[tokio::test]
    async fn extraction_failure_aborts_whole_batch() {
        let files = vec![
            batch_file(0, "Poliza No: 1"),
            batch_file(1, "BROKEN bytes"),
            batch_file(2, "Poliza No: 3"),
        ];
        let (manager, id) = run(files).await;

        let session = manager.get_session(id).await.unwrap();
        assert_eq!(session.status, BatchStatus::Failed);
        // the first file was processed before the abort, the third never was
        assert_eq!(session.processed_files, 1);
        let error = session.error.unwrap();
        assert!(error.contains("upload_1.pdf"));
        assert!(error.contains("file 2 of 3"));

        assert!(manager.take_archive(id).await.is_err());
    }

    #[tokio::test]
    async fn progress_is_monotonic_and_ends_at_one() {
        let files: Vec<UploadedFile> = (0..4)
            .map(|i| batch_file(i, &format!("Poliza No: {}", 1000 + i)))
            .collect();
        let (manager, id) = run(files).await;

        let session = manager.get_session(id).await.unwrap();
        assert_eq!(session.progress(), 1.0);
        assert_eq!(session.processed_files, session.total_files);
    }
}
