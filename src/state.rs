//! Application state management

use std::sync::Arc;

use crate::batch::BatchManager;
use crate::config::Config;
use crate::extract::{PdfTextExtractor, TextExtractor};
use crate::matcher::{PatternError, PolicyMatcher};

/// Error type for state initialization
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Failed to compile policy pattern: {0}")]
    Pattern(#[from] PatternError),
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    batches: BatchManager,
    matcher: PolicyMatcher,
    extractor: Arc<dyn TextExtractor>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Compiles the configured policy pattern; an invalid override is a
    /// startup error rather than a silent fallback.
    pub fn new(config: Config) -> Result<Self, StateError> {
        let matcher = PolicyMatcher::new(&config.batch.pattern)?;
        let batches = BatchManager::new(config.batch.session_expiry_minutes);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                batches,
                matcher,
                extractor: Arc::new(PdfTextExtractor),
            }),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the batch session manager
    pub fn batches(&self) -> &BatchManager {
        &self.inner.batches
    }

    /// Get the policy matcher
    pub fn matcher(&self) -> &PolicyMatcher {
        &self.inner.matcher
    }

    /// Get the text extractor
    pub fn extractor(&self) -> &dyn TextExtractor {
        self.inner.extractor.as_ref()
    }
}
