//! Grammar cache with per-language request dedupe
//!
//! Each language moves through `Unloaded -> Loading -> Loaded | Failed` at
//! most once per cache. A `Loading` entry holds a shared future, so every
//! request that arrives while a fetch is in flight awaits that same fetch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;

use super::grammar::{Grammar, GrammarError, GrammarSource};
use super::languages::LanguageId;

type GrammarFuture = Shared<BoxFuture<'static, Result<Arc<Grammar>, GrammarError>>>;

/// Observable load state of one language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrammarState {
    Unloaded,
    Loading,
    Loaded,
    Failed,
}

enum Entry {
    Loading(GrammarFuture),
    Loaded(Arc<Grammar>),
    Failed(GrammarError),
}

impl Entry {
    fn state(&self) -> GrammarState {
        match self {
            Entry::Loading(_) => GrammarState::Loading,
            Entry::Loaded(_) => GrammarState::Loaded,
            Entry::Failed(_) => GrammarState::Failed,
        }
    }
}

pub struct GrammarCache {
    source: Arc<dyn GrammarSource>,
    fetch_timeout: Duration,
    entries: Mutex<HashMap<LanguageId, Entry>>,
}

impl GrammarCache {
    pub fn new(source: Arc<dyn GrammarSource>, fetch_timeout: Duration) -> Self {
        Self {
            source,
            fetch_timeout,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Current state for a fence identifier; unsupported ids read as Unloaded
    pub fn state(&self, identifier: &str) -> GrammarState {
        let Some(language) = LanguageId::from_identifier(identifier) else {
            return GrammarState::Unloaded;
        };
        self.entries
            .lock()
            .get(&language)
            .map(Entry::state)
            .unwrap_or(GrammarState::Unloaded)
    }

    /// Make the grammar for `identifier` available
    ///
    /// Loaded grammars return at once, in-flight loads are joined, and
    /// failures are remembered for the lifetime of the cache. Identifiers
    /// outside the allow-list are rejected without creating an entry.
    pub async fn ensure_loaded(&self, identifier: &str) -> Result<Arc<Grammar>, GrammarError> {
        let Some(language) = LanguageId::from_identifier(identifier) else {
            tracing::warn!("Language '{}' not supported for syntax highlighting", identifier);
            return Err(GrammarError::Unsupported(identifier.to_string()));
        };

        let pending = {
            let mut entries = self.entries.lock();
            match entries.get(&language) {
                Some(Entry::Loaded(grammar)) => return Ok(Arc::clone(grammar)),
                Some(Entry::Failed(err)) => return Err(err.clone()),
                Some(Entry::Loading(pending)) => {
                    tracing::trace!("Joining in-flight grammar load for {}", language);
                    pending.clone()
                }
                None => {
                    tracing::debug!("Fetching grammar for {}", language);
                    let pending = self.start_fetch(language);
                    entries.insert(language, Entry::Loading(pending.clone()));
                    pending
                }
            }
        };

        let result = pending.await;
        self.settle(language, &result);
        result
    }

    fn start_fetch(&self, language: LanguageId) -> GrammarFuture {
        let source = Arc::clone(&self.source);
        let timeout = self.fetch_timeout;
        async move {
            match tokio::time::timeout(timeout, source.fetch(language)).await {
                Ok(Ok(grammar)) => Ok(Arc::new(grammar)),
                Ok(Err(err)) => Err(err),
                Err(_) => Err(GrammarError::Timeout {
                    language,
                    timeout_ms: timeout.as_millis() as u64,
                }),
            }
        }
        .boxed()
        .shared()
    }

    /// Every waiter calls this; only the first one changes anything
    fn settle(&self, language: LanguageId, result: &Result<Arc<Grammar>, GrammarError>) {
        let mut entries = self.entries.lock();
        if !matches!(entries.get(&language), Some(Entry::Loading(_))) {
            return;
        }
        let entry = match result {
            Ok(grammar) => {
                tracing::info!("Grammar for {} loaded", language);
                Entry::Loaded(Arc::clone(grammar))
            }
            Err(err) => {
                tracing::warn!("Failed to load language {}: {}", language, err);
                Entry::Failed(err.clone())
            }
        };
        entries.insert(language, entry);
    }

    /// Request a set of languages up front; failures only get logged
    pub async fn warm<S: AsRef<str>>(&self, identifiers: &[S]) {
        let loads = identifiers.iter().map(|id| self.ensure_loaded(id.as_ref()));
        let results = futures::future::join_all(loads).await;
        let loaded = results.iter().filter(|r| r.is_ok()).count();
        tracing::debug!("Warmed {}/{} grammars", loaded, identifiers.len());
    }

    /// Languages currently Loaded
    pub fn loaded_languages(&self) -> Vec<LanguageId> {
        let entries = self.entries.lock();
        LanguageId::ALL
            .into_iter()
            .filter(|lang| matches!(entries.get(lang), Some(Entry::Loaded(_))))
            .collect()
    }
}
