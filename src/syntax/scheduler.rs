//! Progressive highlighting of rendered code blocks

use std::collections::HashMap;
use std::sync::Arc;

use super::cache::{GrammarCache, GrammarState};
use super::grammar::Grammar;
use crate::markdown::RenderedContainer;

/// What one highlight pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightReport {
    /// Code elements that now carry highlight markup
    pub highlighted: usize,
    /// Code elements left as plain escaped text
    pub plain: usize,
    /// Final state of each distinct identifier seen in the container
    pub languages: Vec<(String, GrammarState)>,
}

#[derive(Clone)]
pub struct HighlightScheduler {
    cache: Arc<GrammarCache>,
}

impl HighlightScheduler {
    pub fn new(cache: Arc<GrammarCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<GrammarCache> {
        &self.cache
    }

    /// Load every grammar the container needs, then highlight what loaded
    ///
    /// Highlighting only starts after all requested loads have settled, so no
    /// element is ever touched while its grammar is still Loading.
    pub async fn apply_to_container(&self, container: &mut RenderedContainer) -> HighlightReport {
        let ids = container.language_ids();
        if ids.is_empty() {
            return HighlightReport {
                plain: container.code_elements().count(),
                ..Default::default()
            };
        }

        let results =
            futures::future::join_all(ids.iter().map(|id| self.cache.ensure_loaded(id))).await;

        let mut grammars: HashMap<&str, Arc<Grammar>> = HashMap::new();
        for (id, result) in ids.iter().zip(results) {
            if let Ok(grammar) = result {
                grammars.insert(id.as_str(), grammar);
            }
        }

        let mut report = HighlightReport::default();
        for element in container.code_elements_mut() {
            let highlighted = grammars
                .get(element.language.as_str())
                .and_then(|grammar| grammar.highlight(&element.source));
            match highlighted {
                Some(html) => {
                    element.highlighted = Some(html);
                    report.highlighted += 1;
                }
                None => report.plain += 1,
            }
        }

        report.languages = ids
            .iter()
            .map(|id| (id.clone(), self.cache.state(id)))
            .collect();

        tracing::debug!(
            "Highlighted {} code blocks ({} plain)",
            report.highlighted,
            report.plain
        );
        report
    }
}
