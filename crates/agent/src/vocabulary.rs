//! Catalog vocabulary
//!
//! Candidate terms for spelling correction and suggestions: the configured
//! base list unioned with tokens taken from sub-service names and
//! descriptions. Built on first use and kept until `invalidate`.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use booking_agent_config::VocabularyConfig;
use booking_agent_core::{CatalogStore, StoreError};
use booking_agent_text_processing::{normalize, TokenExtractor};

use crate::cache::LazyCache;

pub struct CatalogVocabulary {
    catalog: Arc<dyn CatalogStore>,
    config: VocabularyConfig,
    stopwords: HashSet<String>,
    cache: LazyCache<Vec<String>>,
}

impl CatalogVocabulary {
    pub fn new<I, S>(catalog: Arc<dyn CatalogStore>, config: VocabularyConfig, stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            catalog,
            config,
            stopwords: stopwords.into_iter().map(Into::into).collect(),
            cache: LazyCache::new(),
        }
    }

    /// The static list, sorted and deduplicated
    pub fn base_terms(&self) -> Vec<String> {
        self.config
            .base_terms
            .iter()
            .map(|term| normalize(term))
            .filter(|term| !term.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Vocabulary built from the catalog; errors are not cached
    pub async fn try_terms(&self) -> Result<Arc<Vec<String>>, StoreError> {
        self.cache
            .get_or_try_build(move || async move {
                let pairs = self
                    .catalog
                    .list_all_for_vocabulary(self.config.catalog_limit)
                    .await?;
                let terms = self.build(&pairs);
                tracing::debug!(rows = pairs.len(), terms = terms.len(), "Vocabulary built");
                Ok(terms)
            })
            .await
    }

    /// Vocabulary, degrading to the base list when the catalog is unreadable
    pub async fn terms(&self) -> Arc<Vec<String>> {
        match self.try_terms().await {
            Ok(terms) => terms,
            Err(e) => {
                tracing::warn!(error = %e, "Vocabulary build failed, using base terms");
                Arc::new(self.base_terms())
            }
        }
    }

    pub fn invalidate(&self) {
        self.cache.invalidate();
    }

    fn build(&self, pairs: &[(String, String)]) -> Vec<String> {
        let mut terms: BTreeSet<String> = self.base_terms().into_iter().collect();

        for (name, description) in pairs {
            let text = normalize(&format!("{} {}", name, description));
            terms.extend(
                TokenExtractor::split(&text)
                    .filter(|token| self.admits(token))
                    .map(str::to_string),
            );
        }

        terms.into_iter().collect()
    }

    fn admits(&self, token: &str) -> bool {
        if self.stopwords.contains(token) || token.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
        let len = token.chars().count();
        (self.config.min_term_len..=self.config.max_term_len).contains(&len)
            || self.config.short_terms_allowed.iter().any(|t| t == token)
    }
}
