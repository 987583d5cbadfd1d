//! Intention detection
//!
//! Maps a message to service categories ("intentions"):
//! - keyword sets per service, matched on word boundaries
//! - a TF-IDF scorer over catalog text, used when no keyword matches
//!
//! The TF-IDF index is built from the catalog on first use and kept until
//! [`IntentionDetector::invalidate`].

mod keywords;
mod tfidf;

pub use keywords::KeywordSet;
pub use tfidf::{TfidfIndex, TfidfMatch};

use std::sync::Arc;

use booking_agent_config::IntentConfig;
use booking_agent_core::{CatalogStore, Service, StoreError};
use booking_agent_text_processing::{normalize, TokenExtractor};

use crate::cache::LazyCache;
use crate::Result;

pub struct IntentionDetector {
    catalog: Arc<dyn CatalogStore>,
    services: Vec<KeywordSet>,
    domain: KeywordSet,
    tokenizer: TokenExtractor,
    tfidf_threshold: f64,
    index: LazyCache<TfidfIndex>,
}

impl IntentionDetector {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        config: &IntentConfig,
        tokenizer: TokenExtractor,
    ) -> Result<Self> {
        let services = config
            .services
            .iter()
            .map(|entry| KeywordSet::compile(&entry.service, &entry.keywords))
            .collect::<Result<Vec<_>>>()?;
        let domain = KeywordSet::compile("domain", &config.domain_keywords)?;

        Ok(Self {
            catalog,
            services,
            domain,
            tokenizer,
            tfidf_threshold: config.tfidf_threshold,
            index: LazyCache::new(),
        })
    }

    /// Configured service names whose keywords occur in the message
    pub fn matched_service_names(&self, message: &str) -> Vec<String> {
        let text = normalize(message);
        if text.is_empty() {
            return Vec::new();
        }

        self.services
            .iter()
            .filter(|set| set.matches(&text))
            .map(|set| set.label().to_string())
            .collect()
    }

    /// Catalog services whose keywords occur in the message
    ///
    /// Keyword matches with no catalog service of that name are skipped.
    pub async fn detect_intentions(&self, message: &str) -> Result<Vec<Service>> {
        let mut found = Vec::new();
        for name in self.matched_service_names(message) {
            match self.catalog.get_service_by_name(&name).await? {
                Some(service) => found.push(service),
                None => tracing::debug!(service = %name, "Keyword match has no catalog service"),
            }
        }
        Ok(found)
    }

    /// Keep only the intentions the current message still mentions
    pub fn validate_against_message<S: AsRef<str>>(&self, intentions: &[S], message: &str) -> Vec<String> {
        let text = normalize(message);
        let mut kept: Vec<String> = Vec::new();

        for name in intentions {
            let name = name.as_ref();
            let still_mentioned = self
                .services
                .iter()
                .find(|set| set.is_labeled(name))
                .map_or(false, |set| set.matches(&text));
            if still_mentioned && !kept.iter().any(|k| k == name) {
                kept.push(name.to_string());
            }
        }
        kept
    }

    /// On-topic gate: any service or domain keyword present
    ///
    /// An empty message counts as related.
    pub fn is_related(&self, message: &str) -> bool {
        let text = normalize(message);
        if text.is_empty() {
            return true;
        }
        self.domain.matches(&text) || self.services.iter().any(|set| set.matches(&text))
    }

    /// Best TF-IDF service for the message, if it clears the threshold
    pub async fn classify_by_tfidf(&self, message: &str) -> Option<TfidfMatch> {
        let terms = self.tokenizer.extract(&normalize(message));
        if terms.is_empty() {
            return None;
        }

        let index = self.tfidf_index().await;
        let result = index.classify(&terms, self.tfidf_threshold);
        tracing::debug!(
            terms = ?terms,
            service = result.as_ref().map(|m| m.service.name.as_str()),
            score = result.as_ref().map(|m| m.score),
            "TF-IDF classification"
        );
        result
    }

    /// The index, or an empty one while the catalog is unreadable
    pub async fn tfidf_index(&self) -> Arc<TfidfIndex> {
        let built = self
            .index
            .get_or_try_build(move || async move {
                let services = self.catalog.list_services().await?;
                let names: Vec<String> = services.iter().map(|s| s.name.clone()).collect();
                let subs = self.catalog.list_sub_services_by_service_names(&names).await?;
                let index = TfidfIndex::build(&services, &subs, &self.tokenizer);
                tracing::debug!(documents = index.document_count(), "TF-IDF index built");
                Ok::<_, StoreError>(index)
            })
            .await;

        built.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "TF-IDF index build failed, classifying against nothing");
            Arc::new(TfidfIndex::default())
        })
    }

    pub fn invalidate(&self) {
        self.index.invalidate();
    }
}
