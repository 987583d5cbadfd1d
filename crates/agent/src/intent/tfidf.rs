//! TF-IDF service scorer
//!
//! One synthetic document per service: the tokens of all its sub-service
//! names and descriptions. A query scores against a document as the sum,
//! over its distinct terms found in that document, of `tf × idf` with
//!
//! ```text
//! tf  = count(term in doc) / len(doc)
//! idf = ln(N / df(term)) + 1
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap};

use booking_agent_core::{Service, SubService};
use booking_agent_text_processing::{normalize, TokenExtractor};

/// Accepted classification
#[derive(Debug, Clone, PartialEq)]
pub struct TfidfMatch {
    pub service: Service,
    pub score: f64,
}

#[derive(Debug, Clone)]
struct Document {
    service: Service,
    tf: HashMap<String, f64>,
}

/// Term statistics over the catalog
#[derive(Debug, Clone, Default)]
pub struct TfidfIndex {
    /// Keyed by service name, so iteration order breaks ties
    docs: BTreeMap<String, Document>,
    df: HashMap<String, usize>,
}

impl TfidfIndex {
    pub fn build(services: &[Service], sub_services: &[SubService], tokenizer: &TokenExtractor) -> Self {
        let mut docs = BTreeMap::new();
        let mut df: HashMap<String, usize> = HashMap::new();

        for service in services {
            let tokens: Vec<String> = sub_services
                .iter()
                .filter(|sub| sub.service_id == service.id)
                .flat_map(|sub| tokenizer.extract(&normalize(&format!("{} {}", sub.name, sub.description))))
                .collect();
            if tokens.is_empty() {
                continue;
            }

            let len = tokens.len() as f64;
            let mut counts: HashMap<String, usize> = HashMap::new();
            for token in tokens {
                *counts.entry(token).or_default() += 1;
            }
            for term in counts.keys() {
                *df.entry(term.clone()).or_default() += 1;
            }

            let tf = counts
                .into_iter()
                .map(|(term, count)| (term, count as f64 / len))
                .collect();
            docs.insert(
                service.name.clone(),
                Document {
                    service: service.clone(),
                    tf,
                },
            );
        }

        Self { docs, df }
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn document_count(&self) -> usize {
        self.docs.len()
    }

    /// `None` for terms no document contains
    pub fn idf(&self, term: &str) -> Option<f64> {
        let df = *self.df.get(term)?;
        if df == 0 {
            return None;
        }
        Some((self.docs.len() as f64 / df as f64).ln() + 1.0)
    }

    /// Score of every service against the query terms, by service name
    pub fn scores<S: AsRef<str>>(&self, terms: &[S]) -> Vec<(&Service, f64)> {
        let query: BTreeSet<&str> = terms.iter().map(|t| t.as_ref()).collect();

        self.docs
            .values()
            .map(|doc| {
                let score: f64 = query
                    .iter()
                    .filter_map(|term| Some(doc.tf.get(*term)? * self.idf(term)?))
                    .sum();
                (&doc.service, score)
            })
            .collect()
    }

    /// Best-scoring service if it reaches `threshold`
    pub fn classify<S: AsRef<str>>(&self, terms: &[S], threshold: f64) -> Option<TfidfMatch> {
        let mut best: Option<(&Service, f64)> = None;
        for (service, score) in self.scores(terms) {
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((service, score));
            }
        }

        best.filter(|(_, score)| *score > 0.0 && *score >= threshold)
            .map(|(service, score)| TfidfMatch {
                service: service.clone(),
                score,
            })
    }
}
