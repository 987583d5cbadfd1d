//! Turn-by-turn dialog
//!
//! One call per user turn. Session state is loaded, the turn is resolved
//! against it and the catalog, and the updated state is stored back.
//!
//! Text turns are evaluated in this order:
//!
//! 1. empty message → full catalog
//! 2. day count only → re-quote the selection (catalog if there is none)
//! 3. connector words while intentions are pending → merge and show options
//! 4. off-topic → clarification, unless a day count re-quotes the cart
//! 5. keyword or TF-IDF intention → ask for confirmation
//! 6. free-text search on sub-service names → options or clarification

mod extractor;
mod request;

pub use extractor::TurnExtractor;
pub use request::{Turn, TurnRequest};

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;

use booking_agent_config::{AssistantConfig, DialogueConfig, IntentConfig};
use booking_agent_core::{
    CatalogStore, DialogueStage, PersonId, QuotePersistence, QuoteRecord, QuoteSummary, SessionState,
    SessionStore, SubService, SubServiceId,
};
use booking_agent_text_processing::{normalize, Correction, SpellCorrector, TokenExtractor};

use crate::intent::IntentionDetector;
use crate::response::{OptionGroup, ResponseBuilder, TurnResponse};
use crate::session::{SessionContext, SessionManager};
use crate::suggestions::{BestSuggestion, SuggestionGenerator};
use crate::vocabulary::CatalogVocabulary;
use crate::Result;

/// Every word of the intent and domain keywords; spelling never rewrites
/// them, so an on-topic word is still recognized after correction
fn keyword_words(config: &IntentConfig) -> Vec<String> {
    config
        .services
        .iter()
        .flat_map(|service| service.keywords.iter())
        .chain(config.domain_keywords.iter())
        .flat_map(|keyword| {
            TokenExtractor::split(&normalize(keyword))
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Chatbot engine for one deployment; shared by every session
///
/// Holds no per-conversation state. Catalog-derived data (vocabulary and
/// TF-IDF index) is cached until [`invalidate_caches`](Self::invalidate_caches).
pub struct DialogueOrchestrator {
    catalog: Arc<dyn CatalogStore>,
    quotes: Arc<dyn QuotePersistence>,
    sessions: SessionManager,
    corrector: SpellCorrector,
    tokenizer: TokenExtractor,
    filler: HashSet<String>,
    vocabulary: Arc<CatalogVocabulary>,
    intents: IntentionDetector,
    suggestions: SuggestionGenerator,
    extractor: TurnExtractor,
    config: DialogueConfig,
}

impl DialogueOrchestrator {
    /// Wire the pipeline stages from configuration
    ///
    /// Fails only on an invalid spelling rule or keyword pattern.
    pub fn new(
        config: &AssistantConfig,
        catalog: Arc<dyn CatalogStore>,
        sessions: Arc<dyn SessionStore>,
        quotes: Arc<dyn QuotePersistence>,
    ) -> Result<Self> {
        let tokenizer = TokenExtractor::new(config.stopwords.iter().cloned(), config.spelling.min_token_len);
        let corrector = SpellCorrector::new(
            &config.spelling,
            config
                .stopwords
                .iter()
                .chain(config.suggestions.filler_words.iter())
                .cloned()
                .chain(keyword_words(&config.intents)),
        )?;
        let vocabulary = Arc::new(CatalogVocabulary::new(
            Arc::clone(&catalog),
            config.vocabulary.clone(),
            config.stopwords.iter().cloned(),
        ));
        let intents = IntentionDetector::new(Arc::clone(&catalog), &config.intents, tokenizer.clone())?;
        let suggestions = SuggestionGenerator::new(
            Arc::clone(&vocabulary),
            tokenizer.clone(),
            config.suggestions.clone(),
            config.stopwords.iter().cloned(),
        );
        let extractor = TurnExtractor::new(&config.dialogue.continuation_words, config.dialogue.max_days);

        tracing::info!(
            spelling_rules = corrector.rule_count(),
            intents = config.intents.services.len(),
            "Dialogue orchestrator ready"
        );

        Ok(Self {
            catalog,
            quotes,
            sessions: SessionManager::new(sessions),
            corrector,
            tokenizer,
            filler: config.suggestions.filler_words.iter().cloned().collect(),
            vocabulary,
            intents,
            suggestions,
            extractor,
            config: config.dialogue.clone(),
        })
    }

    pub fn intents(&self) -> &IntentionDetector {
        &self.intents
    }

    pub fn suggestions(&self) -> &SuggestionGenerator {
        &self.suggestions
    }

    /// Drop catalog-derived caches after a catalog write
    pub fn invalidate_caches(&self) {
        self.vocabulary.invalidate();
        self.intents.invalidate();
        tracing::info!("Catalog caches invalidated");
    }

    /// Process one turn; never fails
    pub async fn handle_turn(&self, ctx: &SessionContext, request: TurnRequest) -> TurnResponse {
        let turn = request.into_turn(self.config.max_days);
        let mut state = self.sessions.load(ctx).await;
        tracing::debug!(
            session = %ctx.session_key,
            turn = turn.kind(),
            stage = state.stage.as_str(),
            selections = state.selections.len(),
            "Handling turn"
        );

        let result = match turn {
            Turn::ClearQuote => return self.clear(ctx).await,
            Turn::FinishQuote => return self.finish(ctx, &state).await,
            Turn::SelectionUpdate { selection, days } => self.update_selection(&mut state, selection, days).await,
            Turn::ConfirmIntent { intentions, days } => self.confirm_intent(&mut state, intentions, days).await,
            Turn::TextMessage {
                message,
                selection,
                intentions,
                days,
            } => self.handle_text(&mut state, &message, selection, intentions, days).await,
        };

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(session = %ctx.session_key, error = %e, "Turn failed, showing catalog");
                state.stage = DialogueStage::PresentingOptions;
                self.fallback_catalog().await
            }
        };

        if let Err(e) = self.sessions.save(ctx, &state).await {
            tracing::warn!(session = %ctx.session_key, error = %e, "Session write failed");
        }

        response.with_session(state.stage, state.days, &state.selections)
    }

    /// Replace the stored selection with the client's list
    ///
    /// With a known day count the quote is returned directly. Without one
    /// the selection is priced for the default day count and the user is
    /// asked how many days.
    async fn update_selection(
        &self,
        state: &mut SessionState,
        selection: Vec<SubServiceId>,
        days: Option<u32>,
    ) -> Result<TurnResponse> {
        state.selections = selection;
        if days.is_some() {
            state.days = days;
        }
        if !state.has_selections() {
            return self.present_catalog(state).await;
        }

        match state.days {
            Some(days) => self.quote_selection(state, days, false).await,
            None => {
                let summary = self.price_selection(state, self.config.default_days).await?;
                if summary.is_empty() {
                    return self.present_catalog(state).await;
                }
                state.stage = DialogueStage::AwaitingDayCount;
                Ok(ResponseBuilder::ask_days(summary))
            }
        }
    }

    /// The user accepted the proposed intentions (or named their own)
    ///
    /// Falls back to the pending intentions when the request names none,
    /// and to the full catalog when there are none at all.
    async fn confirm_intent(
        &self,
        state: &mut SessionState,
        intentions: Vec<String>,
        days: Option<u32>,
    ) -> Result<TurnResponse> {
        if days.is_some() {
            state.days = days;
        }
        let names = if intentions.is_empty() {
            state.pending_intentions.clone()
        } else {
            intentions
        };
        if names.is_empty() {
            return self.present_catalog(state).await;
        }

        state.pending_intentions = names.clone();
        self.present_options(state, &names).await
    }

    /// Free-text turn, evaluated in the order listed in the module docs
    ///
    /// A selection or day count sent with the message is stored first.
    async fn handle_text(
        &self,
        state: &mut SessionState,
        message: &str,
        selection: Vec<SubServiceId>,
        intentions: Vec<String>,
        days: Option<u32>,
    ) -> Result<TurnResponse> {
        if !selection.is_empty() {
            state.selections = selection;
        }
        if days.is_some() {
            state.days = days;
        }

        let normalized = normalize(message);
        if normalized.is_empty() {
            return self.present_catalog(state).await;
        }

        if let Some(days) = self.extractor.verify_only_days(&normalized) {
            state.days = Some(days);
            if !state.has_selections() {
                let groups = self.catalog_groups().await?;
                state.stage = DialogueStage::PresentingOptions;
                return Ok(ResponseBuilder::days_noted(groups, days));
            }
            return self.quote_selection(state, days, true).await;
        }

        if self.extractor.is_continuation(&normalized) && !state.pending_intentions.is_empty() {
            state.merge_intentions(intentions);
            let names = state.pending_intentions.clone();
            return self.present_options(state, &names).await;
        }

        let correction = self.correct(&normalized).await;
        let corrected = correction.corrected.as_str();
        let message_days = self.extractor.extract_days(corrected);

        if !self.intents.is_related(corrected) {
            match (state.has_selections(), message_days) {
                (true, Some(days)) => {
                    state.days = Some(days);
                    return self.quote_selection(state, days, true).await;
                }
                (false, _) => return Ok(self.clarify(&normalized, corrected).await),
                (true, None) => {}
            }
        }
        if message_days.is_some() {
            state.days = message_days;
        }

        let mut detected: Vec<String> = self
            .intents
            .detect_intentions(corrected)
            .await?
            .into_iter()
            .map(|service| service.name)
            .collect();
        if detected.is_empty() {
            if let Some(found) = self.intents.classify_by_tfidf(corrected).await {
                detected.push(found.service.name);
            }
        }

        let still_pending = self
            .intents
            .validate_against_message(state.pending_intentions.as_slice(), corrected);

        if !detected.is_empty() {
            let already_confirmed = state.stage == DialogueStage::PresentingOptions
                && detected.iter().all(|name| still_pending.contains(name));
            if already_confirmed {
                return self.present_options(state, &detected).await;
            }

            tracing::debug!(intentions = ?detected, "Asking to confirm intentions");
            state.pending_intentions = detected;
            state.stage = DialogueStage::AwaitingIntentConfirmation;
            return Ok(ResponseBuilder::confirmation(
                &state.pending_intentions,
                state.days,
                self.correction_hint(&correction),
            ));
        }

        state.pending_intentions = still_pending;
        let groups = self.search(corrected).await?;
        if groups.is_empty() {
            return Ok(self.clarify(&normalized, corrected).await);
        }
        state.stage = DialogueStage::PresentingOptions;
        Ok(ResponseBuilder::search_results(groups, message.trim()))
    }

    /// Spelling correction; the vocabulary stage is skipped when the
    /// catalog cannot be read
    async fn correct(&self, normalized: &str) -> Correction {
        match self.vocabulary.try_terms().await {
            Ok(terms) => self.corrector.correct(normalized, Some(terms.as_slice())),
            Err(e) => {
                tracing::warn!(error = %e, "Vocabulary unavailable, rule corrections only");
                self.corrector.correct(normalized, None)
            }
        }
    }

    /// First corrected word that is not filler, as "did you mean"
    fn correction_hint(&self, correction: &Correction) -> Option<BestSuggestion> {
        if !correction.changed() {
            return None;
        }

        let before: Vec<&str> = TokenExtractor::split(&correction.original).collect();
        let after: Vec<&str> = TokenExtractor::split(&correction.corrected).collect();
        let from_rules = (before.len() == after.len())
            .then(|| {
                before
                    .iter()
                    .zip(&after)
                    .find(|(b, a)| b != a && !self.filler.contains(**a))
                    .map(|(b, a)| (b.to_string(), a.to_string()))
            })
            .flatten();

        from_rules
            .or_else(|| correction.replacements.first().cloned())
            .map(|(token, suggestion)| BestSuggestion { token, suggestion })
    }

    async fn clarify(&self, normalized: &str, corrected: &str) -> TurnResponse {
        let suggestions = self.suggestions.generate_suggestions(corrected).await;
        let mut hints = self.suggestions.generate_token_suggestions(normalized).await;
        if hints.is_empty() {
            hints = self.suggestions.fallback_token_hints(normalized).await;
        }
        let hint = SuggestionGenerator::extract_best_suggestion(&hints);

        tracing::debug!(suggestions = ?suggestions, hint = ?hint, "Asking for clarification");
        ResponseBuilder::clarification(suggestions, hint)
    }

    /// Sub-services whose name contains a message token or the whole message
    async fn search(&self, corrected: &str) -> Result<Vec<OptionGroup>> {
        let mut terms: Vec<String> = Vec::new();
        for token in self.tokenizer.extract(corrected) {
            if !self.filler.contains(&token) && !terms.contains(&token) {
                terms.push(token);
            }
        }
        if !terms.iter().any(|t| t == corrected) {
            terms.push(corrected.to_string());
        }

        let mut found: Vec<SubService> = Vec::new();
        let mut seen = HashSet::new();
        'terms: for term in &terms {
            for sub in self.catalog.list_sub_service_name_matches(term).await? {
                if found.len() >= self.config.max_search_results {
                    break 'terms;
                }
                if seen.insert(sub.id) {
                    found.push(sub);
                }
            }
        }
        if found.is_empty() {
            return Ok(Vec::new());
        }

        let services = self.catalog.list_services().await?;
        Ok(OptionGroup::group(&services, &found))
    }

    /// Every service with its sub-services
    async fn catalog_groups(&self) -> Result<Vec<OptionGroup>> {
        let services = self.catalog.list_services().await?;
        let names: Vec<String> = services.iter().map(|s| s.name.clone()).collect();
        let subs = self.catalog.list_sub_services_by_service_names(&names).await?;
        Ok(OptionGroup::group(&services, &subs))
    }

    /// Full catalog, leaving the conversation in `PresentingOptions`
    async fn present_catalog(&self, state: &mut SessionState) -> Result<TurnResponse> {
        let groups = self.catalog_groups().await?;
        state.stage = DialogueStage::PresentingOptions;
        Ok(ResponseBuilder::catalog(groups))
    }

    /// Catalog shown after a failed turn; an apology if it is unreadable too
    async fn fallback_catalog(&self) -> TurnResponse {
        match self.catalog_groups().await {
            Ok(groups) => ResponseBuilder::catalog(groups),
            Err(e) => {
                tracing::error!(error = %e, "Catalog unavailable");
                ResponseBuilder::apology()
            }
        }
    }

    /// Options for the named services only
    ///
    /// Names are compared normalized. When none of them resolves to a
    /// service with sub-services, the full catalog is shown instead.
    async fn present_options(&self, state: &mut SessionState, names: &[String]) -> Result<TurnResponse> {
        let wanted: HashSet<String> = names.iter().map(|n| normalize(n)).collect();
        let services: Vec<_> = self
            .catalog
            .list_services()
            .await?
            .into_iter()
            .filter(|service| wanted.contains(&normalize(&service.name)))
            .collect();
        let service_names: Vec<String> = services.iter().map(|s| s.name.clone()).collect();

        let subs = self
            .catalog
            .list_sub_services_by_service_names(&service_names)
            .await?;
        let groups = OptionGroup::group(&services, &subs);
        if groups.is_empty() {
            tracing::debug!(intentions = ?names, "No options for intentions, showing catalog");
            return self.present_catalog(state).await;
        }

        state.stage = DialogueStage::PresentingOptions;
        Ok(ResponseBuilder::options(groups, &service_names))
    }

    /// Price the stored selection, dropping ids that no longer resolve
    async fn price_selection(&self, state: &mut SessionState, days: u32) -> Result<QuoteSummary> {
        let unique: Vec<SubServiceId> = {
            let mut seen = HashSet::new();
            state.selections.iter().copied().filter(|id| seen.insert(*id)).collect()
        };
        let subs = self.catalog.list_sub_services_by_ids(&unique).await?;
        let by_id: HashMap<SubServiceId, &SubService> = subs.iter().map(|sub| (sub.id, sub)).collect();

        state.selections.retain(|id| {
            let known = by_id.contains_key(id);
            if !known {
                tracing::warn!(sub_service_id = id, "Selected sub-service no longer exists");
            }
            known
        });

        let lines: Vec<&SubService> = state.selections.iter().filter_map(|id| by_id.get(id).copied()).collect();
        Ok(QuoteSummary::compute(lines, days))
    }

    /// Quote the selection for `days`, or the catalog if nothing resolves
    async fn quote_selection(&self, state: &mut SessionState, days: u32, force_breakdown: bool) -> Result<TurnResponse> {
        let summary = self.price_selection(state, days).await?;
        if summary.is_empty() {
            return self.present_catalog(state).await;
        }

        state.stage = DialogueStage::Quoted;
        Ok(ResponseBuilder::quote(summary, force_breakdown))
    }

    /// Forget the session entirely
    async fn clear(&self, ctx: &SessionContext) -> TurnResponse {
        if let Err(e) = self.sessions.clear(ctx).await {
            tracing::warn!(session = %ctx.session_key, error = %e, "Session clear failed");
        }
        tracing::info!(session = %ctx.session_key, "Quote cleared");
        ResponseBuilder::cleared()
    }

    /// Persist one quote row per selected line, then clear the session
    ///
    /// Without a person or a selection nothing is touched. On a persistence
    /// failure the session is kept so the user can retry.
    async fn finish(&self, ctx: &SessionContext, state: &SessionState) -> TurnResponse {
        let untouched = |response: TurnResponse| response.with_session(state.stage, state.days, &state.selections);

        if !state.has_selections() {
            return untouched(ResponseBuilder::nothing_to_finalize());
        }
        let Some(person_id) = ctx.person_id else {
            return untouched(ResponseBuilder::finalize_requires_person());
        };

        let days = state.days.unwrap_or(self.config.default_days);
        match self.persist_quote(person_id, state, days).await {
            Ok(summary) if summary.is_empty() => untouched(ResponseBuilder::nothing_to_finalize()),
            Ok(summary) => {
                if let Err(e) = self.sessions.clear(ctx).await {
                    tracing::warn!(session = %ctx.session_key, error = %e, "Session clear failed");
                }
                tracing::info!(
                    session = %ctx.session_key,
                    person_id,
                    lines = summary.items.len(),
                    total = %summary.total,
                    "Quote finalized"
                );
                ResponseBuilder::finalized(&summary)
            }
            Err(e) => {
                tracing::error!(session = %ctx.session_key, person_id, error = %e, "Quote persistence failed");
                untouched(ResponseBuilder::finalize_failed())
            }
        }
    }

    /// Write one quote row per priced line; stops at the first failure
    async fn persist_quote(&self, person_id: PersonId, state: &SessionState, days: u32) -> Result<QuoteSummary> {
        let mut working = state.clone();
        let summary = self.price_selection(&mut working, days).await?;
        let timestamp = Utc::now();

        for line in &summary.items {
            self.quotes
                .create_quote(QuoteRecord {
                    person_id,
                    sub_service_id: line.id,
                    amount: line.subtotal,
                    timestamp,
                })
                .await?;
        }
        Ok(summary)
    }
}
