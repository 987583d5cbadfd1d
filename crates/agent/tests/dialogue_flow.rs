//! End-to-end dialog scenarios against the in-memory stores

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use booking_agent_agent::{DialogueOrchestrator, SessionContext, TurnRequest, TurnResponse};
use booking_agent_config::AssistantConfig;
use booking_agent_core::{
    CatalogStore, DialogueStage, QuotePersistence, QuoteRecord, Service, StoreError, StoreResult,
    SubService, SubServiceId,
};
use booking_agent_persistence::{InMemoryCatalog, InMemoryQuoteLedger, InMemorySessionStore};

fn catalog() -> InMemoryCatalog {
    let price = |p: i64| Decimal::from(p);
    InMemoryCatalog::new(
        vec![
            Service::new(1, "Alquiler"),
            Service::new(2, "Animación"),
            Service::new(3, "Publicidad"),
        ],
        vec![
            SubService::new(1, 1, "Parlante JBL", "Sonido potente para eventos", price(100)),
            SubService::new(2, 1, "Luces robóticas", "Iluminacion LED", price(200)),
            SubService::new(3, 1, "Mezcladora Pioneer", "", price(150)),
            SubService::new(4, 2, "DJ profesional", "Musica toda la noche", price(300)),
            SubService::new(5, 2, "Animador infantil", "", price(250)),
            SubService::new(6, 3, "Cuña radial", "Spot de 30 segundos", price(80)),
            SubService::new(7, 3, "Perifoneo", "", price(60)),
        ],
    )
}

/// Catalog whose service lookups or every read can be made to fail
struct FlakyCatalog {
    inner: InMemoryCatalog,
    fail_lookups: AtomicBool,
    fail_all: AtomicBool,
}

impl FlakyCatalog {
    fn new() -> Self {
        Self {
            inner: catalog(),
            fail_lookups: AtomicBool::new(false),
            fail_all: AtomicBool::new(false),
        }
    }

    fn check(&self) -> StoreResult<()> {
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(StoreError::catalog("connection reset"));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for FlakyCatalog {
    async fn list_services(&self) -> StoreResult<Vec<Service>> {
        self.check()?;
        self.inner.list_services().await
    }

    async fn get_service_by_name(&self, name: &str) -> StoreResult<Option<Service>> {
        self.check()?;
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(StoreError::catalog("lookup timed out"));
        }
        self.inner.get_service_by_name(name).await
    }

    async fn list_sub_services_by_ids(&self, ids: &[SubServiceId]) -> StoreResult<Vec<SubService>> {
        self.check()?;
        self.inner.list_sub_services_by_ids(ids).await
    }

    async fn list_sub_services_by_service_names(&self, names: &[String]) -> StoreResult<Vec<SubService>> {
        self.check()?;
        self.inner.list_sub_services_by_service_names(names).await
    }

    async fn list_sub_service_name_matches(&self, term: &str) -> StoreResult<Vec<SubService>> {
        self.check()?;
        self.inner.list_sub_service_name_matches(term).await
    }

    async fn list_all_for_vocabulary(&self, limit: usize) -> StoreResult<Vec<(String, String)>> {
        self.check()?;
        self.inner.list_all_for_vocabulary(limit).await
    }
}

struct FailingLedger;

#[async_trait]
impl QuotePersistence for FailingLedger {
    async fn create_quote(&self, _record: QuoteRecord) -> StoreResult<()> {
        Err(StoreError::persistence("disk full"))
    }
}

struct Harness {
    orchestrator: DialogueOrchestrator,
    catalog: Arc<InMemoryCatalog>,
    sessions: Arc<InMemorySessionStore>,
    ledger: Arc<InMemoryQuoteLedger>,
}

impl Harness {
    fn new() -> Self {
        Self::with_config(AssistantConfig::default())
    }

    fn with_config(config: AssistantConfig) -> Self {
        let catalog = Arc::new(catalog());
        let sessions = Arc::new(InMemorySessionStore::new());
        let ledger = Arc::new(InMemoryQuoteLedger::new());
        let orchestrator = DialogueOrchestrator::new(
            &config,
            Arc::clone(&catalog) as Arc<dyn CatalogStore>,
            Arc::clone(&sessions) as _,
            Arc::clone(&ledger) as _,
        )
        .unwrap();

        Self {
            orchestrator,
            catalog,
            sessions,
            ledger,
        }
    }

    async fn turn(&self, ctx: &SessionContext, request: TurnRequest) -> TurnResponse {
        self.orchestrator.handle_turn(ctx, request).await
    }

    async fn say(&self, ctx: &SessionContext, message: &str) -> TurnResponse {
        self.turn(ctx, TurnRequest::text(message)).await
    }
}

fn group_names(response: &TurnResponse) -> Vec<String> {
    response
        .option_groups
        .as_ref()
        .map(|groups| groups.iter().map(|g| g.service.clone()).collect())
        .unwrap_or_default()
}

fn item_ids(response: &TurnResponse) -> Vec<SubServiceId> {
    response
        .option_groups
        .as_ref()
        .map(|groups| groups.iter().flat_map(|g| g.items.iter().map(|i| i.id)).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_misspelled_request_asks_for_confirmation_then_lists_options() {
    let h = Harness::new();
    let ctx = SessionContext::new("s1");

    let response = h.say(&ctx, "nesecito alqiler de equipos").await;
    assert_eq!(response.state, DialogueStage::AwaitingIntentConfirmation);
    assert!(response.message.contains("Alquiler"));
    let actions = response.actions.expect("confirmation actions");
    assert_eq!(actions[0].meta.intentions, vec!["Alquiler"]);
    let hint = response.hint.expect("spelling hint");
    assert_eq!(hint.token, "alqiler");
    assert_eq!(hint.suggestion, "alquiler");

    let response = h.turn(&ctx, TurnRequest::confirm(vec![], None)).await;
    assert_eq!(response.state, DialogueStage::PresentingOptions);
    assert_eq!(group_names(&response), vec!["Alquiler"]);
    assert_eq!(item_ids(&response), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_day_count_reprices_selection() {
    let h = Harness::new();
    let ctx = SessionContext::new("s2");

    let response = h.turn(&ctx, TurnRequest::select(vec![1, 2], None)).await;
    assert_eq!(response.state, DialogueStage::AwaitingDayCount);
    assert_eq!(response.quote.as_ref().unwrap().total, Decimal::from(300));

    let response = h.say(&ctx, "3 dias").await;
    assert_eq!(response.state, DialogueStage::Quoted);
    assert_eq!(response.days, Some(3));
    assert_eq!(response.previous_selections, Some(vec![1, 2]));

    let quote = response.quote.unwrap();
    assert_eq!(quote.total, Decimal::from(900));
    assert_eq!(quote.items[0].subtotal, Decimal::from(300));
    assert_eq!(quote.items[1].subtotal, Decimal::from(600));
    assert!(response.message.contains("Total: $900.00"));
}

#[tokio::test]
async fn test_selection_and_days_in_one_request() {
    let h = Harness::new();
    let ctx = SessionContext::new("s3");

    let request = TurnRequest {
        message: Some("3 dias".into()),
        ..TurnRequest::select(vec![1, 2], None)
    };
    let response = h.turn(&ctx, request).await;
    assert_eq!(response.quote.unwrap().total, Decimal::from(900));

    let response = h.turn(&ctx, TurnRequest::select(vec![4, 4], Some(2))).await;
    assert_eq!(response.state, DialogueStage::Quoted);
    assert_eq!(response.quote.unwrap().total, Decimal::from(1200));
}

#[tokio::test]
async fn test_empty_message_shows_catalog() {
    let h = Harness::new();
    let ctx = SessionContext::new("s4");

    let response = h.say(&ctx, "").await;
    assert_eq!(response.state, DialogueStage::PresentingOptions);
    assert_eq!(group_names(&response), vec!["Alquiler", "Animación", "Publicidad"]);
    assert_eq!(item_ids(&response).len(), 7);
}

#[tokio::test]
async fn test_day_count_without_selection_shows_catalog() {
    let h = Harness::new();
    let ctx = SessionContext::new("s5");

    let response = h.say(&ctx, "por 2 dias").await;
    assert_eq!(response.state, DialogueStage::PresentingOptions);
    assert_eq!(response.days, Some(2));
    assert_eq!(item_ids(&response).len(), 7);
    assert_eq!(h.sessions.snapshot("s5").unwrap().days, Some(2));
}

#[tokio::test]
async fn test_off_topic_asks_for_clarification() {
    let h = Harness::new();
    let ctx = SessionContext::new("s6");

    let response = h.say(&ctx, "cual es la capital de francia").await;
    let suggestions = response.suggestions.expect("suggestions");
    assert!(!suggestions.is_empty());
    assert!(suggestions.len() <= 5);
    assert!(response.option_groups.is_none());
    assert!(response.quote.is_none());
}

#[tokio::test]
async fn test_off_topic_day_change_requotes_cart() {
    let h = Harness::new();
    let ctx = SessionContext::new("s7");

    h.turn(&ctx, TurnRequest::select(vec![1], Some(1))).await;
    let response = h.say(&ctx, "mejor que sean 4 dias").await;

    assert_eq!(response.state, DialogueStage::Quoted);
    assert_eq!(response.quote.unwrap().total, Decimal::from(400));
}

#[tokio::test]
async fn test_continuation_merges_intentions() {
    let h = Harness::new();
    let ctx = SessionContext::new("s8");

    h.say(&ctx, "necesito alquiler").await;
    h.turn(&ctx, TurnRequest::confirm(vec!["Alquiler".into()], None)).await;

    let request = TurnRequest {
        intentions: vec!["Publicidad".into()],
        ..TurnRequest::text("tambien")
    };
    let response = h.turn(&ctx, request).await;
    assert_eq!(group_names(&response), vec!["Alquiler", "Publicidad"]);
    assert_eq!(
        h.sessions.snapshot("s8").unwrap().pending_intentions,
        vec!["Alquiler", "Publicidad"]
    );
}

#[tokio::test]
async fn test_confirmed_intention_skips_second_confirmation() {
    let h = Harness::new();
    let ctx = SessionContext::new("s9");

    h.say(&ctx, "un dj").await;
    h.turn(&ctx, TurnRequest::confirm(vec![], None)).await;

    let response = h.say(&ctx, "que tipo de dj tienen").await;
    assert_eq!(response.state, DialogueStage::PresentingOptions);
    assert!(response.actions.is_none());
    assert_eq!(group_names(&response), vec!["Animación"]);
}

#[tokio::test]
async fn test_stale_intention_is_not_reused() {
    let h = Harness::new();
    let ctx = SessionContext::new("s10");

    h.say(&ctx, "un dj").await;
    h.turn(&ctx, TurnRequest::confirm(vec![], None)).await;

    let response = h.say(&ctx, "y una cuña para la radio").await;
    assert_eq!(response.state, DialogueStage::AwaitingIntentConfirmation);
    assert_eq!(response.actions.unwrap()[0].meta.intentions, vec!["Publicidad"]);
}

#[tokio::test]
async fn test_tfidf_detects_intention_without_keywords() {
    let h = Harness::new();
    let ctx = SessionContext::new("s11");

    let response = h.say(&ctx, "pioneer para la fiesta").await;
    assert_eq!(response.state, DialogueStage::AwaitingIntentConfirmation);
    assert_eq!(response.actions.unwrap()[0].meta.intentions, vec!["Alquiler"]);
}

#[tokio::test]
async fn test_free_text_search() {
    let mut config = AssistantConfig::default();
    config.intents.tfidf_threshold = 50.0;
    let h = Harness::with_config(config);
    let ctx = SessionContext::new("s12");

    let response = h.say(&ctx, "pioneer para la fiesta").await;
    assert_eq!(response.state, DialogueStage::PresentingOptions);
    assert_eq!(item_ids(&response), vec![3]);

    let response = h.say(&ctx, "fiesta sorpresa").await;
    assert!(response.option_groups.is_none());
    assert!(response.suggestions.is_some());
}

#[tokio::test]
async fn test_domain_keyword_survives_spelling_correction() {
    let h = Harness::new();
    h.catalog.add_sub_service(SubService::new(
        8,
        2,
        "Show Fiestas Infantiles",
        "Payasos y juegos para fiestas",
        Decimal::from(220),
    ));
    h.orchestrator.invalidate_caches();
    let ctx = SessionContext::new("s12b");

    // "fiesta" must not be rewritten to the catalog term "fiestas"
    let response = h.say(&ctx, "algo para mi fiesta").await;
    assert_eq!(response.state, DialogueStage::PresentingOptions);
    assert_eq!(item_ids(&response), vec![8]);
    assert!(response.hint.is_none());
}

#[tokio::test]
async fn test_intent_keyword_survives_spelling_correction() {
    let h = Harness::new();
    h.catalog.add_sub_service(SubService::new(
        9,
        3,
        "Redes sociales",
        "Anuncios pagados",
        Decimal::from(90),
    ));
    h.orchestrator.invalidate_caches();
    let ctx = SessionContext::new("s12c");

    let response = h.say(&ctx, "quiero un anuncio").await;
    assert_eq!(response.state, DialogueStage::AwaitingIntentConfirmation);
    assert_eq!(response.actions.unwrap()[0].meta.intentions, vec!["Publicidad"]);
}

#[tokio::test]
async fn test_decomposed_accents_are_understood() {
    let h = Harness::new();
    let ctx = SessionContext::new("s12d");

    let response = h.say(&ctx, "quiero animacio\u{301}n").await;
    assert_eq!(response.state, DialogueStage::AwaitingIntentConfirmation);
    assert_eq!(response.actions.unwrap()[0].meta.intentions, vec!["Animación"]);
}

#[tokio::test]
async fn test_clear_wipes_session() {
    let h = Harness::new();
    let ctx = SessionContext::new("s13");

    h.turn(&ctx, TurnRequest::select(vec![1, 2], Some(2))).await;
    assert!(h.sessions.snapshot("s13").is_some());

    let response = h.turn(&ctx, TurnRequest::clear()).await;
    assert_eq!(response.state, DialogueStage::Idle);
    assert!(response.previous_selections.is_none());
    assert!(h.sessions.snapshot("s13").is_none());
}

#[tokio::test]
async fn test_finish_persists_one_row_per_line() {
    let h = Harness::new();
    let ctx = SessionContext::new("s14").with_person(7);

    h.turn(&ctx, TurnRequest::select(vec![1, 2, 2], Some(2))).await;
    let response = h.turn(&ctx, TurnRequest::finish()).await;
    assert!(response.message.contains("$1000.00"));

    let rows = h.ledger.records_for(7);
    let amounts: Vec<Decimal> = rows.iter().map(|r| r.amount).collect();
    assert_eq!(amounts, vec![Decimal::from(200), Decimal::from(400), Decimal::from(400)]);
    assert!(h.sessions.snapshot("s14").is_none());
}

#[tokio::test]
async fn test_finish_requires_person_and_selection() {
    let h = Harness::new();

    let anonymous = SessionContext::new("s15");
    let response = h.turn(&anonymous, TurnRequest::finish()).await;
    assert!(response.message.contains("seleccionados"));

    h.turn(&anonymous, TurnRequest::select(vec![1], Some(1))).await;
    let response = h.turn(&anonymous, TurnRequest::finish()).await;
    assert!(response.message.contains("iniciar sesión"));
    assert_eq!(h.sessions.snapshot("s15").unwrap().selections, vec![1]);
    assert!(h.ledger.records().is_empty());
}

#[tokio::test]
async fn test_finish_failure_keeps_session() {
    let catalog = Arc::new(catalog());
    let sessions = Arc::new(InMemorySessionStore::new());
    let orchestrator = DialogueOrchestrator::new(
        &AssistantConfig::default(),
        catalog,
        Arc::clone(&sessions) as _,
        Arc::new(FailingLedger),
    )
    .unwrap();
    let ctx = SessionContext::new("s16").with_person(3);

    orchestrator.handle_turn(&ctx, TurnRequest::select(vec![1], Some(2))).await;
    let response = orchestrator.handle_turn(&ctx, TurnRequest::finish()).await;

    assert!(response.message.contains("No pudimos registrar"));
    assert_eq!(response.previous_selections, Some(vec![1]));
    assert_eq!(sessions.snapshot("s16").unwrap().selections, vec![1]);
}

#[tokio::test]
async fn test_internal_fault_falls_back_to_catalog() {
    let catalog = Arc::new(FlakyCatalog::new());
    catalog.fail_lookups.store(true, Ordering::SeqCst);
    let orchestrator = DialogueOrchestrator::new(
        &AssistantConfig::default(),
        Arc::clone(&catalog) as _,
        Arc::new(InMemorySessionStore::new()),
        Arc::new(InMemoryQuoteLedger::new()),
    )
    .unwrap();
    let ctx = SessionContext::new("s17");

    let response = orchestrator.handle_turn(&ctx, TurnRequest::text("un dj")).await;
    assert_eq!(response.state, DialogueStage::PresentingOptions);
    assert_eq!(item_ids(&response).len(), 7);

    catalog.fail_all.store(true, Ordering::SeqCst);
    let response = orchestrator.handle_turn(&ctx, TurnRequest::text("un dj")).await;
    assert!(response.option_groups.is_none());
    assert!(!response.message.is_empty());
}

#[tokio::test]
async fn test_removed_sub_service_is_dropped_from_quote() {
    let h = Harness::new();
    let ctx = SessionContext::new("s18");

    h.turn(&ctx, TurnRequest::select(vec![1, 2], Some(1))).await;
    h.catalog.remove_sub_service(2);

    let response = h.say(&ctx, "2 dias").await;
    let quote = response.quote.unwrap();
    assert_eq!(quote.items.len(), 1);
    assert_eq!(quote.total, Decimal::from(200));
    assert_eq!(h.sessions.snapshot("s18").unwrap().selections, vec![1]);
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let h = Harness::new();
    let a = SessionContext::new("a");
    let b = SessionContext::new("b");

    h.turn(&a, TurnRequest::select(vec![1], Some(1))).await;
    h.turn(&b, TurnRequest::select(vec![4], Some(1))).await;

    assert_eq!(h.sessions.snapshot("a").unwrap().selections, vec![1]);
    assert_eq!(h.sessions.snapshot("b").unwrap().selections, vec![4]);
}

#[tokio::test]
async fn test_catalog_change_visible_after_invalidation() {
    let h = Harness::new();
    let detector = h.orchestrator.intents();
    assert!(detector.classify_by_tfidf("maquina de humo").await.is_none());

    h.catalog
        .add_sub_service(SubService::new(8, 1, "Máquina de humo", "", Decimal::from(90)));
    assert!(detector.classify_by_tfidf("maquina de humo").await.is_none());

    h.orchestrator.invalidate_caches();
    let found = detector.classify_by_tfidf("maquina de humo").await.unwrap();
    assert_eq!(found.service.name, "Alquiler");
}

#[tokio::test]
async fn test_detector_edge_cases() {
    let h = Harness::new();
    let detector = h.orchestrator.intents();

    // an empty message is treated as on-topic
    assert!(detector.is_related(""));
    assert!(detector.classify_by_tfidf("").await.is_none());
}

#[tokio::test]
async fn test_suggestion_caps() {
    let h = Harness::new();
    let generator = h.orchestrator.suggestions();

    let suggestions = generator.generate_suggestions("parlantes luces mezcladoras").await;
    assert!(!suggestions.is_empty());
    assert!(suggestions.len() <= 5);

    let hints = generator.generate_token_suggestions("necesito parlntes").await;
    assert_eq!(hints.len(), 1);
    assert!(hints[0].suggestions.len() <= 6);
    assert_eq!(hints[0].suggestions[0], "parlante");
}
