//! End-to-end tests for the in-page session: extraction, injection,
//! analysis fallback, navigation invalidation, and the panel sync contract.

use std::collections::HashMap;
use std::time::Duration;

use verdict_adapter::QueryableDocument;
use verdict_analysis::{AnalysisOrchestrator, VerdictClient};
use verdict_core::AppConfig;
use verdict_page::{
    load_fresh_analysis, AttachmentHost, InMemoryStore, KeyValueStore, LoggingSpeech, NoSpeech,
    PageError, PageSession, SpeechOutput, KEY_CURRENT_ANALYSIS, KEY_CURRENT_PRODUCT,
};
use verdict_sync::{channel, AckResponse, SyncRequest, SyncResponse};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PRODUCT_URL: &str = "https://www.amazon.in/Samsung-Galaxy-Pro/dp/B0C12345AB";
const SEARCH_URL: &str = "https://www.amazon.in/s?k=phones";

/// Base URL no service listens on: connection refused, instant fallback.
const DEAD_SERVICE: &str = "http://127.0.0.1:9";

/// Selector-to-value fixture standing in for a parsed page.
#[derive(Debug, Clone, Default)]
struct FixtureDocument {
    text: HashMap<&'static str, &'static str>,
    attrs: HashMap<&'static str, &'static str>,
}

impl FixtureDocument {
    fn amazon_product() -> Self {
        let mut doc = Self::default();
        doc.text.insert("#productTitle", "Samsung Galaxy Pro Phone");
        doc.text.insert(".a-price-whole", "74,999");
        doc.attrs
            .insert("#landingImage", "https://m.media-amazon.com/images/I/galaxy.jpg");
        doc
    }
}

impl QueryableDocument for FixtureDocument {
    fn select_text(&self, selector: &str) -> Option<String> {
        self.text.get(selector).map(|s| (*s).to_owned())
    }

    fn select_attr(&self, selector: &str, _attrs: &[&str]) -> Option<String> {
        self.attrs.get(selector).map(|s| (*s).to_owned())
    }

    fn matches(&self, selector: &str) -> bool {
        self.text.contains_key(selector) || self.attrs.contains_key(selector)
    }
}

/// Attachment surface that accepts a configured set of anchors.
#[derive(Debug, Default)]
struct RecordingHost {
    anchors: Vec<&'static str>,
    detach_count: u32,
    forced: bool,
}

impl AttachmentHost for RecordingHost {
    fn attach_at(&mut self, selector: &str) -> bool {
        self.anchors.contains(&selector)
    }

    fn attach_overlay(&mut self) -> bool {
        false
    }

    fn force_overlay(&mut self) {
        self.forced = true;
    }

    fn detach(&mut self) {
        self.detach_count += 1;
    }
}

fn test_config(api_base_url: &str) -> AppConfig {
    AppConfig {
        api_base_url: api_base_url.to_owned(),
        health_timeout_secs: 1,
        analyze_timeout_secs: 2,
        cache_ttl_secs: 300,
        max_attach_attempts: 5,
        attach_backoff_base_ms: 0,
        attach_backoff_cap_ms: 8000,
        navigation_settle_ms: 0,
        extraction_retry_delay_ms: 0,
        log_level: "info".to_owned(),
        user_agent: "verdict-test/0.1".to_owned(),
    }
}

fn session_with<S, V>(
    api_base_url: &str,
    storage: S,
    speech: V,
    initial_url: &str,
) -> PageSession<S, V>
where
    S: KeyValueStore,
    V: SpeechOutput,
{
    let config = test_config(api_base_url);
    let client = VerdictClient::new(&config).expect("client construction should not fail");
    let orchestrator =
        AnalysisOrchestrator::new(client, Duration::from_secs(config.cache_ttl_secs));
    PageSession::new(config, orchestrator, storage, speech, initial_url)
}

#[tokio::test]
async fn initialize_attaches_and_persists_on_a_product_page() {
    let store = InMemoryStore::default();
    let mut session = session_with(DEAD_SERVICE, store.clone(), LoggingSpeech, PRODUCT_URL);
    let doc = FixtureDocument::amazon_product();
    let mut host = RecordingHost {
        anchors: vec!["#apex_desktop"],
        ..RecordingHost::default()
    };

    session.initialize(&doc, &mut host).await;

    assert!(session.is_attached());
    let record = session.current_record().expect("record should exist");
    assert_eq!(record.title.as_deref(), Some("Samsung Galaxy Pro Phone"));
    assert!(store.get(KEY_CURRENT_PRODUCT).await.unwrap().is_some());
}

#[tokio::test]
async fn initialize_is_silent_on_unsupported_sites() {
    let mut session = session_with(
        DEAD_SERVICE,
        InMemoryStore::default(),
        LoggingSpeech,
        "https://news.ycombinator.com/item?id=1",
    );
    let doc = FixtureDocument::default();
    let mut host = RecordingHost::default();

    session.initialize(&doc, &mut host).await;

    assert!(!session.is_attached());
    assert!(session.current_record().is_none());
    assert!(!host.forced);
}

#[tokio::test]
async fn initialize_clears_persisted_state_off_product_pages() {
    let store = InMemoryStore::default();
    store
        .set(KEY_CURRENT_PRODUCT, serde_json::json!({"stale": true}))
        .await
        .unwrap();
    store
        .set(KEY_CURRENT_ANALYSIS, serde_json::json!({"stale": true}))
        .await
        .unwrap();

    let mut session = session_with(DEAD_SERVICE, store.clone(), LoggingSpeech, SEARCH_URL);
    let doc = FixtureDocument::default();
    let mut host = RecordingHost::default();

    session.initialize(&doc, &mut host).await;

    assert!(!session.is_attached());
    assert!(store.get(KEY_CURRENT_PRODUCT).await.unwrap().is_none());
    assert!(store.get(KEY_CURRENT_ANALYSIS).await.unwrap().is_none());
}

#[tokio::test]
async fn incomplete_extraction_still_attaches_the_affordance() {
    let mut session = session_with(
        DEAD_SERVICE,
        InMemoryStore::default(),
        LoggingSpeech,
        PRODUCT_URL,
    );
    // Page with no recognizable fields at all.
    let doc = FixtureDocument::default();
    let mut host = RecordingHost::default();

    session.initialize(&doc, &mut host).await;

    // Degraded mode: no title-backed record, but the affordance is there.
    assert!(session.is_attached());
    assert!(host.forced, "no anchors on a bare page, overlay must be forced");
    let record = session.current_record().expect("record should exist");
    assert!(!record.is_complete());
}

#[tokio::test]
async fn panel_drives_offline_analysis_through_the_sync_contract() {
    let store = InMemoryStore::default();
    let mut session = session_with(DEAD_SERVICE, store.clone(), LoggingSpeech, PRODUCT_URL);
    let doc = FixtureDocument::amazon_product();
    let mut host = RecordingHost {
        anchors: vec!["#apex_desktop"],
        ..RecordingHost::default()
    };
    session.initialize(&doc, &mut host).await;

    let (panel, mut queue) = channel(8);
    let serve = session.serve(&mut queue, &doc);
    let drive = async move {
        panel.analyze_product().await.expect("analysis must succeed");
        let data = panel
            .get_product_data()
            .await
            .expect("snapshot must succeed");
        drop(panel);
        data
    };
    let ((), data) = tokio::join!(serve, drive);

    assert!(data.is_product_page);
    let record = data.product_data.expect("snapshot should carry the record");
    assert_eq!(record.title.as_deref(), Some("Samsung Galaxy Pro Phone"));
    let analysis = data.analysis_result.expect("snapshot should carry verdict");
    assert!(analysis.meta.offline, "dead service must mean offline verdict");
    assert_eq!(analysis.score, 84);

    // The verdict was committed and persisted for the panel's next launch.
    assert!(session.current_analysis().is_some());
    assert!(load_fresh_analysis(&store, 300).await.is_some());
}

#[tokio::test]
async fn panel_gets_online_verdict_when_service_is_up() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/extension/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/extension/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": true,
            "score": 82,
            "recommendation": "Recommended",
            "pros": [["camera", 0.8]],
            "cons": [["price", -0.4]],
            "voice_verdict": "Samsung Galaxy Pro Phone scores 82 percent.",
            "product_title": "Samsung Galaxy Pro Phone",
            "product_url": PRODUCT_URL,
            "reviews_analyzed": 412,
            "processing_time": 2.7,
            "recommendations": [],
            "meta": {"confidence": 0.9, "data_quality": 0.8}
        })))
        .mount(&server)
        .await;

    let mut session = session_with(
        &server.uri(),
        InMemoryStore::default(),
        LoggingSpeech,
        PRODUCT_URL,
    );
    let doc = FixtureDocument::amazon_product();

    let result = session.analyze_current(&doc).await.expect("should analyze");
    assert_eq!(result.score, 82);
    assert!(!result.meta.offline);
}

#[tokio::test]
async fn navigation_resets_state_and_discards_stale_completions() {
    let mut session = session_with(
        DEAD_SERVICE,
        InMemoryStore::default(),
        LoggingSpeech,
        PRODUCT_URL,
    );
    let product_doc = FixtureDocument::amazon_product();
    let mut host = RecordingHost {
        anchors: vec!["#apex_desktop"],
        ..RecordingHost::default()
    };
    session.initialize(&product_doc, &mut host).await;
    let verdict = session
        .analyze_current(&product_doc)
        .await
        .expect("first analysis");
    assert_eq!(session.epoch(), 0);
    assert!(session.current_analysis().is_some());

    // SPA transition to a non-product view.
    let search_doc = FixtureDocument::default();
    let navigated = session
        .handle_navigation(SEARCH_URL, &search_doc, &mut host)
        .await;

    assert!(navigated);
    assert_eq!(session.epoch(), 1);
    assert_eq!(host.detach_count, 1);
    assert!(session.current_record().is_none());
    assert!(session.current_analysis().is_none());
    assert!(!session.is_attached());

    // A completion that raced the navigation carries epoch 0 — rejected.
    assert!(!session.commit_analysis(0, verdict.clone()));
    assert!(session.current_analysis().is_none());
    // A completion for the current epoch is accepted.
    assert!(session.commit_analysis(1, verdict));

    // Observing the same address again is not a navigation.
    let renavigated = session
        .handle_navigation(SEARCH_URL, &search_doc, &mut host)
        .await;
    assert!(!renavigated);
    assert_eq!(session.epoch(), 1);
}

#[tokio::test]
async fn analyze_off_product_page_is_the_blocking_error_case() {
    let mut session = session_with(
        DEAD_SERVICE,
        InMemoryStore::default(),
        LoggingSpeech,
        SEARCH_URL,
    );
    let doc = FixtureDocument::default();

    let err = session.analyze_current(&doc).await.unwrap_err();
    assert!(matches!(err, PageError::NoProductData));

    // Through the sync contract the same failure is a handled ack.
    let response = session
        .handle_request(SyncRequest::AnalyzeProduct, &doc)
        .await;
    assert_eq!(
        response,
        SyncResponse::Ack(AckResponse::failure(
            "cannot analyze: no product data available"
        ))
    );
}

#[tokio::test]
async fn play_verdict_reports_speech_availability() {
    let doc = FixtureDocument::amazon_product();

    let mut speaking = session_with(
        DEAD_SERVICE,
        InMemoryStore::default(),
        LoggingSpeech,
        PRODUCT_URL,
    );
    let response = speaking
        .handle_request(
            SyncRequest::PlayVerdict {
                text: "Buy it.".to_owned(),
            },
            &doc,
        )
        .await;
    assert_eq!(response, SyncResponse::Ack(AckResponse::ok()));

    let mut mute = session_with(
        DEAD_SERVICE,
        InMemoryStore::default(),
        NoSpeech,
        PRODUCT_URL,
    );
    let response = mute
        .handle_request(
            SyncRequest::PlayVerdict {
                text: "Buy it.".to_owned(),
            },
            &doc,
        )
        .await;
    match response {
        SyncResponse::Ack(ack) => {
            assert!(!ack.success);
            assert!(ack.error.unwrap().contains("speech"));
        }
        SyncResponse::ProductData(_) => panic!("expected an ack"),
    }
}
