//! The per-navigation-epoch page session.
//!
//! One [`PageSession`] lives in the in-page context and owns the current
//! view's state: which site profile matched, the extracted record, the last
//! verdict, and the injection state machine. Every operation runs through
//! the session rather than ambient globals, so a navigation epoch cleanly
//! invalidates everything that belonged to the previous view.

use std::time::Duration;

use verdict_adapter::{
    extract, host_of, is_product_page, resolve_site, QueryableDocument, SiteProfile,
};
use verdict_analysis::AnalysisOrchestrator;
use verdict_core::{AppConfig, ProductRecord, ScoreResult};
use verdict_sync::{
    AckResponse, ProductDataResponse, ResponderQueue, SyncRequest, SyncResponse,
};

use crate::error::PageError;
use crate::inject::{AttachmentHost, InjectionRetryController};
use crate::navigation::NavigationWatcher;
use crate::speech::{SpeechOutput, VERDICT_SPEECH_PITCH, VERDICT_SPEECH_RATE};
use crate::storage::{
    KeyValueStore, StoredAnalysis, KEY_CURRENT_ANALYSIS, KEY_CURRENT_PRODUCT,
};

/// The in-page runtime context for one page lifetime.
///
/// `S` and `V` are the host-provided collaborators for persistence and
/// speech; documents and attachment surfaces are passed per call because
/// they are replaced wholesale on every navigation.
pub struct PageSession<S, V> {
    config: AppConfig,
    orchestrator: AnalysisOrchestrator,
    injection: InjectionRetryController,
    watcher: NavigationWatcher,
    profile: Option<&'static SiteProfile>,
    record: Option<ProductRecord>,
    analysis: Option<ScoreResult>,
    storage: S,
    speech: V,
}

impl<S: KeyValueStore, V: SpeechOutput> PageSession<S, V> {
    #[must_use]
    pub fn new(
        config: AppConfig,
        orchestrator: AnalysisOrchestrator,
        storage: S,
        speech: V,
        initial_url: impl Into<String>,
    ) -> Self {
        let injection = InjectionRetryController::from_config(&config);
        Self {
            config,
            orchestrator,
            injection,
            watcher: NavigationWatcher::new(initial_url),
            profile: None,
            record: None,
            analysis: None,
            storage,
            speech,
        }
    }

    /// The epoch of the view the session currently describes.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.watcher.epoch()
    }

    #[must_use]
    pub fn current_record(&self) -> Option<&ProductRecord> {
        self.record.as_ref()
    }

    #[must_use]
    pub fn current_analysis(&self) -> Option<&ScoreResult> {
        self.analysis.as_ref()
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.injection.is_attached()
    }

    /// Sets up the session for the view currently on screen.
    ///
    /// Unsupported sites stop silently. Non-product pages clear any
    /// persisted product state. Product pages are extracted (with one
    /// delayed retry when the title is missing) and then the affordance is
    /// attached — without a title-backed record if extraction stayed
    /// incomplete.
    pub async fn initialize<D, H>(&mut self, doc: &D, attachment_host: &mut H)
    where
        D: QueryableDocument,
        H: AttachmentHost,
    {
        let url = self.watcher.current_url().to_owned();
        let page_host = host_of(&url);

        let Some(profile) = resolve_site(page_host) else {
            tracing::info!(host = page_host, "unsupported site");
            self.profile = None;
            return;
        };
        self.profile = Some(profile);

        if !is_product_page(profile, &url) {
            tracing::debug!(url = %url, site = profile.site_id, "not a product page");
            self.clear_persisted().await;
            return;
        }

        let mut record = extract(profile, doc, &url);
        if !record.is_complete() {
            tracing::debug!("extraction incomplete, retrying once");
            tokio::time::sleep(Duration::from_millis(self.config.extraction_retry_delay_ms))
                .await;
            record = extract(profile, doc, &url);
        }

        if record.is_complete() {
            self.persist_product(&record).await;
        } else {
            tracing::warn!("no title found after retry; attaching without a title-backed record");
        }
        self.record = Some(record);

        let attachment = self.injection.run(profile, attachment_host).await;
        tracing::info!(
            site = profile.site_id,
            attachment = ?attachment,
            "affordance attached"
        );
    }

    /// Reacts to a possible client-side navigation.
    ///
    /// When the address actually changed: the affordance and any displayed
    /// result are detached, session state is invalidated under a new
    /// epoch, and — after a short settle delay so the new view can render —
    /// the session re-initializes against the new document. Returns `true`
    /// when a navigation was handled.
    pub async fn handle_navigation<D, H>(
        &mut self,
        new_url: &str,
        doc: &D,
        attachment_host: &mut H,
    ) -> bool
    where
        D: QueryableDocument,
        H: AttachmentHost,
    {
        let Some(epoch) = self.watcher.observe(new_url) else {
            return false;
        };
        tracing::info!(epoch, url = new_url, "navigation: resetting page state");

        attachment_host.detach();
        self.record = None;
        self.analysis = None;
        self.profile = None;
        self.injection.reset();

        tokio::time::sleep(Duration::from_millis(self.config.navigation_settle_ms)).await;
        self.initialize(doc, attachment_host).await;
        true
    }

    /// Runs the user-initiated analysis path: fresh extraction, then the
    /// remote-first orchestrator.
    ///
    /// # Errors
    ///
    /// - [`PageError::SiteUnsupported`] when no profile matches the host.
    /// - [`PageError::NoProductData`] when the page is not a product page —
    ///   the one failure worth a blocking notice to the user.
    pub async fn analyze_current<D: QueryableDocument>(
        &mut self,
        doc: &D,
    ) -> Result<ScoreResult, PageError> {
        let url = self.watcher.current_url().to_owned();
        let profile = match self.profile {
            Some(profile) => profile,
            None => resolve_site(host_of(&url)).ok_or_else(|| PageError::SiteUnsupported {
                host: host_of(&url).to_owned(),
            })?,
        };
        if !is_product_page(profile, &url) {
            return Err(PageError::NoProductData);
        }

        // Re-extraction produces a wholly new record for this epoch.
        let record = extract(profile, doc, &url);
        self.record = Some(record.clone());

        let epoch = self.watcher.epoch();
        let result = self.orchestrator.analyze(&record).await;

        if self.commit_analysis(epoch, result.clone()) {
            self.persist_analysis(&result).await;
        }
        Ok(result)
    }

    /// Accepts an analysis completion unless its epoch was superseded.
    ///
    /// Stale completions — a verdict that finished after the user navigated
    /// away — are discarded so they can never describe the wrong product.
    pub fn commit_analysis(&mut self, epoch: u64, result: ScoreResult) -> bool {
        if epoch != self.watcher.epoch() {
            tracing::debug!(
                stale_epoch = epoch,
                current_epoch = self.watcher.epoch(),
                "dropping analysis completion from a superseded view"
            );
            return false;
        }
        self.analysis = Some(result);
        true
    }

    /// Answers one panel request. Defensive by construction: every failure
    /// becomes a `{success: false, error}` acknowledgement, because the
    /// panel blocks on the response.
    pub async fn handle_request<D: QueryableDocument>(
        &mut self,
        request: SyncRequest,
        doc: &D,
    ) -> SyncResponse {
        match request {
            SyncRequest::GetProductData => SyncResponse::ProductData(self.product_snapshot(doc)),
            SyncRequest::AnalyzeProduct => match self.analyze_current(doc).await {
                Ok(_) => SyncResponse::Ack(AckResponse::ok()),
                Err(err) => {
                    tracing::warn!(error = %err, "panel-initiated analysis failed");
                    SyncResponse::Ack(AckResponse::failure(err.to_string()))
                }
            },
            SyncRequest::PlayVerdict { text } => {
                match self
                    .speech
                    .speak(&text, VERDICT_SPEECH_RATE, VERDICT_SPEECH_PITCH)
                {
                    Ok(()) => SyncResponse::Ack(AckResponse::ok()),
                    Err(err) => SyncResponse::Ack(AckResponse::failure(err.to_string())),
                }
            }
        }
    }

    /// Serves panel requests until every panel handle is gone.
    pub async fn serve<D: QueryableDocument>(
        &mut self,
        queue: &mut ResponderQueue,
        doc: &D,
    ) {
        while let Some(incoming) = queue.next().await {
            tracing::debug!(action = incoming.request.action(), "panel request");
            let response = self.handle_request(incoming.request.clone(), doc).await;
            incoming.respond(response);
        }
    }

    /// The full-report page URL for the current product, when there is one.
    #[must_use]
    pub fn full_report_url(&self) -> Option<String> {
        self.record
            .as_ref()
            .map(|record| self.orchestrator.full_report_url(&record.url))
    }

    fn product_snapshot<D: QueryableDocument>(&self, doc: &D) -> ProductDataResponse {
        let url = self.watcher.current_url().to_owned();
        let profile = self
            .profile
            .or_else(|| resolve_site(host_of(&url)));
        let on_product_page = profile.is_some_and(|p| is_product_page(p, &url));

        let product_data = match profile {
            Some(profile) if on_product_page => Some(extract(profile, doc, &url)),
            _ => None,
        };
        let analysis_result = self
            .analysis
            .clone()
            .or_else(|| self.orchestrator.cached(&url));

        ProductDataResponse {
            product_data,
            analysis_result,
            is_product_page: on_product_page,
        }
    }

    // Storage is a best-effort collaborator: every failure below is logged
    // and the flow continues without persistence.

    async fn persist_product(&self, record: &ProductRecord) {
        let Ok(value) = serde_json::to_value(record) else {
            return;
        };
        if let Err(err) = self.storage.set(KEY_CURRENT_PRODUCT, value).await {
            tracing::warn!(error = %err, "could not persist product record");
        }
    }

    async fn persist_analysis(&self, result: &ScoreResult) {
        let stored = StoredAnalysis::new(result.clone());
        let Ok(value) = serde_json::to_value(&stored) else {
            return;
        };
        if let Err(err) = self.storage.set(KEY_CURRENT_ANALYSIS, value).await {
            tracing::warn!(error = %err, "could not persist analysis");
        }
    }

    async fn clear_persisted(&self) {
        if let Err(err) = self
            .storage
            .remove(&[KEY_CURRENT_PRODUCT, KEY_CURRENT_ANALYSIS])
            .await
        {
            tracing::warn!(error = %err, "could not clear persisted state");
        }
    }
}
