//! Transport-agnostic request/response plumbing.
//!
//! The host messaging layer (whatever moves bytes between the two
//! contexts) is out of scope; this module models its one essential
//! property — each request gets exactly one response — as a tokio mpsc
//! queue of requests, each carrying a oneshot reply slot. A dropped
//! responder resolves pending and future requests to
//! [`SyncError::ChannelClosed`] instead of hanging the caller.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use crate::error::SyncError;
use crate::message::{AckResponse, ProductDataResponse, SyncRequest, SyncResponse};

struct Envelope {
    request: SyncRequest,
    reply: oneshot::Sender<SyncResponse>,
}

/// Creates a connected panel/page transport pair.
#[must_use]
pub fn channel(capacity: usize) -> (PanelHandle, ResponderQueue) {
    let (tx, rx) = mpsc::channel(capacity);
    (PanelHandle { tx }, ResponderQueue { rx })
}

/// The panel's side of the transport: issues requests and awaits replies.
#[derive(Clone)]
pub struct PanelHandle {
    tx: mpsc::Sender<Envelope>,
}

impl PanelHandle {
    /// Sends a raw request and awaits its single response.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::ChannelClosed`] when the in-page context is
    /// gone, before or after the request was queued.
    pub async fn request(&self, request: SyncRequest) -> Result<SyncResponse, SyncError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Envelope {
                request,
                reply: reply_tx,
            })
            .await
            .map_err(|_| SyncError::ChannelClosed)?;
        reply_rx.await.map_err(|_| SyncError::ChannelClosed)
    }

    /// Fetches the current product snapshot.
    ///
    /// # Errors
    ///
    /// [`SyncError::ChannelClosed`] when the page context is gone;
    /// [`SyncError::UnexpectedResponse`] if the responder answered with an
    /// acknowledgement instead of a snapshot.
    pub async fn get_product_data(&self) -> Result<ProductDataResponse, SyncError> {
        match self.request(SyncRequest::GetProductData).await? {
            SyncResponse::ProductData(data) => Ok(data),
            SyncResponse::Ack(_) => Err(SyncError::UnexpectedResponse {
                request: "getProductData",
            }),
        }
    }

    /// Fetches the product snapshot, retrying once after `retry_delay`.
    ///
    /// The in-page context may still be initializing right after a
    /// navigation; one delayed retry covers that window.
    ///
    /// # Errors
    ///
    /// Propagates the second attempt's error if both attempts fail.
    pub async fn get_product_data_with_retry(
        &self,
        retry_delay: Duration,
    ) -> Result<ProductDataResponse, SyncError> {
        match self.get_product_data().await {
            Ok(data) => Ok(data),
            Err(first_err) => {
                tracing::warn!(error = %first_err, "getProductData failed, retrying once");
                tokio::time::sleep(retry_delay).await;
                self.get_product_data().await
            }
        }
    }

    /// Triggers the in-page analysis path.
    ///
    /// # Errors
    ///
    /// [`SyncError::ChannelClosed`], [`SyncError::UnexpectedResponse`], or
    /// [`SyncError::Rejected`] when the page handled the request but failed.
    pub async fn analyze_product(&self) -> Result<(), SyncError> {
        self.expect_ack(SyncRequest::AnalyzeProduct, "analyzeProduct")
            .await
    }

    /// Asks the in-page context to speak the verdict.
    ///
    /// # Errors
    ///
    /// Same surface as [`Self::analyze_product`].
    pub async fn play_verdict(&self, text: impl Into<String>) -> Result<(), SyncError> {
        self.expect_ack(
            SyncRequest::PlayVerdict { text: text.into() },
            "playVerdict",
        )
        .await
    }

    async fn expect_ack(
        &self,
        request: SyncRequest,
        name: &'static str,
    ) -> Result<(), SyncError> {
        match self.request(request).await? {
            SyncResponse::Ack(AckResponse { success: true, .. }) => Ok(()),
            SyncResponse::Ack(AckResponse { error, .. }) => Err(SyncError::Rejected {
                reason: error.unwrap_or_else(|| "unknown failure".to_owned()),
            }),
            SyncResponse::ProductData(_) => Err(SyncError::UnexpectedResponse { request: name }),
        }
    }
}

/// The in-page side of the transport: a queue of incoming requests.
pub struct ResponderQueue {
    rx: mpsc::Receiver<Envelope>,
}

impl ResponderQueue {
    /// Awaits the next request. `None` means every panel handle is gone
    /// and the queue is drained.
    pub async fn next(&mut self) -> Option<IncomingRequest> {
        self.rx.recv().await.map(|envelope| IncomingRequest {
            request: envelope.request,
            reply: envelope.reply,
        })
    }
}

/// One request waiting for its single response.
pub struct IncomingRequest {
    pub request: SyncRequest,
    reply: oneshot::Sender<SyncResponse>,
}

impl IncomingRequest {
    /// Sends the response. If the panel stopped waiting the response is
    /// discarded; that is the panel's prerogative, not an error here.
    pub fn respond(self, response: SyncResponse) {
        if self.reply.send(response).is_err() {
            tracing::debug!("panel dropped before the response arrived");
        }
    }
}
