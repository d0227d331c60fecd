use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// The other context is gone: the transport was dropped before or while
    /// the request was in flight.
    #[error("messaging unavailable: the responding context is gone")]
    ChannelClosed,

    /// The responder answered with a response shape the request does not
    /// produce.
    #[error("unexpected response variant for {request}")]
    UnexpectedResponse { request: &'static str },

    /// The responder reported a handled internal failure.
    #[error("request failed in the responding context: {reason}")]
    Rejected { reason: String },
}
