//! Cross-context synchronization contract.
//!
//! The in-page context and the detached panel run independently and share
//! no memory; the panel learns about the current product and its verdict
//! only through request/response message passing. This crate defines the
//! message contract and a transport-agnostic async channel: each request is
//! paired with exactly one response future, so the core logic is testable
//! without any host messaging runtime.

pub mod error;
pub mod message;
pub mod transport;

pub use error::SyncError;
pub use message::{AckResponse, ProductDataResponse, SyncRequest, SyncResponse};
pub use transport::{channel, IncomingRequest, PanelHandle, ResponderQueue};
