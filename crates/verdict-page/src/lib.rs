//! In-page runtime for the verdict engine.
//!
//! Owns everything that lives inside the product page's execution context:
//! the injection retry state machine that attaches the interactive
//! affordance to unstable markup, the navigation watcher that invalidates
//! state on client-side route changes, the collaborator seams for
//! persistent storage and speech output, and the [`PageSession`] — the
//! per-navigation-epoch context object every operation runs through.

pub mod error;
pub mod inject;
pub mod navigation;
pub mod session;
pub mod speech;
pub mod storage;

pub use error::PageError;
pub use inject::{Attachment, AttachmentHost, BackoffSchedule, InjectionRetryController};
pub use navigation::NavigationWatcher;
pub use session::PageSession;
pub use speech::{LoggingSpeech, NoSpeech, SpeechError, SpeechOutput};
pub use storage::{
    load_fresh_analysis, InMemoryStore, KeyValueStore, StorageError, StoredAnalysis,
    KEY_CURRENT_ANALYSIS, KEY_CURRENT_PRODUCT,
};
