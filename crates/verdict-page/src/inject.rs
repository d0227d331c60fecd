//! UI-injection retry state machine.
//!
//! Product pages render asynchronously and rearrange themselves while
//! loading, so attaching the interactive affordance is a retry problem:
//! attempts are scheduled with exponential backoff, each attempt walks a
//! prioritized list of anchor locations, and once the attempt budget is
//! exhausted a fixed-position overlay is forced so attachment is
//! guaranteed eventually.

use std::time::Duration;

use verdict_adapter::SiteProfile;

/// Generic anchors tried when every site-specific anchor misses: anything
/// price-like, then common layout containers.
const GENERIC_ANCHOR_SELECTORS: &[&str] = &[r#"[class*="price"]"#, ".col", ".row", "main"];

/// Where the affordance ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachment {
    /// Attached next to the page element matching this selector.
    Anchor(String),
    /// Attached as the fixed-position overlay.
    Overlay,
}

/// The page surface attachment attempts run against.
///
/// Implementations own the actual UI mutation; the controller only decides
/// where and when to try.
pub trait AttachmentHost {
    /// Attempts to attach the affordance beside the first element matching
    /// `selector`. Returns `false` when no such element exists yet.
    fn attach_at(&mut self, selector: &str) -> bool;

    /// Attempts the fixed-position overlay. May fail while the page
    /// scaffold is not ready.
    fn attach_overlay(&mut self) -> bool;

    /// Unconditional overlay attachment, used once retries are exhausted.
    fn force_overlay(&mut self);

    /// Removes the affordance and any displayed result panel.
    fn detach(&mut self);
}

/// Exponential backoff: `base * 2^attempt`, capped.
#[derive(Debug, Clone, Copy)]
pub struct BackoffSchedule {
    base_ms: u64,
    cap_ms: u64,
}

impl BackoffSchedule {
    #[must_use]
    pub fn new(base_ms: u64, cap_ms: u64) -> Self {
        Self { base_ms, cap_ms }
    }

    /// Delay before the given attempt (0-based).
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.min(62);
        Duration::from_millis(self.base_ms.saturating_mul(factor).min(self.cap_ms))
    }
}

/// Retry state machine: `Unattached(attempt) → Attached`, reset by
/// navigation.
#[derive(Debug)]
pub struct InjectionRetryController {
    schedule: BackoffSchedule,
    max_attempts: u32,
    attempt: u32,
    attached: bool,
}

impl InjectionRetryController {
    #[must_use]
    pub fn new(schedule: BackoffSchedule, max_attempts: u32) -> Self {
        Self {
            schedule,
            max_attempts,
            attempt: 0,
            attached: false,
        }
    }

    #[must_use]
    pub fn from_config(config: &verdict_core::AppConfig) -> Self {
        Self::new(
            BackoffSchedule::new(config.attach_backoff_base_ms, config.attach_backoff_cap_ms),
            config.max_attach_attempts,
        )
    }

    #[must_use]
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Re-enters `Unattached(attempt = 0)`. Called when a client-side
    /// navigation invalidates the previous view.
    pub fn reset(&mut self) {
        self.attempt = 0;
        self.attached = false;
    }

    /// One attachment attempt: site-specific anchors, then generic
    /// fallbacks; on the final attempt the overlay is forced
    /// unconditionally. Returns `None` when the attempt failed and another
    /// retry should be scheduled.
    pub fn try_attach<H: AttachmentHost>(
        &mut self,
        profile: &SiteProfile,
        host: &mut H,
    ) -> Option<Attachment> {
        debug_assert!(!self.attached, "attach attempted while already attached");

        for selector in profile
            .anchor_selectors
            .iter()
            .chain(GENERIC_ANCHOR_SELECTORS)
        {
            if host.attach_at(selector) {
                tracing::debug!(selector, attempt = self.attempt, "affordance anchored");
                self.attached = true;
                return Some(Attachment::Anchor((*selector).to_owned()));
            }
        }

        if host.attach_overlay() {
            tracing::debug!(attempt = self.attempt, "affordance attached as overlay");
            self.attached = true;
            return Some(Attachment::Overlay);
        }

        self.attempt += 1;
        if self.attempt >= self.max_attempts {
            tracing::warn!(
                attempts = self.attempt,
                "attachment attempts exhausted, forcing overlay"
            );
            host.force_overlay();
            self.attached = true;
            return Some(Attachment::Overlay);
        }

        None
    }

    /// Drives scheduled attempts until attached. Guaranteed to finish:
    /// the final attempt forces the overlay.
    ///
    /// Cancellation is by dropping the future — a navigation that
    /// supersedes this epoch aborts the attachment run wholesale.
    pub async fn run<H: AttachmentHost>(
        &mut self,
        profile: &SiteProfile,
        host: &mut H,
    ) -> Attachment {
        loop {
            let delay = self.schedule.delay_for(self.attempt);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            if let Some(attachment) = self.try_attach(profile, host) {
                return attachment;
            }
        }
    }
}

#[cfg(test)]
#[path = "inject_test.rs"]
mod tests;
