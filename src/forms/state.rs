//! Preview state owned by a single form
//!
//! Holds the raw document, its filtered form, the serialized preview shown
//! to the user, the loading flag and the current-error slot. Fetches are
//! split into `begin_fetch` / `complete_fetch` so that only the latest
//! issued request may change the state.

use serde_json::Value;
use tracing::debug;

use super::error::FormError;
use crate::domain::PathExclusionFilter;

/// Sequence number handed out when a fetch begins
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

#[derive(Debug, Default)]
pub struct PreviewState {
    raw: Option<Value>,
    filtered: Option<Value>,
    preview: String,
    loading: bool,
    error: Option<FormError>,
    latest_request: u64,
}

impl PreviewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter Loading. Clears the error, the surfaced preview and the cached
    /// raw document, and supersedes every earlier ticket.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_request += 1;
        self.loading = true;
        self.error = None;
        self.raw = None;
        self.filtered = None;
        self.preview.clear();
        debug!("Preview fetch #{} started", self.latest_request);
        FetchTicket(self.latest_request)
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.latest_request
    }

    /// Apply the outcome of a fetch. Returns false and leaves the state
    /// untouched when a newer fetch has begun since `ticket` was issued.
    pub fn complete_fetch<S: AsRef<str>>(
        &mut self,
        ticket: FetchTicket,
        result: Result<Value, FormError>,
        exclusion_paths: &[S],
    ) -> bool {
        if !self.is_current(ticket) {
            debug!(
                "Discarding stale preview fetch #{} (latest is #{})",
                ticket.0, self.latest_request
            );
            return false;
        }

        self.loading = false;
        match result {
            Ok(document) => {
                self.raw = Some(document);
                self.refilter(exclusion_paths);
                self.error = None;
            }
            Err(e) => {
                self.raw = None;
                self.filtered = None;
                self.preview.clear();
                self.error = Some(e);
            }
        }
        true
    }

    /// Re-apply the exclusion filter to the cached raw document. Returns
    /// false when nothing has been fetched yet.
    pub fn refilter<S: AsRef<str>>(&mut self, exclusion_paths: &[S]) -> bool {
        let Some(raw) = &self.raw else {
            return false;
        };

        let filtered = if exclusion_paths.is_empty() {
            raw.clone()
        } else {
            PathExclusionFilter::filter(raw, exclusion_paths)
        };
        self.preview = serde_json::to_string(&filtered).unwrap_or_default();
        self.filtered = Some(filtered);
        true
    }

    pub fn set_error(&mut self, error: FormError) {
        self.error = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Forget everything fetched; pending tickets become stale.
    pub fn reset(&mut self) {
        let latest_request = self.latest_request + 1;
        *self = Self {
            latest_request,
            ..Default::default()
        };
    }

    pub fn raw_document(&self) -> Option<&Value> {
        self.raw.as_ref()
    }

    pub fn filtered_document(&self) -> Option<&Value> {
        self.filtered.as_ref()
    }

    /// Serialized filtered document, empty while loading or after a failure
    pub fn preview(&self) -> &str {
        &self.preview
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&FormError> {
        self.error.as_ref()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }
}
