//! Controller for the "new index data input" form

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::error::FormError;
use super::state::{FetchTicket, PreviewState};
use super::{load_preview, ClearInputs, PreviewForm, SaveOutcome, SuccessCallback};
use crate::domain::{DataInputConfig, IndexSavePort, OutputLocationRule, PreviewFetchPort};

pub struct IndexInputController {
    fetcher: Arc<dyn PreviewFetchPort>,
    store: Arc<dyn IndexSavePort>,
    state: PreviewState,
    on_success: Option<SuccessCallback>,
}

impl IndexInputController {
    pub fn new(fetcher: Arc<dyn PreviewFetchPort>, store: Arc<dyn IndexSavePort>) -> Self {
        Self {
            fetcher,
            store,
            state: PreviewState::new(),
            on_success: None,
        }
    }

    pub fn with_on_success(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    /// Fetcher used by this form, for callers driving fetches themselves
    pub fn fetcher(&self) -> Arc<dyn PreviewFetchPort> {
        self.fetcher.clone()
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.state.begin_fetch()
    }

    pub fn complete_fetch<S: AsRef<str>>(
        &mut self,
        ticket: FetchTicket,
        result: Result<Value, FormError>,
        exclusion_paths: &[S],
    ) -> bool {
        self.state.complete_fetch(ticket, result, exclusion_paths)
    }

    /// Fetch the preview document and surface it with `exclusion_paths` removed.
    pub async fn fetch_preview<S: AsRef<str> + Sync>(&mut self, url: &str, exclusion_paths: &[S]) {
        let ticket = self.state.begin_fetch();
        let result = load_preview(self.fetcher.as_ref(), url).await;
        self.state.complete_fetch(ticket, result, exclusion_paths);
    }

    /// Re-filter the cached document. Never fetches.
    pub fn on_exclusion_paths_change<S: AsRef<str>>(&mut self, exclusion_paths: &[S]) {
        if !self.state.refilter(exclusion_paths) {
            debug!("Exclusion paths changed before any preview was fetched");
        }
    }

    pub async fn save(
        &mut self,
        config: &DataInputConfig,
        clear_inputs: Option<ClearInputs<'_>>,
    ) -> SaveOutcome {
        // Validation failures never reach the store
        let missing = config.missing_required_fields(OutputLocationRule::Always);
        if !missing.is_empty() {
            debug!("Index data input is missing required fields: {:?}", missing);
            self.state.set_error(FormError::Validation { missing });
            return SaveOutcome::Invalid;
        }

        match self.store.save_to_index(config).await {
            Ok(()) => {
                info!("Saved index data input '{}'", config.name);
                self.state.clear_error();
                // Success callback first, then the caller's draft reset
                if let Some(callback) = &self.on_success {
                    callback();
                }
                if let Some(clear) = clear_inputs {
                    clear();
                }
                SaveOutcome::Saved
            }
            Err(e) => {
                warn!("Failed to save index data input '{}': {:#}", config.name, e);
                self.state.set_error(FormError::IndexSave);
                SaveOutcome::Failed
            }
        }
    }

    /// Drop fetched documents and any pending fetch, as when the form unmounts
    pub fn reset(&mut self) {
        self.state.reset();
    }
}

impl PreviewForm for IndexInputController {
    fn preview_state(&self) -> &PreviewState {
        &self.state
    }
}
