//! Controller for the "new KV store data input" form
//!
//! Works like the index form, and additionally offers the top-level keys of
//! the previewed document as candidate fields for the KV store collection.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::error::FormError;
use super::state::{FetchTicket, PreviewState};
use super::{load_preview, ClearInputs, PreviewForm, SaveOutcome, SuccessCallback};
use crate::domain::{DataInputConfig, InputType, KvStoreSavePort, OutputLocationRule, PreviewFetchPort};

pub struct KvStoreInputController {
    fetcher: Arc<dyn PreviewFetchPort>,
    store: Arc<dyn KvStoreSavePort>,
    state: PreviewState,
    candidate_fields: Vec<String>,
    on_success: Option<SuccessCallback>,
}

fn object_keys(document: Option<&Value>) -> Vec<String> {
    document
        .and_then(Value::as_object)
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default()
}

/// Keys of the filtered document, else of the raw document, else none.
/// Only JSON objects have fields.
pub fn derive_candidate_fields(filtered: Option<&Value>, raw: Option<&Value>) -> Vec<String> {
    let fields = object_keys(filtered);
    if !fields.is_empty() {
        return fields;
    }
    object_keys(raw)
}

impl KvStoreInputController {
    pub fn new(fetcher: Arc<dyn PreviewFetchPort>, store: Arc<dyn KvStoreSavePort>) -> Self {
        Self {
            fetcher,
            store,
            state: PreviewState::new(),
            candidate_fields: Vec::new(),
            on_success: None,
        }
    }

    pub fn with_on_success(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    /// Fields offered for KV store key selection
    pub fn candidate_fields(&self) -> &[String] {
        &self.candidate_fields
    }

    pub fn fetcher(&self) -> Arc<dyn PreviewFetchPort> {
        self.fetcher.clone()
    }

    fn refresh_candidate_fields(&mut self) {
        self.candidate_fields =
            derive_candidate_fields(self.state.filtered_document(), self.state.raw_document());
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        let ticket = self.state.begin_fetch();
        self.refresh_candidate_fields();
        ticket
    }

    pub fn complete_fetch<S: AsRef<str>>(
        &mut self,
        ticket: FetchTicket,
        result: Result<Value, FormError>,
        exclusion_paths: &[S],
    ) -> bool {
        let applied = self.state.complete_fetch(ticket, result, exclusion_paths);
        if applied {
            self.refresh_candidate_fields();
        }
        applied
    }

    pub async fn fetch_preview<S: AsRef<str> + Sync>(&mut self, url: &str, exclusion_paths: &[S]) {
        let ticket = self.begin_fetch();
        let result = load_preview(self.fetcher.as_ref(), url).await;
        self.complete_fetch(ticket, result, exclusion_paths);
    }

    pub fn on_exclusion_paths_change<S: AsRef<str>>(&mut self, exclusion_paths: &[S]) {
        if self.state.refilter(exclusion_paths) {
            self.refresh_candidate_fields();
        } else {
            debug!("Exclusion paths changed before any preview was fetched");
        }
    }

    /// Validate and save. Inputs whose type is not `kvstore` pass validation
    /// without an output location but are never sent.
    pub async fn save(
        &mut self,
        config: &DataInputConfig,
        clear_inputs: Option<ClearInputs<'_>>,
    ) -> SaveOutcome {
        let missing = config.missing_required_fields(OutputLocationRule::KvStoreOnly);
        if !missing.is_empty() {
            debug!("KV store data input is missing required fields: {:?}", missing);
            self.state.set_error(FormError::Validation { missing });
            return SaveOutcome::Invalid;
        }

        // Output location is optional for other types, but only kvstore is sent
        if config.input_type != Some(InputType::KvStore) {
            debug!(
                "Skipping save of '{}': input type is not kvstore",
                config.name
            );
            return SaveOutcome::Skipped;
        }

        match self.store.save_to_kvstore(config).await {
            Ok(()) => {
                info!("Saved KV store data input '{}'", config.name);
                self.state.clear_error();
                if let Some(callback) = &self.on_success {
                    callback();
                }
                if let Some(clear) = clear_inputs {
                    clear();
                }
                SaveOutcome::Saved
            }
            Err(e) => {
                warn!("Failed to save KV store data input '{}': {:#}", config.name, e);
                self.state.set_error(FormError::KvStoreSave);
                SaveOutcome::Failed
            }
        }
    }

    pub fn reset(&mut self) {
        self.state.reset();
        self.candidate_fields.clear();
    }
}

impl PreviewForm for KvStoreInputController {
    fn preview_state(&self) -> &PreviewState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::test_support::{RecordingStore, StubFetcher};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const NO_PATHS: [&str; 0] = [];

    fn kv_config() -> DataInputConfig {
        DataInputConfig {
            name: "devices".to_string(),
            url: "http://feed/devices".to_string(),
            input_type: Some(InputType::KvStore),
            cron_expression: "*/10 * * * *".to_string(),
            selected_output_location: "devices_collection".to_string(),
            excluded_paths: vec![],
        }
    }

    fn form_with(fetcher: StubFetcher) -> KvStoreInputController {
        KvStoreInputController::new(Arc::new(fetcher), Arc::new(RecordingStore::default()))
    }

    #[test]
    fn test_derive_candidate_fields() {
        let raw = json!({"x": 1, "y": 2});
        let filtered = json!({"y": 2});
        let empty = json!({});

        assert_eq!(derive_candidate_fields(Some(&filtered), Some(&raw)), vec!["y"]);
        assert_eq!(derive_candidate_fields(Some(&empty), Some(&raw)), vec!["x", "y"]);
        assert_eq!(derive_candidate_fields(None, Some(&raw)), vec!["x", "y"]);
        assert!(derive_candidate_fields(None, None).is_empty());
    }

    #[test]
    fn test_non_object_documents_have_no_fields() {
        let array = json!([{"x": 1}]);
        assert!(derive_candidate_fields(Some(&array), Some(&array)).is_empty());
        assert!(derive_candidate_fields(Some(&json!("text")), Some(&Value::Null)).is_empty());
    }

    #[tokio::test]
    async fn test_candidate_fields_from_raw_document() {
        let mut form = form_with(StubFetcher::default().with("http://feed", 200, r#"{"x":1,"y":2}"#));

        form.fetch_preview("http://feed", &NO_PATHS).await;
        assert_eq!(form.candidate_fields(), &["x".to_string(), "y".to_string()]);
    }

    #[tokio::test]
    async fn test_candidate_fields_follow_exclusions() {
        let mut form = form_with(StubFetcher::default().with("http://feed", 200, r#"{"x":1,"y":2,"z":3}"#));

        form.fetch_preview("http://feed", &["y"]).await;
        assert_eq!(form.candidate_fields(), &["x".to_string(), "z".to_string()]);

        form.on_exclusion_paths_change(&["x", "z"]);
        assert_eq!(form.preview(), r#"{"y":2}"#);
        assert_eq!(form.candidate_fields(), &["y".to_string()]);

        // Excluding everything falls back to the raw document's keys
        form.on_exclusion_paths_change(&["$.*"]);
        assert_eq!(form.preview(), "{}");
        assert_eq!(form.candidate_fields().len(), 3);
    }

    #[tokio::test]
    async fn test_candidate_fields_cleared_by_new_fetch() {
        let mut form = form_with(
            StubFetcher::default()
                .with("http://feed", 200, r#"{"x":1}"#)
                .with("http://broken", 500, ""),
        );

        form.fetch_preview("http://feed", &NO_PATHS).await;
        assert_eq!(form.candidate_fields().len(), 1);

        form.fetch_preview("http://broken", &NO_PATHS).await;
        assert!(form.candidate_fields().is_empty());
        assert_eq!(form.error_message().as_deref(), Some("HTTP error: 500"));
    }

    #[tokio::test]
    async fn test_index_input_is_skipped_silently() {
        let store = Arc::new(RecordingStore::default());
        let successes = Arc::new(AtomicUsize::new(0));
        let counter = successes.clone();
        let mut form = KvStoreInputController::new(Arc::new(StubFetcher::default()), store.clone())
            .with_on_success(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });

        let mut config = kv_config();
        config.input_type = Some(InputType::Index);
        config.selected_output_location.clear();

        let mut cleared = false;
        let mut clear = || cleared = true;
        let outcome = form.save(&config, Some(&mut clear)).await;

        assert_eq!(outcome, SaveOutcome::Skipped);
        assert!(form.error().is_none());
        assert_eq!(store.saved_count(), 0);
        assert_eq!(successes.load(Ordering::SeqCst), 0);
        assert!(!cleared);
    }

    #[tokio::test]
    async fn test_kvstore_requires_output_location() {
        let store = Arc::new(RecordingStore::default());
        let mut form = KvStoreInputController::new(Arc::new(StubFetcher::default()), store.clone());

        let mut config = kv_config();
        config.selected_output_location.clear();
        assert_eq!(form.save(&config, None).await, SaveOutcome::Invalid);
        assert_eq!(form.error_message().as_deref(), Some("Not all required fields are filled out"));

        let mut config = kv_config();
        config.name.clear();
        assert_eq!(form.save(&config, None).await, SaveOutcome::Invalid);
        assert_eq!(store.saved_count(), 0);
    }

    #[tokio::test]
    async fn test_save_success_and_failure() {
        let store = Arc::new(RecordingStore::default());
        let mut form = KvStoreInputController::new(Arc::new(StubFetcher::default()), store.clone());
        assert_eq!(form.save(&kv_config(), None).await, SaveOutcome::Saved);
        assert_eq!(store.saved_count(), 1);

        let mut form = KvStoreInputController::new(
            Arc::new(StubFetcher::default()),
            Arc::new(RecordingStore::rejecting()),
        );
        assert_eq!(form.save(&kv_config(), None).await, SaveOutcome::Failed);
        assert_eq!(form.error_message().as_deref(), Some("Failed to save data input to KV Store"));
    }

    #[test]
    fn test_save_future_is_send() {
        fn assert_send<T: Send>(_: &T) {}

        let mut form = form_with(StubFetcher::default());
        let config = kv_config();
        let mut draft = kv_config();
        let mut clear = || draft.clear_inputs();

        let save = form.save(&config, Some(&mut clear));
        assert_send(&save);
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let mut form = form_with(StubFetcher::default().with("http://feed", 200, r#"{"x":1}"#));
        form.fetch_preview("http://feed", &NO_PATHS).await;
        form.reset();

        assert!(form.raw_document().is_none());
        assert!(form.candidate_fields().is_empty());
        assert_eq!(form.preview(), "");
    }
}
