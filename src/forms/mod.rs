//! Form controllers for creating data inputs
//!
//! Each controller owns its [`PreviewState`] and talks to the outside world
//! only through the ports in [`crate::domain`]. Public operations never
//! fail; every error ends up in the form's single error slot.

use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::PreviewFetchPort;

pub mod error;
pub mod index;
pub mod kvstore;
pub mod state;

pub use error::FormError;
pub use index::IndexInputController;
pub use kvstore::KvStoreInputController;
pub use state::{FetchTicket, PreviewState};

/// Read access shared by both form controllers
///
/// Implementors only hand out their [`PreviewState`]; everything a renderer
/// shows is read through it.
pub trait PreviewForm {
    fn preview_state(&self) -> &PreviewState;

    /// Serialized filtered document, empty while loading or after a failure
    fn preview(&self) -> &str {
        self.preview_state().preview()
    }

    fn loading(&self) -> bool {
        self.preview_state().loading()
    }

    fn error(&self) -> Option<&FormError> {
        self.preview_state().error()
    }

    fn error_message(&self) -> Option<String> {
        self.preview_state().error_message()
    }

    fn raw_document(&self) -> Option<&Value> {
        self.preview_state().raw_document()
    }

    fn filtered_document(&self) -> Option<&Value> {
        self.preview_state().filtered_document()
    }
}

/// Callback fired after a successful save
pub type SuccessCallback = Box<dyn Fn() + Send + Sync>;

/// Per-save hook that resets the caller's draft inputs. `Send` keeps the
/// `save` futures spawnable.
pub type ClearInputs<'a> = &'a mut (dyn FnMut() + Send);

/// What a call to `save` ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// Required fields were missing; nothing was sent
    Invalid,
    /// The save collaborator rejected the configuration
    Failed,
    /// The form does not handle this input type; nothing was sent
    Skipped,
}

/// GET `url` and decode the body as JSON, classifying every failure.
pub async fn load_preview(fetcher: &dyn PreviewFetchPort, url: &str) -> Result<Value, FormError> {
    if url.is_empty() {
        return Err(FormError::MissingUrl);
    }

    let response = fetcher.get(url).await.map_err(|e| {
        warn!("Preview fetch from {} failed: {:#}", url, e);
        FormError::network(e.to_string())
    })?;

    if !response.is_success() {
        warn!("Preview fetch from {} returned HTTP {}", url, response.status);
        return Err(FormError::Http {
            status: response.status,
        });
    }

    let document = response.json().map_err(|e| {
        warn!("Preview from {} is not valid JSON: {}", url, e);
        FormError::Decode(e.to_string())
    })?;
    debug!("Fetched preview document from {}", url);
    Ok(document)
}
