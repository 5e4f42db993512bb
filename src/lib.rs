//! # datainputs - data input forms for the admin console
//!
//! Control logic behind the two "new data input" forms of the console: one
//! for inputs written to an index and one for inputs written to a KV store.
//! Each form fetches a JSON preview from a user-supplied URL, removes the
//! fields the user excluded by JSON path, validates the required fields and
//! hands the configuration to the backend.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use datainputs::adapters::{DataInputApiClient, HttpPreviewFetcher};
//! use datainputs::config::Settings;
//! use datainputs::forms::{IndexInputController, PreviewForm};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::new()?;
//!     let mut form = IndexInputController::new(
//!         Arc::new(HttpPreviewFetcher::new()),
//!         Arc::new(DataInputApiClient::new(&settings.backend)),
//!     );
//!
//!     form.fetch_preview("https://example.com/feed.json", &["$.meta"]).await;
//!     println!("{}", form.preview());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Domain**: data input record, JSON paths, the exclusion filter and the
//!   collaborator ports
//! - **Forms**: per-form controllers owning their preview state
//! - **Adapters**: reqwest implementations of the ports
//! - **Config**: layered settings

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod forms;
