use clap::Parser;
use datainputs::adapters::{DataInputApiClient, HttpPreviewFetcher};
use datainputs::cli::{Cli, Command, FormKind};
use datainputs::config::Settings;
use datainputs::domain::{DataInputConfig, InputType, PathExclusionFilter};
use datainputs::forms::{IndexInputController, KvStoreInputController, PreviewForm, SaveOutcome};
use serde_json::Value;
use std::io::Read;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let settings = Settings::new_with_cli(&cli)?;

    // Initialize tracing; RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.logging.level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let fetcher = Arc::new(HttpPreviewFetcher::new());
    let api = Arc::new(DataInputApiClient::new(&settings.backend));

    match cli.command {
        Command::Preview { url, exclude, kind } => match kind {
            FormKind::Index => {
                let mut form = IndexInputController::new(fetcher, api);
                form.fetch_preview(&url, &exclude).await;
                if let Some(message) = form.error_message() {
                    anyhow::bail!(message);
                }
                println!("{}", form.preview());
            }
            FormKind::KvStore => {
                let mut form = KvStoreInputController::new(fetcher, api);
                form.fetch_preview(&url, &exclude).await;
                if let Some(message) = form.error_message() {
                    anyhow::bail!(message);
                }
                println!("{}", form.preview());
                println!("Candidate fields: {}", form.candidate_fields().join(", "));
            }
        },
        Command::Filter { file, exclude } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let document: Value = serde_json::from_str(&text)?;
            let filtered = PathExclusionFilter::filter(&document, &exclude);
            println!("{}", serde_json::to_string_pretty(&filtered)?);
        }
        Command::Create {
            kind,
            name,
            url,
            cron,
            output_location,
            exclude,
        } => {
            let config = DataInputConfig {
                name,
                url,
                input_type: Some(InputType::from(kind)),
                cron_expression: cron,
                selected_output_location: output_location.unwrap_or_default(),
                excluded_paths: exclude,
            };

            let (outcome, error) = match kind {
                FormKind::Index => {
                    let mut form = IndexInputController::new(fetcher, api);
                    let outcome = form.save(&config, None).await;
                    (outcome, form.error_message())
                }
                FormKind::KvStore => {
                    let mut form = KvStoreInputController::new(fetcher, api);
                    let outcome = form.save(&config, None).await;
                    (outcome, form.error_message())
                }
            };

            match outcome {
                SaveOutcome::Saved => info!("Data input '{}' created", config.name),
                SaveOutcome::Skipped => info!("Data input '{}' not handled by this form", config.name),
                SaveOutcome::Invalid | SaveOutcome::Failed => {
                    anyhow::bail!(error.unwrap_or_else(|| "Unknown error".to_string()));
                }
            }
        }
    }

    Ok(())
}
