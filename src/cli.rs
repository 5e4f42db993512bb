use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::domain::InputType;

/// Data input forms - preview, filter and create index or KV store data inputs
#[derive(Parser, Debug, Clone)]
#[command(name = "datainputs", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "DATAINPUTS_CONFIG", default_value = "datainputs.toml")]
    pub config: PathBuf,

    /// Base URL of the console backend that stores data inputs
    #[arg(long, env = "DATAINPUTS_BACKEND_URL")]
    pub backend_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Fetch a JSON preview the way the data input form does
    Preview {
        /// Source URL of the data input
        #[arg(long)]
        url: String,

        /// JSON path to exclude (repeatable)
        #[arg(short, long = "exclude")]
        exclude: Vec<String>,

        /// Which form to run
        #[arg(long, value_enum, default_value_t = FormKind::Index)]
        kind: FormKind,
    },

    /// Remove JSON paths from a local document
    Filter {
        /// JSON file to read; stdin when omitted
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// JSON path to exclude (repeatable)
        #[arg(short, long = "exclude")]
        exclude: Vec<String>,
    },

    /// Validate and save a new data input
    Create {
        #[arg(long, value_enum)]
        kind: FormKind,

        #[arg(long)]
        name: String,

        #[arg(long)]
        url: String,

        /// Cron schedule of the input
        #[arg(long)]
        cron: String,

        /// Index or KV store collection receiving the records
        #[arg(long)]
        output_location: Option<String>,

        /// JSON path to exclude (repeatable)
        #[arg(short, long = "exclude")]
        exclude: Vec<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Index,
    #[value(name = "kvstore")]
    KvStore,
}

impl From<FormKind> for InputType {
    fn from(kind: FormKind) -> Self {
        match kind {
            FormKind::Index => InputType::Index,
            FormKind::KvStore => InputType::KvStore,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["datainputs", "filter"]);
        assert_eq!(cli.config, PathBuf::from("datainputs.toml"));
        assert!(cli.backend_url.is_none());
        match cli.command {
            Command::Filter { file, exclude } => {
                assert!(file.is_none());
                assert!(exclude.is_empty());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_preview_args() {
        let cli = Cli::parse_from([
            "datainputs",
            "--backend-url",
            "http://console:8000",
            "preview",
            "--url",
            "https://example.com/feed.json",
            "-e",
            "$.meta",
            "--exclude",
            "items[*].secret",
            "--kind",
            "kvstore",
        ]);
        assert_eq!(cli.backend_url.as_deref(), Some("http://console:8000"));
        match cli.command {
            Command::Preview { url, exclude, kind } => {
                assert_eq!(url, "https://example.com/feed.json");
                assert_eq!(exclude, vec!["$.meta", "items[*].secret"]);
                assert_eq!(kind, FormKind::KvStore);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_create_args() {
        let cli = Cli::parse_from([
            "datainputs",
            "create",
            "--kind",
            "index",
            "--name",
            "weather",
            "--url",
            "https://example.com/weather.json",
            "--cron",
            "*/5 * * * *",
            "--output-location",
            "main",
        ]);
        match cli.command {
            Command::Create { kind, name, output_location, exclude, .. } => {
                assert_eq!(InputType::from(kind), InputType::Index);
                assert_eq!(name, "weather");
                assert_eq!(output_location.as_deref(), Some("main"));
                assert!(exclude.is_empty());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
