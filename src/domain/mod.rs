use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

pub mod exclusion;
pub mod json_path;

pub use exclusion::PathExclusionFilter;
pub use json_path::{JsonPath, JsonPathError, PathSegment};

/// Where a data input writes its records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Index,
    #[serde(rename = "kvstore")]
    KvStore,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::Index => "index",
            InputType::KvStore => "kvstore",
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "index" => Ok(InputType::Index),
            "kvstore" => Ok(InputType::KvStore),
            other => Err(anyhow::anyhow!("Unknown input type: {}", other)),
        }
    }
}

/// When `selected_output_location` counts as a required field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLocationRule {
    Always,
    KvStoreOnly,
}

/// Draft of a data input as edited in the console form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataInputConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub input_type: Option<InputType>,
    #[serde(default)]
    pub cron_expression: String,
    #[serde(default)]
    pub selected_output_location: String,
    #[serde(default)]
    pub excluded_paths: Vec<String>,
}

impl DataInputConfig {
    pub fn new(input_type: InputType) -> Self {
        Self {
            input_type: Some(input_type),
            ..Default::default()
        }
    }

    /// Names of required fields that are still empty
    pub fn missing_required_fields(&self, rule: OutputLocationRule) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.is_empty() {
            missing.push("name");
        }
        if self.url.is_empty() {
            missing.push("url");
        }
        if self.input_type.is_none() {
            missing.push("input_type");
        }
        if self.cron_expression.is_empty() {
            missing.push("cron_expression");
        }
        let needs_location = match rule {
            OutputLocationRule::Always => true,
            OutputLocationRule::KvStoreOnly => self.input_type == Some(InputType::KvStore),
        };
        if needs_location && self.selected_output_location.is_empty() {
            missing.push("selected_output_location");
        }
        missing
    }

    /// Append an exclusion path picked from the preview tree. Returns false
    /// if the path was already excluded.
    pub fn add_excluded_path(&mut self, path: impl Into<String>) -> bool {
        let path = path.into();
        if self.excluded_paths.contains(&path) {
            return false;
        }
        self.excluded_paths.push(path);
        true
    }

    pub fn remove_excluded_path(&mut self, path: &str) -> bool {
        let before = self.excluded_paths.len();
        self.excluded_paths.retain(|p| p != path);
        self.excluded_paths.len() != before
    }

    /// Reset the form inputs after a successful save. The input type stays,
    /// since it selects which form is shown.
    pub fn clear_inputs(&mut self) {
        *self = Self {
            input_type: self.input_type,
            ..Default::default()
        };
    }
}

/// Response of a preview GET, before JSON decoding
#[derive(Debug, Clone)]
pub struct PreviewResponse {
    pub status: u16,
    pub body: String,
}

impl PreviewResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

#[async_trait]
pub trait PreviewFetchPort: Send + Sync {
    /// Issue a GET against a user-supplied URL. Errors are transport failures
    /// only; non-success statuses come back as a response.
    async fn get(&self, url: &str) -> anyhow::Result<PreviewResponse>;
}

#[async_trait]
pub trait IndexSavePort: Send + Sync {
    async fn save_to_index(&self, config: &DataInputConfig) -> anyhow::Result<()>;
}

#[async_trait]
pub trait KvStoreSavePort: Send + Sync {
    async fn save_to_kvstore(&self, config: &DataInputConfig) -> anyhow::Result<()>;
}
