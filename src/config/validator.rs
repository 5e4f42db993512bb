use thiserror::Error;

use crate::config::{BackendSettings, LoggingSettings, Settings};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        // Validate backend settings
        if let Err(e) = Self::validate_backend(&settings.backend) {
            errors.extend(e);
        }

        // Validate logging settings
        if let Err(e) = Self::validate_logging(&settings.logging) {
            errors.extend(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_backend(backend: &BackendSettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        // Base URL must be an absolute http(s) URL
        if backend.base_url.is_empty() {
            errors.push(ValidationError::MissingField("backend.base_url".to_string()));
        } else if !(backend.base_url.starts_with("http://") || backend.base_url.starts_with("https://")) {
            errors.push(ValidationError::InvalidValue {
                field: "backend.base_url".to_string(),
                reason: "URL must start with http:// or https://".to_string(),
            });
        }

        // Endpoints are joined onto the base URL
        for (field, endpoint) in [
            ("backend.index_endpoint", &backend.index_endpoint),
            ("backend.kvstore_endpoint", &backend.kvstore_endpoint),
        ] {
            if !endpoint.starts_with('/') {
                errors.push(ValidationError::InvalidValue {
                    field: field.to_string(),
                    reason: "Endpoint path must start with '/'".to_string(),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_logging(logging: &LoggingSettings) -> Result<(), Vec<ValidationError>> {
        if logging.level.trim().is_empty() {
            return Err(vec![ValidationError::MissingField("logging.level".to_string())]);
        }
        Ok(())
    }
}
