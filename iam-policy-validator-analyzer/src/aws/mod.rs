//! AWS SDK integration: Access Analyzer client wrapper and ambient configuration.

pub(crate) mod access_analyzer_client;
pub(crate) mod config;
mod conversion;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::finding::FindingRecord;
use crate::validation::ValidationRequest;

pub use access_analyzer_client::AwsAccessAnalyzerClient;
pub use config::AmbientAwsConfig;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AwsError {
    #[error("AWS configuration error: {0}")]
    ConfigError(String),
    #[error("Access Analyzer client error: {0}")]
    AccessAnalyzerError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl AwsError {
    /// The underlying message without the category prefix.
    pub fn detail(&self) -> &str {
        match self {
            Self::ConfigError(msg)
            | Self::AccessAnalyzerError(msg)
            | Self::SerializationError(msg) => msg,
        }
    }
}

pub type AwsResult<T> = Result<T, AwsError>;

/// A remote service that classifies a policy document and reports findings.
///
/// Implementations make exactly one attempt per call.
#[async_trait]
pub trait PolicyValidator: Send + Sync {
    async fn validate(&self, request: &ValidationRequest) -> AwsResult<Vec<FindingRecord>>;
}

/// Resolves remote-service configuration and hands back a ready validator.
///
/// Called once per invocation; nothing is cached between calls.
#[async_trait]
pub trait ValidatorSource: Send + Sync {
    async fn connect(&self) -> AwsResult<Arc<dyn PolicyValidator>>;
}
