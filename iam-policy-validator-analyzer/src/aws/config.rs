//! Ambient AWS configuration resolution
//!
//! Credentials and region come from the standard provider chains (environment
//! variables, shared config/credential files, container and instance metadata).
//! Nothing here is accepted from the caller.

use std::sync::Arc;

use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_accessanalyzer::error::DisplayErrorContext;
use log::debug;

use crate::aws::{AwsAccessAnalyzerClient, AwsError, AwsResult, PolicyValidator, ValidatorSource};

/// [`ValidatorSource`] backed by the default AWS configuration loader.
#[derive(Debug, Default, Clone, Copy)]
pub struct AmbientAwsConfig;

impl AmbientAwsConfig {
    pub fn new() -> Self {
        Self
    }

    /// Load the ambient SDK configuration and make sure it is usable.
    ///
    /// SDK-level retries are disabled: every validation is a single attempt.
    ///
    /// # Errors
    ///
    /// Returns [`AwsError::ConfigError`] if no region resolves or the credential
    /// chain cannot produce credentials.
    pub async fn load(&self) -> AwsResult<SdkConfig> {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .retry_config(RetryConfig::disabled())
            .load()
            .await;

        ensure_resolved(&config).await?;
        Ok(config)
    }
}

/// Fail fast when the configuration cannot reach the service at all.
///
/// The SDK resolves credentials lazily, so without this check a missing
/// profile would only show up as an opaque dispatch failure.
pub(crate) async fn ensure_resolved(config: &SdkConfig) -> AwsResult<()> {
    let region = config.region().ok_or_else(|| {
        AwsError::ConfigError(
            "no AWS region could be resolved from the environment, shared config, or instance metadata"
                .to_string(),
        )
    })?;

    let provider = config.credentials_provider().ok_or_else(|| {
        AwsError::ConfigError("no AWS credentials provider is configured".to_string())
    })?;

    provider.provide_credentials().await.map_err(|e| {
        AwsError::ConfigError(format!(
            "failed to resolve AWS credentials: {}",
            DisplayErrorContext(&e)
        ))
    })?;

    debug!("Resolved AWS configuration for region {}", region);
    Ok(())
}

#[async_trait]
impl ValidatorSource for AmbientAwsConfig {
    async fn connect(&self) -> AwsResult<Arc<dyn PolicyValidator>> {
        let config = self.load().await?;
        Ok(Arc::new(AwsAccessAnalyzerClient::from_conf(&config)))
    }
}

/// An already-loaded configuration, e.g. one pointing at a custom endpoint.
#[async_trait]
impl ValidatorSource for SdkConfig {
    async fn connect(&self) -> AwsResult<Arc<dyn PolicyValidator>> {
        ensure_resolved(self).await?;
        Ok(Arc::new(AwsAccessAnalyzerClient::from_conf(self)))
    }
}
