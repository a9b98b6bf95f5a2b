//! AWS Access Analyzer client wrapper for policy validation

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_accessanalyzer::error::DisplayErrorContext;
use aws_sdk_accessanalyzer::types::PolicyType;
use aws_sdk_accessanalyzer::Client as AccessAnalyzerClient;
use log::debug;

use crate::aws::{AwsError, AwsResult, PolicyValidator};
use crate::finding::FindingRecord;
use crate::validation::ValidationRequest;

pub struct AwsAccessAnalyzerClient {
    client: AccessAnalyzerClient,
}

impl AwsAccessAnalyzerClient {
    pub fn new(client: AccessAnalyzerClient) -> Self {
        Self { client }
    }

    pub fn from_conf(config: &SdkConfig) -> Self {
        Self::new(AccessAnalyzerClient::new(config))
    }
}

#[async_trait]
impl PolicyValidator for AwsAccessAnalyzerClient {
    /// Issue a single `ValidatePolicy` call. Only the first page of findings
    /// is read.
    async fn validate(&self, request: &ValidationRequest) -> AwsResult<Vec<FindingRecord>> {
        debug!(
            "Calling ValidatePolicy with policy type {} ({} bytes)",
            request.policy_type,
            request.document.len()
        );

        let output = self
            .client
            .validate_policy()
            .policy_document(request.document.as_str())
            .policy_type(PolicyType::from(request.policy_type.as_str()))
            .send()
            .await
            .map_err(|e| AwsError::AccessAnalyzerError(format!("{}", DisplayErrorContext(&e))))?;

        Ok(output.findings().iter().map(FindingRecord::from).collect())
    }
}
