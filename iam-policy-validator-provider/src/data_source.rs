//! `aws-iam-validator` data source.

use std::sync::Arc;

use async_trait::async_trait;
use iam_policy_validator_analyzer::{validate_document, AmbientAwsConfig, ValidatorSource};
use log::error;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::InvocationContext;
use crate::diagnostics::Diagnostics;
use crate::schema::{AttrType, Attribute, Schema};

pub const DATA_SOURCE_TYPE_NAME: &str = "aws-iam-validator";

/// Outcome of a data source read. `state` is only present when the read
/// produced no error diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadResponse {
    pub state: Option<Value>,
    pub diagnostics: Diagnostics,
}

impl ReadResponse {
    pub fn failed(diagnostics: Diagnostics) -> Self {
        Self {
            state: None,
            diagnostics,
        }
    }
}

/// A host-invocable data source.
#[async_trait]
pub trait DataSource: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    async fn read(&self, ctx: &InvocationContext, config: &Value) -> ReadResponse;
}

#[derive(Debug, Serialize, Deserialize)]
struct ValidatePolicyModel {
    policy_json: String,
    #[serde(default)]
    findings: Option<Vec<String>>,
}

/// Validates an IAM policy document and exposes the findings as state.
pub struct ValidatePolicyDataSource {
    source: Arc<dyn ValidatorSource>,
}

impl ValidatePolicyDataSource {
    pub fn new(source: Arc<dyn ValidatorSource>) -> Self {
        Self { source }
    }
}

impl Default for ValidatePolicyDataSource {
    fn default() -> Self {
        Self::new(Arc::new(AmbientAwsConfig::new()))
    }
}

#[async_trait]
impl DataSource for ValidatePolicyDataSource {
    fn type_name(&self) -> &'static str {
        DATA_SOURCE_TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new(
            "Validates an AWS IAM policy JSON string using the AWS Access Analyzer ValidatePolicy API.",
        )
        .with_attribute(
            "policy_json",
            Attribute::required(AttrType::String, "IAM policy JSON string to validate."),
        )
        .with_attribute(
            "findings",
            Attribute::computed(
                AttrType::list_of(AttrType::String),
                "List of findings from the AWS ValidatePolicy API.",
            ),
        )
    }

    async fn read(&self, ctx: &InvocationContext, config: &Value) -> ReadResponse {
        let mut diagnostics = self.schema().validate_config(config);
        if diagnostics.has_error() {
            return ReadResponse::failed(diagnostics);
        }

        let mut data: ValidatePolicyModel = match serde_json::from_value(config.clone()) {
            Ok(data) => data,
            Err(e) => {
                diagnostics.add_error("Invalid configuration", e.to_string());
                return ReadResponse::failed(diagnostics);
            }
        };

        let findings =
            match validate_document(self.source.as_ref(), ctx.cancel_token(), &data.policy_json)
                .await
            {
                Ok(findings) => findings,
                Err(e) => {
                    error!("{} read failed: {e}", DATA_SOURCE_TYPE_NAME);
                        diagnostics.add_error(e.summary(), e.detail());
                    return ReadResponse::failed(diagnostics);
                }
            };

        data.findings = Some(findings);
        match serde_json::to_value(&data) {
            Ok(state) => ReadResponse {
                state: Some(state),
                diagnostics,
            },
            Err(e) => {
                diagnostics.add_error("State serialization error", e.to_string());
                ReadResponse::failed(diagnostics)
            }
        }
    }
}
