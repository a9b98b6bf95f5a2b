//! Provider registry: the set of entry points the host can discover and invoke.

use std::sync::Arc;

use iam_policy_validator_analyzer::{AmbientAwsConfig, ValidatorSource};
use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;

use crate::context::InvocationContext;
use crate::data_source::{DataSource, ReadResponse, ValidatePolicyDataSource};
use crate::diagnostics::{Diagnostics, FunctionError};
use crate::function::{Function, ValidatePolicyFunction};
use crate::schema::{FunctionDefinition, Schema};

/// What the provider offers, as reported to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderMetadata {
    pub version: String,
    pub data_sources: Vec<String>,
    pub functions: Vec<String>,
}

/// Registers the policy validation data source and function and dispatches
/// host calls to them by name.
pub struct IamValidatorProvider {
    data_sources: Vec<Arc<dyn DataSource>>,
    functions: Vec<Arc<dyn Function>>,
}

impl IamValidatorProvider {
    /// Provider whose entry points resolve ambient AWS configuration on every call.
    pub fn new() -> Self {
        Self::with_validator_source(Arc::new(AmbientAwsConfig::new()))
    }

    /// Provider whose entry points validate through `source`.
    pub fn with_validator_source(source: Arc<dyn ValidatorSource>) -> Self {
        Self {
            data_sources: vec![Arc::new(ValidatePolicyDataSource::new(source.clone()))],
            functions: vec![Arc::new(ValidatePolicyFunction::new(source))],
        }
    }

    pub fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            data_sources: self
                .data_sources
                .iter()
                .map(|d| d.type_name().to_string())
                .collect(),
            functions: self.functions.iter().map(|f| f.name().to_string()).collect(),
        }
    }

    pub fn data_source_schema(&self, type_name: &str) -> Option<Schema> {
        self.data_source(type_name).map(|d| d.schema())
    }

    pub fn function_definition(&self, name: &str) -> Option<FunctionDefinition> {
        self.function(name).map(|f| f.definition())
    }

    pub async fn read_data_source(
        &self,
        type_name: &str,
        ctx: &InvocationContext,
        config: &Value,
    ) -> ReadResponse {
        let Some(data_source) = self.data_source(type_name) else {
            warn!("Read requested for unknown data source {}", type_name);
            let mut diagnostics = Diagnostics::new();
            diagnostics.add_error(
                "Unknown data source",
                format!("This provider does not support data source \"{type_name}\"."),
            );
            return ReadResponse::failed(diagnostics);
        };

        debug!("Reading data source {}", type_name);
        data_source.read(ctx, config).await
    }

    pub async fn call_function(
        &self,
        name: &str,
        ctx: &InvocationContext,
        args: &[Value],
    ) -> Result<Value, FunctionError> {
        let Some(function) = self.function(name) else {
            warn!("Call requested for unknown function {}", name);
            return Err(FunctionError::new(format!(
                "This provider does not define a function named \"{name}\"."
            )));
        };

        debug!("Calling function {}", name);
        function.run(ctx, args).await
    }

    fn data_source(&self, type_name: &str) -> Option<&Arc<dyn DataSource>> {
        self.data_sources
            .iter()
            .find(|d| d.type_name() == type_name)
    }

    fn function(&self, name: &str) -> Option<&Arc<dyn Function>> {
        self.functions.iter().find(|f| f.name() == name)
    }
}

impl Default for IamValidatorProvider {
    fn default() -> Self {
        Self::new()
    }
}
