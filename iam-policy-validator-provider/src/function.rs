//! `validate_policy` provider function.

use std::sync::Arc;

use async_trait::async_trait;
use iam_policy_validator_analyzer::{validate_document, AmbientAwsConfig, ValidatorSource};
use log::{error, info};
use serde::Serialize;
use serde_json::Value;

use crate::context::InvocationContext;
use crate::diagnostics::FunctionError;
use crate::schema::{AttrType, FunctionDefinition, Parameter};

pub const FUNCTION_NAME: &str = "validate_policy";

/// A host-invocable function.
#[async_trait]
pub trait Function: Send + Sync {
    fn name(&self) -> &'static str;

    fn definition(&self) -> FunctionDefinition;

    async fn run(&self, ctx: &InvocationContext, args: &[Value]) -> Result<Value, FunctionError>;
}

/// Positional arguments checked against a [`FunctionDefinition`].
#[derive(Debug)]
pub struct FunctionArguments<'a> {
    definition: &'a FunctionDefinition,
    args: &'a [Value],
}

impl<'a> FunctionArguments<'a> {
    /// Check arity, nullness, and type of every argument.
    pub fn parse(
        definition: &'a FunctionDefinition,
        args: &'a [Value],
    ) -> Result<Self, FunctionError> {
        let expected = definition.parameters.len();
        if args.len() != expected {
            return Err(FunctionError::new(format!(
                "Function expects {expected} argument(s), got {}",
                args.len()
            )));
        }

        for (position, (parameter, value)) in
            definition.parameters.iter().zip(args.iter()).enumerate()
        {
            if value.is_null() {
                return Err(FunctionError::argument(
                    position,
                    format!(
                        "Invalid value for \"{}\" parameter: value must not be null.",
                        parameter.name
                    ),
                ));
            }
            if !parameter.attr_type.conforms(value) {
                return Err(FunctionError::argument(
                    position,
                    format!(
                        "Invalid value for \"{}\" parameter: {} required.",
                        parameter.name,
                        parameter.attr_type.friendly_name()
                    ),
                ));
            }
        }

        Ok(Self { definition, args })
    }

    pub fn string(&self, position: usize) -> Result<&'a str, FunctionError> {
        self.args
            .get(position)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                let name = self
                    .definition
                    .parameters
                    .get(position)
                    .map_or("argument", |p| p.name.as_str());
                FunctionError::argument(position, format!("\"{name}\" must be a string"))
            })
    }
}

#[derive(Debug, Serialize)]
struct ValidatePolicyResult {
    errors: Vec<String>,
}

/// Validates an IAM policy document and returns `{ errors = [...] }`.
pub struct ValidatePolicyFunction {
    source: Arc<dyn ValidatorSource>,
}

impl ValidatePolicyFunction {
    pub fn new(source: Arc<dyn ValidatorSource>) -> Self {
        Self { source }
    }
}

impl Default for ValidatePolicyFunction {
    fn default() -> Self {
        Self::new(Arc::new(AmbientAwsConfig::new()))
    }
}

#[async_trait]
impl Function for ValidatePolicyFunction {
    fn name(&self) -> &'static str {
        FUNCTION_NAME
    }

    fn definition(&self) -> FunctionDefinition {
        FunctionDefinition {
            summary: "Validate an AWS IAM policy JSON string using the AWS Access Analyzer ValidatePolicy API.".to_string(),
            description: "Given an IAM policy JSON string, calls AWS ValidatePolicy and returns a list of validation errors.".to_string(),
            parameters: vec![Parameter::string(
                "policy_json",
                "IAM policy JSON string to validate.",
            )],
            return_type: AttrType::object([("errors", AttrType::list_of(AttrType::String))]),
        }
    }

    async fn run(&self, ctx: &InvocationContext, args: &[Value]) -> Result<Value, FunctionError> {
        info!("Running {} function", FUNCTION_NAME);

        let definition = self.definition();
        let policy_json = FunctionArguments::parse(&definition, args)
            .and_then(|arguments| arguments.string(0))
            .map_err(|e| {
                error!("{} argument error: {e}", FUNCTION_NAME);
                e
            })?;

        let errors = validate_document(self.source.as_ref(), ctx.cancel_token(), policy_json)
            .await
            .map_err(|e| FunctionError::new(e.to_string()))?;

        let result = serde_json::to_value(ValidatePolicyResult { errors })
            .map_err(|e| FunctionError::new(format!("Failed to build result: {e}")))?;
        if !definition.return_type.conforms(&result) {
            return Err(FunctionError::new(
                "Function result does not match the declared return type",
            ));
        }
        Ok(result)
    }
}
