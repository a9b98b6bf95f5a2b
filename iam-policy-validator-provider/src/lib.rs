//! Terraform-facing entry points for IAM policy validation.
//!
//! Two components share one remote call, AWS Access Analyzer `ValidatePolicy`:
//! - the `aws-iam-validator` data source, which stores findings in state
//! - the `validate_policy` function, which returns `{ errors = [...] }`
//!
//! [`IamValidatorProvider`] registers both and dispatches host calls by name.

pub mod context;
pub mod data_source;
pub mod diagnostics;
pub mod function;
pub mod registry;
pub mod schema;

#[cfg(test)]
pub(crate) mod test_utils;

pub use context::InvocationContext;
pub use data_source::{DataSource, ReadResponse, ValidatePolicyDataSource, DATA_SOURCE_TYPE_NAME};
pub use diagnostics::{Diagnostic, Diagnostics, FunctionError, Severity};
pub use function::{Function, FunctionArguments, ValidatePolicyFunction, FUNCTION_NAME};
pub use registry::{IamValidatorProvider, ProviderMetadata};
pub use schema::{AttrType, Attribute, AttributeMode, FunctionDefinition, Parameter, Schema};

// Re-export the remote-validation seam for callers that inject their own
pub use iam_policy_validator_analyzer::{AmbientAwsConfig, ValidatorSource};
