//! This crate provides the AWS side of IAM Policy Validator:
//! - ambient AWS configuration resolution
//! - the Access Analyzer `ValidatePolicy` call behind the [`PolicyValidator`] seam
//! - serializable finding records and the request/response shaping shared by
//!   every entry point
//!

mod aws;
pub mod finding;
pub mod validation;

// Re-exports for a small, focused public API
pub use aws::{
    AmbientAwsConfig, AwsAccessAnalyzerClient, AwsError, AwsResult, PolicyValidator,
    ValidatorSource,
};
pub use finding::{FindingRecord, FindingType, Location, PathElement, Position, Span};
pub use validation::{
    build_request, render_findings, validate_document, ValidationError, ValidationRequest,
    IDENTITY_POLICY,
};
