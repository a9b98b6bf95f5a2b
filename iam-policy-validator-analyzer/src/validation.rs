//! Request/response shaping shared by every entry point.
//!
//! Both the data source and the function run the same linear exchange:
//! resolve configuration, make one `ValidatePolicy` call, render findings.

use log::{debug, error, info};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::aws::{AwsError, AwsResult, ValidatorSource};
use crate::finding::FindingRecord;

/// The only classification the validator submits documents under.
pub const IDENTITY_POLICY: &str = "IDENTITY_POLICY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRequest {
    pub document: String,
    pub policy_type: String,
}

/// Terminal failure of a validation exchange.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Ambient credentials or region could not be resolved.
    #[error("AWS config error: {0}")]
    Configuration(String),

    /// The remote call failed or was rejected.
    #[error("ValidatePolicy error: {0}")]
    RemoteCall(String),

    /// A finding could not be rendered to its string form.
    #[error("Finding serialization error: {0}")]
    Render(String),

    /// The caller cancelled the invocation before it completed.
    #[error("Operation cancelled: policy validation was interrupted before it completed")]
    Cancelled,
}

impl ValidationError {
    /// Short, host-facing summary line for this failure.
    pub fn summary(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "AWS config error",
            Self::RemoteCall(_) => "ValidatePolicy error",
            Self::Render(_) => "Finding serialization error",
            Self::Cancelled => "Operation cancelled",
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            Self::Configuration(msg) | Self::RemoteCall(msg) | Self::Render(msg) => msg,
            Self::Cancelled => "policy validation was interrupted before it completed",
        }
    }
}

/// Build a validation request for `document`; the document is passed through untouched.
pub fn build_request(document: impl Into<String>) -> ValidationRequest {
    ValidationRequest {
        document: document.into(),
        policy_type: IDENTITY_POLICY.to_string(),
    }
}

/// Render each finding as a compact JSON object, preserving order.
pub fn render_findings(findings: &[FindingRecord]) -> AwsResult<Vec<String>> {
    findings
        .iter()
        .map(|finding| {
            serde_json::to_string(finding).map_err(|e| {
                AwsError::SerializationError(format!("Failed to serialize finding: {e}"))
            })
        })
        .collect()
}

/// Validate `document` against the remote service and return rendered findings.
///
/// The whole exchange races `cancel`; a cancelled token wins even if the
/// remote call would have succeeded.
pub async fn validate_document(
    source: &dyn ValidatorSource,
    cancel: &CancellationToken,
    document: &str,
) -> Result<Vec<String>, ValidationError> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => {
            info!("Policy validation cancelled");
            Err(ValidationError::Cancelled)
        }
        result = run_validation(source, document) => result,
    }
}

async fn run_validation(
    source: &dyn ValidatorSource,
    document: &str,
) -> Result<Vec<String>, ValidationError> {
    info!("Loading AWS configuration");
    let validator = source.connect().await.map_err(|e| {
        error!("failed to load AWS config: {e}");
        ValidationError::Configuration(e.detail().to_string())
    })?;
    info!("Loaded AWS configuration");

    let request = build_request(document);
    let findings = validator.validate(&request).await.map_err(|e| {
        error!("failed to validate policy: {e}");
        ValidationError::RemoteCall(e.detail().to_string())
    })?;

    info!("ValidatePolicy returned {} findings", findings.len());
    debug!("Findings: {:?}", findings);

    render_findings(&findings).map_err(|e| ValidationError::Render(e.detail().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aws::PolicyValidator;
    use crate::finding::{FindingType, Location, PathElement};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    const VALID_POLICY: &str = r#"{"Version":"2012-10-17","Statement":[{"Sid":"AllowX","Effect":"Allow","Action":["iam:GetUser"],"Resource":"*"}]}"#;

    fn finding(issue_code: &str) -> FindingRecord {
        FindingRecord {
            finding_details: format!("details for {issue_code}"),
            finding_type: FindingType::Warning,
            issue_code: issue_code.to_string(),
            learn_more_link: "https://docs.aws.amazon.com/IAM/".to_string(),
            locations: vec![Location {
                path: vec![PathElement::Key("Statement".to_string())],
                span: None,
            }],
        }
    }

    struct StubValidator {
        response: AwsResult<Vec<FindingRecord>>,
        requests: Mutex<Vec<ValidationRequest>>,
    }

    #[async_trait]
    impl PolicyValidator for StubValidator {
        async fn validate(&self, request: &ValidationRequest) -> AwsResult<Vec<FindingRecord>> {
            self.requests.lock().unwrap().push(request.clone());
            self.response.clone()
        }
    }

    struct StubSource {
        connect_error: Option<AwsError>,
        validator: Arc<StubValidator>,
        connects: AtomicUsize,
    }

    impl StubSource {
        fn returning(response: AwsResult<Vec<FindingRecord>>) -> Self {
            Self {
                connect_error: None,
                validator: Arc::new(StubValidator {
                    response,
                    requests: Mutex::new(Vec::new()),
                }),
                connects: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ValidatorSource for StubSource {
        async fn connect(&self) -> AwsResult<Arc<dyn PolicyValidator>> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            match &self.connect_error {
                Some(e) => Err(e.clone()),
                None => {
                    let validator: Arc<dyn PolicyValidator> = self.validator.clone();
                    Ok(validator)
                }
            }
        }
    }

    /// Never resolves; used to exercise cancellation.
    struct HangingSource;

    #[async_trait]
    impl ValidatorSource for HangingSource {
        async fn connect(&self) -> AwsResult<Arc<dyn PolicyValidator>> {
            std::future::pending().await
        }
    }

    #[test]
    fn test_render_findings_preserves_order() {
        let rendered = render_findings(&[finding("FIRST"), finding("SECOND"), finding("THIRD")])
            .unwrap();
        assert_eq!(rendered.len(), 3);
        assert!(rendered[0].contains("\"IssueCode\":\"FIRST\""));
        assert!(rendered[1].contains("\"IssueCode\":\"SECOND\""));
        assert!(rendered[2].contains("\"IssueCode\":\"THIRD\""));
        assert!(rendered.iter().all(|s| !s.is_empty()));
    }

    #[test]
    fn test_render_no_findings_is_empty() {
        assert!(render_findings(&[]).unwrap().is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn test_valid_policy_yields_empty_list() {
        let source = StubSource::returning(Ok(vec![]));
        let result = validate_document(&source, &CancellationToken::new(), VALID_POLICY).await;
        assert_eq!(result, Ok(vec![]));

        let requests = source.validator.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].document, VALID_POLICY);
        assert_eq!(requests[0].policy_type, "IDENTITY_POLICY");
    }

    #[tokio::test]
    async fn test_repeated_calls_are_identical() {
        let source = StubSource::returning(Ok(vec![finding("A"), finding("B")]));
        let cancel = CancellationToken::new();
        let first = validate_document(&source, &cancel, VALID_POLICY).await.unwrap();
        let second = validate_document(&source, &cancel, VALID_POLICY).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(source.connects.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_connect_failure_is_configuration_error() {
        let mut source = StubSource::returning(Ok(vec![]));
        source.connect_error = Some(AwsError::ConfigError("no region".to_string()));

        let result = validate_document(&source, &CancellationToken::new(), VALID_POLICY).await;
        assert_eq!(
            result,
            Err(ValidationError::Configuration("no region".to_string()))
        );
        assert!(source.validator.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remote_failure_is_surfaced_verbatim() {
        let source = StubSource::returning(Err(AwsError::AccessAnalyzerError(
            "ValidationException: policy document is too large".to_string(),
        )));

        let err = validate_document(&source, &CancellationToken::new(), VALID_POLICY)
            .await
            .unwrap_err();
        assert_eq!(err.summary(), "ValidatePolicy error");
        assert_eq!(
            err.to_string(),
            "ValidatePolicy error: ValidationException: policy document is too large"
        );
    }

    #[tokio::test]
    async fn test_cancelled_token_aborts() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = validate_document(&HangingSource, &cancel, VALID_POLICY).await;
        assert_eq!(result, Err(ValidationError::Cancelled));
    }

    #[tokio::test]
    async fn test_cancellation_interrupts_pending_call() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            trigger.cancel();
        });
        let result = validate_document(&HangingSource, &cancel, VALID_POLICY).await;
        assert_eq!(result, Err(ValidationError::Cancelled));
    }
}
