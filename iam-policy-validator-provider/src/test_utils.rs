//! Stub validators shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use iam_policy_validator_analyzer::{
    AwsError, AwsResult, FindingRecord, FindingType, Location, PathElement, PolicyValidator,
    ValidationRequest, ValidatorSource,
};

/// Sample policy documents.
pub mod fixtures {
    /// A well-formed identity policy.
    pub const VALID_POLICY: &str = r#"{"Version":"2012-10-17","Statement":[{"Sid":"AllowX","Effect":"Allow","Action":["iam:GetUser"],"Resource":"*"}]}"#;

    /// Top-level `Statement` key misspelled.
    pub const MISSPELLED_POLICY: &str = r#"{"Version":"2012-10-17","Stment":[{"Sid":"AllowX","Effect":"Allow","Action":["iam:GetUser"],"Resource":"*"}]}"#;
}

pub fn structural_error() -> FindingRecord {
    FindingRecord {
        finding_details: "Add a Statement element to the policy.".to_string(),
        finding_type: FindingType::Error,
        issue_code: "MISSING_STATEMENT".to_string(),
        learn_more_link: "https://docs.aws.amazon.com/IAM/latest/UserGuide/access-analyzer-reference-policy-checks.html".to_string(),
        locations: vec![Location {
            path: vec![PathElement::Key("Stment".to_string())],
            span: None,
        }],
    }
}

/// Records every request and replays a canned response.
pub struct StubSource {
    connect_error: Option<AwsError>,
    validator: Arc<RecordingValidator>,
    connects: AtomicUsize,
}

struct RecordingValidator {
    response: AwsResult<Vec<FindingRecord>>,
    requests: Mutex<Vec<ValidationRequest>>,
}

#[async_trait]
impl PolicyValidator for RecordingValidator {
    async fn validate(&self, request: &ValidationRequest) -> AwsResult<Vec<FindingRecord>> {
        self.requests.lock().unwrap().push(request.clone());
        self.response.clone()
    }
}

impl StubSource {
    pub fn returning(findings: Vec<FindingRecord>) -> Arc<Self> {
        Arc::new(Self::new(None, Ok(findings)))
    }

    pub fn failing_call(message: &str) -> Arc<Self> {
        Arc::new(Self::new(
            None,
            Err(AwsError::AccessAnalyzerError(message.to_string())),
        ))
    }

    pub fn failing_config(message: &str) -> Arc<Self> {
        Arc::new(Self::new(
            Some(AwsError::ConfigError(message.to_string())),
            Ok(vec![]),
        ))
    }

    fn new(connect_error: Option<AwsError>, response: AwsResult<Vec<FindingRecord>>) -> Self {
        Self {
            connect_error,
            validator: Arc::new(RecordingValidator {
                response,
                requests: Mutex::new(Vec::new()),
            }),
            connects: AtomicUsize::new(0),
        }
    }

    /// Number of configuration resolutions attempted.
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<ValidationRequest> {
        self.validator.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ValidatorSource for StubSource {
    async fn connect(&self) -> AwsResult<Arc<dyn PolicyValidator>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if let Some(e) = &self.connect_error {
            return Err(e.clone());
        }
        let validator: Arc<dyn PolicyValidator> = self.validator.clone();
        Ok(validator)
    }
}
