//! Conversions from Access Analyzer SDK shapes into [`FindingRecord`]s.

use aws_sdk_accessanalyzer::types::{
    Location as SdkLocation, PathElement as SdkPathElement, Position as SdkPosition,
    Span as SdkSpan, ValidatePolicyFinding, ValidatePolicyFindingType,
};

use crate::finding::{FindingRecord, FindingType, Location, PathElement, Position, Span};

impl From<&ValidatePolicyFinding> for FindingRecord {
    fn from(finding: &ValidatePolicyFinding) -> Self {
        Self {
            finding_details: finding.finding_details().to_string(),
            finding_type: FindingType::from(finding.finding_type()),
            issue_code: finding.issue_code().to_string(),
            learn_more_link: finding.learn_more_link().to_string(),
            locations: finding.locations().iter().map(Location::from).collect(),
        }
    }
}

impl From<&ValidatePolicyFindingType> for FindingType {
    fn from(value: &ValidatePolicyFindingType) -> Self {
        match value {
            ValidatePolicyFindingType::Error => Self::Error,
            ValidatePolicyFindingType::SecurityWarning => Self::SecurityWarning,
            ValidatePolicyFindingType::Suggestion => Self::Suggestion,
            ValidatePolicyFindingType::Warning => Self::Warning,
            other => Self::Unknown(other.as_str().to_string()),
        }
    }
}

impl From<&SdkLocation> for Location {
    fn from(location: &SdkLocation) -> Self {
        Self {
            path: location.path().iter().map(PathElement::from).collect(),
            span: location.span().map(Span::from),
        }
    }
}

impl From<&SdkPathElement> for PathElement {
    fn from(element: &SdkPathElement) -> Self {
        match element {
            SdkPathElement::Index(index) => Self::Index(*index),
            SdkPathElement::Key(key) => Self::Key(key.clone()),
            SdkPathElement::Substring(substring) => Self::Substring {
                start: substring.start(),
                length: substring.length(),
            },
            SdkPathElement::Value(value) => Self::Value(value.clone()),
            _ => Self::Unknown,
        }
    }
}

impl From<&SdkSpan> for Span {
    fn from(span: &SdkSpan) -> Self {
        Self {
            start: span.start().map(Position::from),
            end: span.end().map(Position::from),
        }
    }
}

impl From<&SdkPosition> for Position {
    fn from(position: &SdkPosition) -> Self {
        Self {
            line: position.line(),
            column: position.column(),
            offset: position.offset(),
        }
    }
}
