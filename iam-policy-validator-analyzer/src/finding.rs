//! Finding records returned by the remote validator.
//!
//! A [`FindingRecord`] is serialized one JSON object per finding, with
//! PascalCase keys:
//!
//! ```text
//! {"FindingDetails":"...","FindingType":"ERROR","IssueCode":"...","LearnMoreLink":"...",
//!  "Locations":[{"Path":[{"Key":"Statement"}],"Span":{"Start":{...},"End":{...}}}]}
//! ```

use serde::{Deserialize, Serialize};

/// A single diagnostic reported about a submitted policy document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FindingRecord {
    pub finding_details: String,
    pub finding_type: FindingType,
    pub issue_code: String,
    pub learn_more_link: String,
    pub locations: Vec<Location>,
}

/// Severity category of a finding. Categories this crate does not know yet
/// are carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindingType {
    Error,
    SecurityWarning,
    Suggestion,
    Warning,
    #[serde(untagged)]
    Unknown(String),
}

/// Where in the policy document a finding applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Location {
    pub path: Vec<PathElement>,
    pub span: Option<Span>,
}

/// One step of the JSON path from the document root to the finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum PathElement {
    Index(i32),
    Key(String),
    #[serde(rename_all = "PascalCase")]
    Substring {
        start: i32,
        length: i32,
    },
    Value(String),
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Span {
    pub start: Option<Position>,
    pub end: Option<Position>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Position {
    pub line: i32,
    pub column: i32,
    pub offset: i32,
}
