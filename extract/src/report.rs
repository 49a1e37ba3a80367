//! Structured extraction reporting.

use serde::{Deserialize, Serialize};

/// Structured failure code for pages that contributed no builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCode {
    /// Page file could not be read.
    ReadFailed,
    /// Document had no usable content.
    MalformedDocument,
    /// Every strategy ran and none found a build.
    NoBuilds,
}

impl std::fmt::Display for FailureCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadFailed => write!(f, "read_failed"),
            Self::MalformedDocument => write!(f, "malformed_document"),
            Self::NoBuilds => write!(f, "no_builds"),
        }
    }
}

/// Per-page extraction report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub subject: String,
    pub success: bool,
    /// Strategy whose result was kept.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    /// Strategies that ran, in order.
    pub strategies_attempted: Vec<String>,
    pub record_count: usize,
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_code: Option<FailureCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_detail: Option<String>,
}

impl ExtractionReport {
    /// Report for a page that never reached the pipeline.
    pub fn failed(subject: &str, code: FailureCode, detail: impl Into<String>) -> Self {
        Self {
            subject: subject.to_string(),
            success: false,
            strategy: None,
            strategies_attempted: Vec::new(),
            record_count: 0,
            warnings: Vec::new(),
            failure_code: Some(code),
            failure_detail: Some(detail.into()),
        }
    }
}

/// Serializable report for a whole batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReportBundle {
    /// RFC 3339 timestamp of the run.
    pub generated_at: String,
    pub reports: Vec<ExtractionReport>,
    /// Subjects whose page failed to load or parse.
    pub failures: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_code_display_matches_serde() {
        for code in [
            FailureCode::ReadFailed,
            FailureCode::MalformedDocument,
            FailureCode::NoBuilds,
        ] {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{code}\""));
        }
    }

    #[test]
    fn test_failed_report_omits_strategy() {
        let report = ExtractionReport::failed("Mew", FailureCode::MalformedDocument, "empty");
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("strategy").is_none());
        assert_eq!(json["failure_code"], "malformed_document");
        assert_eq!(json["success"], false);
    }
}
