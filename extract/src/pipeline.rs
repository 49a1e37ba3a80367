//! Page pipeline: strategy fallback and per-document runs.

use dex_builds_core::{BuildRecord, EV_TOTAL_LIMIT, PageResult};
use tracing::{debug, info, warn};

use crate::config::ExtractConfig;
use crate::document::Page;
use crate::error::ExtractError;
use crate::report::{ExtractionReport, FailureCode};
use crate::strategies::{LocatorStrategy, default_strategies};

/// Which strategy produced a page's records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    pub records: Vec<BuildRecord>,
    /// Name of the strategy whose result was kept, if any was non-empty.
    pub strategy: Option<&'static str>,
    /// Strategies that ran, in order.
    pub attempted: Vec<&'static str>,
}

/// Full result of extracting one document.
#[derive(Debug, Clone)]
pub struct ExtractionRun {
    pub page: PageResult,
    pub report: ExtractionReport,
}

/// Ordered set of locator strategies applied to each page.
///
/// Strategies run in order and the first non-empty result wins; later
/// strategies are never invoked for that page.
pub struct PagePipeline {
    strategies: Vec<Box<dyn LocatorStrategy>>,
}

impl PagePipeline {
    /// Pipeline with the default strategies for `config`'s anchors.
    pub fn new(config: &ExtractConfig) -> Self {
        Self::with_strategies(default_strategies(&config.anchors))
    }

    pub fn with_strategies(strategies: Vec<Box<dyn LocatorStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Runs strategies against a parsed page until one finds builds.
    pub fn run(&self, page: &Page) -> PipelineOutcome {
        let mut attempted = Vec::new();

        for strategy in &self.strategies {
            attempted.push(strategy.name());
            let records = strategy.locate(page);
            debug!(
                subject = page.subject(),
                strategy = strategy.name(),
                records = records.len(),
                "Strategy finished"
            );
            if !records.is_empty() {
                return PipelineOutcome {
                    records,
                    strategy: Some(strategy.name()),
                    attempted,
                };
            }
        }

        PipelineOutcome {
            records: Vec::new(),
            strategy: None,
            attempted,
        }
    }

    /// Parses `source` and extracts its builds along with a report.
    ///
    /// # Errors
    ///
    /// [`ExtractError::MalformedDocument`] when `source` has no usable
    /// content. A page without builds is not an error.
    pub fn run_document(&self, subject: &str, source: &str) -> Result<ExtractionRun, ExtractError> {
        let outcome = {
            let page = Page::parse(subject, source)?;
            self.run(&page)
        };

        let warnings = budget_warnings(&outcome.records);
        for warning in &warnings {
            warn!(subject, "{warning}");
        }

        let record_count = outcome.records.len();
        let success = record_count > 0;
        info!(
            subject,
            strategy = outcome.strategy.unwrap_or("none"),
            records = record_count,
            "Extracted builds"
        );

        let report = ExtractionReport {
            subject: subject.to_string(),
            success,
            strategy: outcome.strategy.map(str::to_string),
            strategies_attempted: outcome.attempted.iter().map(|s| s.to_string()).collect(),
            record_count,
            warnings,
            failure_code: (!success).then_some(FailureCode::NoBuilds),
            failure_detail: (!success).then(|| "no strategy found a build table".to_string()),
        };

        Ok(ExtractionRun {
            page: PageResult::new(subject, outcome.records),
            report,
        })
    }
}

impl Default for PagePipeline {
    fn default() -> Self {
        Self::new(&ExtractConfig::default())
    }
}

/// Spreads the normalizer could not bring under budget, for manual review.
fn budget_warnings(records: &[BuildRecord]) -> Vec<String> {
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| !record.evs.is_within_budget())
        .map(|(index, record)| {
            format!(
                "build {index}: EV total {} exceeds {EV_TOTAL_LIMIT} and was left unchanged",
                record.evs.total()
            )
        })
        .collect()
}
