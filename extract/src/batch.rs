//! Directory batches and bundle file workflows.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use dex_builds_core::{DexBundle, PageResult, budget_warnings, validate_bundle};
use tracing::{debug, info, warn};

use crate::config::ExtractConfig;
use crate::error::{ExtractError, Result};
use crate::pipeline::PagePipeline;
use crate::report::{ExtractionReport, ExtractionReportBundle, FailureCode};

/// Aggregated output from a batch run.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Builds of every page that parsed, keyed by subject.
    pub bundle: DexBundle,
    /// Per-page reports, sorted by subject.
    pub reports: Vec<ExtractionReport>,
    /// Subjects that contributed no builds.
    pub failures: Vec<String>,
    /// Non-fatal warnings, prefixed with their subject.
    pub warnings: Vec<String>,
}

impl BatchOutcome {
    /// Serializable report for this run.
    pub fn report_bundle(&self) -> ExtractionReportBundle {
        build_report_bundle(self.reports.clone(), self.failures.clone())
    }
}

/// Subject identifier for a page file: its file stem.
///
/// `pages/Garchomp.html` → `Garchomp`.
pub fn subject_from_path(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?.trim();
    (!stem.is_empty()).then(|| stem.to_string())
}

/// Page files directly inside `dir` with the given extension, sorted.
///
/// # Errors
///
/// [`ExtractError::InvalidInput`] if `dir` is not a directory or holds no
/// matching files; [`ExtractError::Io`] if it cannot be listed.
pub fn collect_page_paths(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ExtractError::InvalidInput(format!(
            "Input directory '{}' does not exist",
            dir.display()
        )));
    }

    let extension = extension.trim_start_matches('.');
    let mut paths = BTreeSet::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension() == Some(OsStr::new(extension)) {
            paths.insert(path);
        }
    }

    if paths.is_empty() {
        return Err(ExtractError::InvalidInput(format!(
            "No .{extension} files found in '{}'",
            dir.display()
        )));
    }

    Ok(paths.into_iter().collect())
}

/// Extracts every page file in `dir` into one bundle.
///
/// # Errors
///
/// See [`collect_page_paths`] and [`extract_paths`].
pub fn extract_directory(dir: &Path, config: &ExtractConfig) -> Result<BatchOutcome> {
    let paths = collect_page_paths(dir, &config.batch.extension)?;
    extract_paths(&paths, config)
}

/// Extracts the given page files in parallel and merges the results.
///
/// Pages that cannot be read or parsed are recorded as failed reports and do
/// not stop the batch. Pages where no strategy found a build still appear in
/// the bundle, with an empty list.
///
/// # Errors
///
/// [`ExtractError::ThreadPool`] if the worker pool cannot be created, and
/// [`ExtractError::Validation`] if two paths map to the same subject.
pub fn extract_paths(paths: &[PathBuf], config: &ExtractConfig) -> Result<BatchOutcome> {
    let pipeline = PagePipeline::new(config);

    let extract_one = |path: &PathBuf| -> (Option<PageResult>, ExtractionReport) {
        let subject = subject_from_path(path).unwrap_or_else(|| path.display().to_string());

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(
                    subject = %subject,
                    path = %path.display(),
                    error = %err,
                    "Failed to read page"
                );
                let report =
                    ExtractionReport::failed(&subject, FailureCode::ReadFailed, err.to_string());
                return (None, report);
            }
        };
        let source = String::from_utf8_lossy(&bytes);

        match pipeline.run_document(&subject, &source) {
            Ok(run) => (Some(run.page), run.report),
            Err(err) => {
                warn!(subject = %subject, error = %err, "Skipping malformed page");
                let report = ExtractionReport::failed(
                    &subject,
                    FailureCode::MalformedDocument,
                    err.to_string(),
                );
                (None, report)
            }
        }
    };

    // Each worker parses its own document; the DOM never crosses threads.
    let mut results: Vec<(Option<PageResult>, ExtractionReport)> = {
        use rayon::prelude::*;
        let jobs = config
            .batch
            .jobs
            .filter(|jobs| *jobs > 0)
            .unwrap_or_else(|| default_parallel_jobs(paths.len()));
        debug!(jobs, pages = paths.len(), "Starting extraction pool");
        let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;

        pool.install(|| paths.par_iter().map(extract_one).collect())
    };

    results.sort_by(|(_, a), (_, b)| a.subject.cmp(&b.subject));

    let mut bundle = DexBundle::new();
    let mut failures = Vec::new();
    let mut warnings = Vec::new();
    let mut reports = Vec::with_capacity(results.len());

    for (page, report) in results {
        if !report.success {
            failures.push(report.subject.clone());
        }
        warnings.extend(
            report
                .warnings
                .iter()
                .map(|warning| format!("{}: {}", report.subject, warning)),
        );
        if let Some(page) = page {
            bundle.insert_page(page)?;
        }
        reports.push(report);
    }

    info!(
        pages = reports.len(),
        subjects = bundle.page_count(),
        builds = bundle.build_count(),
        failures = failures.len(),
        warnings = warnings.len(),
        "Batch extraction finished"
    );

    Ok(BatchOutcome {
        bundle,
        reports,
        failures,
        warnings,
    })
}

fn default_parallel_jobs(page_count: usize) -> usize {
    let cpu_count = std::thread::available_parallelism()
        .map(|parallelism| parallelism.get())
        .unwrap_or(4);
    cpu_count.clamp(1, 16).min(page_count.max(1))
}

/// Builds a serializable report bundle stamped with the current time.
pub fn build_report_bundle(
    reports: Vec<ExtractionReport>,
    failures: Vec<String>,
) -> ExtractionReportBundle {
    ExtractionReportBundle {
        generated_at: Utc::now().to_rfc3339(),
        reports,
        failures,
    }
}

/// Collects bundle JSON paths from input files and/or directories.
///
/// Directories contribute their `*.json` files, except report files named
/// `*report.json`.
///
/// # Errors
///
/// [`ExtractError::InvalidInput`] for missing paths, non-JSON files, or when
/// nothing was found.
pub fn collect_bundle_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    if inputs.is_empty() {
        return Err(ExtractError::InvalidInput(
            "No bundle paths were provided".to_string(),
        ));
    }

    let mut paths = BTreeSet::new();

    for input in inputs {
        if input.is_dir() {
            for entry in fs::read_dir(input)? {
                let path = entry?.path();
                let is_json = path.extension() == Some(OsStr::new("json"));
                let is_report = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.ends_with("report.json"));
                if is_json && !is_report {
                    paths.insert(path);
                }
            }
            continue;
        }

        if input.is_file() {
            if input.extension() != Some(OsStr::new("json")) {
                return Err(ExtractError::InvalidInput(format!(
                    "Bundle file '{}' must end in .json",
                    input.display()
                )));
            }
            paths.insert(input.clone());
            continue;
        }

        return Err(ExtractError::InvalidInput(format!(
            "Bundle path '{}' does not exist",
            input.display()
        )));
    }

    if paths.is_empty() {
        return Err(ExtractError::InvalidInput(
            "No bundle JSON files found in provided paths".to_string(),
        ));
    }

    Ok(paths.into_iter().collect())
}

/// Reads a bundle JSON file without validating it.
pub fn load_bundle(path: &Path) -> Result<DexBundle> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Loads a bundle and checks every record.
///
/// Over-budget spreads are logged with `warn!` and do not fail the load.
///
/// # Errors
///
/// [`ExtractError::Validation`] naming the file and the first problem found.
pub fn load_and_validate_bundle(path: &Path) -> Result<DexBundle> {
    let bundle = load_bundle(path)?;
    let errors = validate_bundle(&bundle);
    if let Some(first) = errors.first() {
        return Err(ExtractError::Validation(format!(
            "'{}': {first} ({} problem(s) total)",
            path.display(),
            errors.len()
        )));
    }
    for warning in budget_warnings(&bundle) {
        warn!(path = %path.display(), "{warning}");
    }
    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"<html><body>
        <h2 id="hl_2">Builds</h2>
        <table>
          <tr><th>Name</th><th>Rating</th></tr>
          <tr><td><a href="#hm_1">Sweeper</a></td><td>S</td></tr>
        </table>
        <h3 id="hm_1">Sweeper</h3>
        <table>
          <tr><th>Moveset</th><td><a>Dragon Dance</a><a>Earthquake</a></td></tr>
          <tr><th>Nature</th><td>Jolly</td></tr>
        </table>
    </body></html>"##;

    #[test]
    fn test_subject_from_path_uses_stem() {
        assert_eq!(
            subject_from_path(Path::new("pages/Garchomp.html")).as_deref(),
            Some("Garchomp")
        );
        assert_eq!(
            subject_from_path(Path::new("Mr. Mime.html")).as_deref(),
            Some("Mr. Mime")
        );
        assert_eq!(subject_from_path(Path::new("/")), None);
    }

    #[test]
    fn test_collect_page_paths_filters_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.html"), PAGE).unwrap();
        fs::write(dir.path().join("a.html"), PAGE).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignore").unwrap();
        fs::create_dir(dir.path().join("nested.html")).unwrap();

        let paths = collect_page_paths(dir.path(), ".html").unwrap();
        let names: Vec<_> = paths
            .iter()
            .filter_map(|path| path.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, vec!["a.html", "b.html"]);
    }

    #[test]
    fn test_collect_page_paths_rejects_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = collect_page_paths(dir.path(), "html").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidInput(_)));
    }

    #[test]
    fn test_extract_directory_records_failures_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Dragonite.html"), PAGE).unwrap();
        fs::write(dir.path().join("Blank.html"), "   ").unwrap();
        fs::write(
            dir.path().join("Empty.html"),
            "<html><body><p>nothing</p></body></html>",
        )
        .unwrap();

        let mut config = ExtractConfig::default();
        config.batch.jobs = Some(2);
        let outcome = extract_directory(dir.path(), &config).unwrap();

        let subjects: Vec<_> = outcome.reports.iter().map(|r| r.subject.as_str()).collect();
        assert_eq!(subjects, vec!["Blank", "Dragonite", "Empty"]);
        assert_eq!(outcome.failures, vec!["Blank", "Empty"]);

        assert_eq!(outcome.bundle.page_count(), 2);
        assert_eq!(outcome.bundle.get("Dragonite").map(<[_]>::len), Some(1));
        assert_eq!(outcome.bundle.get("Empty").map(<[_]>::len), Some(0));
        assert!(outcome.bundle.get("Blank").is_none());

        assert_eq!(
            outcome.reports[0].failure_code,
            Some(FailureCode::MalformedDocument)
        );
        assert_eq!(outcome.reports[1].strategy.as_deref(), Some("primary-index"));
        assert_eq!(outcome.reports[2].failure_code, Some(FailureCode::NoBuilds));
    }

    #[test]
    fn test_extract_paths_rejects_duplicate_subjects() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        let first = dir.path().join("a").join("Dragonite.html");
        let second = dir.path().join("b").join("Dragonite.html");
        fs::write(&first, PAGE).unwrap();
        fs::write(&second, PAGE).unwrap();

        let err = extract_paths(&[first, second], &ExtractConfig::default()).unwrap_err();
        assert!(matches!(err, ExtractError::Validation(message) if message.contains("Dragonite")));
    }

    #[test]
    fn test_build_report_bundle_stamps_time() {
        let bundle = build_report_bundle(Vec::new(), vec!["Ditto".to_string()]);
        assert_eq!(bundle.failures, vec!["Ditto".to_string()]);
        assert!(bundle.generated_at.contains('T'));
    }

    #[test]
    fn test_default_parallel_jobs_is_non_zero_and_bounded_by_workload() {
        assert_eq!(default_parallel_jobs(0), 1);
        assert_eq!(default_parallel_jobs(1), 1);
        assert!(default_parallel_jobs(2000) <= 16);
    }

    #[test]
    fn test_collect_bundle_paths_skips_reports() {
        let dir = tempfile::tempdir().unwrap();
        let bundle_path = dir.path().join("builds.json");
        fs::write(&bundle_path, "{}").unwrap();
        fs::write(dir.path().join("extraction-report.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let paths = collect_bundle_paths(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(paths, vec![bundle_path]);

        let err = collect_bundle_paths(&[dir.path().join("notes.txt")]).unwrap_err();
        assert!(err.to_string().contains("must end in .json"));
    }

    #[test]
    fn test_load_and_validate_bundle_reports_first_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("builds.json");
        fs::write(&path, r#"{"Ditto": [{"moveset": []}]}"#).unwrap();

        let err = load_and_validate_bundle(&path).unwrap_err();
        assert!(matches!(err, ExtractError::Validation(_)));

        fs::write(&path, r#"{"Ditto": [{"moveset": ["Transform"]}]}"#).unwrap();
        let bundle = load_and_validate_bundle(&path).unwrap();
        assert_eq!(bundle.build_count(), 1);
    }

    #[test]
    fn test_extracted_bundle_with_unrepaired_spread_loads_back() {
        let pages = tempfile::tempdir().unwrap();
        fs::write(
            pages.path().join("Smeargle.html"),
            r#"<html><body>
                <h3 id="hm_1">Everything</h3>
                <table>
                  <tr><th>EV Spread</th><td>150 HP / 150 Atk / 150 Def / 150 Spe / 150 SpA / 150 SpD</td></tr>
                  <tr><th>Moveset</th><td><a>Spore</a></td></tr>
                </table>
            </body></html>"#,
        )
        .unwrap();

        let outcome = extract_directory(pages.path(), &ExtractConfig::default()).unwrap();
        assert_eq!(outcome.bundle.build_count(), 1);
        assert_eq!(outcome.warnings.len(), 1);

        let out = tempfile::tempdir().unwrap();
        let path = out.path().join("builds.json");
        fs::write(&path, serde_json::to_string_pretty(&outcome.bundle).unwrap()).unwrap();

        let bundle = load_and_validate_bundle(&path).unwrap();
        assert_eq!(bundle.build_count(), 1);
        assert_eq!(budget_warnings(&bundle).len(), 1);
    }
}
