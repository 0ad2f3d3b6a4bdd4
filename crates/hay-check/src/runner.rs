//! Sequential check execution.
//!
//! Every check gets its own browser. The browser is closed explicitly once
//! the check resolves, pass or fail; if the check panics, `TestBrowser`'s
//! Drop kills the process instead. A failed check is logged and the run
//! moves on, unless `fail_fast` is set.

use crate::assertions::{
    check_document_count, check_document_format, check_item, check_record_format, check_row,
    locate_item, locate_row,
};
use crate::config::Settings;
use crate::error::CheckError;
use crate::fixtures::{CheckPage, CheckSpec, FixtureTable, RequestLink};
use crate::ui::format_duration;
use hay_browser::{CatalogSite, Page, TestBrowser};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Selector that marks a record page as rendered.
pub const RECORD_READY: &str = ".bib_item";

/// Selector that marks a search-results page as rendered.
pub const RESULTS_READY: &str = "div.document";

/// Options for a run that are not catalog settings.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Stop after the first failed check.
    pub fail_fast: bool,

    /// Save a screenshot of the page here when a check fails.
    pub screenshot_dir: Option<PathBuf>,
}

/// How one check ended.
#[derive(Debug)]
pub enum Outcome {
    /// Every expectation held.
    Passed,
    /// The first expectation that did not hold, or the browser failure.
    Failed(CheckError),
}

/// Result of one check.
#[derive(Debug)]
pub struct CheckReport {
    /// Check name
    pub name: String,
    /// Wall time including browser launch and teardown
    pub duration: Duration,
    /// Pass or failure
    pub outcome: Outcome,
}

impl CheckReport {
    /// True if the check passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        matches!(self.outcome, Outcome::Passed)
    }
}

/// Results of a whole run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// One report per check that ran, in run order
    pub reports: Vec<CheckReport>,
    /// Checks not run because `fail_fast` stopped the run
    pub skipped: usize,
}

impl RunSummary {
    /// Number of checks that passed.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.reports.iter().filter(|r| r.passed()).count()
    }

    /// Number of checks that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.reports.len() - self.passed()
    }

    /// Number of checks that ran.
    #[must_use]
    pub fn total(&self) -> usize {
        self.reports.len()
    }

    /// True if every check ran and passed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.skipped == 0
    }

    /// Total wall time.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.reports.iter().map(|r| r.duration).sum()
    }
}

/// Runs every check in the table, one after another.
///
/// Never returns early on a failed check unless `options.fail_fast` is set;
/// logs `All checks complete` at the end either way.
pub async fn run_all(settings: &Settings, table: &FixtureTable, options: &RunOptions) -> RunSummary {
    let mut summary = RunSummary::default();

    for (index, spec) in table.checks.iter().enumerate() {
        let started = Instant::now();
        let result = run_scoped(settings, spec, options).await;
        let duration = started.elapsed();

        let outcome = match result {
            Ok(()) => {
                info!(
                    "Result: {} passed ({})",
                    spec.name,
                    format_duration(duration)
                );
                Outcome::Passed
            }
            Err(e) => {
                error!(
                    "Result: {} failed ({}): {e}",
                    spec.name,
                    format_duration(duration)
                );
                Outcome::Failed(e)
            }
        };

        let failed = matches!(outcome, Outcome::Failed(_));
        summary.reports.push(CheckReport {
            name: spec.name.clone(),
            duration,
            outcome,
        });

        if failed && options.fail_fast {
            summary.skipped = table.len() - index - 1;
            debug!("fail-fast: stopping with {} checks left", summary.skipped);
            break;
        }
    }

    info!("All checks complete");
    summary
}

/// Runs one check in a browser of its own and closes the browser afterwards.
///
/// # Errors
///
/// Returns the check's failure, or a launch failure.
pub async fn run_scoped(
    settings: &Settings,
    spec: &CheckSpec,
    options: &RunOptions,
) -> Result<(), CheckError> {
    info!("\n-------\nGoal: {}\n-------", spec.goal);

    let browser = TestBrowser::launch(settings.browser_config()).await?;
    let result = run_check(&browser, settings, spec, options).await;

    if let Err(e) = browser.close().await {
        warn!("Failed to close browser after {}: {e}", spec.name);
    }

    result
}

/// Runs one check in an already-launched browser.
///
/// # Errors
///
/// Returns the first expectation that did not hold, or a browser failure.
pub async fn run_check(
    browser: &TestBrowser,
    settings: &Settings,
    spec: &CheckSpec,
    options: &RunOptions,
) -> Result<(), CheckError> {
    let page = browser.new_page().await?;
    let result = check_page(&page, settings, spec).await;

    if result.is_err() {
        if let Some(dir) = &options.screenshot_dir {
            save_screenshot(&page, dir, &spec.name).await;
        }
    }

    for message in page.console().errors() {
        warn!("{}: page console: {message}", spec.name);
    }

    if let Err(e) = page.close().await {
        debug!("Failed to close page for {}: {e}", spec.name);
    }

    result
}

async fn check_page(page: &Page, settings: &Settings, spec: &CheckSpec) -> Result<(), CheckError> {
    let site = settings.site();

    match &spec.page {
        CheckPage::Record {
            bib,
            limit_all,
            warm_up,
            items,
        } => {
            if *warm_up {
                let url = settings.production_site().record_url(bib, true);
                info!("Warming availability cache, ```{url}```");
                page.navigate(&url).await?;
                page.console().clear();
            }

            let url = site.record_url(bib, *limit_all);
            info!("hitting url, ```{url}```");
            page.navigate(&url).await?;
            page.wait_for_selector(RECORD_READY).await?;
            settle(settings).await;

            let record = page.record_snapshot(&RequestLink::class_names()).await?;
            debug!(?record, "record snapshot");

            check_record_format(&record)?;
            for expected in items {
                let item = locate_item(&record, &expected.locator)?;
                info!("{}.text, ```{}```", expected.locator, item.text);
                check_item(item, expected)?;
            }
        }
        CheckPage::Search {
            query,
            expected_documents,
            rows,
        } => {
            let url = site.search_url(query);
            info!("hitting url, ```{url}```");
            page.navigate(&url).await?;
            page.wait_for_selector(RESULTS_READY).await?;
            settle(settings).await;

            let results = page.results_snapshot().await?;
            debug!(?results, "results snapshot");

            check_document_count(&results, *expected_documents)?;
            for expected in rows {
                let (document, row) = locate_row(&results, &expected.call_number)?;
                info!("target_row.text, ```{}```", row.text);
                check_document_format(document)?;
                check_row(row, expected)?;
            }
        }
    }

    Ok(())
}

async fn settle(settings: &Settings) {
    let pause = settings.settle();
    if !pause.is_zero() {
        debug!("Settling for {}", format_duration(pause));
        tokio::time::sleep(pause).await;
    }
}

/// File name for a failed check's screenshot.
#[must_use]
pub fn screenshot_path(dir: &Path, check: &str) -> PathBuf {
    let stem: String = check
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    dir.join(format!("{stem}.png"))
}

async fn save_screenshot(page: &Page, dir: &Path, check: &str) {
    let path = screenshot_path(dir, check);

    let saved = async {
        let png = page
            .screenshot()
            .await
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(&path, png).await
    }
    .await;

    match saved {
        Ok(()) => info!("Saved screenshot to {}", path.display()),
        Err(e) => warn!("Could not save screenshot for {check}: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    fn report(name: &str, outcome: Outcome, millis: u64) -> CheckReport {
        CheckReport {
            name: name.to_string(),
            duration: Duration::from_millis(millis),
            outcome,
        }
    }

    #[test]
    fn summary_counts() {
        let summary = RunSummary {
            reports: vec![
                report("a", Outcome::Passed, 1200),
                report(
                    "b",
                    Outcome::Failed(CheckError::DocumentCount {
                        expected: 3,
                        actual: 2,
                    }),
                    800,
                ),
                report("c", Outcome::Passed, 1000),
            ],
            skipped: 0,
        };
        assert_eq!(summary.passed(), 2);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.total(), 3);
        assert_eq!(summary.duration(), Duration::from_millis(3000));
        assert!(!summary.is_success());
    }

    #[test]
    fn skipped_checks_are_not_success() {
        let summary = RunSummary {
            reports: vec![report("a", Outcome::Passed, 10)],
            skipped: 2,
        };
        assert_eq!(summary.failed(), 0);
        assert!(!summary.is_success());
    }

    #[test]
    fn empty_run_succeeds() {
        assert!(RunSummary::default().is_success());
    }

    #[test]
    fn screenshot_names_are_file_safe() {
        let dir = Path::new("/tmp/shots");
        assert_eq!(
            screenshot_path(dir, "john-hay-record"),
            PathBuf::from("/tmp/shots/john-hay-record.png")
        );
        assert_eq!(
            screenshot_path(dir, "odd name/../x"),
            PathBuf::from("/tmp/shots/odd_name____x.png")
        );
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLog {
        type Writer = CapturedLog;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    impl CapturedLog {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[tokio::test]
    async fn completion_is_logged_after_failed_checks() {
        let log = CapturedLog::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(log.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        // A browser that cannot start fails every check without touching the network.
        let settings = Settings {
            chrome_path: Some("/nonexistent/hay-check/chrome".into()),
            ..Settings::default()
        };
        let table = FixtureTable::builtin()
            .select(&["beckwith-record".to_string(), "yoken-search".to_string()])
            .unwrap();

        let summary = run_all(&settings, &table, &RunOptions::default()).await;

        assert_eq!(summary.total(), 2);
        assert_eq!(summary.failed(), 2);
        assert!(matches!(
            summary.reports[0].outcome,
            Outcome::Failed(CheckError::Browser(_))
        ));

        let text = log.text();
        assert!(text.contains("Result: beckwith-record failed"), "{text}");
        assert!(text.contains("Result: yoken-search failed"), "{text}");
        let complete = text.find("All checks complete").expect("completion line");
        assert!(complete > text.find("Result: yoken-search failed").unwrap());
    }

    #[tokio::test]
    async fn empty_table_runs_nothing() {
        let summary = run_all(
            &Settings::default(),
            &FixtureTable::default(),
            &RunOptions::default(),
        )
        .await;
        assert_eq!(summary.total(), 0);
        assert!(summary.is_success());
    }
}
