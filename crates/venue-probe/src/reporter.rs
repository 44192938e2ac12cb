//! Reporter - Scenario Reporting with Fail-Fast Support
//!
//! ```text
//! ┌──────────────────────┐     ┌──────────────────────┐
//! │  FailureMode::       │     │  FailureMode::       │
//! │  FailFast            │     │  CollectAll          │
//! │                      │     │                      │
//! │  stop on the first   │     │  run every scenario  │
//! │  failing scenario    │     │  and report them all │
//! └──────────────────────┘     └──────────────────────┘
//! ```
//!
//! Results render as a console summary, JSON, or JUnit XML for CI.

use crate::result::{ProbeError, ProbeResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Failure mode for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    /// Stop on first failure
    FailFast,
    /// Run everything, report all failures
    #[default]
    CollectAll,
}

/// Scenario result status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    /// Scenario passed
    Passed,
    /// Scenario failed
    Failed,
    /// Scenario was not run
    Skipped,
}

impl TestStatus {
    /// Check if status is passing
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Check if status is failing
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

/// Individual scenario result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResultEntry {
    /// Scenario name
    pub name: String,
    /// Status
    pub status: TestStatus,
    /// Duration of the scenario
    pub duration: Duration,
    /// Error message if failed
    pub error: Option<String>,
    /// Remarks from a passing run (fallbacks, partial outcomes)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    /// Screenshot captured on failure
    pub screenshot: Option<PathBuf>,
    /// Timestamp when the scenario completed
    pub timestamp: SystemTime,
}

impl TestResultEntry {
    /// Create a passing result
    #[must_use]
    pub fn passed(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Passed,
            duration,
            error: None,
            notes: Vec::new(),
            screenshot: None,
            timestamp: SystemTime::now(),
        }
    }

    /// Create a failing result
    #[must_use]
    pub fn failed(name: impl Into<String>, duration: Duration, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Failed,
            duration,
            error: Some(error.into()),
            notes: Vec::new(),
            screenshot: None,
            timestamp: SystemTime::now(),
        }
    }

    /// Create a skipped result
    #[must_use]
    pub fn skipped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Skipped,
            duration: Duration::ZERO,
            error: None,
            notes: Vec::new(),
            screenshot: None,
            timestamp: SystemTime::now(),
        }
    }

    /// Attach a failure screenshot path
    #[must_use]
    pub fn with_screenshot(mut self, path: PathBuf) -> Self {
        self.screenshot = Some(path);
        self
    }

    /// Attach notes
    #[must_use]
    pub fn with_notes(mut self, notes: Vec<String>) -> Self {
        self.notes = notes;
        self
    }
}

/// Serialized report document
#[derive(Debug, Serialize)]
struct ReportDocument<'a> {
    suite: &'a str,
    total: usize,
    passed: usize,
    failed: usize,
    skipped: usize,
    duration_ms: u128,
    results: &'a [TestResultEntry],
}

/// Scenario reporter
///
/// In `FailFast` mode, [`Reporter::record`] returns an error for the first
/// failing entry so the runner can stop.
#[derive(Debug, Default)]
pub struct Reporter {
    results: Vec<TestResultEntry>,
    failure_mode: FailureMode,
    suite_name: String,
}

impl Reporter {
    /// Create reporter in `CollectAll` mode
    #[must_use]
    pub fn new() -> Self {
        Self {
            suite_name: "venue-probe".to_string(),
            ..Default::default()
        }
    }

    /// Create reporter in `FailFast` mode
    #[must_use]
    pub fn fail_fast() -> Self {
        Self::new().with_failure_mode(FailureMode::FailFast)
    }

    /// Set the failure mode
    #[must_use]
    pub const fn with_failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    /// Set suite name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.suite_name = name.into();
        self
    }

    /// Failure mode in effect
    #[must_use]
    pub const fn failure_mode(&self) -> FailureMode {
        self.failure_mode
    }

    /// Record a result
    ///
    /// # Errors
    ///
    /// In `FailFast` mode, returns an error if the scenario failed
    pub fn record(&mut self, result: TestResultEntry) -> ProbeResult<()> {
        let failure = result
            .status
            .is_failed()
            .then(|| (result.name.clone(), result.error.clone().unwrap_or_default()));

        self.results.push(result);

        if self.failure_mode == FailureMode::FailFast {
            if let Some((name, error)) = failure {
                return Err(ProbeError::AssertionFailed {
                    message: format!("stopping after '{name}' failed: {error}"),
                });
            }
        }
        Ok(())
    }

    /// Number of passed scenarios
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.status.is_passed()).count()
    }

    /// Number of failed scenarios
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| r.status.is_failed()).count()
    }

    /// Number of skipped scenarios
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == TestStatus::Skipped)
            .count()
    }

    /// Total recorded
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.results.len()
    }

    /// Whether nothing failed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed_count() == 0
    }

    /// Sum of scenario durations
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.results.iter().map(|r| r.duration).sum()
    }

    /// All results
    #[must_use]
    pub fn results(&self) -> &[TestResultEntry] {
        &self.results
    }

    /// Failing results
    #[must_use]
    pub fn failures(&self) -> Vec<&TestResultEntry> {
        self.results
            .iter()
            .filter(|r| r.status.is_failed())
            .collect()
    }

    /// One-line summary
    #[must_use]
    pub fn summary(&self) -> String {
        let mut line = format!(
            "{}: {}/{} passed",
            self.suite_name,
            self.passed_count(),
            self.total_count()
        );
        if self.failed_count() > 0 {
            line.push_str(&format!(", {} failed", self.failed_count()));
        }
        if self.skipped_count() > 0 {
            line.push_str(&format!(", {} skipped", self.skipped_count()));
        }
        line
    }

    /// Render the report as pretty JSON
    pub fn render_json(&self) -> ProbeResult<String> {
        let doc = ReportDocument {
            suite: &self.suite_name,
            total: self.total_count(),
            passed: self.passed_count(),
            failed: self.failed_count(),
            skipped: self.skipped_count(),
            duration_ms: self.total_duration().as_millis(),
            results: &self.results,
        };
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    /// Write JSON to a file
    ///
    /// # Errors
    ///
    /// Returns error if serialization or file writing fails
    pub fn generate_json(&self, output_path: &Path) -> ProbeResult<()> {
        std::fs::write(output_path, self.render_json()?)?;
        Ok(())
    }

    /// Write JUnit XML for CI integration
    ///
    /// # Errors
    ///
    /// Returns error if file writing fails
    pub fn generate_junit(&self, output_path: &Path) -> ProbeResult<()> {
        std::fs::write(output_path, self.render_junit())?;
        Ok(())
    }

    /// Render JUnit XML content
    #[must_use]
    pub fn render_junit(&self) -> String {
        let mut xml = String::new();

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(
            r#"<testsuite name="{}" tests="{}" failures="{}" skipped="{}" time="{:.3}">"#,
            escape_xml(&self.suite_name),
            self.total_count(),
            self.failed_count(),
            self.skipped_count(),
            self.total_duration().as_secs_f64()
        ));
        xml.push('\n');

        for result in &self.results {
            xml.push_str(&format!(
                r#"  <testcase name="{}" time="{:.3}">"#,
                escape_xml(&result.name),
                result.duration.as_secs_f64()
            ));
            xml.push('\n');

            match result.status {
                TestStatus::Failed => {
                    let error = result.error.as_deref().unwrap_or_default();
                    xml.push_str(&format!(
                        r#"    <failure message="{}">{}</failure>"#,
                        escape_xml(error),
                        escape_xml(error)
                    ));
                    xml.push('\n');
                }
                TestStatus::Skipped => xml.push_str("    <skipped/>\n"),
                TestStatus::Passed => {}
            }
            if let Some(path) = &result.screenshot {
                xml.push_str(&format!(
                    "    <system-out>[[ATTACHMENT|{}]]</system-out>\n",
                    escape_xml(&path.display().to_string())
                ));
            }

            xml.push_str("  </testcase>\n");
        }

        xml.push_str("</testsuite>\n");
        xml
    }
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod failure_mode_tests {
        use super::*;

        #[test]
        fn test_default_failure_mode() {
            assert_eq!(FailureMode::default(), FailureMode::CollectAll);
            assert_eq!(Reporter::fail_fast().failure_mode(), FailureMode::FailFast);
        }
    }

    mod test_result_entry_tests {
        use super::*;

        #[test]
        fn test_failed_result() {
            let result =
                TestResultEntry::failed("page_load", Duration::from_millis(50), "timed out");
            assert_eq!(result.status, TestStatus::Failed);
            assert_eq!(result.error.as_deref(), Some("timed out"));
        }

        #[test]
        fn test_skipped_result() {
            let result = TestResultEntry::skipped("load_latency");
            assert_eq!(result.status, TestStatus::Skipped);
            assert_eq!(result.duration, Duration::ZERO);
        }

        #[test]
        fn test_builders() {
            let result = TestResultEntry::passed("x", Duration::ZERO)
                .with_notes(vec!["fallback city".into()])
                .with_screenshot(PathBuf::from("shots/x.png"));
            assert_eq!(result.notes, vec!["fallback city".to_string()]);
            assert_eq!(result.screenshot, Some(PathBuf::from("shots/x.png")));
        }
    }

    mod reporter_tests {
        use super::*;

        #[test]
        fn test_collect_all_keeps_going() {
            let mut reporter = Reporter::new();
            reporter
                .record(TestResultEntry::failed("a", Duration::ZERO, "boom"))
                .unwrap();
            reporter
                .record(TestResultEntry::passed("b", Duration::ZERO))
                .unwrap();
            assert_eq!(reporter.failed_count(), 1);
            assert_eq!(reporter.passed_count(), 1);
            assert!(!reporter.all_passed());
        }

        #[test]
        fn test_fail_fast_stops() {
            let mut reporter = Reporter::fail_fast();
            let err = reporter
                .record(TestResultEntry::failed("a", Duration::ZERO, "boom"))
                .unwrap_err();
            assert!(err.to_string().contains("'a' failed: boom"));
            assert_eq!(reporter.total_count(), 1);
        }

        #[test]
        fn test_summary() {
            let mut reporter = Reporter::new().with_name("staging");
            reporter
                .record(TestResultEntry::passed("a", Duration::ZERO))
                .unwrap();
            reporter
                .record(TestResultEntry::failed("b", Duration::ZERO, "x"))
                .unwrap();
            reporter.record(TestResultEntry::skipped("c")).unwrap();
            assert_eq!(reporter.summary(), "staging: 1/3 passed, 1 failed, 1 skipped");
        }

        #[test]
        fn test_render_json() {
            let mut reporter = Reporter::new();
            reporter
                .record(TestResultEntry::passed("page_load", Duration::from_millis(12)))
                .unwrap();
            let json: serde_json::Value =
                serde_json::from_str(&reporter.render_json().unwrap()).unwrap();
            assert_eq!(json["passed"], 1);
            assert_eq!(json["results"][0]["name"], "page_load");
            assert_eq!(json["results"][0]["status"], "passed");
        }

        #[test]
        fn test_render_junit_escapes() {
            let mut reporter = Reporter::new();
            reporter
                .record(
                    TestResultEntry::failed("over_filtering", Duration::ZERO, "got <4> & \"more\"")
                        .with_screenshot(PathBuf::from("a/b.png")),
                )
                .unwrap();
            let xml = reporter.render_junit();
            assert!(xml.contains(r#"failures="1""#));
            assert!(xml.contains("got &lt;4&gt; &amp; &quot;more&quot;"));
            assert!(xml.contains("[[ATTACHMENT|a/b.png]]"));
        }

        #[test]
        fn test_generate_files() {
            let dir = tempfile::tempdir().unwrap();
            let mut reporter = Reporter::new();
            reporter.record(TestResultEntry::skipped("x")).unwrap();
            reporter.generate_junit(&dir.path().join("junit.xml")).unwrap();
            reporter.generate_json(&dir.path().join("report.json")).unwrap();
            let xml = std::fs::read_to_string(dir.path().join("junit.xml")).unwrap();
            assert!(xml.contains("<skipped/>"));
            assert!(dir.path().join("report.json").exists());
        }
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a'b"), "a&apos;b");
    }
}
