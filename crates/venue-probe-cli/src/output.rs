//! Output formatting and progress reporting

use console::{style, Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use venue_probe::{TestResultEntry, TestStatus};

/// Output format for run results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON report on stdout
    Json,
}

/// Line prefix for console messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Pass,
    Fail,
    Skip,
    Info,
}

impl Tag {
    fn render(self, color: bool) -> String {
        match (self, color) {
            (Self::Pass, true) => style("✓").green().bold().to_string(),
            (Self::Fail, true) => style("✗").red().bold().to_string(),
            (Self::Skip, true) => style("-").yellow().to_string(),
            (Self::Info, true) => style("ℹ").blue().bold().to_string(),
            (Self::Pass, false) => "PASS".to_string(),
            (Self::Fail, false) => "FAIL".to_string(),
            (Self::Skip, false) => "SKIP".to_string(),
            (Self::Info, false) => "INFO".to_string(),
        }
    }
}

/// Console reporter for a probe run.
///
/// Everything goes to stderr so stdout stays clean for `--format json`.
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    spinner: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            spinner: None,
            use_color,
            quiet,
        }
    }

    /// Spin while a blocking run is in progress
    pub fn start_spinner(&mut self, message: &str) {
        if self.quiet || !self.term.is_term() {
            return;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(120));
        self.spinner = Some(pb);
    }

    /// Clear the spinner
    pub fn finish(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        self.tagged(Tag::Pass, message);
    }

    /// Print a failure message; shown even in quiet mode
    pub fn failure(&self, message: &str) {
        self.tagged(Tag::Fail, message);
    }

    /// Print a skipped entry
    pub fn skipped(&self, message: &str) {
        self.tagged(Tag::Skip, message);
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        self.tagged(Tag::Info, message);
    }

    fn tagged(&self, tag: Tag, message: &str) {
        if self.quiet && tag != Tag::Fail {
            return;
        }
        let _ = self
            .term
            .write_line(&format!("{} {message}", tag.render(self.use_color)));
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }

        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };

        let _ = self.term.write_line("");
        let _ = self.term.write_line(&styled);
    }

    /// Print one scenario result with its notes, error and screenshot
    pub fn entry(&self, entry: &TestResultEntry) {
        let line = format!("{} ({}ms)", entry.name, entry.duration.as_millis());
        match entry.status {
            TestStatus::Passed => self.success(&line),
            TestStatus::Skipped => self.skipped(&entry.name),
            TestStatus::Failed => {
                self.failure(&line);
                if let Some(ref error) = entry.error {
                    let _ = self.term.write_line(&format!("    {error}"));
                }
                if let Some(ref shot) = entry.screenshot {
                    let _ = self
                        .term
                        .write_line(&format!("    screenshot: {}", shot.display()));
                }
            }
        }
        if !self.quiet {
            for note in &entry.notes {
                let _ = self.term.write_line(&format!("    note: {note}"));
            }
        }
    }

    /// Print run summary
    pub fn summary(&self, passed: usize, failed: usize, skipped: usize, duration: Duration) {
        if self.quiet && failed == 0 {
            return;
        }

        let total = passed + failed + skipped;
        let verdict = if failed > 0 { "FAILED" } else { "PASSED" };
        let line = if self.use_color {
            let verdict_style = if failed > 0 {
                Style::new().red().bold()
            } else {
                Style::new().green().bold()
            };
            format!(
                "{} {total} scenarios in {:.2}s ({} passed, {} failed, {} skipped)",
                verdict_style.apply_to(verdict),
                duration.as_secs_f64(),
                style(passed).green(),
                style(failed).red(),
                style(skipped).yellow()
            )
        } else {
            format!(
                "{verdict} {total} scenarios in {:.2}s ({passed} passed, {failed} failed, {skipped} skipped)",
                duration.as_secs_f64()
            )
        };
        let _ = self.term.write_line("");
        let _ = self.term.write_line(&line);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod output_format_tests {
        use super::*;

        #[test]
        fn test_default_format() {
            assert_eq!(OutputFormat::default(), OutputFormat::Text);
        }
    }

    mod progress_reporter_tests {
        use super::*;
        use std::path::PathBuf;

        #[test]
        fn test_new_reporter() {
            let reporter = ProgressReporter::new(true, false);
            assert!(reporter.use_color);
            assert!(!reporter.quiet);
        }

        #[test]
        fn test_quiet_reporter() {
            let reporter = ProgressReporter::new(false, true);
            assert!(reporter.quiet);
        }

        #[test]
        fn test_entries_of_every_status() {
            let reporter = ProgressReporter::new(false, false);
            reporter.entry(
                &TestResultEntry::passed("page_load", Duration::from_millis(12))
                    .with_notes(vec!["load signal after 12ms".into()]),
            );
            reporter.entry(
                &TestResultEntry::failed("load_latency", Duration::from_millis(5), "too slow")
                    .with_screenshot(PathBuf::from("shots/load_latency.png")),
            );
            reporter.entry(&TestResultEntry::skipped("venue_data_not_blank"));
        }

        #[test]
        fn test_spinner_lifecycle() {
            let mut reporter = ProgressReporter::new(false, false);
            reporter.start_spinner("running");
            reporter.finish();
            assert!(reporter.spinner.is_none());
        }

        #[test]
        fn test_quiet_mode_suppresses_spinner() {
            let mut reporter = ProgressReporter::new(false, true);
            reporter.start_spinner("running");
            assert!(reporter.spinner.is_none());
            reporter.failure("shown");
        }

        #[test]
        fn test_tag_plain_rendering() {
            assert_eq!(Tag::Pass.render(false), "PASS");
            assert_eq!(Tag::Fail.render(false), "FAIL");
            assert!(Tag::Skip.render(true).contains('-'));
        }

        #[test]
        fn test_summary_variants() {
            let reporter = ProgressReporter::new(false, false);
            reporter.summary(7, 0, 0, Duration::from_secs(5));
            reporter.summary(5, 1, 1, Duration::from_secs(3));
        }
    }
}
