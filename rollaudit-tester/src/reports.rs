use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;
use rollaudit_core::{Analysis, Rating, RandomnessReport, SampleSet, analyze};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::sampling::SessionSummary;

/// Print the randomness analysis of `samples`.
pub fn generate_console_report<W: Write + ?Sized>(
    out: &mut W,
    samples: &SampleSet,
) -> io::Result<()> {
    let report = match analyze(samples) {
        Analysis::Report(report) => report,
        Analysis::NoData => {
            writeln!(out)?;
            writeln!(out, "{}", "RANDOMNESS ANALYSIS:".bright_cyan().bold())?;
            return writeln!(out, "No successful rolls to analyze");
        }
    };

    writeln!(out)?;
    writeln!(
        out,
        "{}",
        format!(
            "RANDOMNESS ANALYSIS ({} successful rolls):",
            report.sample_count
        )
        .bright_cyan()
        .bold()
    )?;
    writeln!(out, "{}", "=".repeat(50).cyan())?;
    writeln!(
        out,
        "Range: {}-{} ({} possible values)",
        report.min, report.max, report.category_count
    )?;
    writeln!(
        out,
        "Expected frequency per value: {:.1}",
        report.expected_frequency
    )?;

    write_test_lines(out, &report)?;

    writeln!(out)?;
    writeln!(out, "{}", "OVERALL ASSESSMENT:".bold())?;
    writeln!(out, "{}", overall_line(report.overall))
}

fn write_test_lines<W: Write + ?Sized>(out: &mut W, report: &RandomnessReport) -> io::Result<()> {
    let chi = &report.chi_square;
    writeln!(out)?;
    writeln!(out, "Chi-square test:")?;
    writeln!(
        out,
        "  χ² = {:.2}, p ≈ {:.3} (df {})",
        chi.statistic, chi.p_value, chi.degrees_of_freedom
    )?;
    writeln!(out, "  {}", verdict(chi.rating, chi.assessment()))?;

    let entropy = &report.entropy;
    writeln!(out)?;
    writeln!(out, "Entropy analysis:")?;
    writeln!(
        out,
        "  Entropy = {:.2} bits (ratio: {:.3})",
        entropy.entropy, entropy.ratio
    )?;
    writeln!(out, "  {}", verdict(entropy.rating, entropy.assessment()))?;

    let spread = &report.frequency_variance;
    writeln!(out)?;
    writeln!(out, "Frequency variance:")?;
    writeln!(
        out,
        "  Standard deviation = {:.2} (expected {:.2}, ratio {:.2})",
        spread.std_dev, spread.expected_std_dev, spread.ratio
    )?;
    writeln!(out, "  {}", verdict(spread.rating, spread.assessment()))
}

fn verdict(rating: Rating, assessment: &str) -> String {
    let text = format!("{rating} - {assessment}");
    match rating {
        Rating::Excellent | Rating::Good => text.green().to_string(),
        Rating::Fair => text.yellow().to_string(),
        Rating::Poor => text.red().to_string(),
        Rating::NoData => text,
    }
}

fn overall_line(rating: Rating) -> String {
    let summary = rating.overall_summary();
    match rating {
        Rating::Excellent | Rating::Good => format!("✓ {rating} - {summary}").green().to_string(),
        Rating::Fair => format!("⚠ {rating} - {summary}").yellow().to_string(),
        Rating::Poor => format!("✗ {rating} - {summary}").red().to_string(),
        Rating::NoData => summary.to_string(),
    }
}

/// Print how many rolls failed, split by category.
pub fn generate_failure_summary<W: Write + ?Sized>(
    out: &mut W,
    samples: &SampleSet,
) -> io::Result<()> {
    let failed = samples.failure_count();
    if failed == 0 {
        return Ok(());
    }
    let breakdown = samples
        .failure_breakdown()
        .into_iter()
        .map(|(kind, count)| format!("{kind}: {count}"))
        .collect::<Vec<_>>()
        .join(", ");
    writeln!(
        out,
        "{} ({breakdown})",
        format!("Failed rolls: {failed}").red()
    )
}

/// End-of-run summary written with `--report json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: String,
    pub finished_at: String,
    pub loops_completed: u32,
    pub interrupted: bool,
    pub total_rolls: usize,
    pub successful_rolls: usize,
    pub failed_rolls: usize,
    pub failures_by_kind: BTreeMap<String, usize>,
    pub analysis: Analysis,
}

impl RunReport {
    pub fn new(
        summary: &SessionSummary,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let samples = &summary.samples;
        Self {
            started_at: started_at.to_rfc3339(),
            finished_at: finished_at.to_rfc3339(),
            loops_completed: summary.loops_completed,
            interrupted: summary.interrupted,
            total_rolls: samples.len(),
            successful_rolls: samples.success_count(),
            failed_rolls: samples.failure_count(),
            failures_by_kind: samples
                .failure_breakdown()
                .into_iter()
                .map(|(kind, count)| (kind.to_string(), count))
                .collect(),
            analysis: analyze(samples),
        }
    }
}

pub fn generate_json_report<W: Write + ?Sized>(out: &mut W, report: &RunReport) -> Result<()> {
    let json_output = serde_json::to_string_pretty(report)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollaudit_core::{FailureKind, Grade, RollOutcome};

    fn rendered(samples: &SampleSet) -> String {
        colored::control::set_override(false);
        let mut buffer = Vec::new();
        generate_console_report(&mut buffer, samples).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    fn uniform(count_per_face: usize) -> SampleSet {
        (1..=10)
            .cycle()
            .take(10 * count_per_face)
            .map(|v| RollOutcome::rolled(v, Grade::Success))
            .collect()
    }

    #[test]
    fn console_report_lists_every_test() {
        let text = rendered(&uniform(3));
        assert!(text.contains("RANDOMNESS ANALYSIS (30 successful rolls):"));
        assert!(text.contains("Range: 1-10 (10 possible values)"));
        assert!(text.contains("Expected frequency per value: 3.0"));
        assert!(text.contains("Chi-square test:"));
        assert!(text.contains("Entropy analysis:"));
        assert!(text.contains("Frequency variance:"));
        assert!(text.contains("OVERALL ASSESSMENT:"));
    }

    #[test]
    fn console_report_handles_no_data() {
        let samples: SampleSet = [RollOutcome::failed(FailureKind::Transport, "down")]
            .into_iter()
            .collect();
        let text = rendered(&samples);
        assert!(text.contains("No successful rolls to analyze"));
        assert!(!text.contains("Chi-square"));
    }

    #[test]
    fn failure_summary_groups_by_kind() {
        colored::control::set_override(false);
        let samples: SampleSet = [
            RollOutcome::failed(FailureKind::Http(502), "HTTP 502"),
            RollOutcome::failed(FailureKind::Http(502), "HTTP 502"),
            RollOutcome::failed(FailureKind::Protocol, "nope"),
            RollOutcome::rolled(1, Grade::Success),
        ]
        .into_iter()
        .collect();
        let mut buffer = Vec::new();
        generate_failure_summary(&mut buffer, &samples).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "Failed rolls: 3 (protocol: 1, HTTP 502: 2)\n");
    }

    #[test]
    fn failure_summary_is_silent_without_failures() {
        let mut buffer = Vec::new();
        generate_failure_summary(&mut buffer, &uniform(1)).unwrap();
        assert!(buffer.is_empty());
    }

    #[test]
    fn json_report_counts_rolls() {
        let mut samples = uniform(2);
        samples.push(RollOutcome::failed(FailureKind::Transport, "reset"));
        let summary = SessionSummary {
            loops_completed: 2,
            samples,
            interrupted: true,
        };
        let now = Utc::now();
        let report = RunReport::new(&summary, now, now);
        let mut buffer = Vec::new();
        generate_json_report(&mut buffer, &report).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(json["loops_completed"], 2);
        assert_eq!(json["interrupted"], true);
        assert_eq!(json["total_rolls"], 21);
        assert_eq!(json["failed_rolls"], 1);
        assert_eq!(json["failures_by_kind"]["transport"], 1);
        assert_eq!(json["analysis"]["status"], "report");
    }
}
