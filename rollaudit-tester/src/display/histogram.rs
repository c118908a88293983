//! Terminal frequency histogram, one column per observed value.
//!
//! Rows are frequency levels drawn top-down. Once every column holds at least
//! `K` samples the rows `1..K` carry no shape information, so only row `K` is
//! kept below the taller columns and a note reports how many floor rows were
//! dropped. That keeps the height bounded by the spread of the counts rather
//! than the sample size. A perfectly flat distribution keeps only row `K`,
//! except a single-value range, which is drawn at full height.

use colored::{Color, Colorize};
use rollaudit_core::{Distribution, Grade, SampleSet};
use std::io::{self, Write};

pub const FILLED_MARK: &str = "█";
pub const EMPTY_MARK: char = '.';

/// Ranges wider than this get a midpoint label on the scale line.
const MIDPOINT_SCALE_WIDTH: usize = 50;

/// Which frequency levels to draw for a distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistogramLayout {
    pub min: u32,
    pub max: u32,
    /// Levels to draw, highest first
    pub levels: Vec<usize>,
    /// Floor rows collapsed away, present whenever the bottom row is full
    pub omitted_rows: Option<usize>,
}

impl HistogramLayout {
    #[must_use]
    pub fn from_distribution(dist: &Distribution) -> Self {
        let max_count = dist.max_count();
        let mut layout = Self {
            min: dist.min(),
            max: dist.max(),
            levels: (1..=max_count).rev().collect(),
            omitted_rows: None,
        };

        match saturated_floor(dist) {
            // one column is its own shape
            Some(_) if layout.width() == 1 => layout.omitted_rows = Some(0),
            Some(full) => {
                layout.levels.retain(|&level| level >= full);
                layout.omitted_rows = Some(full - 1);
            }
            None => {}
        }
        layout
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        (self.max - self.min) as usize + 1
    }
}

/// Highest level `K` such that rows `1..=K` are all full, if row 1 is.
fn saturated_floor(dist: &Distribution) -> Option<usize> {
    dist.range_counts()
        .map(|(_, count)| count)
        .min()
        .filter(|&lowest| lowest > 0)
}

pub const fn grade_color(grade: &Grade) -> Color {
    match grade {
        Grade::CriticalSuccess => Color::BrightGreen,
        Grade::Success => Color::BrightBlue,
        Grade::Failure => Color::BrightYellow,
        Grade::Fumble => Color::BrightRed,
        Grade::Other(_) => Color::BrightMagenta,
    }
}

/// Scale line with the range endpoints (and midpoint for wide ranges).
#[must_use]
pub fn scale_line(min: u32, max: u32) -> String {
    let width = (max - min) as usize + 1;
    let (min_label, max_label) = (min.to_string(), max.to_string());

    if width <= MIDPOINT_SCALE_WIDTH {
        let padding = width.saturating_sub(min_label.len() + max_label.len());
        return format!("{min_label}{}{max_label}", " ".repeat(padding));
    }

    let mid_label = (min + (max - min) / 2).to_string();
    let free = width.saturating_sub(min_label.len() + mid_label.len());
    let left = free / 2;
    let right = free.saturating_sub(left + max_label.len());
    format!(
        "{min_label}{}{mid_label}{}{max_label}",
        " ".repeat(left),
        " ".repeat(right)
    )
}

fn row(dist: &Distribution, layout: &HistogramLayout, level: usize) -> String {
    (layout.min..=layout.max)
        .map(|value| match dist.tally(value) {
            Some(tally) if tally.count >= level => FILLED_MARK
                .color(grade_color(&tally.first_grade))
                .to_string(),
            _ => EMPTY_MARK.to_string(),
        })
        .collect()
}

/// Draw the histogram for the successful outcomes in `samples`.
pub fn render_histogram<W: Write + ?Sized>(out: &mut W, samples: &SampleSet) -> io::Result<()> {
    let Some(dist) = Distribution::from_samples(samples) else {
        return writeln!(out, "No successful rolls to graph");
    };
    let layout = HistogramLayout::from_distribution(&dist);

    writeln!(out, "{}", scale_line(layout.min, layout.max))?;
    for &level in &layout.levels {
        writeln!(out, "{}", row(&dist, &layout, level))?;
    }
    if let Some(omitted) = layout.omitted_rows {
        writeln!(out, "[{omitted} line(s) with all values filled not shown]")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollaudit_core::{FailureKind, RollOutcome};

    fn samples(values: impl IntoIterator<Item = u32>) -> SampleSet {
        values
            .into_iter()
            .map(|value| RollOutcome::rolled(value, Grade::Success))
            .collect()
    }

    fn layout(values: impl IntoIterator<Item = u32>) -> HistogramLayout {
        let set = samples(values);
        HistogramLayout::from_distribution(&Distribution::from_samples(&set).unwrap())
    }

    fn rendered(set: &SampleSet) -> String {
        let mut buffer = Vec::new();
        render_histogram(&mut buffer, set).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn single_value_draws_one_column_of_full_height() {
        let layout = layout(std::iter::repeat_n(50, 10));
        assert_eq!(layout.width(), 1);
        assert_eq!(layout.levels, (1..=10).rev().collect::<Vec<_>>());
        assert_eq!(layout.omitted_rows, Some(0));
    }

    #[test]
    fn gaps_keep_every_row() {
        let layout = layout([1, 1, 1, 3]);
        assert_eq!(layout.levels, vec![3, 2, 1]);
        assert_eq!(layout.omitted_rows, None);
    }

    #[test]
    fn one_of_each_collapses_to_single_row() {
        let layout = layout(1..=100);
        assert_eq!(layout.levels, vec![1]);
        assert_eq!(layout.omitted_rows, Some(0));
    }

    #[test]
    fn saturated_floor_is_collapsed() {
        // every value at least 3 deep, value 2 reaches 5
        let mut values: Vec<u32> = (1..=4).flat_map(|v| [v, v, v]).collect();
        values.extend([2, 2]);
        let layout = layout(values);
        assert_eq!(layout.levels, vec![5, 4, 3]);
        assert_eq!(layout.omitted_rows, Some(2));
    }

    #[test]
    fn flat_multi_value_distribution_keeps_only_the_floor_row() {
        for per_face in [10, 1_000, 60_000] {
            let layout = layout((1..=6).cycle().take(6 * per_face));
            assert_eq!(layout.levels, vec![per_face]);
            assert_eq!(layout.omitted_rows, Some(per_face - 1));
        }
    }

    #[test]
    fn flat_d6_renders_scale_row_and_note() {
        let text = rendered(&samples((1..=6).cycle().take(6 * 1_000)));
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("[999 line(s) with all values filled not shown]"));
    }

    #[test]
    fn height_is_bounded_once_distribution_fills_in() {
        // growing the floor does not grow the drawing
        let small: Vec<u32> = (1..=6).cycle().take(6 * 3).chain([4]).collect();
        let large: Vec<u32> = (1..=6).cycle().take(6 * 300).chain([4]).collect();
        assert_eq!(layout(small).levels.len(), 2);
        assert_eq!(layout(large).levels.len(), 2);
    }

    #[test]
    fn scale_line_spans_range_width() {
        assert_eq!(scale_line(1, 10), "1       10");
        assert_eq!(scale_line(5, 5), "55");
        let wide = scale_line(1, 100);
        assert!(wide.starts_with('1'));
        assert!(wide.contains("50"));
        assert!(wide.ends_with("100"));
        assert_eq!(wide.chars().count(), 100);
    }

    #[test]
    fn render_skips_failures_and_marks_gaps() {
        let mut set = samples([1, 3, 3]);
        set.push(RollOutcome::failed(FailureKind::Transport, "reset"));
        let text = rendered(&set);
        let rows: Vec<&str> = text.lines().skip(1).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].matches(FILLED_MARK).count(), 1);
        assert_eq!(rows[0].matches(EMPTY_MARK).count(), 2);
        assert_eq!(rows[1].matches(FILLED_MARK).count(), 2);
        assert!(!text.contains("not shown"));
    }

    #[test]
    fn render_reports_omitted_rows() {
        let text = rendered(&samples(1..=100));
        assert!(text.contains("[0 line(s) with all values filled not shown]"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn render_without_successes_prints_notice_only() {
        let set: SampleSet = [RollOutcome::failed(FailureKind::Http(500), "HTTP 500")]
            .into_iter()
            .collect();
        assert_eq!(rendered(&set), "No successful rolls to graph\n");
    }
}
