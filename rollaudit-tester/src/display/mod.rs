pub mod histogram;

pub use histogram::render_histogram;

use rollaudit_core::SampleSet;
use std::io::{self, Write};

use crate::reports::{generate_console_report, generate_failure_summary};

/// Clear the terminal and home the cursor.
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// `Loop i/L` progress label; unbounded runs omit the limit.
#[must_use]
pub fn loop_label(completed: u32, max_loops: Option<u32>) -> String {
    match max_loops {
        Some(max) => format!("Loop {completed}/{max}"),
        None => format!("Loop {completed}"),
    }
}

/// Draw one live frame: header, histogram, failures, then the analysis.
///
/// The frame is assembled in memory and written in one go so the terminal
/// never shows a half-drawn view.
pub fn render_frame<W: Write + ?Sized>(
    out: &mut W,
    completed: u32,
    max_loops: Option<u32>,
    samples: &SampleSet,
) -> io::Result<()> {
    let mut frame = Vec::new();
    frame.extend_from_slice(CLEAR_SCREEN.as_bytes());
    writeln!(
        frame,
        "{} - Total rolls: {}",
        loop_label(completed, max_loops),
        samples.len()
    )?;
    render_histogram(&mut frame, samples)?;
    generate_failure_summary(&mut frame, samples)?;
    generate_console_report(&mut frame, samples)?;

    out.write_all(&frame)?;
    out.flush()
}
