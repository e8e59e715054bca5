//! Console output formatting.

use crate::driver;
use crate::scheduler::{ScanOutcome, ScanSummary};
use crate::types::DeviceTypeId;
use console::style;
use std::io::{self, Write};

/// Seconds rendered as minutes:seconds, the scan summary format.
pub fn min_sec(seconds: f64) -> String {
    let mins = (seconds / 60.0).floor() as u64;
    let secs = seconds % 60.0;
    format!("{}:{:05.2}", mins, secs)
}

/// Print the end-of-scan summary line.
pub fn print_summary(summary: &ScanSummary) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let verdict = match summary.outcome {
        ScanOutcome::Completed => style("Scan complete").green().bold(),
        ScanOutcome::Cancelled => style("Scan cancelled").yellow().bold(),
    };
    writeln!(
        out,
        "{}, found {} units in {}",
        verdict,
        style(summary.hosts_found).cyan(),
        min_sec(summary.elapsed.as_secs_f64())
    )?;
    writeln!(
        out,
        "  {} {}",
        style("Results:").bold(),
        summary.result_dir.display()
    )?;
    Ok(())
}

/// Print the selectable device families.
pub fn print_device_list() -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "{}", style("Supported device families:").bold())?;
    for id in DeviceTypeId::ALL {
        writeln!(
            out,
            "  {:<12} {}",
            style(id.tag()).cyan(),
            driver::display_name(id)
        )?;
    }
    Ok(())
}

/// Print a non-fatal warning to stderr.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", style("warning:").yellow().bold(), message);
}
