use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::grading::CourseGradeResult;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a grade ratio as a percentage with two decimals ("0.884" -> "88.40%")
pub fn format_percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a detail string to fit available width, accounting for Unicode
fn truncate_detail(detail: &str, max_width: usize) -> String {
    let chars: Vec<char> = detail.chars().collect();
    if chars.len() <= max_width {
        detail.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format a grade result as a human-readable report: one line per
/// section row, the per-category contributions, then the course total.
/// Dropped rows keep their annotation; prominent rows stand out when
/// colors are on.
pub fn format_report(result: &CourseGradeResult, use_colors: bool) -> String {
    let mut lines = Vec::new();

    let label_width = result
        .section_breakdown
        .iter()
        .map(|entry| entry.label.chars().count())
        .max()
        .unwrap_or(0);

    let term_width = get_terminal_width();

    for entry in &result.section_breakdown {
        let percent_str = format!("{:>7}", format_percent(entry.percent));
        let detail = match term_width {
            // label + two separators + percent column
            Some(width) if width > label_width + 13 => {
                truncate_detail(&entry.detail, width - label_width - 13)
            }
            _ => entry.detail.clone(),
        };

        // Pad before styling so ANSI escapes don't skew the columns
        let row = format!("{:<label_width$}  {}  {}", entry.label, percent_str, detail);
        let mut line = if use_colors && entry.prominent {
            row.bold().to_string()
        } else if use_colors && entry.mark.is_some() {
            row.dimmed().to_string()
        } else {
            row
        };

        if let Some(ref mark) = entry.mark {
            if use_colors {
                line.push_str(&format!(" [{}]", mark.dimmed()));
            } else {
                line.push_str(&format!(" [{}]", mark));
            }
        }
        lines.push(line);
    }

    if !result.grade_breakdown.is_empty() {
        lines.push(String::new());
        for category in &result.grade_breakdown {
            lines.push(category.detail.clone());
        }
    }

    lines.push(String::new());
    let total = format!("Total: {}", format_percent(result.percent));
    if use_colors {
        lines.push(total.bold().to_string());
    } else {
        lines.push(total);
    }

    lines.join("\n")
}

/// Format a grade result as tab-separated values for scripting
/// Columns: label, percent, detail, dropped flag (no headers, no colors)
pub fn format_tsv(result: &CourseGradeResult) -> String {
    let mut lines: Vec<String> = result
        .section_breakdown
        .iter()
        .map(|entry| {
            format!(
                "{}\t{:.4}\t{}\t{}",
                entry.label,
                entry.percent,
                entry.detail,
                if entry.mark.is_some() { "dropped" } else { "" }
            )
        })
        .collect();
    lines.push(format!("Total\t{:.4}\t\t", result.percent));
    lines.join("\n")
}
