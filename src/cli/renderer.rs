use chrono::Local;
use colored::{control, ColoredString, Colorize};

use crate::core::formatter::{
    format_days, format_remaining_percent, format_reset_day, format_signed_percent,
    format_usage_bar,
};
use crate::core::models::pace::{
    PaceBreakdown, PaceReport, PaceStatus, PaceUnavailable, UsageReading,
};

const BAR_WIDTH: usize = 12;

/// Render a pace report as a colored (or plain) block.
///
/// Layout:
/// ```text
///  Weekly pace (surplus)
///   Remaining  56% remaining [███████░░░░░]
///              Resets Sun Jan 4
///   Days       3 left, 4 elapsed
///   Used/day   11.00% so far
///   Left/day   18.67% until reset
///   Diff       +7.67% per day
///   Lasts      5.1 days at current pace (+2.1 days buffer)
///   Quota      14.29%/day covers 3.9 days
/// ```
pub fn render_report(report: &PaceReport, reading: &UsageReading, use_color: bool) -> String {
    control::set_override(use_color);

    let mut lines: Vec<String> = Vec::new();
    match report {
        PaceReport::Computed(breakdown) => {
            render_breakdown(&mut lines, breakdown, reading);
        }
        PaceReport::Unavailable(unavailable) => {
            lines.push(" Weekly pace".bold().to_string());
            render_remaining(&mut lines, reading);
            lines.push(format!("  {}", render_unavailable(unavailable).yellow()));
        }
    }

    lines.join("\n")
}

/// One-line "cannot compute" message.
pub fn render_unavailable(unavailable: &PaceUnavailable) -> String {
    format!(
        "Cannot compute pace: {} ({} days remaining)",
        unavailable.reason, unavailable.days_remaining
    )
}

fn render_breakdown(lines: &mut Vec<String>, b: &PaceBreakdown, reading: &UsageReading) {
    let header = format!(" Weekly pace ({})", b.status);
    lines.push(header.bold().to_string());

    render_remaining(lines, reading);

    lines.push(format!(
        "  {}       {} left, {} elapsed",
        "Days".cyan(),
        b.days_remaining,
        b.days_elapsed
    ));
    lines.push(format!(
        "  {}   {:.2}% so far",
        "Used/day".cyan(),
        b.average_used_per_day_so_far
    ));
    lines.push(format!(
        "  {}   {:.2}% until reset",
        "Left/day".cyan(),
        b.remaining_average_per_day
    ));
    lines.push(format!(
        "  {}       {} per day",
        "Diff".cyan(),
        color_by_status(b.status, &format_signed_percent(b.daily_diff))
    ));

    let lasts = match (b.equivalent_days_total, b.equivalent_buffer_days) {
        (Some(total), Some(buffer)) => {
            let buffer_str = if buffer >= 0.0 {
                format!("+{} buffer", format_days(buffer))
            } else {
                format!("{} short", format_days(buffer))
            };
            format!(
                "{} at current pace ({})",
                format_days(total),
                color_by_status(b.status, &buffer_str)
            )
        }
        _ => "no usage recorded yet".dimmed().to_string(),
    };
    lines.push(format!("  {}      {}", "Lasts".cyan(), lasts));

    let quota = match b.days_from_quota {
        Some(days) => format!("{:.2}%/day covers {}", b.quota_per_day, format_days(days)),
        None => format!("{:.2}%/day", b.quota_per_day),
    };
    lines.push(format!("  {}      {}", "Quota".cyan(), quota));
}

fn render_remaining(lines: &mut Vec<String>, reading: &UsageReading) {
    let Some(remaining) = reading.remaining_percent else {
        return;
    };
    lines.push(format!(
        "  {}  {} {}",
        "Remaining".cyan(),
        color_by_remaining(remaining, &format_remaining_percent(remaining)),
        format_usage_bar(remaining, BAR_WIDTH).magenta()
    ));
    if let Some(reset) = reading.reset_date {
        let today = reading
            .reference_date
            .unwrap_or_else(|| Local::now().date_naive());
        // 13 spaces to align under the percent/bar values
        lines.push(format!("             {}", format_reset_day(reset, today).dimmed()));
    }
}

fn color_by_status(status: PaceStatus, text: &str) -> ColoredString {
    match status {
        PaceStatus::Surplus => text.green(),
        PaceStatus::Deficit => text.red(),
    }
}

/// Color the percent string green/yellow/red based on remaining percentage.
fn color_by_remaining(remaining_percent: f64, text: &str) -> ColoredString {
    if remaining_percent >= 25.0 {
        text.green()
    } else if remaining_percent >= 10.0 {
        text.yellow()
    } else {
        text.red()
    }
}
