use chrono::NaiveDate;

/// Returns "{remaining}% remaining", rounded to the nearest integer.
pub fn format_remaining_percent(remaining_percent: f64) -> String {
    let remaining = remaining_percent.clamp(0.0, 100.0).round() as u64;
    format!("{}% remaining", remaining)
}

/// Returns "[████████░░░░]" where █ = remaining portion, ░ = used portion.
/// Width is the number of block characters inside the brackets.
pub fn format_usage_bar(remaining_percent: f64, width: usize) -> String {
    let remaining_percent = remaining_percent.clamp(0.0, 100.0);
    let filled = ((remaining_percent / 100.0) * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);

    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

/// Returns a percentage with an explicit sign, e.g. "+7.67%" or "-19.17%".
pub fn format_signed_percent(value: f64) -> String {
    if value >= 0.0 {
        format!("+{:.2}%", value)
    } else {
        format!("{:.2}%", value)
    }
}

/// Returns "1 day", "3 days" or "2.1 days". Whole values drop the decimal.
pub fn format_days(days: f64) -> String {
    let rounded = (days * 10.0).round() / 10.0;
    let text = if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{:.1}", rounded)
    };
    if rounded.abs() == 1.0 {
        format!("{} day", text)
    } else {
        format!("{} days", text)
    }
}

/// Returns "Resets Sun Jan 4", or "Resets today" / "Resets tomorrow" relative to `today`.
pub fn format_reset_day(reset: NaiveDate, today: NaiveDate) -> String {
    match (reset - today).num_days() {
        0 => "Resets today".to_string(),
        1 => "Resets tomorrow".to_string(),
        _ => format!("Resets {}", reset.format("%a %b %-d")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_remaining_percent_rounds() {
        assert_eq!(format_remaining_percent(71.6), "72% remaining");
        assert_eq!(format_remaining_percent(100.0), "100% remaining");
        assert_eq!(format_remaining_percent(-3.0), "0% remaining");
        assert_eq!(format_remaining_percent(110.0), "100% remaining");
    }

    #[test]
    fn format_usage_bar_width() {
        assert_eq!(format_usage_bar(100.0, 12), "[████████████]");
        assert_eq!(format_usage_bar(0.0, 12), "[░░░░░░░░░░░░]");
        assert_eq!(format_usage_bar(50.0, 12), "[██████░░░░░░]");
    }

    #[test]
    fn format_signed_percent_sign() {
        assert_eq!(format_signed_percent(7.6667), "+7.67%");
        assert_eq!(format_signed_percent(0.0), "+0.00%");
        assert_eq!(format_signed_percent(-19.1667), "-19.17%");
    }

    #[test]
    fn format_days_singular_and_fraction() {
        assert_eq!(format_days(1.0), "1 day");
        assert_eq!(format_days(3.0), "3 days");
        assert_eq!(format_days(2.0909), "2.1 days");
        assert_eq!(format_days(-2.5556), "-2.6 days");
        assert_eq!(format_days(-1.0), "-1 day");
    }

    #[test]
    fn format_reset_day_relative() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let on = |d: u32| NaiveDate::from_ymd_opt(2026, 1, d).unwrap();
        assert_eq!(format_reset_day(on(1), today), "Resets today");
        assert_eq!(format_reset_day(on(2), today), "Resets tomorrow");
        assert_eq!(format_reset_day(on(4), today), "Resets Sun Jan 4");
    }
}
