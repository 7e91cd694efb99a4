//! Pull the numbers the pace calculator needs out of scraped page text.
//!
//! Typical input looks like:
//! ```text
//!   56% left
//!   Resets Jan 4, 3:18 PM
//!
//!   44% used
//!   Resets Tomorrow at 1:00 AM (Asia/Tokyo)
//! ```

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;

static PERCENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[^\d.])(\d+(?:\.\d+)?)\s*%\s*(used|left|remaining)?").expect("valid regex")
});

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})").expect("valid regex"));

static MONTH_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b([a-z]{3,9})\.?\s+(\d{1,2})(?:st|nd|rd|th)?\b(?:,?\s+(\d{4})\b)?")
        .expect("valid regex")
});

static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b[a-z]+\b").expect("valid regex"));

/// Read the remaining percentage from text such as "56% left" or "44% used".
///
/// A "used" figure is converted to what is left. Values above 100 are rejected.
pub fn parse_remaining_percent(text: &str) -> Option<f64> {
    let caps = PERCENT_RE.captures(text)?;
    let value: f64 = caps[1].parse().ok()?;
    if !(0.0..=100.0).contains(&value) {
        return None;
    }
    let is_used = caps
        .get(2)
        .is_some_and(|m| m.as_str().eq_ignore_ascii_case("used"));
    Some(if is_used { 100.0 - value } else { value })
}

/// Read the reset day from text such as "Resets Jan 4, 3:18 PM".
///
/// Dates without a year resolve to the next occurrence on or after `today`,
/// as do bare weekday names. Any time of day or zone annotation is ignored.
pub fn parse_reset_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    if let Some(caps) = ISO_DATE_RE.captures(text) {
        let year = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let day = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    for caps in MONTH_DAY_RE.captures_iter(text) {
        let Some(month) = parse_month(&caps[1]) else {
            continue;
        };
        let day: u32 = caps[2].parse().ok()?;
        if let Some(year) = caps.get(3) {
            return NaiveDate::from_ymd_opt(year.as_str().parse().ok()?, month, day);
        }
        return next_month_day(month, day, today);
    }

    for word in WORD_RE.find_iter(text) {
        let word = word.as_str().to_ascii_lowercase();
        match word.as_str() {
            "today" => return Some(today),
            "tomorrow" => return Some(today + Duration::days(1)),
            _ => {}
        }
        if let Some(weekday) = parse_weekday(&word) {
            return Some(next_weekday(weekday, today));
        }
    }

    None
}

fn parse_month(name: &str) -> Option<u32> {
    let name = name.to_ascii_lowercase();
    let months = [
        "january", "february", "march", "april", "may", "june", "july", "august", "september",
        "october", "november", "december",
    ];
    months
        .iter()
        .position(|m| *m == name || (name.len() >= 3 && m.starts_with(name.as_str())))
        .map(|i| i as u32 + 1)
}

fn parse_weekday(name: &str) -> Option<Weekday> {
    match name {
        "mon" | "monday" => Some(Weekday::Mon),
        "tue" | "tues" | "tuesday" => Some(Weekday::Tue),
        "wed" | "wednesday" => Some(Weekday::Wed),
        "thu" | "thur" | "thurs" | "thursday" => Some(Weekday::Thu),
        "fri" | "friday" => Some(Weekday::Fri),
        "sat" | "saturday" => Some(Weekday::Sat),
        "sun" | "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

fn next_month_day(month: u32, day: u32, today: NaiveDate) -> Option<NaiveDate> {
    let this_year = NaiveDate::from_ymd_opt(today.year(), month, day);
    match this_year {
        Some(date) if date >= today => Some(date),
        _ => NaiveDate::from_ymd_opt(today.year() + 1, month, day),
    }
}

fn next_weekday(weekday: Weekday, today: NaiveDate) -> NaiveDate {
    let ahead = (7 + weekday.num_days_from_monday() as i64
        - today.weekday().num_days_from_monday() as i64)
        % 7;
    today + Duration::days(ahead)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn percent_left() {
        assert_eq!(parse_remaining_percent("56% left"), Some(56.0));
        assert_eq!(parse_remaining_percent("  56 % remaining"), Some(56.0));
        assert_eq!(parse_remaining_percent("12.5%"), Some(12.5));
    }

    #[test]
    fn percent_used_is_inverted() {
        assert_eq!(parse_remaining_percent("44% used"), Some(56.0));
        assert_eq!(
            parse_remaining_percent("  ███████████▌            23% used"),
            Some(77.0)
        );
        assert_eq!(parse_remaining_percent("100% USED"), Some(0.0));
    }

    #[test]
    fn percent_out_of_range_or_missing() {
        assert_eq!(parse_remaining_percent("150% left"), None);
        assert_eq!(parse_remaining_percent("1000% left"), None);
        assert_eq!(parse_remaining_percent("1100% used"), None);
        assert_eq!(parse_remaining_percent("no numbers here"), None);
        assert_eq!(parse_remaining_percent(""), None);
    }

    #[test]
    fn reset_month_day_with_time() {
        let today = date(2026, 1, 1);
        assert_eq!(
            parse_reset_date("Resets Jan 4, 3:18 PM", today),
            Some(date(2026, 1, 4))
        );
        assert_eq!(
            parse_reset_date("Resets Mar 3, 12am (Asia/Tokyo)", today),
            Some(date(2026, 3, 3))
        );
        assert_eq!(
            parse_reset_date("Resets January 4th", today),
            Some(date(2026, 1, 4))
        );
    }

    #[test]
    fn reset_month_day_rolls_into_next_year() {
        let today = date(2025, 12, 30);
        assert_eq!(parse_reset_date("Resets Jan 2", today), Some(date(2026, 1, 2)));
    }

    #[test]
    fn reset_with_explicit_year() {
        let today = date(2026, 1, 1);
        assert_eq!(
            parse_reset_date("Resets Dec 28, 2025", today),
            Some(date(2025, 12, 28))
        );
    }

    #[test]
    fn reset_iso_date() {
        let today = date(2026, 1, 1);
        assert_eq!(
            parse_reset_date("2026-01-04T15:18:00", today),
            Some(date(2026, 1, 4))
        );
    }

    #[test]
    fn reset_relative_words() {
        let today = date(2026, 1, 1);
        assert_eq!(parse_reset_date("Resets Today at 5:30 PM", today), Some(today));
        assert_eq!(
            parse_reset_date("Resets Tomorrow at 1:00 AM", today),
            Some(date(2026, 1, 2))
        );
    }

    #[test]
    fn reset_weekday() {
        // 2026-01-01 is a Thursday.
        let today = date(2026, 1, 1);
        assert_eq!(parse_reset_date("Resets Sun 3:00 PM", today), Some(date(2026, 1, 4)));
        assert_eq!(parse_reset_date("Resets Thursday", today), Some(today));
        assert_eq!(parse_reset_date("Resets Wed", today), Some(date(2026, 1, 7)));
    }

    #[test]
    fn reset_unparseable() {
        let today = date(2026, 1, 1);
        assert_eq!(parse_reset_date("Resets soon", today), None);
        assert_eq!(parse_reset_date("Resets Foo 31", today), None);
        assert_eq!(parse_reset_date("Resets Feb 30, 2026", today), None);
    }
}
