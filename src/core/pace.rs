use chrono::Local;
use tracing::debug;

use crate::core::models::pace::{
    PaceBreakdown, PaceReport, PaceStatus, PaceUnavailable, UnavailableReason, UsageReading,
};

/// Length of the usage cycle in days.
pub const TOTAL_DAYS: i64 = 7;

/// Even share of a weekly allowance, in percent per day.
pub const DEFAULT_QUOTA_PER_DAY: f64 = 100.0 / TOTAL_DAYS as f64;

/// Compare the pace of consumption so far against what is left until the reset.
///
/// Returns `None` when the reading lacks a usable percentage or reset date, and
/// `PaceReport::Unavailable` when the reset falls on the reference day or earlier.
/// Both dates are calendar days, so the day count is exact and independent of
/// the time of day the reading was taken.
pub fn compute_surplus_or_deficit(reading: &UsageReading) -> Option<PaceReport> {
    let remaining_percent = reading.remaining_percent.filter(|p| p.is_finite())?;
    let reset = reading.reset_date?;
    let reference = reading
        .reference_date
        .unwrap_or_else(|| Local::now().date_naive());

    let days_remaining = (reset - reference).num_days();
    if days_remaining <= 0 {
        debug!(%reset, %reference, days_remaining, "reset is today or past, pace unavailable");
        return Some(PaceReport::Unavailable(PaceUnavailable {
            reason: UnavailableReason::ResetTodayOrPast,
            days_remaining,
        }));
    }

    let days_elapsed = TOTAL_DAYS - days_remaining;
    let used_percent = 100.0 - remaining_percent;

    // Same-day readings put the whole usage on day zero.
    let average_used_per_day_so_far = if days_elapsed > 0 {
        used_percent / days_elapsed as f64
    } else {
        used_percent
    };
    let remaining_average_per_day = remaining_percent / days_remaining as f64;
    let daily_diff = remaining_average_per_day - average_used_per_day_so_far;
    let status = if daily_diff >= 0.0 {
        PaceStatus::Surplus
    } else {
        PaceStatus::Deficit
    };

    let equivalent_days_total = if average_used_per_day_so_far > 0.0 {
        Some(remaining_percent / average_used_per_day_so_far)
    } else {
        None
    };
    let equivalent_buffer_days = equivalent_days_total.map(|d| d - days_remaining as f64);

    let quota_per_day = reading.quota_per_day.unwrap_or(DEFAULT_QUOTA_PER_DAY);
    let days_from_quota = if quota_per_day.is_finite() && quota_per_day > 0.0 {
        Some(remaining_percent / quota_per_day)
    } else {
        None
    };

    debug!(
        days_remaining,
        days_elapsed,
        daily_diff,
        %status,
        "computed weekly pace"
    );

    Some(PaceReport::Computed(PaceBreakdown {
        days_remaining,
        days_elapsed,
        used_percent,
        average_used_per_day_so_far,
        remaining_average_per_day,
        daily_diff,
        status,
        equivalent_days_total,
        equivalent_buffer_days,
        quota_per_day,
        days_from_quota,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn computed(reading: &UsageReading) -> PaceBreakdown {
        match compute_surplus_or_deficit(reading) {
            Some(PaceReport::Computed(b)) => b,
            other => panic!("expected computed report, got {:?}", other),
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn missing_percent_yields_none() {
        let reading = UsageReading {
            reset_date: Some(date(2026, 1, 4)),
            ..Default::default()
        };
        assert!(compute_surplus_or_deficit(&reading).is_none());
    }

    #[test]
    fn missing_reset_yields_none() {
        let reading = UsageReading {
            remaining_percent: Some(50.0),
            ..Default::default()
        };
        assert!(compute_surplus_or_deficit(&reading).is_none());
    }

    #[test]
    fn non_finite_percent_yields_none() {
        let reading = UsageReading::new(f64::NAN, date(2026, 1, 4)).with_reference(date(2026, 1, 1));
        assert!(compute_surplus_or_deficit(&reading).is_none());
    }

    #[test]
    fn reset_today_is_unavailable() {
        let today = date(2026, 1, 1);
        let reading = UsageReading::new(40.0, today).with_reference(today);
        let report = compute_surplus_or_deficit(&reading).unwrap();
        assert_eq!(
            report,
            PaceReport::Unavailable(PaceUnavailable {
                reason: UnavailableReason::ResetTodayOrPast,
                days_remaining: 0,
            })
        );
        assert!(!report.is_ok());
    }

    #[test]
    fn reset_in_past_is_unavailable() {
        let reading = UsageReading::new(40.0, date(2025, 12, 30)).with_reference(date(2026, 1, 1));
        let report = compute_surplus_or_deficit(&reading).unwrap();
        assert!(!report.is_ok());
        assert_eq!(report.days_remaining(), -2);
    }

    #[test]
    fn no_usage_has_no_equivalent_days() {
        let today = date(2026, 1, 1);
        let reading = UsageReading::new(100.0, today + Duration::days(7)).with_reference(today);
        let b = computed(&reading);
        assert_eq!(b.days_remaining, 7);
        assert_eq!(b.days_elapsed, 0);
        assert_eq!(b.used_percent, 0.0);
        assert_eq!(b.average_used_per_day_so_far, 0.0);
        assert!(b.equivalent_days_total.is_none());
        assert!(b.equivalent_buffer_days.is_none());
        assert_eq!(b.status, PaceStatus::Surplus);
    }

    #[test]
    fn surplus_scenario() {
        let reading = UsageReading::new(56.0, date(2026, 1, 4)).with_reference(date(2026, 1, 1));
        let b = computed(&reading);
        assert_eq!(b.days_remaining, 3);
        assert_eq!(b.days_elapsed, 4);
        assert!(approx(b.used_percent, 44.0));
        assert!(approx(b.average_used_per_day_so_far, 11.0));
        assert!(approx(b.remaining_average_per_day, 18.67));
        assert!(approx(b.daily_diff, 7.67));
        assert_eq!(b.status, PaceStatus::Surplus);
        assert!(approx(b.equivalent_days_total.unwrap(), 5.09));
        assert!(approx(b.equivalent_buffer_days.unwrap(), 2.09));
        assert!(approx(b.quota_per_day, 14.29));
        assert!(approx(b.days_from_quota.unwrap(), 3.92));
    }

    #[test]
    fn deficit_scenario() {
        let reading = UsageReading::new(10.0, date(2026, 1, 4)).with_reference(date(2026, 1, 1));
        let b = computed(&reading);
        assert!(approx(b.used_percent, 90.0));
        assert!(approx(b.average_used_per_day_so_far, 22.5));
        assert_eq!(b.status, PaceStatus::Deficit);
        assert!(approx(b.equivalent_days_total.unwrap(), 0.44));
        assert!(approx(b.equivalent_buffer_days.unwrap(), -2.56));
        assert!(b.equivalent_buffer_days.unwrap() < 0.0);
    }

    #[test]
    fn zero_diff_counts_as_surplus() {
        // Day zero of the cycle: 12.5 used today, 87.5 / 7 = 12.5 left per day.
        let reading = UsageReading::new(87.5, date(2026, 1, 8)).with_reference(date(2026, 1, 1));
        let b = computed(&reading);
        assert_eq!(b.daily_diff, 0.0);
        assert_eq!(b.status, PaceStatus::Surplus);
    }

    #[test]
    fn same_day_cycle_start_puts_usage_on_day_zero() {
        let reading = UsageReading::new(80.0, date(2026, 1, 8)).with_reference(date(2026, 1, 1));
        let b = computed(&reading);
        assert_eq!(b.days_elapsed, 0);
        assert!(approx(b.average_used_per_day_so_far, 20.0));
        assert!(!b.average_used_per_day_so_far.is_nan());
        assert!(approx(b.equivalent_days_total.unwrap(), 4.0));
    }

    #[test]
    fn quota_override_is_echoed() {
        let reading = UsageReading::new(50.0, date(2026, 1, 4))
            .with_reference(date(2026, 1, 1))
            .with_quota_per_day(10.0);
        let b = computed(&reading);
        assert_eq!(b.quota_per_day, 10.0);
        assert!(approx(b.days_from_quota.unwrap(), 5.0));
    }

    #[test]
    fn non_positive_quota_has_no_quota_days() {
        let reading = UsageReading::new(50.0, date(2026, 1, 4))
            .with_reference(date(2026, 1, 1))
            .with_quota_per_day(0.0);
        let b = computed(&reading);
        assert_eq!(b.quota_per_day, 0.0);
        assert!(b.days_from_quota.is_none());
    }

    #[test]
    fn time_of_day_does_not_change_day_count() {
        let reset = date(2026, 1, 4).and_hms_opt(15, 18, 0).unwrap();
        let early = date(2026, 1, 1).and_hms_opt(0, 1, 0).unwrap();
        let late = date(2026, 1, 1).and_hms_opt(23, 59, 0).unwrap();
        let a = compute_surplus_or_deficit(&UsageReading::new(56.0, reset).with_reference(early));
        let b = compute_surplus_or_deficit(&UsageReading::new(56.0, reset).with_reference(late));
        assert_eq!(a, b);
        assert_eq!(a.unwrap().days_remaining(), 3);
    }

    #[test]
    fn day_count_is_exact_across_dst_change() {
        // US and EU clocks move forward in March; calendar arithmetic is unaffected.
        let reading = UsageReading::new(50.0, date(2026, 3, 10)).with_reference(date(2026, 3, 7));
        assert_eq!(computed(&reading).days_remaining, 3);
        let reading = UsageReading::new(50.0, date(2026, 3, 31)).with_reference(date(2026, 3, 28));
        assert_eq!(computed(&reading).days_remaining, 3);
    }

    #[test]
    fn used_plus_remaining_is_one_hundred() {
        let today = date(2026, 1, 1);
        for days in 1..=7 {
            for remaining in [0.0, 12.5, 33.3, 50.0, 99.9, 100.0] {
                let reading =
                    UsageReading::new(remaining, today + Duration::days(days)).with_reference(today);
                let b = computed(&reading);
                assert!((b.used_percent + remaining - 100.0).abs() < 1e-9);
                assert_eq!(b.days_elapsed + b.days_remaining, TOTAL_DAYS);
            }
        }
    }

    #[test]
    fn reset_beyond_one_cycle_counts_all_usage_as_one_day() {
        let reading = UsageReading::new(60.0, date(2026, 1, 11)).with_reference(date(2026, 1, 1));
        let b = computed(&reading);
        assert_eq!(b.days_remaining, 10);
        assert_eq!(b.days_elapsed, -3);
        assert!(approx(b.average_used_per_day_so_far, 40.0));
        assert!(approx(b.daily_diff, -34.0));
        assert!(approx(b.equivalent_buffer_days.unwrap(), -8.5));
        assert_eq!(b.status, PaceStatus::Deficit);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let reading = UsageReading::new(37.5, date(2026, 1, 5)).with_reference(date(2026, 1, 1));
        let first = compute_surplus_or_deficit(&reading);
        let second = compute_surplus_or_deficit(&reading);
        assert_eq!(first, second);
        let (Some(PaceReport::Computed(a)), Some(PaceReport::Computed(b))) = (first, second) else {
            panic!("expected computed reports");
        };
        assert_eq!(a.daily_diff.to_bits(), b.daily_diff.to_bits());
    }

    #[test]
    fn reference_defaults_to_today() {
        let today = Local::now().date_naive();
        let reading = UsageReading::new(50.0, today + Duration::days(2));
        assert_eq!(compute_surplus_or_deficit(&reading).unwrap().days_remaining(), 2);
    }
}
