use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Serialize, Serializer};

/// Anything that can be reduced to a local calendar date.
///
/// Conversion always builds a new `NaiveDate`; the time of day is dropped.
pub trait CalendarDay {
    fn calendar_day(&self) -> NaiveDate;
}

impl CalendarDay for NaiveDate {
    fn calendar_day(&self) -> NaiveDate {
        *self
    }
}

impl CalendarDay for NaiveDateTime {
    fn calendar_day(&self) -> NaiveDate {
        self.date()
    }
}

impl<Tz: TimeZone> CalendarDay for DateTime<Tz> {
    fn calendar_day(&self) -> NaiveDate {
        self.with_timezone(&Local).date_naive()
    }
}

/// A point-in-time reading of a weekly allowance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsageReading {
    /// Percentage of the weekly quota left (0.0 - 100.0)
    pub remaining_percent: Option<f64>,
    /// Calendar day the weekly window resets
    pub reset_date: Option<NaiveDate>,
    /// Calendar day the reading is taken on (defaults to today)
    pub reference_date: Option<NaiveDate>,
    /// Standard daily allotment (defaults to 100/7)
    pub quota_per_day: Option<f64>,
}

impl UsageReading {
    pub fn new(remaining_percent: f64, reset: impl CalendarDay) -> Self {
        Self {
            remaining_percent: Some(remaining_percent),
            reset_date: Some(reset.calendar_day()),
            reference_date: None,
            quota_per_day: None,
        }
    }

    pub fn with_reference(mut self, reference: impl CalendarDay) -> Self {
        self.reference_date = Some(reference.calendar_day());
        self
    }

    pub fn with_quota_per_day(mut self, quota_per_day: f64) -> Self {
        self.quota_per_day = Some(quota_per_day);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaceStatus {
    Surplus,
    Deficit,
}

impl std::fmt::Display for PaceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Surplus => write!(f, "surplus"),
            Self::Deficit => write!(f, "deficit"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    /// The reset falls on the reference day or earlier
    ResetTodayOrPast,
}

impl std::fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ResetTodayOrPast => write!(f, "weekly reset is today or already passed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaceUnavailable {
    pub reason: UnavailableReason,
    pub days_remaining: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaceBreakdown {
    pub days_remaining: i64,
    pub days_elapsed: i64,
    pub used_percent: f64,
    /// Average percent consumed per elapsed day
    pub average_used_per_day_so_far: f64,
    /// Percent per day still available until the reset
    pub remaining_average_per_day: f64,
    pub daily_diff: f64,
    pub status: PaceStatus,
    /// Days the remaining allowance lasts at the current average; `None` with no usage yet
    pub equivalent_days_total: Option<f64>,
    /// Days beyond (positive) or short of (negative) the reset date
    pub equivalent_buffer_days: Option<f64>,
    pub quota_per_day: f64,
    /// Days the remaining allowance lasts at the standard daily quota
    pub days_from_quota: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaceReport {
    Computed(PaceBreakdown),
    Unavailable(PaceUnavailable),
}

impl PaceReport {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Computed(_))
    }

    pub fn days_remaining(&self) -> i64 {
        match self {
            Self::Computed(b) => b.days_remaining,
            Self::Unavailable(u) => u.days_remaining,
        }
    }
}

#[derive(Serialize)]
struct Tagged<'a, T> {
    ok: bool,
    #[serde(flatten)]
    inner: &'a T,
}

impl Serialize for PaceReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Computed(inner) => Tagged { ok: true, inner }.serialize(serializer),
            Self::Unavailable(inner) => Tagged { ok: false, inner }.serialize(serializer),
        }
    }
}
