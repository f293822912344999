use std::fmt;

use chrono::{Datelike, Duration, Local, NaiveDate};

/// A calendar month, used to address the per-month warehouse tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Target tables key months as `yyyyMM`.
    pub fn periode(&self) -> String {
        format!("{:04}{:02}", self.year, self.month)
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        month_end(self.first_day())
    }

    pub fn next(&self) -> Self {
        Self::of(shift_months(self.first_day(), 1))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Window {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn start_str(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_str(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }

    /// Split the window into one slice per calendar month it touches.
    pub fn months(&self) -> Vec<(Period, Window)> {
        let mut slices = Vec::new();
        if self.end < self.start {
            return slices;
        }
        let mut period = Period::of(self.start);
        let last = Period::of(self.end);
        while period <= last {
            let start = period.first_day().max(self.start);
            let end = period.last_day().min(self.end);
            slices.push((period, Window::new(start, end)));
            period = period.next();
        }
        slices
    }
}

/// Every comparison window a report needs, derived once per request.
#[derive(Debug, Clone)]
pub struct DateWindows {
    pub reference: NaiveDate,
    pub current: Window,
    pub previous_month: Window,
    pub previous_year: Window,
    pub ytd: Window,
    pub previous_ytd: Window,
    pub qtd: Window,
    pub previous_qtd: Window,
    pub days_in_month: u32,
    pub today: u32,
    pub remaining_days: u32,
}

impl DateWindows {
    pub fn period(&self) -> Period {
        Period::of(self.reference)
    }

    /// Share of the month already elapsed, used by run-rate projections.
    pub fn elapsed_fraction(&self) -> f64 {
        self.today as f64 / self.days_in_month as f64
    }

    /// From the start of the previous month through the reference date.
    pub fn trailing(&self) -> Window {
        Window::new(self.previous_month.start, self.current.end)
    }

    /// Registration horizon for orders completed this month: from the start
    /// of the previous year through the reference date.
    pub fn ps_lookback(&self) -> Window {
        Window::new(self.previous_ytd.start, self.current.end)
    }
}

/// Resolve all comparison windows for a reference date.
///
/// When the reference date is the last day of its month, prior-period windows
/// end on the last day of their own month. Otherwise they end on the same
/// day-of-month, capped at that month's length.
pub fn resolve_windows(reference: NaiveDate) -> DateWindows {
    let month_end_aligned = reference == month_end(reference);

    let current = Window::new(month_start(reference), reference);

    let prev_end = shift_aligned(reference, -1, month_end_aligned);
    let previous_month = Window::new(month_start(prev_end), prev_end);

    let yoy_end = shift_aligned(reference, -12, month_end_aligned);
    let previous_year = Window::new(month_start(yoy_end), yoy_end);

    let ytd = Window::new(year_start(reference), reference);
    let previous_ytd = Window::new(year_start(yoy_end), yoy_end);

    let qtd = Window::new(quarter_start(reference), reference);
    let prev_quarter_end = shift_aligned(reference, -3, month_end_aligned);
    let previous_qtd = Window::new(quarter_start(prev_quarter_end), prev_quarter_end);

    let days_in_month = month_end(reference).day();
    let today = reference.day().max(1);

    DateWindows {
        reference,
        current,
        previous_month,
        previous_year,
        ytd,
        previous_ytd,
        qtd,
        previous_qtd,
        days_in_month,
        today,
        remaining_days: days_in_month.saturating_sub(today),
    }
}

/// Reference date used when a request does not name one.
pub fn default_reference_date(lag_days: i64) -> NaiveDate {
    Local::now().date_naive() - Duration::days(lag_days)
}

/// Parse a `date` query value. Accepts a plain ISO date or an ISO timestamp
/// whose time part follows a `T` or a space.
pub fn parse_reference_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    let (date_part, rest) = match trimmed.get(..10) {
        Some(head) => (head, &trimmed[10..]),
        None => (trimmed, ""),
    };
    if !(rest.is_empty() || rest.starts_with('T') || rest.starts_with(' ')) {
        return None;
    }
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Parse the leading date of a warehouse timestamp column.
pub fn parse_stamp(value: &str) -> Option<NaiveDate> {
    parse_reference_date(value)
}

fn shift_aligned(date: NaiveDate, months: i32, month_end_aligned: bool) -> NaiveDate {
    let first = shift_months(month_start(date), months);
    let last = month_end(first);
    if month_end_aligned {
        return last;
    }
    first.with_day(date.day()).unwrap_or(last).min(last)
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn month_end(date: NaiveDate) -> NaiveDate {
    shift_months(month_start(date), 1) - Duration::days(1)
}

fn quarter_start(date: NaiveDate) -> NaiveDate {
    let quarter = (date.month() - 1) / 3;
    let start_month = quarter * 3 + 1;
    NaiveDate::from_ymd_opt(date.year(), start_month, 1).unwrap_or(date)
}

fn year_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
}

fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    let total_months = date.year() * 12 + date.month() as i32 - 1 + months;
    let new_year = total_months.div_euclid(12);
    let new_month = (total_months.rem_euclid(12) + 1) as u32;
    NaiveDate::from_ymd_opt(new_year, new_month, 1).unwrap_or(date)
}
