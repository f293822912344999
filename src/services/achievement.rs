//! Achievement, growth and run-rate arithmetic.
//!
//! Every ratio goes through [`divide`], so a missing or zero denominator
//! becomes `None` instead of `NaN`/`inf`.

use crate::date_utils::DateWindows;
use crate::models::kpi::{Attainment, Trend};

/// `num / den`, or `None` when the denominator is missing, zero or not finite.
pub fn divide(num: f64, den: Option<f64>) -> Option<f64> {
    let den = den?;
    if den == 0.0 || !den.is_finite() || !num.is_finite() {
        return None;
    }
    Some(num / den)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `round(num / den * 100, 2)`.
pub fn percent(num: f64, den: Option<f64>) -> Option<f64> {
    divide(num, den).map(|ratio| round2(ratio * 100.0))
}

/// Render a percentage as `"12.34%"`.
pub fn format_percent(value: Option<f64>) -> Option<String> {
    value.map(|v| format!("{:.2}%", v))
}

/// Percentage string for `num / den`.
pub fn percent_str(num: f64, den: f64) -> Option<String> {
    format_percent(percent(num, Some(den)))
}

/// Growth of `current` over `previous` as a percentage string.
pub fn growth(current: f64, previous: f64) -> Option<String> {
    format_percent(percent(current - previous, Some(previous)))
}

pub fn trend_i64(mtd: i64, m1: i64, yoy: i64) -> Trend<i64> {
    Trend {
        mtd,
        m1,
        yoy,
        mom: growth(mtd as f64, m1 as f64),
        yoy_growth: growth(mtd as f64, yoy as f64),
    }
}

pub fn trend_f64(mtd: f64, m1: f64, yoy: f64) -> Trend<f64> {
    Trend {
        mtd,
        m1,
        yoy,
        mom: growth(mtd, m1),
        yoy_growth: growth(mtd, yoy),
    }
}

/// Attainment of `actual` against an optional monthly `target`.
pub fn attainment(actual: f64, target: Option<f64>, windows: &DateWindows) -> Attainment {
    let days_in_month = windows.days_in_month as f64;
    let today = windows.today.max(1) as f64;
    let remaining = windows.remaining_days as f64;

    let run_rate_target = target.map(|t| t * windows.elapsed_fraction());
    let gap = target.map(|t| t - actual);

    Attainment {
        target,
        actual,
        achievement: format_percent(percent(actual, target)),
        run_rate_achievement: format_percent(percent(actual, run_rate_target)),
        daily_target: target.and_then(|t| divide(t, Some(days_in_month))).map(round2),
        daily_actual: round2(actual / today),
        required_daily: gap.and_then(|g| divide(g, Some(remaining))).map(round2),
        gap: gap.map(round2),
    }
}
