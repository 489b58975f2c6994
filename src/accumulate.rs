// Year-to-date accumulation of the safety indices.
//
// The accumulated indices are not sums of the monthly indices: counts and
// HHT are summed across the window, headcount is averaged, and the four
// formulas are applied once to those aggregates. Recomputed in full on
// every query.
use crate::indices::man_hours;
use crate::types::Observation;
use crate::util::average;

const PER_MILLION: f64 = 1_000_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct YtdAccumulation {
    pub year: i32,
    pub cutoff_month: u32,
    /// Months with a record inside the January..=cutoff window.
    pub months_observed: usize,
    pub total_accidents: f64,
    pub total_lost_days: f64,
    pub total_charged_days: f64,
    pub total_hht: f64,
    pub avg_headcount: f64,
    pub accident_rate: f64,
    pub severity_rate: f64,
    pub frequency_index: f64,
    pub gravity_index: f64,
}

/// Accumulate January through `cutoff_month` of `year`.
///
/// Returns `None` when the window holds no records at all, so callers can
/// tell "no data" apart from a window of zero-valued months.
pub fn accumulate(records: &[Observation], year: i32, cutoff_month: u32) -> Option<YtdAccumulation> {
    let window: Vec<&Observation> = records
        .iter()
        .filter(|r| r.year() == year && r.month_number() <= cutoff_month)
        .collect();
    if window.is_empty() {
        return None;
    }

    let total_accidents: f64 = window.iter().map(|r| r.lost_time_accidents).sum();
    let total_lost_days: f64 = window.iter().map(|r| r.lost_days).sum();
    let total_charged_days: f64 = window.iter().map(|r| r.charged_days).sum();
    let total_hht: f64 = window
        .iter()
        .map(|r| man_hours(r.headcount, r.overtime_hours, r.absence_hours))
        .sum();
    let headcounts: Vec<f64> = window.iter().map(|r| r.headcount).collect();
    let avg_headcount = average(&headcounts);

    let workers = avg_headcount.max(1.0);
    let hht = total_hht.max(1.0);

    Some(YtdAccumulation {
        year,
        cutoff_month,
        months_observed: window.len(),
        total_accidents,
        total_lost_days,
        total_charged_days,
        total_hht,
        avg_headcount,
        accident_rate: total_accidents / workers * 100.0,
        severity_rate: total_lost_days / workers * 100.0,
        frequency_index: total_accidents * PER_MILLION / hht,
        gravity_index: (total_lost_days + total_charged_days) * PER_MILLION / hht,
    })
}
