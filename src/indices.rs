// Monthly safety indices per the DS 40/44/67 reporting conventions.
//
// Everything here is a pure function of one observation. Divisors are
// floored to 1 so a month with no headcount or negative net hours still
// produces finite numbers instead of poisoning the report with NaN.
use crate::types::Observation;

/// Contractual hours per worker per month used for the HHT estimate.
pub const STANDARD_MONTHLY_HOURS: f64 = 180.0;

const PER_MILLION: f64 = 1_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyIndices {
    pub hht: f64,
    /// Lost-time accidents per 100 workers.
    pub accident_rate: f64,
    /// Lost days per 100 workers.
    pub severity_rate: f64,
    /// Lost-time accidents per million man-hours.
    pub frequency_index: f64,
    /// Lost plus charged days per million man-hours.
    pub gravity_index: f64,
}

/// Man-hours worked: headcount at standard hours, plus overtime, minus
/// absence. Floored to 1 because it is the denominator of both indices.
pub fn man_hours(headcount: f64, overtime_hours: f64, absence_hours: f64) -> f64 {
    let hht = headcount * STANDARD_MONTHLY_HOURS + overtime_hours - absence_hours;
    hht.max(1.0)
}

pub fn indices_for(obs: &Observation) -> MonthlyIndices {
    let hht = man_hours(obs.headcount, obs.overtime_hours, obs.absence_hours);
    let workers = obs.headcount.max(1.0);
    MonthlyIndices {
        hht,
        accident_rate: obs.lost_time_accidents / workers * 100.0,
        severity_rate: obs.lost_days / workers * 100.0,
        frequency_index: obs.lost_time_accidents * PER_MILLION / hht,
        gravity_index: (obs.lost_days + obs.charged_days) * PER_MILLION / hht,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn observation(headcount: f64, overtime: f64, absence: f64, accidents: f64, lost_days: f64) -> Observation {
        let mut obs = Observation::empty(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        obs.headcount = headcount;
        obs.overtime_hours = overtime;
        obs.absence_hours = absence;
        obs.lost_time_accidents = accidents;
        obs.lost_days = lost_days;
        obs
    }

    #[test]
    fn accident_rate_is_exact_for_positive_headcount() {
        let obs = observation(22.0, 0.0, 88.0, 1.0, 5.0);
        let idx = indices_for(&obs);
        assert_eq!(idx.accident_rate, 1.0 / 22.0 * 100.0);
        assert_eq!(idx.severity_rate, 5.0 / 22.0 * 100.0);
    }

    #[test]
    fn worked_example_matches_reference_values() {
        // 22 workers, 88 absence hours -> HHT = 22*180 - 88 = 3872.
        let obs = observation(22.0, 0.0, 88.0, 1.0, 5.0);
        let idx = indices_for(&obs);
        assert_eq!(idx.hht, 3872.0);
        assert!((idx.accident_rate - 4.545).abs() < 1e-3);
        assert!((idx.severity_rate - 22.73).abs() < 1e-2);
        assert!((idx.frequency_index - 258.26).abs() < 1e-2);
    }

    #[test]
    fn gravity_index_includes_charged_days() {
        let mut obs = observation(22.0, 0.0, 88.0, 1.0, 5.0);
        obs.charged_days = 300.0;
        let idx = indices_for(&obs);
        assert_eq!(idx.gravity_index, 305.0 * 1_000_000.0 / 3872.0);
    }

    #[test]
    fn divisors_are_floored_to_one() {
        let obs = observation(0.0, 0.0, 0.0, 2.0, 10.0);
        let idx = indices_for(&obs);
        assert_eq!(idx.hht, 1.0);
        assert_eq!(idx.accident_rate, 200.0);
        assert_eq!(idx.frequency_index, 2_000_000.0);
        assert!(idx.gravity_index.is_finite());
    }

    #[test]
    fn man_hours_floors_negative_net_hours() {
        assert_eq!(man_hours(1.0, 0.0, 500.0), 1.0);
        assert_eq!(man_hours(22.0, 40.0, 10.0), 22.0 * 180.0 + 30.0);
    }
}
