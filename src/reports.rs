use chrono::NaiveDate;

use crate::accumulate::accumulate;
use crate::indices::indices_for;
use crate::types::{ComplianceRow, MonthlyIndexRow, Observation, SummaryStats, YtdRollupRow};
use crate::util::{format_number, month_label};

fn year_window(data: &[Observation], year: i32) -> Vec<&Observation> {
    data.iter().filter(|r| r.year() == year).collect()
}

/// Report 1: one row per reported month with the four DS 40/44/67
/// indices computed from that month alone.
pub fn monthly_indices_report(data: &[Observation], year: i32) -> Vec<MonthlyIndexRow> {
    year_window(data, year)
        .into_iter()
        .map(|obs| {
            let idx = indices_for(obs);
            MonthlyIndexRow {
                month: month_label(obs.month),
                headcount: format_number(obs.headcount, 1),
                hht: format_number(idx.hht, 2),
                accident_rate: format_number(idx.accident_rate, 2),
                severity_rate: format_number(idx.severity_rate, 2),
                frequency_index: format_number(idx.frequency_index, 2),
                gravity_index: format_number(idx.gravity_index, 2),
            }
        })
        .collect()
}

/// Report 2: for each reported month, the indices accumulated over the
/// January-through-that-month window.
pub fn ytd_rollup_report(data: &[Observation], year: i32) -> Vec<YtdRollupRow> {
    year_window(data, year)
        .into_iter()
        .filter_map(|obs| {
            let acc = accumulate(data, year, obs.month_number())?;
            Some(YtdRollupRow {
                month: month_label(obs.month),
                months_observed: acc.months_observed,
                total_accidents: format_number(acc.total_accidents, 0),
                total_lost_days: format_number(acc.total_lost_days, 0),
                total_hht: format_number(acc.total_hht, 2),
                accident_rate: format_number(acc.accident_rate, 2),
                severity_rate: format_number(acc.severity_rate, 2),
                frequency_index: format_number(acc.frequency_index, 2),
                gravity_index: format_number(acc.gravity_index, 2),
            })
        })
        .collect()
}

// Compliance cells render "-" when nothing was planned; a percentage
// against a zero plan has no meaning.
fn pct(executed: f64, planned: f64) -> String {
    if planned <= 0.0 {
        "-".to_string()
    } else {
        format_number(executed / planned * 100.0, 1)
    }
}

/// Report 3: preventive-management compliance per month (inspections,
/// trainings, corrective-action closure, health-surveillance coverage).
pub fn compliance_report(data: &[Observation], year: i32) -> Vec<ComplianceRow> {
    year_window(data, year)
        .into_iter()
        .map(|obs| ComplianceRow {
            month: month_label(obs.month),
            inspections_planned: format_number(obs.inspections_planned, 0),
            inspections_executed: format_number(obs.inspections_executed, 0),
            inspection_compliance: pct(obs.inspections_executed, obs.inspections_planned),
            trainings_planned: format_number(obs.trainings_planned, 0),
            trainings_executed: format_number(obs.trainings_executed, 0),
            training_compliance: pct(obs.trainings_executed, obs.trainings_planned),
            action_closure: pct(obs.actions_closed, obs.actions_open),
            exam_coverage: pct(obs.exams_done, obs.exams_planned),
        })
        .collect()
}

/// Year roll-up for `summary.json`: raw totals, the accumulated indices
/// at the latest reported month, and days elapsed since the most recent
/// recorded accident.
pub fn generate_summary(data: &[Observation], year: i32, today: NaiveDate) -> SummaryStats {
    let window = year_window(data, year);
    let months_reported = window.len();
    let total_accidents: f64 = window.iter().map(|r| r.lost_time_accidents).sum();
    let total_lost_days: f64 = window.iter().map(|r| r.lost_days).sum();
    let total_unsafe_acts: f64 = window.iter().map(|r| r.unsafe_acts).sum();
    let total_unsafe_conditions: f64 = window.iter().map(|r| r.unsafe_conditions).sum();

    let last_accident = window.iter().filter_map(|r| r.last_accident_date).max();
    let days_without_accident = last_accident.map(|d| (today - d).num_days().max(0));

    let latest_month = window.iter().map(|r| r.month_number()).max();
    let acc = latest_month.and_then(|m| accumulate(data, year, m));

    SummaryStats {
        year,
        months_reported,
        total_accidents: total_accidents.round() as i64,
        total_lost_days,
        total_unsafe_acts: total_unsafe_acts.round() as i64,
        total_unsafe_conditions: total_unsafe_conditions.round() as i64,
        days_without_accident,
        accident_rate: acc.as_ref().map(|a| a.accident_rate),
        severity_rate: acc.as_ref().map(|a| a.severity_rate),
        frequency_index: acc.as_ref().map(|a| a.frequency_index),
        gravity_index: acc.as_ref().map(|a| a.gravity_index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: i32, month: u32) -> Observation {
        Observation::empty(NaiveDate::from_ymd_opt(year, month, 1).unwrap())
    }

    fn march_2024() -> Observation {
        let mut obs = record(2024, 3);
        obs.headcount = 22.0;
        obs.absence_hours = 88.0;
        obs.lost_time_accidents = 1.0;
        obs.lost_days = 5.0;
        obs
    }

    #[test]
    fn monthly_report_renders_worked_example() {
        let data = vec![march_2024()];
        let rows = monthly_indices_report(&data, 2024);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].month, "MAR 2024");
        assert_eq!(rows[0].hht, "3,872.00");
        assert_eq!(rows[0].accident_rate, "4.55");
        assert_eq!(rows[0].severity_rate, "22.73");
        assert_eq!(rows[0].frequency_index, "258.26");
    }

    #[test]
    fn monthly_report_filters_by_year() {
        let data = vec![march_2024(), record(2023, 3)];
        assert_eq!(monthly_indices_report(&data, 2024).len(), 1);
        assert_eq!(monthly_indices_report(&data, 2022).len(), 0);
    }

    #[test]
    fn rollup_report_accumulates_progressively() {
        let mut feb = record(2024, 2);
        feb.headcount = 22.0;
        let data = vec![feb, march_2024()];
        let rows = ytd_rollup_report(&data, 2024);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].months_observed, 1);
        assert_eq!(rows[1].months_observed, 2);
        assert_eq!(rows[1].total_accidents, "1");
    }

    #[test]
    fn compliance_report_computes_percentages() {
        let mut obs = record(2024, 1);
        obs.inspections_planned = 4.0;
        obs.inspections_executed = 3.0;
        obs.trainings_planned = 0.0;
        obs.trainings_executed = 0.0;
        obs.actions_open = 10.0;
        obs.actions_closed = 5.0;
        obs.exams_planned = 8.0;
        obs.exams_done = 8.0;
        let rows = compliance_report(&[obs], 2024);
        assert_eq!(rows[0].inspection_compliance, "75.0");
        assert_eq!(rows[0].training_compliance, "-");
        assert_eq!(rows[0].action_closure, "50.0");
        assert_eq!(rows[0].exam_coverage, "100.0");
    }

    #[test]
    fn summary_totals_and_days_without_accident() {
        let mut jan = record(2024, 1);
        jan.lost_time_accidents = 1.0;
        jan.lost_days = 4.0;
        jan.unsafe_acts = 3.0;
        jan.last_accident_date = NaiveDate::from_ymd_opt(2024, 1, 20);
        let mut feb = record(2024, 2);
        feb.lost_time_accidents = 2.0;
        feb.unsafe_conditions = 5.0;
        feb.last_accident_date = NaiveDate::from_ymd_opt(2024, 2, 10);
        let data = vec![jan, feb];

        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let summary = generate_summary(&data, 2024, today);
        assert_eq!(summary.months_reported, 2);
        assert_eq!(summary.total_accidents, 3);
        assert_eq!(summary.total_lost_days, 4.0);
        assert_eq!(summary.total_unsafe_acts, 3);
        assert_eq!(summary.total_unsafe_conditions, 5);
        assert_eq!(summary.days_without_accident, Some(20));
        assert!(summary.frequency_index.is_some());
    }

    #[test]
    fn summary_without_data_has_no_indices() {
        let summary = generate_summary(&[], 2024, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(summary.months_reported, 0);
        assert_eq!(summary.days_without_accident, None);
        assert_eq!(summary.accident_rate, None);
    }
}
