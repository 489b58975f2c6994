// In-memory table of monthly observations keyed by (year, month), with
// wholesale CSV persistence. Single-user tool: `save` rewrites the file
// from scratch on every change, there is no partial update.
use std::collections::BTreeMap;
use std::error::Error;
use std::path::Path;

use chrono::Datelike;

use crate::columns::Column;
use crate::types::Observation;
use crate::util::{parse_date_safe, parse_f64_safe};

#[derive(Debug, Default)]
pub struct RecordStore {
    records: BTreeMap<(i32, u32), Observation>,
}

impl RecordStore {
    pub fn new() -> RecordStore {
        RecordStore::default()
    }

    /// Build a store from loaded records. On duplicate months the last
    /// one wins; the number of replacements is returned so the loader can
    /// report them.
    pub fn from_records(records: Vec<Observation>) -> (RecordStore, usize) {
        let mut store = RecordStore::new();
        let mut duplicates = 0usize;
        for obs in records {
            if store.upsert(obs) {
                duplicates += 1;
            }
        }
        (store, duplicates)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, year: i32, month: u32) -> Option<&Observation> {
        self.records.get(&(year, month))
    }

    /// Insert or replace the record for the observation's month. Returns
    /// `true` when an existing record was replaced.
    pub fn upsert(&mut self, obs: Observation) -> bool {
        let key = (obs.month.year(), obs.month.month());
        self.records.insert(key, obs).is_some()
    }

    /// Assign one field of an existing record from raw user input.
    ///
    /// Parse failures come back as errors, never as a silent zero: a bad
    /// value in a safety table should stop the edit, not vanish into it.
    pub fn edit(
        &mut self,
        year: i32,
        month: u32,
        column: Column,
        raw: &str,
    ) -> Result<(), Box<dyn Error>> {
        let obs = self
            .records
            .get_mut(&(year, month))
            .ok_or_else(|| format!("no record for {}-{:02}; enter the month first", year, month))?;
        match column {
            Column::Mes => {
                Err("the month key cannot be edited; enter a new record instead".into())
            }
            Column::FechaUltimoAccidente => {
                if raw.trim().is_empty() {
                    obs.last_accident_date = None;
                    return Ok(());
                }
                match parse_date_safe(Some(raw)) {
                    Some(d) => {
                        obs.last_accident_date = Some(d);
                        Ok(())
                    }
                    None => Err(format!("'{}' is not a date (use YYYY-MM-DD)", raw).into()),
                }
            }
            numeric => match parse_f64_safe(Some(raw)) {
                Some(v) => {
                    // Every non-date column is numeric, so the accessor
                    // cannot miss here.
                    if let Some(field) = obs.numeric_field_mut(numeric) {
                        *field = v;
                    }
                    Ok(())
                }
                None => Err(format!("'{}' is not a number", raw).into()),
            },
        }
    }

    pub fn reset(&mut self) {
        self.records.clear();
    }

    /// All records in chronological order.
    pub fn sorted(&self) -> Vec<Observation> {
        self.records.values().cloned().collect()
    }

    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.records.keys().map(|(y, _)| *y).collect();
        years.dedup();
        years
    }

    pub fn latest_month(&self, year: i32) -> Option<u32> {
        self.records
            .keys()
            .filter(|(y, _)| *y == year)
            .map(|(_, m)| *m)
            .max()
    }

    /// Rewrite the whole table to `path` under the canonical headers.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn Error>> {
        let mut wtr = csv::Writer::from_path(path)?;
        wtr.write_record(Column::ALL.iter().map(|c| c.header()))?;
        for obs in self.records.values() {
            let mut row: Vec<String> = Vec::with_capacity(Column::ALL.len());
            for col in Column::ALL {
                row.push(match col {
                    Column::Mes => obs.month.format("%Y-%m-%d").to_string(),
                    Column::FechaUltimoAccidente => obs
                        .last_accident_date
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_default(),
                    numeric => obs
                        .numeric_field(numeric)
                        .map(|v| v.to_string())
                        .unwrap_or_default(),
                });
            }
            wtr.write_record(&row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(year: i32, month: u32, headcount: f64) -> Observation {
        let mut obs = Observation::empty(NaiveDate::from_ymd_opt(year, month, 1).unwrap());
        obs.headcount = headcount;
        obs
    }

    #[test]
    fn upsert_replaces_same_month() {
        let mut store = RecordStore::new();
        assert!(!store.upsert(record(2024, 3, 20.0)));
        assert!(store.upsert(record(2024, 3, 25.0)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(2024, 3).unwrap().headcount, 25.0);
    }

    #[test]
    fn from_records_counts_duplicates() {
        let records = vec![record(2024, 1, 18.0), record(2024, 1, 19.0), record(2024, 2, 19.0)];
        let (store, duplicates) = RecordStore::from_records(records);
        assert_eq!(store.len(), 2);
        assert_eq!(duplicates, 1);
        assert_eq!(store.get(2024, 1).unwrap().headcount, 19.0);
    }

    #[test]
    fn edit_assigns_numeric_field() {
        let (mut store, _) = RecordStore::from_records(vec![record(2024, 3, 20.0)]);
        store.edit(2024, 3, Column::DiasPerdidos, "7").unwrap();
        assert_eq!(store.get(2024, 3).unwrap().lost_days, 7.0);
    }

    #[test]
    fn edit_rejects_bad_input_without_zeroing() {
        let (mut store, _) = RecordStore::from_records(vec![record(2024, 3, 20.0)]);
        store.edit(2024, 3, Column::Dotacion, "veinte").unwrap_err();
        assert_eq!(store.get(2024, 3).unwrap().headcount, 20.0);
    }

    #[test]
    fn edit_rejects_missing_month_and_month_key() {
        let (mut store, _) = RecordStore::from_records(vec![record(2024, 3, 20.0)]);
        assert!(store.edit(2024, 4, Column::Dotacion, "21").is_err());
        assert!(store.edit(2024, 3, Column::Mes, "2024-05-01").is_err());
    }

    #[test]
    fn edit_sets_and_clears_last_accident_date() {
        let (mut store, _) = RecordStore::from_records(vec![record(2024, 3, 20.0)]);
        store
            .edit(2024, 3, Column::FechaUltimoAccidente, "2024-03-12")
            .unwrap();
        assert_eq!(
            store.get(2024, 3).unwrap().last_accident_date,
            NaiveDate::from_ymd_opt(2024, 3, 12)
        );
        store.edit(2024, 3, Column::FechaUltimoAccidente, "").unwrap();
        assert_eq!(store.get(2024, 3).unwrap().last_accident_date, None);
    }

    #[test]
    fn sorted_and_years_are_chronological() {
        let (store, _) = RecordStore::from_records(vec![
            record(2024, 2, 1.0),
            record(2023, 11, 1.0),
            record(2024, 1, 1.0),
        ]);
        let months: Vec<(i32, u32)> = store
            .sorted()
            .iter()
            .map(|o| (o.year(), o.month_number()))
            .collect();
        assert_eq!(months, vec![(2023, 11), (2024, 1), (2024, 2)]);
        assert_eq!(store.years(), vec![2023, 2024]);
        assert_eq!(store.latest_month(2024), Some(2));
        assert_eq!(store.latest_month(2022), None);
    }

    #[test]
    fn reset_clears_everything() {
        let (mut store, _) = RecordStore::from_records(vec![record(2024, 1, 5.0)]);
        store.reset();
        assert!(store.is_empty());
    }
}
