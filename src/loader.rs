use std::error::Error;
use std::io;
use std::path::Path;

use csv::ReaderBuilder;
use std::collections::HashMap;

use crate::columns::{self, Column};
use crate::store::RecordStore;
use crate::types::Observation;
use crate::util::{parse_date_safe, parse_f64_safe, parse_month_safe};

/// One cell the loader could not take at face value.
#[derive(Debug, Clone)]
pub struct LoadWarning {
    /// 1-based row in the file, counting the header as row 1.
    pub row: usize,
    pub column: &'static str,
    pub value: String,
}

/// What happened during a load. Unparseable numerics still end up as
/// zero so the report can render, but every coercion is counted and
/// carried here instead of disappearing silently.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    /// Rows dropped for lack of a parseable MES.
    pub skipped_rows: usize,
    /// Months that appeared more than once; the last row wins.
    pub duplicate_months: usize,
    /// Non-empty cells coerced to zero (or to an empty date).
    pub coerced_values: usize,
    /// Canonical columns absent from the header, backfilled with zero.
    pub missing_columns: Vec<&'static str>,
    /// Headers we did not recognize at all.
    pub unknown_columns: Vec<String>,
    /// Derived-index columns present in the input; ignored, indices are
    /// recomputed from the base fields.
    pub derived_columns: Vec<String>,
    pub warnings: Vec<LoadWarning>,
}

pub fn load<P: AsRef<Path>>(path: P) -> Result<(RecordStore, LoadReport), Box<dyn Error>> {
    let rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    load_from_reader(rdr)
}

pub fn load_from_reader<R: io::Read>(
    mut rdr: csv::Reader<R>,
) -> Result<(RecordStore, LoadReport), Box<dyn Error>> {
    let mut report = LoadReport::default();

    // Fuzzy header resolution: trim/case/accent variants and the known
    // misspellings all land on their canonical column.
    let mut positions: HashMap<Column, usize> = HashMap::new();
    for (idx, raw) in rdr.headers()?.iter().enumerate() {
        if let Some(col) = columns::resolve(raw) {
            // First occurrence wins if a header repeats.
            positions.entry(col).or_insert(idx);
        } else if columns::is_derived(raw) {
            report.derived_columns.push(raw.trim().to_string());
        } else if !columns::is_junk(raw) && !raw.trim().is_empty() {
            report.unknown_columns.push(raw.trim().to_string());
        }
    }

    if !positions.contains_key(&Column::Mes) {
        return Err("input file has no MES column; cannot key records by month".into());
    }
    for col in Column::ALL {
        if col != Column::Mes && !positions.contains_key(&col) {
            report.missing_columns.push(col.header());
        }
    }

    let mut records: Vec<Observation> = Vec::new();
    for result in rdr.records() {
        report.total_rows += 1;
        let row_no = report.total_rows + 1;
        let record = match result {
            Ok(r) => r,
            Err(_) => {
                report.skipped_rows += 1;
                report.warnings.push(LoadWarning {
                    row: row_no,
                    column: "(row)",
                    value: "unreadable row".to_string(),
                });
                continue;
            }
        };
        let cell = |col: Column| positions.get(&col).and_then(|i| record.get(*i));

        let raw_month = cell(Column::Mes).unwrap_or("");
        let month = match parse_month_safe(Some(raw_month)) {
            Some(m) => m,
            None => {
                report.skipped_rows += 1;
                report.warnings.push(LoadWarning {
                    row: row_no,
                    column: Column::Mes.header(),
                    value: raw_month.to_string(),
                });
                continue;
            }
        };

        let mut obs = Observation::empty(month);
        for col in Column::NUMERIC {
            let raw = match cell(col) {
                Some(v) => v,
                None => continue, // backfilled column stays at zero
            };
            if raw.trim().is_empty() {
                continue;
            }
            match parse_f64_safe(Some(raw)) {
                Some(v) => {
                    if let Some(field) = obs.numeric_field_mut(col) {
                        *field = v;
                    }
                }
                None => {
                    report.coerced_values += 1;
                    report.warnings.push(LoadWarning {
                        row: row_no,
                        column: col.header(),
                        value: raw.to_string(),
                    });
                }
            }
        }

        if let Some(raw) = cell(Column::FechaUltimoAccidente) {
            if !raw.trim().is_empty() {
                match parse_date_safe(Some(raw)) {
                    Some(d) => obs.last_accident_date = Some(d),
                    None => {
                        report.coerced_values += 1;
                        report.warnings.push(LoadWarning {
                            row: row_no,
                            column: Column::FechaUltimoAccidente.header(),
                            value: raw.to_string(),
                        });
                    }
                }
            }
        }

        records.push(obs);
    }

    let (store, duplicates) = RecordStore::from_records(records);
    report.duplicate_months = duplicates;
    report.loaded_rows = store.len();
    Ok((store, report))
}
