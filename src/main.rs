// Entry point and high-level CLI flow.
//
// - Option [1] loads the monthly SST table from CSV, printing the load
//   diagnostics (skipped rows, coerced cells, backfilled columns).
// - Option [2] generates the three reports and a JSON summary for a year.
// - Options [3]-[5] mutate the table (form entry, single-field edit,
//   reset); every mutation rewrites the data file wholesale.
mod accumulate;
mod columns;
mod indices;
mod loader;
mod output;
mod reports;
mod store;
mod types;
mod util;

use chrono::Datelike;
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::sync::Mutex;

use store::RecordStore;
use types::Observation;

const DEFAULT_DATA_FILE: &str = "indicadores_sst.csv";

// In-memory app state so the table is loaded once but can be reported on
// and edited repeatedly in a single run.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| {
    Mutex::new(AppState {
        store: RecordStore::new(),
        path: DEFAULT_DATA_FILE.to_string(),
    })
});

struct AppState {
    store: RecordStore,
    path: String,
}

/// Print a prompt and read one trimmed line from stdin.
fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

fn read_choice() -> String {
    read_line("Enter choice: ")
}

/// Ask whether to go back to the menu after generating reports.
///
/// Returns `true` for `Y`, `false` for `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        match read_line("Back to menu (Y/N): ").to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Handle option [1]: load the CSV table and print the load diagnostics.
fn handle_load() {
    let path = {
        let prompt = format!("CSV file [{}]: ", DEFAULT_DATA_FILE);
        let entered = read_line(&prompt);
        if entered.is_empty() {
            DEFAULT_DATA_FILE.to_string()
        } else {
            entered
        }
    };
    match loader::load(&path) {
        Ok((store, report)) => {
            println!(
                "Processing table... ({} rows read, {} months loaded)",
                util::format_int(report.total_rows as i64),
                util::format_int(report.loaded_rows as i64)
            );
            if report.skipped_rows > 0 {
                println!(
                    "Note: {} rows skipped for lack of a valid MES.",
                    util::format_int(report.skipped_rows as i64)
                );
            }
            if report.duplicate_months > 0 {
                println!(
                    "Note: {} duplicate months; kept the last row of each.",
                    util::format_int(report.duplicate_months as i64)
                );
            }
            if !report.missing_columns.is_empty() {
                println!(
                    "Warning: missing columns filled with zero: {}",
                    report.missing_columns.join(", ")
                );
            }
            if !report.derived_columns.is_empty() {
                println!(
                    "Info: ignored derived columns (indices are recomputed): {}",
                    report.derived_columns.join(", ")
                );
            }
            if !report.unknown_columns.is_empty() {
                println!("Info: unrecognized columns: {}", report.unknown_columns.join(", "));
            }
            if report.coerced_values > 0 {
                println!(
                    "Warning: {} cells could not be parsed and were stored as zero:",
                    util::format_int(report.coerced_values as i64)
                );
                for w in report.warnings.iter().take(5) {
                    println!("  row {}, {}: '{}'", w.row, w.column, w.value);
                }
                if report.warnings.len() > 5 {
                    println!("  ...and {} more.", report.warnings.len() - 5);
                }
            }
            println!();
            let mut state = APP_STATE.lock().unwrap();
            state.store = store;
            state.path = path;
        }
        Err(e) => {
            eprintln!("Failed to load file: {}\n", e);
        }
    }
}

/// Pick the reporting year: the one the user typed, or the latest year
/// in the table when the input is empty or not a number.
fn prompt_year(years: &[i32]) -> i32 {
    let latest = *years.last().unwrap_or(&0);
    let listed: Vec<String> = years.iter().map(|y| y.to_string()).collect();
    let entered = read_line(&format!("Year (available: {}) [{}]: ", listed.join(", "), latest));
    entered.parse::<i32>().unwrap_or(latest)
}

/// Handle option [2]: generate the three reports and the JSON summary.
///
/// Side-effectful on purpose: writes three CSV files and summary.json,
/// and prints markdown previews of each report.
fn handle_generate_reports() {
    let (data, years) = {
        let state = APP_STATE.lock().unwrap();
        (state.store.sorted(), state.store.years())
    };
    if data.is_empty() {
        println!("Error: No data loaded. Load the CSV file first (option 1).\n");
        return;
    }
    let year = prompt_year(&years);

    println!("\nGenerating reports for {}...\n", year);

    let r1 = reports::monthly_indices_report(&data, year);
    let file1 = "report1_indicadores_mensuales.csv";
    if let Err(e) = output::write_csv(file1, &r1) {
        eprintln!("Write error: {}", e);
    }
    println!("Report 1: Monthly Safety Indices");
    output::preview_table_rows(&r1, 3);
    println!("(Full table exported to {})\n", file1);

    let r2 = reports::ytd_rollup_report(&data, year);
    let file2 = "report2_acumulado_anual.csv";
    if let Err(e) = output::write_csv(file2, &r2) {
        eprintln!("Write error: {}", e);
    }
    println!("Report 2: Year-to-Date Accumulated Indices");
    output::preview_table_rows(&r2, 3);
    println!("(Full table exported to {})\n", file2);

    let r3 = reports::compliance_report(&data, year);
    let file3 = "report3_gestion_preventiva.csv";
    if let Err(e) = output::write_csv(file3, &r3) {
        eprintln!("Write error: {}", e);
    }
    println!("Report 3: Preventive Management Compliance");
    output::preview_table_rows(&r3, 3);
    println!("(Full table exported to {})\n", file3);

    let today = chrono::Local::now().date_naive();
    let summary = reports::generate_summary(&data, year, today);
    if let Err(e) = output::write_json("summary.json", &summary) {
        eprintln!("Write error: {}", e);
    }
    println!("Summary Stats (summary.json):");
    println!(
        "  Accidents: {} | Lost days: {} | Unsafe acts: {} | Unsafe conditions: {}",
        util::format_int(summary.total_accidents),
        util::format_number(summary.total_lost_days, 0),
        util::format_int(summary.total_unsafe_acts),
        util::format_int(summary.total_unsafe_conditions)
    );
    if let Some(d) = summary.days_without_accident {
        println!("  Days without accidents: {}", util::format_int(d));
    }
    if let (Some(fi), Some(ig)) = (summary.frequency_index, summary.gravity_index) {
        println!(
            "  YTD frequency index: {} | YTD gravity index: {}",
            util::format_number(fi, 2),
            util::format_number(ig, 2)
        );
    }
    println!();
}

/// Prompt one numeric cell; bad input is reported and stored as zero so
/// a typo never aborts a half-entered form.
fn prompt_count(label: &str) -> f64 {
    let raw = read_line(&format!("{}: ", label));
    if raw.is_empty() {
        return 0.0;
    }
    match util::parse_f64_safe(Some(&raw)) {
        Some(v) => v,
        None => {
            println!("Warning: '{}' is not a number; stored as 0.", raw);
            0.0
        }
    }
}

/// Handle option [3]: enter (or re-enter) a full monthly record.
fn handle_enter_record() {
    let raw_month = read_line("Month (YYYY-MM): ");
    let Some(month) = util::parse_month_safe(Some(&raw_month)) else {
        println!("Invalid month '{}'.\n", raw_month);
        return;
    };

    let mut obs = Observation::empty(month);
    for col in columns::Column::NUMERIC {
        if let Some(field) = obs.numeric_field_mut(col) {
            *field = prompt_count(col.header());
        }
    }
    let raw_date = read_line("FECHA ULTIMO ACCIDENTE (optional, YYYY-MM-DD): ");
    if !raw_date.is_empty() {
        match util::parse_date_safe(Some(&raw_date)) {
            Some(d) => obs.last_accident_date = Some(d),
            None => println!("Warning: '{}' is not a date; left empty.", raw_date),
        }
    }

    let idx = indices::indices_for(&obs);
    println!(
        "\n{}: HHT {} | frequency {} | gravity {}",
        util::month_label(obs.month),
        util::format_number(idx.hht, 2),
        util::format_number(idx.frequency_index, 2),
        util::format_number(idx.gravity_index, 2)
    );

    let mut state = APP_STATE.lock().unwrap();
    if state.store.upsert(obs) {
        println!("Replaced the existing record for that month.");
    }
    save_table(&state);
    println!();
}

/// Handle option [4]: edit one field of an existing record.
fn handle_edit_field() {
    let raw_month = read_line("Month (YYYY-MM): ");
    let Some(month) = util::parse_month_safe(Some(&raw_month)) else {
        println!("Invalid month '{}'.\n", raw_month);
        return;
    };
    let raw_col = read_line("Column: ");
    let Some(col) = columns::resolve(&raw_col) else {
        println!("Unknown column '{}'.\n", raw_col);
        return;
    };
    let value = read_line("New value: ");

    let mut state = APP_STATE.lock().unwrap();
    match state.store.edit(month.year(), month.month(), col, &value) {
        Ok(()) => {
            save_table(&state);
            println!("Updated {} for {}.\n", col.header(), util::month_label(month));
        }
        Err(e) => println!("Edit rejected: {}\n", e),
    }
}

/// Handle option [5]: wipe the table after a Y/N confirmation.
fn handle_reset() {
    match read_line("Reset the whole dataset? (Y/N): ").to_uppercase().as_str() {
        "Y" => {
            let mut state = APP_STATE.lock().unwrap();
            state.store.reset();
            save_table(&state);
            println!("Dataset cleared.\n");
        }
        _ => println!("Reset cancelled.\n"),
    }
}

/// Rewrite the backing CSV from the in-memory table.
fn save_table(state: &AppState) {
    match state.store.save(&state.path) {
        Ok(()) => println!("Table saved to {}.", state.path),
        Err(e) => eprintln!("Save error: {}", e),
    }
}

fn main() {
    loop {
        println!("SST Indicator Console:");
        println!("[1] Load the data file");
        println!("[2] Generate reports");
        println!("[3] Enter a monthly record");
        println!("[4] Edit one field of a record");
        println!("[5] Reset the dataset\n");
        match read_choice().as_str() {
            "1" => {
                handle_load();
            }
            "2" => {
                println!();
                handle_generate_reports();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            "3" => {
                handle_enter_record();
            }
            "4" => {
                handle_edit_field();
            }
            "5" => {
                handle_reset();
            }
            _ => {
                println!("Invalid choice. Please enter 1-5.\n");
            }
        }
    }
}
