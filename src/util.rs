// Parsing and formatting helpers.
//
// All the forgiving CSV/number/date handling lives here, so the rest of
// the code works on clean typed values. Callers decide what a `None`
// means (skip, warn, or fill with zero); nothing in this module coerces
// silently.
use chrono::{Datelike, NaiveDate};
use num_format::{Locale, ToFormattedString};

/// Parse a string-like value into `f64`, tolerating the formatting noise
/// common in spreadsheet exports.
///
/// - Accepts `Option<&str>` so callers can pass optional cells through.
/// - Trims whitespace and strips `","` thousands separators.
/// - Rejects values containing alphabetic characters.
/// - Returns `None` for anything that cannot be parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(",", "");
    s.parse::<f64>().ok()
}

/// Parse a month cell into the first day of that month.
///
/// Sheets exported from different tools write the period in different
/// shapes, so we try, in order: `YYYY-MM-DD`, `DD/MM/YYYY`, `YYYY-MM`
/// and `MM/YYYY`. Any day-of-month in the first two forms is clamped to
/// the 1st, since records are keyed by month.
pub fn parse_month_safe(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    let full = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"));
    if let Ok(d) = full {
        return d.with_day(1);
    }
    let month_only = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("01/{}", s), "%d/%m/%Y"));
    month_only.ok()
}

/// Parse a plain date cell (`YYYY-MM-DD` or `DD/MM/YYYY`), no clamping.
pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
        .ok()
}

pub fn average(v: &[f64]) -> f64 {
    // Arithmetic mean; 0 for an empty slice to avoid NaNs.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

const MONTH_LABELS: [&str; 12] = [
    "ENE", "FEB", "MAR", "ABR", "MAY", "JUN", "JUL", "AGO", "SEP", "OCT", "NOV", "DIC",
];

/// Short Spanish month label for report rows, e.g. `MAR 2024`.
pub fn month_label(date: NaiveDate) -> String {
    format!("{} {}", MONTH_LABELS[date.month0() as usize], date.year())
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimal places plus thousands separators (`3,872.00`).
    let neg = n.is_sign_negative();
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    } else if decimals > 0 {
        res.push('.');
        res.push_str(&"0".repeat(decimals));
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thousands separators for counts in console messages.
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_f64_safe_handles_spreadsheet_noise() {
        assert_eq!(parse_f64_safe(Some(" 1,234.5 ")), Some(1234.5));
        assert_eq!(parse_f64_safe(Some("22")), Some(22.0));
        assert_eq!(parse_f64_safe(Some("n/a")), None);
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(None), None);
    }

    #[test]
    fn parse_month_safe_accepts_common_shapes() {
        let march = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(parse_month_safe(Some("2024-03-01")), Some(march));
        assert_eq!(parse_month_safe(Some("2024-03-15")), Some(march));
        assert_eq!(parse_month_safe(Some("15/03/2024")), Some(march));
        assert_eq!(parse_month_safe(Some("2024-03")), Some(march));
        assert_eq!(parse_month_safe(Some("03/2024")), Some(march));
        assert_eq!(parse_month_safe(Some("marzo")), None);
    }

    #[test]
    fn month_label_is_spanish_abbreviation() {
        let d = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        assert_eq!(month_label(d), "SEP 2024");
    }

    #[test]
    fn format_number_groups_thousands() {
        assert_eq!(format_number(3872.0, 2), "3,872.00");
        assert_eq!(format_number(-1234.567, 1), "-1,234.6");
        assert_eq!(format_number(0.0, 0), "0");
    }
}
