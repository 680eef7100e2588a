//! Display Formatting
//!
//! Numbers and dates are shown the way a Chilean locale (es-CL) prints them:
//! `.` groups thousands, `,` separates decimals, months are Spanish.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

const MONTHS_SHORT: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

const MONTHS_LONG: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Format a number with between `min_frac` and `max_frac` decimals
///
/// Rounds half away from zero at `max_frac`, then drops trailing zeros down
/// to `min_frac`.
pub fn format_number(value: f64, min_frac: usize, max_frac: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let max_frac = max_frac.max(min_frac);
    let factor = 10f64.powi(max_frac as i32);
    let rounded = (value.abs() * factor).round() / factor;

    let fixed = format!("{:.*}", max_frac, rounded);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, f),
        None => (fixed.as_str(), ""),
    };

    let mut frac = frac_part.to_string();
    while frac.len() > min_frac && frac.ends_with('0') {
        frac.pop();
    }

    let mut out = String::new();
    if value < 0.0 && rounded != 0.0 {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac.is_empty() {
        out.push(',');
        out.push_str(&frac);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// Format an indicator value with its unit
///
/// - missing value → `"-"`
/// - `CLP` → `"$1.234,50"`
/// - `%` → `"3,20%"`
/// - other units → `"1,05 USD"`
pub fn format_currency(value: Option<f64>, unit: Option<&str>) -> String {
    let Some(value) = value else {
        return "-".to_string();
    };

    let formatted = format_number(value, 2, 2);

    match unit {
        Some("CLP") => format!("${}", formatted),
        Some("%") => format!("{}%", formatted),
        Some(unit) if !unit.is_empty() => format!("{} {}", formatted, unit),
        _ => formatted,
    }
}

/// Axis tick label: 0 to 2 decimals
pub fn format_axis_value(value: f64) -> String {
    format_number(value, 0, 2)
}

/// `dd-mm-yyyy`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// Chart x-axis label, e.g. `"05 ene"`
pub fn format_short_date(date: NaiveDate) -> String {
    format!("{:02} {}", date.day(), MONTHS_SHORT[date.month0() as usize])
}

/// Last-update stamp, e.g. `"16 de octubre de 2026, 14:30"`
pub fn format_last_update(at: NaiveDateTime) -> String {
    format!(
        "{} de {} de {}, {:02}:{:02}",
        at.day(),
        MONTHS_LONG[at.month0() as usize],
        at.year(),
        at.hour(),
        at.minute()
    )
}

/// Percent change from `previous` to `current`
///
/// Returns 0 when there is no previous value or it is zero.
pub fn calculate_change(current: f64, previous: Option<f64>) -> f64 {
    match previous {
        Some(prev) if prev != 0.0 => (current - prev) / prev * 100.0,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency_clp() {
        assert_eq!(format_currency(Some(1234.5), Some("CLP")), "$1.234,50");
        assert_eq!(format_currency(Some(39500.123), Some("CLP")), "$39.500,12");
        assert_eq!(format_currency(Some(0.0), Some("CLP")), "$0,00");
    }

    #[test]
    fn test_format_currency_percent() {
        assert_eq!(format_currency(Some(3.2), Some("%")), "3,20%");
        assert_eq!(format_currency(Some(-0.4), Some("%")), "-0,40%");
    }

    #[test]
    fn test_format_currency_other_units() {
        assert_eq!(format_currency(Some(1.05), Some("USD")), "1,05 USD");
        assert_eq!(format_currency(Some(1000000.0), None), "1.000.000,00");
        assert_eq!(format_currency(Some(12.0), Some("")), "12,00");
    }

    #[test]
    fn test_format_currency_missing() {
        assert_eq!(format_currency(None, Some("CLP")), "-");
        assert_eq!(format_currency(None, None), "-");
    }

    #[test]
    fn test_format_number_fraction_bounds() {
        assert_eq!(format_number(1234.0, 0, 2), "1.234");
        assert_eq!(format_number(1234.5, 0, 2), "1.234,5");
        assert_eq!(format_number(1234.567, 0, 2), "1.234,57");
        assert_eq!(format_number(999.999, 0, 2), "1.000");
        assert_eq!(format_number(-0.001, 0, 2), "0");
        assert_eq!(format_number(123.0, 2, 2), "123,00");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1234"), "1.234");
        assert_eq!(group_thousands("1234567"), "1.234.567");
    }

    #[test]
    fn test_dates() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(format_date(date), "05-01-2026");
        assert_eq!(format_short_date(date), "05 ene");

        let at = date.and_hms_opt(9, 7, 0).unwrap();
        assert_eq!(format_last_update(at), "5 de enero de 2026, 09:07");
    }

    #[test]
    fn test_calculate_change() {
        assert_eq!(calculate_change(110.0, Some(100.0)), 10.0);
        assert_eq!(calculate_change(90.0, Some(100.0)), -10.0);
        assert_eq!(calculate_change(5.0, Some(0.0)), 0.0);
        assert_eq!(calculate_change(5.0, None), 0.0);
    }
}
