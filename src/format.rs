use chrono::{NaiveDateTime, NaiveTime};

// ---------------------------------------------------------------------------
// Number formatting for KPI cards and the data table
// ---------------------------------------------------------------------------

/// Round to a whole number and group digits by thousands: `1234567.4` → `1,234,567`.
pub fn format_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Money with a leading symbol and no decimals, e.g. `৳ 1,300`.
pub fn format_currency(symbol: &str, value: f64) -> String {
    format!("{symbol} {}", format_thousands(value))
}

/// Table cell for an amount: two decimals, trailing zeros dropped.
pub fn format_amount(value: f64) -> String {
    let s = format!("{value:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Date cell: date-only values (stored at midnight) print without a time.
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    if ts.time() == NaiveTime::MIN {
        ts.format("%Y-%m-%d").to_string()
    } else {
        ts.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_grouping() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(999.0), "999");
        assert_eq!(format_thousands(1300.0), "1,300");
        assert_eq!(format_thousands(1234567.4), "1,234,567");
        assert_eq!(format_thousands(999.5), "1,000");
    }

    #[test]
    fn negative_values_keep_their_sign() {
        assert_eq!(format_thousands(-1500.0), "-1,500");
        assert_eq!(format_thousands(-0.2), "0");
    }

    #[test]
    fn currency() {
        assert_eq!(format_currency("৳", 1300.0), "৳ 1,300");
        assert_eq!(format_currency("৳", 650.0), "৳ 650");
        assert_eq!(format_currency("$", 0.0), "$ 0");
    }

    #[test]
    fn amounts() {
        assert_eq!(format_amount(500.0), "500");
        assert_eq!(format_amount(99.5), "99.5");
        assert_eq!(format_amount(12.346), "12.35");
    }

    #[test]
    fn timestamps() {
        let day = chrono::NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(format_timestamp(day.and_hms_opt(0, 0, 0).unwrap()), "2024-01-05");
        assert_eq!(
            format_timestamp(day.and_hms_opt(14, 30, 5).unwrap()),
            "2024-01-05 14:30:05"
        );
    }
}
