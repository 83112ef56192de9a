//! Форматирование значений ячеек и карточек.

use chrono::NaiveDate;

/// Groups digits by three with a non-breaking space: `1234567` → `1 234 567`.
pub fn format_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('\u{00a0}');
        }
        grouped.push(ch);
    }
    if n < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Fixed decimals with grouped integer part and a comma separator.
pub fn format_amount(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };
    let int_value: i64 = int_part.parse().unwrap_or(0);
    let sign = if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{}{},{}", sign, format_thousands(int_value), frac),
        None => format!("{}{}", sign, format_thousands(int_value)),
    }
}

pub fn format_money(value: f64) -> String {
    format_amount(value, 2)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1\u{00a0}000");
        assert_eq!(format_thousands(-1234567), "-1\u{00a0}234\u{00a0}567");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(1234.5), "1\u{00a0}234,50");
        assert_eq!(format_money(0.0), "0,00");
        assert_eq!(format_money(-85000.0), "-85\u{00a0}000,00");
        assert_eq!(format_money(-0.001), "0,00");
    }

    #[test]
    fn test_format_amount_without_decimals() {
        assert_eq!(format_amount(1234.6, 0), "1\u{00a0}235");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(format_date(date), "05.03.2024");
    }
}
