//! Pattern-driven date formatting.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use super::{MONTH_NAMES, Token, WEEKDAY_NAMES, tokenize};

/// Format a date against a pattern, with the time of day fixed at midnight.
pub fn format_date(date: NaiveDate, pattern: &str) -> String {
    // Midnight always exists.
    format_datetime(date.and_hms_opt(0, 0, 0).unwrap(), pattern)
}

/// Format a datetime against a pattern.
pub fn format_datetime(datetime: NaiveDateTime, pattern: &str) -> String {
    let date = datetime.date();
    let mut out = String::new();

    for token in tokenize(pattern) {
        match token {
            Token::Year4 => out.push_str(&format!("{:04}", date.year())),
            Token::Year2 => out.push_str(&format!("{:02}", date.year().rem_euclid(100))),
            Token::WeekYear4 => out.push_str(&format!("{:04}", date.iso_week().year())),
            Token::WeekYear2 => {
                out.push_str(&format!("{:02}", date.iso_week().year().rem_euclid(100)))
            }
            Token::MonthFull => out.push_str(MONTH_NAMES[date.month0() as usize]),
            Token::MonthAbbrev => out.push_str(&MONTH_NAMES[date.month0() as usize][..3]),
            Token::Month2 => out.push_str(&format!("{:02}", date.month())),
            Token::Month1 => out.push_str(&date.month().to_string()),
            Token::Day2 => out.push_str(&format!("{:02}", date.day())),
            Token::Day1 => out.push_str(&date.day().to_string()),
            Token::WeekdayFull => {
                out.push_str(WEEKDAY_NAMES[date.weekday().num_days_from_monday() as usize])
            }
            Token::WeekdayAbbrev => {
                out.push_str(&WEEKDAY_NAMES[date.weekday().num_days_from_monday() as usize][..3])
            }
            Token::WeekdayNum => {
                out.push_str(&date.weekday().num_days_from_sunday().to_string())
            }
            Token::Week2 => out.push_str(&format!("{:02}", date.iso_week().week())),
            Token::Week1 => out.push_str(&date.iso_week().week().to_string()),
            Token::Quarter => out.push_str(&(date.month0() / 3 + 1).to_string()),
            Token::Hour2 => out.push_str(&format!("{:02}", datetime.hour())),
            Token::Hour1 => out.push_str(&datetime.hour().to_string()),
            Token::Minute2 => out.push_str(&format!("{:02}", datetime.minute())),
            Token::Minute1 => out.push_str(&datetime.minute().to_string()),
            Token::Second2 => out.push_str(&format!("{:02}", datetime.second())),
            Token::Second1 => out.push_str(&datetime.second().to_string()),
            Token::AmPmUpper => out.push_str(if datetime.hour() < 12 { "AM" } else { "PM" }),
            Token::AmPmLower => out.push_str(if datetime.hour() < 12 { "am" } else { "pm" }),
            Token::Literal(text) => out.push_str(&text),
        }
    }
    out
}
