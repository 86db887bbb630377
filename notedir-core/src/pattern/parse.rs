//! Pattern-driven date parsing.
//!
//! Two modes: strict (every token must consume its exact shape and the whole
//! input must be matched) and loose (numeric fields are fished out of the
//! input, everything else is skipped). Loose parsing exists only as the
//! fallback for self-contradictory week formats.

use chrono::{NaiveDate, Weekday};

use super::{MONTH_NAMES, Token, WEEKDAY_NAMES, tokenize};

#[derive(Debug, Default, Clone, Copy)]
struct Fields {
    year: Option<i32>,
    week_year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    week: Option<u32>,
    quarter: Option<u32>,
}

/// Parse `input` against `pattern`, requiring an exact match.
///
/// Returns `None` when the input does not fully match or the matched fields
/// do not name a real calendar date.
pub fn parse_strict(input: &str, pattern: &str) -> Option<NaiveDate> {
    let chars: Vec<char> = input.chars().collect();
    let mut pos = 0;
    let mut fields = Fields::default();

    for token in tokenize(pattern) {
        match token {
            Token::Literal(text) => {
                for expected in text.chars() {
                    if chars.get(pos) != Some(&expected) {
                        return None;
                    }
                    pos += 1;
                }
            }
            Token::Year4 => fields.year = Some(take_digits_exact(&chars, &mut pos, 4)? as i32),
            Token::Year2 => {
                fields.year = Some(expand_two_digit_year(take_digits_exact(&chars, &mut pos, 2)?))
            }
            Token::WeekYear4 => {
                fields.week_year = Some(take_digits_exact(&chars, &mut pos, 4)? as i32)
            }
            Token::WeekYear2 => {
                fields.week_year =
                    Some(expand_two_digit_year(take_digits_exact(&chars, &mut pos, 2)?))
            }
            Token::MonthFull => {
                fields.month = Some(take_name(&chars, &mut pos, &MONTH_NAMES, false)? as u32 + 1)
            }
            Token::MonthAbbrev => {
                fields.month = Some(take_name(&chars, &mut pos, &MONTH_NAMES, true)? as u32 + 1)
            }
            Token::Month2 => fields.month = Some(take_digits_exact(&chars, &mut pos, 2)?),
            Token::Month1 => fields.month = Some(take_digits_flex(&chars, &mut pos, 2)?),
            Token::Day2 => fields.day = Some(take_digits_exact(&chars, &mut pos, 2)?),
            Token::Day1 => fields.day = Some(take_digits_flex(&chars, &mut pos, 2)?),
            Token::WeekdayFull => {
                take_name(&chars, &mut pos, &WEEKDAY_NAMES, false)?;
            }
            Token::WeekdayAbbrev => {
                take_name(&chars, &mut pos, &WEEKDAY_NAMES, true)?;
            }
            Token::WeekdayNum => {
                take_digits_exact(&chars, &mut pos, 1)?;
            }
            Token::Week2 => fields.week = Some(take_digits_exact(&chars, &mut pos, 2)?),
            Token::Week1 => fields.week = Some(take_digits_flex(&chars, &mut pos, 2)?),
            Token::Quarter => {
                let quarter = take_digits_exact(&chars, &mut pos, 1)?;
                if !(1..=4).contains(&quarter) {
                    return None;
                }
                fields.quarter = Some(quarter);
            }
            Token::Hour2 | Token::Minute2 | Token::Second2 => {
                take_digits_exact(&chars, &mut pos, 2)?;
            }
            Token::Hour1 | Token::Minute1 | Token::Second1 => {
                take_digits_flex(&chars, &mut pos, 2)?;
            }
            Token::AmPmUpper | Token::AmPmLower => {
                take_name(&chars, &mut pos, &["am", "pm"], false)?;
            }
        }
    }

    if pos != chars.len() {
        return None;
    }
    resolve(&fields)
}

/// Parse `input` against `pattern`, taking whatever numeric fields can be
/// found in order and ignoring everything else. Trailing input is allowed.
pub fn parse_loose(input: &str, pattern: &str) -> Option<NaiveDate> {
    let chars: Vec<char> = input.chars().collect();
    let mut pos = 0;
    let mut fields = Fields::default();

    for token in tokenize(pattern) {
        let width = match token {
            Token::Year4 | Token::WeekYear4 => 4,
            Token::Year2 | Token::WeekYear2 | Token::Month2 | Token::Month1 | Token::Day2
            | Token::Day1 | Token::Week2 | Token::Week1 => 2,
            Token::Quarter => 1,
            // Names, literals and time of day contribute nothing here.
            _ => continue,
        };

        skip_to_digit(&chars, &mut pos);
        let Some(value) = take_digits_flex(&chars, &mut pos, width) else {
            continue;
        };
        match token {
            Token::Year4 => fields.year = Some(value as i32),
            Token::Year2 => fields.year = Some(expand_two_digit_year(value)),
            Token::WeekYear4 => fields.week_year = Some(value as i32),
            Token::WeekYear2 => fields.week_year = Some(expand_two_digit_year(value)),
            Token::Month2 | Token::Month1 => fields.month = Some(value),
            Token::Day2 | Token::Day1 => fields.day = Some(value),
            Token::Week2 | Token::Week1 => fields.week = Some(value),
            Token::Quarter => {
                if (1..=4).contains(&value) {
                    fields.quarter = Some(value);
                }
            }
            _ => unreachable!(),
        }
    }

    resolve(&fields)
}

/// Turn matched fields into a date. Month/day fields win over week fields;
/// week fields yield the Monday of the ISO week; a quarter yields its first
/// day; a bare year yields January 1.
fn resolve(fields: &Fields) -> Option<NaiveDate> {
    let Fields { year, week_year, month, day, week, quarter } = *fields;

    if month.is_some() || day.is_some() {
        let year = year.or(week_year)?;
        let month = month.unwrap_or_else(|| quarter.map_or(1, quarter_start_month));
        return NaiveDate::from_ymd_opt(year, month, day.unwrap_or(1));
    }
    if let Some(week) = week {
        let year = week_year.or(year)?;
        return NaiveDate::from_isoywd_opt(year, week, Weekday::Mon);
    }
    if let Some(quarter) = quarter {
        let year = year.or(week_year)?;
        return NaiveDate::from_ymd_opt(year, quarter_start_month(quarter), 1);
    }
    let year = year.or(week_year)?;
    NaiveDate::from_ymd_opt(year, 1, 1)
}

fn quarter_start_month(quarter: u32) -> u32 {
    (quarter - 1) * 3 + 1
}

/// Two-digit years follow the usual 69 cutoff: 68 is 2068, 69 is 1969.
fn expand_two_digit_year(value: u32) -> i32 {
    if value < 69 { 2000 + value as i32 } else { 1900 + value as i32 }
}

fn take_digits_exact(chars: &[char], pos: &mut usize, len: usize) -> Option<u32> {
    if *pos + len > chars.len() {
        return None;
    }
    let slice = &chars[*pos..*pos + len];
    if !slice.iter().all(|c| c.is_ascii_digit()) {
        return None;
    }
    *pos += len;
    slice.iter().collect::<String>().parse().ok()
}

fn take_digits_flex(chars: &[char], pos: &mut usize, max: usize) -> Option<u32> {
    let mut len = 0;
    while len < max && *pos + len < chars.len() && chars[*pos + len].is_ascii_digit() {
        len += 1;
    }
    if len == 0 {
        return None;
    }
    let value = chars[*pos..*pos + len].iter().collect::<String>().parse().ok();
    *pos += len;
    value
}

fn skip_to_digit(chars: &[char], pos: &mut usize) {
    while *pos < chars.len() && !chars[*pos].is_ascii_digit() {
        *pos += 1;
    }
}

/// Match one of `names` (or its three-letter abbreviation) case-insensitively,
/// returning its index.
fn take_name(chars: &[char], pos: &mut usize, names: &[&str], abbrev: bool) -> Option<usize> {
    for (idx, name) in names.iter().enumerate() {
        let wanted: String = if abbrev { name.chars().take(3).collect() } else { (*name).to_string() };
        let len = wanted.chars().count();
        if *pos + len > chars.len() {
            continue;
        }
        let have: String = chars[*pos..*pos + len].iter().collect();
        if have.eq_ignore_ascii_case(&wanted) {
            *pos += len;
            return Some(idx);
        }
    }
    None
}
