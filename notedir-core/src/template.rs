//! Template placeholder expansion.
//!
//! Placeholders are `{{...}}` blocks, substituted independently in one
//! left-to-right pass. Unrecognized blocks are left verbatim. Grammar:
//!
//! ```text
//! {{date}}        the new note's filename
//! {{title}}       the new note's filename
//! {{time}}        creation time of day, HH:mm
//! {{date+3d:MM-DD}} / {{time-1h}}
//!                 target date at the creation time of day, shifted by a
//!                 signed offset (units y q m w d h s), rendered with the
//!                 custom format after `:` (default: the note format)
//! {{yesterday}} / {{tomorrow}}
//!                 target date ± one day, in the note format
//! {{monday:DD}} ... {{sunday:DD}}
//!                 (week notes only) that weekday of the target week
//! ```

use chrono::{Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};

use crate::granularity::Granularity;
use crate::pattern;

pub(crate) struct TemplateContext<'a> {
    /// Date the note is being created for.
    pub date: NaiveDate,
    /// Time of day at the creation instant.
    pub now: NaiveTime,
    /// The formatted filename (without folder or extension).
    pub filename: &'a str,
    /// The resolved note format.
    pub format: &'a str,
    pub granularity: Granularity,
}

/// Expand every `{{...}}` placeholder in `template`.
pub(crate) fn expand(template: &str, ctx: &TemplateContext) -> String {
    let mut out = String::new();
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            // Unterminated block; emit the tail as-is.
            out.push_str(&rest[start..]);
            return out;
        };
        let body = &after[..end];
        match substitute(body, ctx) {
            Some(replacement) => out.push_str(&replacement),
            None => {
                out.push_str("{{");
                out.push_str(body);
                out.push_str("}}");
            }
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

fn substitute(body: &str, ctx: &TemplateContext) -> Option<String> {
    let body = body.trim();
    let (head, custom) = match body.find(':') {
        Some(idx) => (body[..idx].trim(), Some(body[idx + 1..].trim())),
        None => (body, None),
    };
    let (key, offset) = split_offset(head)?;

    match key.to_ascii_lowercase().as_str() {
        "date" if offset.is_none() && custom.is_none() => Some(ctx.filename.to_string()),
        "time" if offset.is_none() && custom.is_none() => {
            Some(ctx.now.format("%H:%M").to_string())
        }
        "date" | "time" => {
            let mut datetime = ctx.date.and_time(ctx.now);
            if let Some((amount, unit)) = offset {
                datetime = apply_offset(datetime, amount, unit)?;
            }
            let format = custom.filter(|fmt| !fmt.is_empty()).unwrap_or(ctx.format);
            Some(pattern::format_datetime(datetime, format))
        }
        "title" => Some(ctx.filename.to_string()),
        "yesterday" => Some(pattern::format_date(ctx.date - Duration::days(1), ctx.format)),
        "tomorrow" => Some(pattern::format_date(ctx.date + Duration::days(1), ctx.format)),
        name => {
            if ctx.granularity != Granularity::Week || offset.is_some() {
                return None;
            }
            let weekday = pattern::WEEKDAY_NAMES
                .iter()
                .position(|day| day.eq_ignore_ascii_case(name))?;
            let format = custom?;
            let monday = Granularity::Week.start_of(ctx.date);
            let day = monday + Duration::days(weekday as i64);
            let format = if format.is_empty() { ctx.format } else { format };
            Some(pattern::format_date(day, format))
        }
    }
}

/// Split a trailing `<sign><digits><unit>` offset off a placeholder key.
/// Returns `None` when an offset is present but malformed.
fn split_offset(head: &str) -> Option<(&str, Option<(i64, char)>)> {
    let Some(idx) = head.find(['+', '-']) else {
        return Some((head, None));
    };
    let key = head[..idx].trim_end();
    let offset = parse_offset(&head[idx..])?;
    Some((key, Some(offset)))
}

fn parse_offset(s: &str) -> Option<(i64, char)> {
    let s = s.trim();
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    let digits_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }
    let amount: i64 = rest[..digits_end].parse().ok()?;
    let unit = rest[digits_end..].trim();
    let mut unit_chars = unit.chars();
    let unit = unit_chars.next()?.to_ascii_lowercase();
    if unit_chars.next().is_some() || !"yqmwdhs".contains(unit) {
        return None;
    }
    Some((sign * amount, unit))
}

fn apply_offset(datetime: NaiveDateTime, amount: i64, unit: char) -> Option<NaiveDateTime> {
    match unit {
        'y' => shift_months(datetime, amount.checked_mul(12)?),
        'q' => shift_months(datetime, amount.checked_mul(3)?),
        'm' => shift_months(datetime, amount),
        'w' => datetime.checked_add_signed(Duration::weeks(amount)),
        'd' => datetime.checked_add_signed(Duration::days(amount)),
        'h' => datetime.checked_add_signed(Duration::hours(amount)),
        's' => datetime.checked_add_signed(Duration::seconds(amount)),
        _ => None,
    }
}

fn shift_months(datetime: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        datetime.checked_add_months(magnitude)
    } else {
        datetime.checked_sub_months(magnitude)
    }
}
