//! Filename-to-date resolution.
//!
//! Filenames are parsed against the granularity's currently configured
//! format, read fresh from the resolver each time so settings changes take
//! effect immediately.

use chrono::NaiveDate;

use crate::granularity::Granularity;
use crate::pattern;
use crate::settings::SettingsResolver;
use crate::store::{self, NoteFile};
use crate::uid::DateUid;

/// Parse `name` against `format` for the given granularity.
///
/// Week formats that encode both a week number and a month or day-of-month
/// are self-contradictory (the two can disagree for the same date). When such
/// a format strictly matches, the month/day tokens are stripped and the name
/// is re-parsed loosely so the week fields alone decide the date.
pub fn date_from_name(name: &str, granularity: Granularity, format: &str) -> Option<NaiveDate> {
    let strict = pattern::parse_strict(name, format)?;
    if granularity == Granularity::Week && is_week_format_ambiguous(format) {
        return pattern::parse_loose(name, &strip_month_day_tokens(format));
    }
    Some(strict)
}

/// Date for a note file, using the granularity's configured format.
pub fn date_from_file(
    resolver: &SettingsResolver,
    file: &NoteFile,
    granularity: Granularity,
) -> Option<NaiveDate> {
    date_from_basename(resolver, file.basename(), granularity)
}

/// Date for a store path, using the granularity's configured format.
pub fn date_from_path(
    resolver: &SettingsResolver,
    path: &str,
    granularity: Granularity,
) -> Option<NaiveDate> {
    date_from_basename(resolver, store::basename(path), granularity)
}

fn date_from_basename(
    resolver: &SettingsResolver,
    basename: &str,
    granularity: Granularity,
) -> Option<NaiveDate> {
    let format = resolver.resolve(granularity).format;
    // Formats may encode folders ("YYYY/MM/YYYY-MM-DD"); only the last
    // segment names the file.
    let format = format.split('/').next_back().unwrap_or("");
    if format.is_empty() {
        return None;
    }
    date_from_name(basename, granularity, format)
}

/// UID for the first granularity (day, then week, then month) whose format
/// matches the file's basename. The order is load-bearing: a name valid as
/// both a day and a week resolves as a day.
pub fn first_matching_uid(resolver: &SettingsResolver, file: &NoteFile) -> Option<DateUid> {
    Granularity::INDEXED.into_iter().find_map(|granularity| {
        date_from_file(resolver, file, granularity)
            .map(|date| DateUid::new(date, granularity))
    })
}

/// As [`first_matching_uid`], but for a raw path (used for the old side of a
/// rename, where no file handle exists anymore).
pub fn first_matching_uid_for_path(resolver: &SettingsResolver, path: &str) -> Option<DateUid> {
    Granularity::INDEXED.into_iter().find_map(|granularity| {
        date_from_path(resolver, path, granularity)
            .map(|date| DateUid::new(date, granularity))
    })
}

/// A week format is ambiguous when, literals aside, it carries a week number
/// and a month or day-of-month: the two constrain the same date twice.
fn is_week_format_ambiguous(format: &str) -> bool {
    let clean = remove_escaped_segments(format);
    let has_week = clean.chars().any(|c| c == 'w' || c == 'W');
    let has_month_or_day = clean.chars().any(|c| c == 'M' || c == 'D');
    has_week && has_month_or_day
}

fn remove_escaped_segments(format: &str) -> String {
    let mut out = String::new();
    let mut chars = format.chars();
    while let Some(c) = chars.next() {
        if c == '[' {
            for inner in chars.by_ref() {
                if inner == ']' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn strip_month_day_tokens(format: &str) -> String {
    format.chars().filter(|&c| c != 'M' && c != 'D').collect()
}
