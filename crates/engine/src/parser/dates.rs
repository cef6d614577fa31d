//! Natural-language date recognition.
//!
//! An ordered list of independent matchers is tried top to bottom and
//! the first one producing a date wins. Every matcher receives the
//! lowercased utterance and a reference "today", so the whole module
//! stays deterministic under test.

use std::sync::LazyLock;

use chrono::{Datelike, Days, NaiveDate};
use regex::Regex;

use super::re;

pub(crate) type DateMatcher = fn(&str, NaiveDate) -> Option<NaiveDate>;

/// Matchers in precedence order; literal words beat numeric dates beat
/// relative phrases. Full month names are tried in both orders before
/// the abbreviated forms, so "september 20" beats a stray "15 sep" in
/// the same utterance.
pub(crate) const MATCHERS: &[DateMatcher] = &[
    today,
    yesterday,
    numeric,
    day_then_month_full,
    month_then_day_full,
    day_then_month_abbr,
    month_then_day_abbr,
    days_ago,
    weeks_ago,
    last_weekday,
    this_weekday,
];

pub(crate) fn first_match(text: &str, reference: NaiveDate) -> Option<NaiveDate> {
    MATCHERS.iter().find_map(|matcher| matcher(text, reference))
}

const MONTH_FULL: &str = "january|february|march|april|may|june|july|august|september|\
     october|november|december";
const MONTH_ABBREVIATED: &str = "jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec";

fn month_number(name: &str) -> Option<u32> {
    let index = [
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ]
    .iter()
    .position(|abbr| name.starts_with(abbr))?;
    Some(index as u32 + 1)
}

fn today(text: &str, reference: NaiveDate) -> Option<NaiveDate> {
    static RE: LazyLock<Regex> = LazyLock::new(|| re(r"\btoday\b"));
    RE.is_match(text).then_some(reference)
}

fn yesterday(text: &str, reference: NaiveDate) -> Option<NaiveDate> {
    static RE: LazyLock<Regex> = LazyLock::new(|| re(r"\byesterday\b"));
    if RE.is_match(text) {
        reference.checked_sub_days(Days::new(1))
    } else {
        None
    }
}

/// `M/D/YYYY` (or `-` separated); two-digit years are 2000-based.
fn numeric(text: &str, _reference: NaiveDate) -> Option<NaiveDate> {
    static RE: LazyLock<Regex> =
        LazyLock::new(|| re(r"(\d{1,2})[/\-](\d{1,2})[/\-](\d{2,4})"));
    let captures = RE.captures(text)?;
    let month: u32 = captures[1].parse().ok()?;
    let day: u32 = captures[2].parse().ok()?;
    let year: i32 = captures[3].parse().ok()?;
    let year = if captures[3].len() == 2 { 2000 + year } else { year };
    NaiveDate::from_ymd_opt(year, month, day)
}

fn day_then_month(regex: &Regex, text: &str, reference: NaiveDate) -> Option<NaiveDate> {
    let captures = regex.captures(text)?;
    let day: u32 = captures[1].parse().ok()?;
    let month = month_number(&captures[2])?;
    NaiveDate::from_ymd_opt(reference.year(), month, day)
}

fn month_then_day(regex: &Regex, text: &str, reference: NaiveDate) -> Option<NaiveDate> {
    let captures = regex.captures(text)?;
    let month = month_number(&captures[1])?;
    let day: u32 = captures[2].parse().ok()?;
    NaiveDate::from_ymd_opt(reference.year(), month, day)
}

/// "15 september"; the reference supplies the year.
fn day_then_month_full(text: &str, reference: NaiveDate) -> Option<NaiveDate> {
    static RE: LazyLock<Regex> =
        LazyLock::new(|| re(&format!(r"(\d{{1,2}})\s+({MONTH_FULL})")));
    day_then_month(&RE, text, reference)
}

/// "september 15".
fn month_then_day_full(text: &str, reference: NaiveDate) -> Option<NaiveDate> {
    static RE: LazyLock<Regex> =
        LazyLock::new(|| re(&format!(r"({MONTH_FULL})\s+(\d{{1,2}})")));
    month_then_day(&RE, text, reference)
}

/// "15 sep".
fn day_then_month_abbr(text: &str, reference: NaiveDate) -> Option<NaiveDate> {
    static RE: LazyLock<Regex> =
        LazyLock::new(|| re(&format!(r"(\d{{1,2}})\s+({MONTH_ABBREVIATED})")));
    day_then_month(&RE, text, reference)
}

/// "sep 15".
fn month_then_day_abbr(text: &str, reference: NaiveDate) -> Option<NaiveDate> {
    static RE: LazyLock<Regex> =
        LazyLock::new(|| re(&format!(r"({MONTH_ABBREVIATED})\s+(\d{{1,2}})")));
    month_then_day(&RE, text, reference)
}

fn days_ago(text: &str, reference: NaiveDate) -> Option<NaiveDate> {
    static RE: LazyLock<Regex> = LazyLock::new(|| re(r"(\d+)\s+days?\s+ago"));
    let captures = RE.captures(text)?;
    let days: u64 = captures[1].parse().ok()?;
    reference.checked_sub_days(Days::new(days))
}

fn weeks_ago(text: &str, reference: NaiveDate) -> Option<NaiveDate> {
    static RE: LazyLock<Regex> = LazyLock::new(|| re(r"(\d+)\s+weeks?\s+ago"));
    let captures = RE.captures(text)?;
    let weeks: u64 = captures[1].parse().ok()?;
    reference.checked_sub_days(Days::new(weeks * 7))
}

fn weekday_number(name: &str) -> Option<i64> {
    [
        "sunday",
        "monday",
        "tuesday",
        "wednesday",
        "thursday",
        "friday",
        "saturday",
    ]
    .iter()
    .position(|day| *day == name)
    .map(|index| index as i64)
}

const WEEKDAY_ALTERNATION: &str = "monday|tuesday|wednesday|thursday|friday|saturday|sunday";

/// "last monday": always strictly in the past, wrapping a full week
/// back when the weekday is today or still ahead.
fn last_weekday(text: &str, reference: NaiveDate) -> Option<NaiveDate> {
    static RE: LazyLock<Regex> =
        LazyLock::new(|| re(&format!(r"last\s+({WEEKDAY_ALTERNATION})")));
    let captures = RE.captures(text)?;
    let target = weekday_number(&captures[1])?;
    let current = reference.weekday().num_days_from_sunday() as i64;
    let mut days_back = current - target;
    if days_back <= 0 {
        days_back += 7;
    }
    reference.checked_sub_days(Days::new(days_back as u64))
}

/// "this monday": today or later in the current week, wrapping forward
/// when the weekday has already passed.
fn this_weekday(text: &str, reference: NaiveDate) -> Option<NaiveDate> {
    static RE: LazyLock<Regex> =
        LazyLock::new(|| re(&format!(r"this\s+({WEEKDAY_ALTERNATION})")));
    let captures = RE.captures(text)?;
    let target = weekday_number(&captures[1])?;
    let current = reference.weekday().num_days_from_sunday() as i64;
    let mut days_ahead = target - current;
    if days_ahead < 0 {
        days_ahead += 7;
    }
    reference.checked_add_days(Days::new(days_ahead as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    // 2024-06-12 was a Wednesday.
    fn reference() -> NaiveDate {
        date(2024, 6, 12)
    }

    #[test]
    fn literal_today_and_yesterday() {
        assert_eq!(first_match("spent 50 today", reference()), Some(reference()));
        assert_eq!(
            first_match("spent 50 yesterday", reference()),
            Some(date(2024, 6, 11))
        );
    }

    #[test]
    fn numeric_date_is_month_first() {
        assert_eq!(
            first_match("paid on 3/15/2024", reference()),
            Some(date(2024, 3, 15))
        );
    }

    #[test]
    fn numeric_two_digit_year_is_2000_based() {
        assert_eq!(
            first_match("paid on 3-15-24", reference()),
            Some(date(2024, 3, 15))
        );
    }

    #[test]
    fn impossible_numeric_date_is_skipped() {
        assert_eq!(first_match("code 13/45/2024", reference()), None);
    }

    #[test]
    fn day_before_month_name() {
        assert_eq!(
            first_match("dinner on 15 september", reference()),
            Some(date(2024, 9, 15))
        );
    }

    #[test]
    fn month_name_before_day_abbreviated() {
        assert_eq!(
            first_match("dinner on sep 15", reference()),
            Some(date(2024, 9, 15))
        );
    }

    #[test]
    fn full_month_name_beats_abbreviated_phrase() {
        assert_eq!(
            first_match("15 sep or september 20", reference()),
            Some(date(2024, 9, 20))
        );
    }

    #[test]
    fn relative_days_and_weeks() {
        assert_eq!(
            first_match("3 days ago", reference()),
            Some(date(2024, 6, 9))
        );
        assert_eq!(
            first_match("2 weeks ago", reference()),
            Some(date(2024, 5, 29))
        );
    }

    #[test]
    fn last_weekday_is_strictly_in_the_past() {
        // Monday before Wednesday the 12th.
        assert_eq!(
            first_match("last monday", reference()),
            Some(date(2024, 6, 10))
        );
        // Same weekday wraps a whole week back.
        assert_eq!(
            first_match("last wednesday", reference()),
            Some(date(2024, 6, 5))
        );
        // A weekday later in the week resolves to the previous week.
        assert_eq!(
            first_match("last friday", reference()),
            Some(date(2024, 6, 7))
        );
    }

    #[test]
    fn this_weekday_never_moves_backwards() {
        assert_eq!(
            first_match("this friday", reference()),
            Some(date(2024, 6, 14))
        );
        // Today stays today.
        assert_eq!(
            first_match("this wednesday", reference()),
            Some(reference())
        );
        // A weekday already passed wraps to next week.
        assert_eq!(
            first_match("this monday", reference()),
            Some(date(2024, 6, 17))
        );
    }

    #[test]
    fn literal_words_win_over_relative_phrases() {
        assert_eq!(
            first_match("today, not 3 days ago", reference()),
            Some(reference())
        );
    }
}
