use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcError;
use crate::types::{with_metadata, ComputationOutput};
use crate::CalcResult;

pub const MIN_BIRTH_YEAR: i32 = 1900;
pub const MAX_BIRTH_YEAR: i32 = 2025;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgeInput {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgeOutput {
    pub birth_date: NaiveDate,
    pub as_of: NaiveDate,
    /// Completed years, counting the birthday.
    pub international_age: i32,
    /// Year difference plus one.
    pub traditional_age: i32,
    /// Year difference only.
    pub calendar_year_age: i32,
    pub days_since_birth: i64,
    pub days_until_next_birthday: i64,
    pub next_birthday: NaiveDate,
    pub birth_weekday: String,
}

/// Age as of the local calendar date.
pub fn calculate_age_today(input: &AgeInput) -> CalcResult<ComputationOutput<AgeOutput>> {
    calculate_age(input, Local::now().date_naive())
}

/// Age on `today` under the three counting conventions.
pub fn calculate_age(input: &AgeInput, today: NaiveDate) -> CalcResult<ComputationOutput<AgeOutput>> {
    let start = Instant::now();

    if !(MIN_BIRTH_YEAR..=MAX_BIRTH_YEAR).contains(&input.year) {
        return Err(CalcError::InvalidInput {
            field: "year".into(),
            reason: format!("Birth year must be between {MIN_BIRTH_YEAR} and {MAX_BIRTH_YEAR}"),
        });
    }
    let birth = NaiveDate::from_ymd_opt(input.year, input.month, input.day).ok_or_else(|| {
        CalcError::DateError(format!(
            "{:04}-{:02}-{:02} is not a calendar date",
            input.year, input.month, input.day
        ))
    })?;
    if birth > today {
        return Err(CalcError::InvalidInput {
            field: "birth_date".into(),
            reason: format!("Birth date {birth} is after {today}"),
        });
    }

    tracing::debug!(%birth, %today, "calculating age");

    let year_diff = today.year() - birth.year();
    let birthday_passed = (today.month(), today.day()) >= (birth.month(), birth.day());
    let international_age = if birthday_passed { year_diff } else { year_diff - 1 };

    let this_year = birthday_in(birth, today.year())?;
    let next_birthday = if this_year >= today {
        this_year
    } else {
        birthday_in(birth, today.year() + 1)?
    };

    let mut warnings = Vec::new();
    if birth.month() == 2 && birth.day() == 29 {
        warnings.push("Feb 29 birthdays are observed on Mar 1 in non-leap years".to_string());
    }

    let output = AgeOutput {
        birth_date: birth,
        as_of: today,
        international_age,
        traditional_age: year_diff + 1,
        calendar_year_age: year_diff,
        days_since_birth: (today - birth).num_days(),
        days_until_next_birthday: (next_birthday - today).num_days(),
        next_birthday,
        birth_weekday: weekday_name(birth).to_string(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "International, traditional and calendar-year age from calendar dates",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn birthday_in(birth: NaiveDate, year: i32) -> CalcResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, birth.month(), birth.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
        .ok_or_else(|| CalcError::DateError(format!("No birthday in year {year}")))
}

fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        chrono::Weekday::Mon => "Monday",
        chrono::Weekday::Tue => "Tuesday",
        chrono::Weekday::Wed => "Wednesday",
        chrono::Weekday::Thu => "Thursday",
        chrono::Weekday::Fri => "Friday",
        chrono::Weekday::Sat => "Saturday",
        chrono::Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn age(y: i32, m: u32, d: u32, today: NaiveDate) -> CalcResult<AgeOutput> {
        calculate_age(&AgeInput { year: y, month: m, day: d }, today).map(|o| o.result)
    }

    #[test]
    fn test_birthday_already_passed() {
        let out = age(1990, 3, 15, date(2024, 6, 1)).unwrap();
        assert_eq!(out.international_age, 34);
        assert_eq!(out.calendar_year_age, 34);
        assert_eq!(out.traditional_age, 35);
        assert_eq!(out.next_birthday, date(2025, 3, 15));
    }

    #[test]
    fn test_birthday_not_yet() {
        let out = age(1990, 9, 15, date(2024, 6, 1)).unwrap();
        assert_eq!(out.international_age, 33);
        assert_eq!(out.calendar_year_age, 34);
        assert_eq!(out.days_until_next_birthday, 106);
    }

    #[test]
    fn test_birthday_today() {
        let out = age(2000, 6, 1, date(2024, 6, 1)).unwrap();
        assert_eq!(out.international_age, 24);
        assert_eq!(out.days_until_next_birthday, 0);
        assert_eq!(out.next_birthday, date(2024, 6, 1));
    }

    #[test]
    fn test_days_since_birth_and_weekday() {
        let out = age(2000, 1, 1, date(2000, 1, 31)).unwrap();
        assert_eq!(out.days_since_birth, 30);
        assert_eq!(out.birth_weekday, "Saturday");
    }

    #[test]
    fn test_leap_day_birthday() {
        let out = calculate_age(&AgeInput { year: 2000, month: 2, day: 29 }, date(2023, 2, 1)).unwrap();
        assert_eq!(out.result.next_birthday, date(2023, 3, 1));
        assert_eq!(out.result.international_age, 22);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_impossible_date() {
        let err = age(2001, 2, 30, date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, CalcError::DateError(_)));
    }

    #[test]
    fn test_year_out_of_range() {
        assert!(age(1899, 12, 31, date(2024, 1, 1)).is_err());
        assert!(age(2026, 1, 1, date(2027, 1, 1)).is_err());
    }

    #[test]
    fn test_future_birth_rejected() {
        match age(2024, 5, 2, date(2024, 5, 1)).unwrap_err() {
            CalcError::InvalidInput { field, .. } => assert_eq!(field, "birth_date"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
