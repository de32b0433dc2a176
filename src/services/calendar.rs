use chrono::{Datelike, Duration, NaiveDate};

pub const DAY_HEADER: [&str; 7] = ["Po", "Út", "St", "Čt", "Pá", "So", "Ne"];

pub const MONTH_NAMES: [&str; 12] = [
    "Leden", "Únor", "Březen", "Duben", "Květen", "Červen", "Červenec", "Srpen", "Září", "Říjen",
    "Listopad", "Prosinec",
];

/// First day of a month given a 0-based month. Out-of-range months roll
/// over into neighbouring years, so `(2024, 12)` is January 2025.
pub fn first_of_month(year: i32, month0: i32) -> Option<NaiveDate> {
    let year = year.checked_add(month0.div_euclid(12))?;
    let month = month0.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Last day of the month is day 0 of the following one.
pub fn days_in_month(year: i32, month0: i32) -> Option<u32> {
    let next = first_of_month(year, month0.checked_add(1)?)?;
    let last = next - Duration::days(1);
    Some(last.day())
}

/// Blank cells before the 1st in a Monday-first grid (0..=6).
pub fn leading_blanks(first: NaiveDate) -> u32 {
    // Sunday-first index shifted so Monday is 0 and Sunday is 6.
    (first.weekday().num_days_from_sunday() + 6) % 7
}

/// Calendar cells for one month: `None` for leading blanks, then each day.
pub fn month_grid(year: i32, month0: i32) -> Vec<Option<u32>> {
    let (Some(first), Some(days)) = (first_of_month(year, month0), days_in_month(year, month0))
    else {
        return Vec::new();
    };

    let blanks = leading_blanks(first);
    let mut cells = Vec::with_capacity((blanks + days) as usize);
    cells.extend((0..blanks).map(|_| None));
    cells.extend((1..=days).map(Some));
    cells
}

/// The 1st of the month `delta` months away from `date`.
pub fn shift_month(date: NaiveDate, delta: i32) -> Option<NaiveDate> {
    first_of_month(date.year(), (date.month0() as i32).checked_add(delta)?)
}

/// Months since year 0, for comparing dates at month granularity.
pub fn month_ordinal(date: NaiveDate) -> i64 {
    date.year() as i64 * 12 + date.month0() as i64
}

pub fn month_label(date: NaiveDate) -> String {
    format!("{} {}", MONTH_NAMES[date.month0() as usize], date.year())
}
