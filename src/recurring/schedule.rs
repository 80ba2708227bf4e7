//! Month arithmetic for recurring charge dates.

use time::{Date, Month};

/// The same day one month later, clamping to the last day of the shorter
/// month. For example, January 31 becomes February 28 (or 29 in a leap year).
pub fn add_one_month(date: Date) -> Date {
    let (year, month) = match date.month() {
        Month::December => (date.year() + 1, Month::January),
        month => (date.year(), month.next()),
    };

    let day = date.day().min(last_day_of_month(year, month));

    Date::from_calendar_date(year, month, day).expect("invalid clamped date")
}

fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}
