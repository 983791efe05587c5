use chrono::{Local, NaiveDateTime};

/// Source of the current local wall-clock time.
///
/// Injected into the handlers so time and date replies can be checked against
/// a fixed instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Reads the host's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Formats a time as 12-hour `HH:MM AM/PM`.
pub fn format_time(at: NaiveDateTime) -> String {
    at.format("%I:%M %p").to_string()
}

/// Formats a date as `Weekday, Month DD, YYYY`.
pub fn format_date(at: NaiveDateTime) -> String {
    at.format("%A, %B %d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_format_time_afternoon() {
        assert_eq!(format_time(at(2024, 3, 4, 15, 7)), "03:07 PM");
    }

    #[test]
    fn test_format_time_midnight_and_noon() {
        assert_eq!(format_time(at(2024, 3, 4, 0, 0)), "12:00 AM");
        assert_eq!(format_time(at(2024, 3, 4, 12, 30)), "12:30 PM");
    }

    #[test]
    fn test_format_date_pads_day() {
        assert_eq!(format_date(at(2024, 3, 4, 9, 0)), "Monday, March 04, 2024");
        assert_eq!(format_date(at(2023, 12, 25, 9, 0)), "Monday, December 25, 2023");
    }

    #[test]
    fn test_fixed_clock_is_frozen() {
        let clock = FixedClock(at(2024, 1, 1, 8, 15));
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now(), at(2024, 1, 1, 8, 15));
    }
}
