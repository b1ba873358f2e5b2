use chrono::{Datelike, Days, NaiveDate};

use crate::aggregators::error::AggregationError;

/// Last day of the calendar month containing `date`.
pub fn month_end(date: NaiveDate) -> Result<NaiveDate, AggregationError> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };

    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| invalid(date, "month end is out of range"))
}

/// The Sunday closing the Monday-to-Sunday week containing `date`.
pub fn week_end(date: NaiveDate) -> Result<NaiveDate, AggregationError> {
    let to_sunday = 6 - date.weekday().num_days_from_monday();
    date.checked_add_days(Days::new(u64::from(to_sunday)))
        .ok_or_else(|| invalid(date, "week end is out of range"))
}

/// The week label following `week`.
pub fn next_week(week: NaiveDate) -> Result<NaiveDate, AggregationError> {
    week.checked_add_days(Days::new(7))
        .ok_or_else(|| invalid(week, "next week is out of range"))
}

fn invalid(date: NaiveDate, reason: &str) -> AggregationError {
    AggregationError::InvalidDate {
        date: date.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_end() {
        assert_eq!(month_end(ymd(2021, 1, 1)).unwrap(), ymd(2021, 1, 31));
        assert_eq!(month_end(ymd(2021, 2, 14)).unwrap(), ymd(2021, 2, 28));
        assert_eq!(month_end(ymd(2020, 2, 29)).unwrap(), ymd(2020, 2, 29));
        assert_eq!(month_end(ymd(2021, 12, 5)).unwrap(), ymd(2021, 12, 31));
    }

    #[test]
    fn test_week_end_is_sunday() {
        // 2021-01-04 is a Monday
        assert_eq!(week_end(ymd(2021, 1, 4)).unwrap(), ymd(2021, 1, 10));
        assert_eq!(week_end(ymd(2021, 1, 9)).unwrap(), ymd(2021, 1, 10));
        assert_eq!(week_end(ymd(2021, 1, 10)).unwrap(), ymd(2021, 1, 10));
        assert_eq!(week_end(ymd(2021, 1, 11)).unwrap(), ymd(2021, 1, 17));
    }

    #[test]
    fn test_out_of_range_dates() {
        let err = month_end(NaiveDate::MAX).unwrap_err();
        assert!(err.to_string().starts_with("aggregation failed: invalid date"));
        assert!(next_week(NaiveDate::MAX).is_err());
    }
}
