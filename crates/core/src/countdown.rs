use chrono::NaiveDate;
use serde::Serialize;

/// Days and whole weeks left until the exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Countdown {
    pub exam_date: NaiveDate,
    pub days: u32,
    pub weeks: u32,
}

impl Countdown {
    /// Never negative: on or after exam day both counts are zero.
    #[must_use]
    pub fn until(exam_date: NaiveDate, today: NaiveDate) -> Self {
        let days = u32::try_from((exam_date - today).num_days().max(0)).unwrap_or(u32::MAX);
        Self {
            exam_date,
            days,
            weeks: days / 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_days_and_whole_weeks() {
        let exam = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        let cd = Countdown::until(exam, NaiveDate::from_ymd_opt(2026, 8, 1).unwrap());
        assert_eq!(cd.days, 23);
        assert_eq!(cd.weeks, 3);
    }

    #[test]
    fn clamps_after_exam() {
        let exam = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        let cd = Countdown::until(exam, NaiveDate::from_ymd_opt(2026, 9, 1).unwrap());
        assert_eq!((cd.days, cd.weeks), (0, 0));
    }
}
