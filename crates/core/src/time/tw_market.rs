use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

// Taiwan has no DST; UTC+8 all year.
const TST_OFFSET_SECS: i64 = 8 * 3600;

/// Calendar date in Taipei for the given instant.
pub fn report_date(now_utc: DateTime<Utc>) -> NaiveDate {
    (now_utc.naive_utc() + Duration::seconds(TST_OFFSET_SECS)).date()
}

/// zh-TW short date form: `YYYY/M/D`, no zero padding.
pub fn display_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.year(), date.month(), date.day())
}

/// Date label stamped on a freshly generated report.
pub fn report_date_label(now_utc: DateTime<Utc>) -> String {
    display_date(report_date(now_utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn rolls_forward_after_taipei_midnight() {
        // 2026-10-16 17:30 UTC = 2026-10-17 01:30 TST
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 17, 30, 0).unwrap();
        assert_eq!(report_date(now), NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
    }

    #[test]
    fn stays_on_same_day_before_taipei_midnight() {
        // 2026-10-16 15:59 UTC = 2026-10-16 23:59 TST
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 15, 59, 0).unwrap();
        assert_eq!(report_date(now), NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
    }

    #[test]
    fn display_has_no_zero_padding() {
        let d = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(display_date(d), "2026/1/5");
    }

    #[test]
    fn label_combines_both() {
        let now = Utc.with_ymd_and_hms(2026, 12, 31, 20, 0, 0).unwrap();
        assert_eq!(report_date_label(now), "2027/1/1");
    }
}
