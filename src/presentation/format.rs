use crate::domain::entities::Time;
use chrono::{DateTime, Utc};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// 一覧カード向けの相対日付
///
/// 経過日数は 24 時間単位の切り捨て。未来の時刻は "Today" として扱う。
pub fn format_date(timestamp: Time, now: DateTime<Utc>) -> String {
    let date = DateTime::from_timestamp_nanos(timestamp);
    let diff_ms = now.timestamp_millis() - date.timestamp_millis();
    let diff_days = diff_ms.div_euclid(MILLIS_PER_DAY);

    match diff_days {
        i64::MIN..=0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{diff_days} days ago"),
        _ => date.format("%B %-d, %Y").to_string(),
    }
}

/// 詳細画面向けの日時（例: "March 4, 2024 at 3:07 PM"）
pub fn format_date_time(timestamp: Time) -> String {
    DateTime::from_timestamp_nanos(timestamp)
        .format("%B %-d, %Y at %-I:%M %p")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn nanos(at: DateTime<Utc>) -> Time {
        at.timestamp_nanos_opt().unwrap()
    }

    #[test]
    fn relative_dates() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(format_date(nanos(now - Duration::hours(3)), now), "Today");
        assert_eq!(format_date(nanos(now - Duration::hours(30)), now), "Yesterday");
        assert_eq!(format_date(nanos(now - Duration::days(4)), now), "4 days ago");
        assert_eq!(format_date(nanos(now - Duration::days(9)), now), "March 1, 2024");
    }

    #[test]
    fn future_dates_are_today() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(format_date(nanos(now + Duration::days(2)), now), "Today");
    }

    #[test]
    fn full_date_time() {
        let at = Utc.with_ymd_and_hms(2024, 3, 4, 15, 7, 0).unwrap();
        assert_eq!(format_date_time(nanos(at)), "March 4, 2024 at 3:07 PM");
    }
}
