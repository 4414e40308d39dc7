//! Đọc ngày tháng dạng văn bản tự do trong hồ sơ.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};

const CALENDAR_DATE_FORMAT: &str = "%Y-%m-%d";

/// Định dạng thời điểm không kèm múi giờ, coi như UTC.
const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Đọc ngày dạng `YYYY-MM-DD`.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, CALENDAR_DATE_FORMAT).ok()
}

/// Đọc một thời điểm so sánh được.
///
/// Chuỗi có ký tự `T` được đọc như timestamp đầy đủ (chấp nhận hậu tố `Z`
/// hoặc độ lệch múi giờ, quy về UTC); còn lại đọc như ngày lịch lúc 00:00 UTC.
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    if value.contains('T') {
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(dt.with_timezone(&Utc));
        }
        return NAIVE_TIMESTAMP_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
            .map(|naive| Utc.from_utc_datetime(&naive));
    }

    parse_calendar_date(value)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Tính tuổi tròn tại ngày `today`.
///
/// Trả về `None` khi ngày sinh thiếu hoặc không đọc được.
pub fn age_on(date_of_birth: Option<&str>, today: NaiveDate) -> Option<i32> {
    let dob = parse_calendar_date(date_of_birth?)?;
    let mut age = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    Some(age)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn age_counts_completed_years() {
        assert_eq!(age_on(Some("1990-01-01"), day(2024, 6, 15)), Some(34));
        assert_eq!(age_on(Some("1990-06-16"), day(2024, 6, 15)), Some(33));
    }

    #[test]
    fn age_on_birthday_is_exact_year_difference() {
        assert_eq!(age_on(Some("1984-08-24"), day(2024, 8, 24)), Some(40));
    }

    #[test]
    fn age_is_absent_for_missing_or_invalid_dob() {
        let today = day(2024, 6, 15);
        assert_eq!(age_on(None, today), None);
        assert_eq!(age_on(Some("2000-13-01"), today), None);
        assert_eq!(age_on(Some("invalid-date"), today), None);
    }

    #[test]
    fn instants_normalize_to_utc() {
        let zulu = parse_instant("2023-03-15T10:00:00Z").unwrap();
        let offset = parse_instant("2023-03-15T12:00:00+02:00").unwrap();
        assert_eq!(zulu, offset);

        let naive = parse_instant("2023-03-15T10:00:00").unwrap();
        assert_eq!(naive, zulu);
    }

    #[test]
    fn plain_dates_read_as_midnight() {
        let instant = parse_instant("2022-10-20").unwrap();
        assert_eq!(instant.date_naive(), day(2022, 10, 20));
        assert_eq!(parse_instant("not-a-date"), None);
        assert_eq!(parse_instant("2022-10-20Tgarbage"), None);
    }
}
