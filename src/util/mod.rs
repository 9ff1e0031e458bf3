use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

const DAY_FORMAT: &str = "%Y-%m-%d";

/// A calendar date in `YYYY-MM-DD` form.
///
/// Validated on construction, so every `DayKey` names a real date. The
/// zero-padded form makes string order equal to chronological order, which is
/// what the document store relies on for range filters.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct DayKey(String);

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid date `{0}`, expected YYYY-MM-DD")]
pub struct InvalidDayKey(pub String);

impl DayKey {
    pub fn parse(s: &str) -> Result<Self, InvalidDayKey> {
        let s = s.trim();
        // chrono accepts unpadded fields; the key must be the canonical form.
        match NaiveDate::parse_from_str(s, DAY_FORMAT) {
            Ok(d) if d.format(DAY_FORMAT).to_string() == s => Ok(Self(s.to_string())),
            _ => Err(InvalidDayKey(s.to_string())),
        }
    }

    pub fn from_date(d: NaiveDate) -> Self {
        Self(d.format(DAY_FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn date(&self) -> NaiveDate {
        // Checked in `parse`/`from_date`.
        NaiveDate::parse_from_str(&self.0, DAY_FORMAT).unwrap_or_default()
    }

    pub fn shift(&self, days: i64) -> Self {
        Self::from_date(self.date() + Duration::days(days))
    }

    /// "March 5"
    pub fn heading(&self) -> String {
        self.date().format("%B %-d").to_string()
    }

    /// "Tuesday, 2024"
    pub fn weekday_year(&self) -> String {
        self.date().format("%A, %Y").to_string()
    }

    /// ("MAR", "05") for the calendar tile on the important-days page.
    pub fn month_day_tile(&self) -> (String, String) {
        let d = self.date();
        (
            d.format("%b").to_string().to_uppercase(),
            format!("{:02}", d.day()),
        )
    }
}

impl TryFrom<String> for DayKey {
    type Error = InvalidDayKey;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DayKey> for String {
    fn from(value: DayKey) -> Self {
        value.0
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inclusive date range used by search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: DayKey,
    pub end: DayKey,
}

impl DateRange {
    pub fn contains(&self, day: &DayKey) -> bool {
        &self.start <= day && day <= &self.end
    }

    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn today_local() -> DayKey {
    // Use system local timezone (browser runtime).
    let d = js_sys::Date::new_0();
    let y = d.get_full_year() as i32;
    let m = d.get_month() + 1;
    let day = d.get_date();
    NaiveDate::from_ymd_opt(y, m, day)
        .map(DayKey::from_date)
        .unwrap_or_else(|| DayKey::from_date(NaiveDate::default()))
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn today_local() -> DayKey {
    DayKey::from_date(chrono::Local::now().date_naive())
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn now_ms() -> i64 {
    js_sys::Date::now().round() as i64
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// "9:05 AM" in the viewer's local time.
#[cfg(target_arch = "wasm32")]
pub(crate) fn format_time_of_day(epoch_ms: i64) -> String {
    let d = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(epoch_ms as f64));
    clock_label(d.get_hours(), d.get_minutes())
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn format_time_of_day(epoch_ms: i64) -> String {
    use chrono::{Local, TimeZone, Timelike};
    match Local.timestamp_millis_opt(epoch_ms).single() {
        Some(t) => clock_label(t.hour(), t.minute()),
        None => String::new(),
    }
}

fn clock_label(hour: u32, minute: u32) -> String {
    let (h12, suffix) = match hour {
        0 => (12, "AM"),
        1..=11 => (hour, "AM"),
        12 => (12, "PM"),
        _ => (hour - 12, "PM"),
    };
    format!("{h12}:{minute:02} {suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> DayKey {
        DayKey::parse(s).expect("valid date")
    }

    #[test]
    fn test_day_key_requires_canonical_form() {
        assert!(DayKey::parse("2024-02-29").is_ok());
        assert!(DayKey::parse("2023-02-29").is_err());
        assert!(DayKey::parse("2024-2-9").is_err());
        assert!(DayKey::parse("").is_err());
        assert_eq!(day(" 2024-01-31 ").as_str(), "2024-01-31");
    }

    #[test]
    fn test_day_key_shift_crosses_month_and_year() {
        assert_eq!(day("2024-01-31").shift(1).as_str(), "2024-02-01");
        assert_eq!(day("2024-01-01").shift(-1).as_str(), "2023-12-31");
    }

    #[test]
    fn test_day_key_order_is_chronological() {
        let mut days = vec![day("2024-02-01"), day("2023-12-31"), day("2024-01-15")];
        days.sort();
        let got: Vec<&str> = days.iter().map(|d| d.as_str()).collect();
        assert_eq!(got, vec!["2023-12-31", "2024-01-15", "2024-02-01"]);
    }

    #[test]
    fn test_range_is_inclusive() {
        let r = DateRange {
            start: day("2024-01-01"),
            end: day("2024-01-31"),
        };
        assert!(r.contains(&day("2024-01-01")));
        assert!(r.contains(&day("2024-01-31")));
        assert!(!r.contains(&day("2024-02-01")));
        assert!(r.is_valid());
        assert!(!DateRange {
            start: day("2024-02-01"),
            end: day("2024-01-01"),
        }
        .is_valid());
    }

    #[test]
    fn test_labels() {
        let d = day("2024-03-05");
        assert_eq!(d.heading(), "March 5");
        assert_eq!(d.weekday_year(), "Tuesday, 2024");
        assert_eq!(d.month_day_tile(), ("MAR".to_string(), "05".to_string()));
    }

    #[test]
    fn test_clock_label() {
        assert_eq!(clock_label(0, 5), "12:05 AM");
        assert_eq!(clock_label(9, 30), "9:30 AM");
        assert_eq!(clock_label(12, 0), "12:00 PM");
        assert_eq!(clock_label(23, 59), "11:59 PM");
    }
}
