//! Conversion between iCalendar compact date tokens and ISO-8601
//!
//! Display-oriented: a trailing `Z` is dropped on the way in and added on the
//! way out, so every timestamp is read as the deployment's local time.

use chrono::{DateTime, Utc};

/// Compact UTC timestamp format used for DTSTAMP, CREATED and friends
pub const ICAL_UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";

const DATETIME_LEN: usize = 15;

/// Format an instant as `YYYYMMDDTHHMMSSZ`
#[must_use]
pub fn format_utc(instant: DateTime<Utc>) -> String {
    instant.format(ICAL_UTC_FORMAT).to_string()
}

/// Convert an iCal date or date-time token to ISO-8601
///
/// `20260215` becomes `2026-02-15`, `20260215T120000Z` becomes
/// `2026-02-15T12:00:00`. Anything else is returned unchanged.
#[must_use]
pub fn ical_to_iso(raw: &str) -> String {
    if raw.len() == 8 && raw.bytes().all(|b| b.is_ascii_digit()) {
        return format!("{}-{}-{}", &raw[..4], &raw[4..6], &raw[6..8]);
    }

    let clean = raw.strip_suffix('Z').unwrap_or(raw);
    if clean.len() >= DATETIME_LEN
        && clean.is_ascii()
        && clean.as_bytes()[8] == b'T'
        && clean[..8].bytes().all(|b| b.is_ascii_digit())
        && clean[9..DATETIME_LEN].bytes().all(|b| b.is_ascii_digit())
    {
        let (date, time) = (&clean[..8], &clean[9..DATETIME_LEN]);
        return format!(
            "{}-{}-{}T{}:{}:{}",
            &date[..4],
            &date[4..6],
            &date[6..8],
            &time[..2],
            &time[2..4],
            &time[4..6]
        );
    }

    raw.to_string()
}

/// Like [`ical_to_iso`], mapping an empty token to `None`
#[must_use]
pub fn ical_to_iso_opt(raw: Option<&str>) -> Option<String> {
    raw.filter(|r| !r.is_empty()).map(ical_to_iso)
}

/// Strip ISO separators: `-` and `:` removed, space turned into `T`
fn clean_iso(iso: &str) -> String {
    iso.trim()
        .chars()
        .filter(|c| *c != '-' && *c != ':')
        .map(|c| if c == ' ' { 'T' } else { c })
        .collect()
}

fn starts_with_date(clean: &str) -> bool {
    clean.len() >= 8 && clean.as_bytes()[..8].iter().all(u8::is_ascii_digit)
}

/// True when the value carries no time of day (`2026-03-01`, `20260301`)
#[must_use]
pub fn is_date_only(iso: &str) -> bool {
    let clean = clean_iso(iso);
    clean.len() == 8 && starts_with_date(&clean)
}

/// Encode an ISO value as an all-day `YYYYMMDD` token
///
/// Returns `None` when the value does not start with a date.
#[must_use]
pub fn iso_to_ical_date(iso: &str) -> Option<String> {
    let clean = clean_iso(iso);
    starts_with_date(&clean).then(|| clean[..8].to_string())
}

/// Encode an ISO value as a `YYYYMMDDTHHMMSSZ` token
///
/// A date without time gets `T000000`. The part before `Z` is cut or
/// zero-padded to exactly 15 characters, so fractional seconds and offsets
/// are dropped. Returns `None` when the value does not start with a date.
#[must_use]
pub fn iso_to_ical_datetime(iso: &str) -> Option<String> {
    let mut clean = clean_iso(iso);
    if !starts_with_date(&clean) {
        return None;
    }
    if clean.ends_with('Z') {
        clean.pop();
    }
    if !clean.contains('T') {
        clean.truncate(8);
        clean.push_str("T000000");
    }

    let mut token: String = clean.chars().take(DATETIME_LEN).collect();
    for _ in token.chars().count()..DATETIME_LEN {
        token.push('0');
    }
    token.push('Z');
    Some(token)
}

/// Encoded DTSTART/DTEND/DUE value together with its property parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateProperty {
    /// `;VALUE=DATE` for all-day values, empty otherwise
    pub params: &'static str,
    pub value: String,
}

impl DateProperty {
    /// Encode `iso` as all-day or timed
    #[must_use]
    pub fn encode(iso: &str, all_day: bool) -> Option<Self> {
        if all_day {
            iso_to_ical_date(iso).map(|value| Self {
                params: ";VALUE=DATE",
                value,
            })
        } else {
            iso_to_ical_datetime(iso).map(|value| Self { params: "", value })
        }
    }

    /// Encode `iso`, choosing all-day when it has no time part
    #[must_use]
    pub fn encode_auto(iso: &str) -> Option<Self> {
        Self::encode(iso, is_date_only(iso))
    }

    /// Full content line for property `name`
    #[must_use]
    pub fn line(&self, name: &str) -> String {
        format!("{name}{}:{}", self.params, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn all_day_token_to_iso() {
        assert_eq!(ical_to_iso("20260215"), "2026-02-15");
    }

    #[test]
    fn datetime_token_to_iso_strips_utc_marker() {
        assert_eq!(ical_to_iso("20260215T120000Z"), "2026-02-15T12:00:00");
        assert_eq!(ical_to_iso("20260215T120000"), "2026-02-15T12:00:00");
    }

    #[test]
    fn unknown_tokens_pass_through() {
        assert_eq!(ical_to_iso("2026-02-15"), "2026-02-15");
        assert_eq!(ical_to_iso("garbage"), "garbage");
        assert_eq!(ical_to_iso("2026021"), "2026021");
        assert_eq!(ical_to_iso("20260215X120000"), "20260215X120000");
        assert_eq!(ical_to_iso(""), "");
    }

    #[test]
    fn non_ascii_input_does_not_panic() {
        assert_eq!(ical_to_iso("2026年02月15日T12"), "2026年02月15日T12");
        assert_eq!(iso_to_ical_datetime("2026年"), None);
    }

    #[test]
    fn empty_token_maps_to_none() {
        assert_eq!(ical_to_iso_opt(Some("")), None);
        assert_eq!(ical_to_iso_opt(None), None);
        assert_eq!(
            ical_to_iso_opt(Some("20260301")),
            Some("2026-03-01".to_string())
        );
    }

    #[test]
    fn iso_datetime_to_ical() {
        assert_eq!(
            iso_to_ical_datetime("2026-02-15T12:00:00").as_deref(),
            Some("20260215T120000Z")
        );
        assert_eq!(
            iso_to_ical_datetime("2026-02-15 12:00:00").as_deref(),
            Some("20260215T120000Z")
        );
        assert_eq!(
            iso_to_ical_datetime("2026-02-15T12:00:00Z").as_deref(),
            Some("20260215T120000Z")
        );
    }

    #[test]
    fn iso_date_for_timed_field_defaults_to_midnight() {
        assert_eq!(
            iso_to_ical_datetime("2026-02-15").as_deref(),
            Some("20260215T000000Z")
        );
    }

    #[test]
    fn short_time_is_padded_and_long_time_truncated() {
        assert_eq!(
            iso_to_ical_datetime("2026-02-15T12:30").as_deref(),
            Some("20260215T123000Z")
        );
        assert_eq!(
            iso_to_ical_datetime("2026-02-15T12:30:45.123+01:00").as_deref(),
            Some("20260215T123045Z")
        );
    }

    #[test]
    fn unencodable_values_yield_none() {
        assert_eq!(iso_to_ical_datetime("tomorrow"), None);
        assert_eq!(iso_to_ical_date("next week"), None);
        assert_eq!(iso_to_ical_date(""), None);
    }

    #[test]
    fn all_day_takes_first_eight_digits() {
        assert_eq!(
            iso_to_ical_date("2026-02-15T12:00:00").as_deref(),
            Some("20260215")
        );
    }

    #[test]
    fn date_only_detection() {
        assert!(is_date_only("2026-03-01"));
        assert!(is_date_only("20260301"));
        assert!(!is_date_only("2026-03-01T10:00"));
        assert!(!is_date_only("2026-03-01 10:00"));
        assert!(!is_date_only("soon"));
    }

    #[test]
    fn date_property_lines() {
        let all_day = DateProperty::encode_auto("2026-03-01").unwrap();
        assert_eq!(all_day.line("DUE"), "DUE;VALUE=DATE:20260301");

        let timed = DateProperty::encode_auto("2026-03-01T10:00:00").unwrap();
        assert_eq!(timed.line("DUE"), "DUE:20260301T100000Z");

        let forced = DateProperty::encode("2026-03-01T10:00:00", true).unwrap();
        assert_eq!(forced.line("DTSTART"), "DTSTART;VALUE=DATE:20260301");
    }

    #[test]
    fn utc_formatting() {
        let instant = Utc.with_ymd_and_hms(2026, 2, 15, 9, 5, 7).unwrap();
        assert_eq!(format_utc(instant), "20260215T090507Z");
    }
}
