use super::models::CalendarEvent;
use crate::config::ReminderRules;
use crate::error::{config_error, ReminderResult};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::{debug, warn};

/// Parse an offset string in `[+|-]HH:MM` format into seconds east of UTC
pub fn parse_offset(offset_str: &str) -> Option<i32> {
    let (sign, rest) = match offset_str.as_bytes().first()? {
        b'+' => (1, &offset_str[1..]),
        b'-' => (-1, &offset_str[1..]),
        _ => (1, offset_str),
    };
    let parts: Vec<&str> = rest.split(':').collect();
    let is_digits = |part: &&str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if parts.len() != 2 || !parts.iter().all(is_digits) {
        return None;
    }
    let hour = parts[0].parse::<i32>().ok()?;
    let minute = parts[1].parse::<i32>().ok()?;
    if hour > 14 || minute > 59 {
        return None;
    }
    Some(sign * (hour * 3600 + minute * 60))
}

/// What "today" means for the run
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DayAnchor {
    Fixed(FixedOffset),
    Zone(Tz),
}

impl DayAnchor {
    /// Build the anchor from the rules, a named timezone wins over the fixed offset
    pub fn from_rules(rules: &ReminderRules) -> ReminderResult<Self> {
        if let Some(name) = rules.timezone.as_deref().filter(|n| !n.trim().is_empty()) {
            let tz: Tz = name
                .parse()
                .map_err(|_| config_error(&format!("Unknown timezone: {}", name)))?;
            return Ok(DayAnchor::Zone(tz));
        }

        let seconds = parse_offset(&rules.utc_offset)
            .ok_or_else(|| config_error(&format!("Invalid UTC offset: {}", rules.utc_offset)))?;
        let offset = FixedOffset::east_opt(seconds)
            .ok_or_else(|| config_error(&format!("UTC offset out of range: {}", rules.utc_offset)))?;
        Ok(DayAnchor::Fixed(offset))
    }

    /// Local calendar date of the given instant
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        match self {
            DayAnchor::Fixed(offset) => now.with_timezone(offset).date_naive(),
            DayAnchor::Zone(tz) => now.with_timezone(tz).date_naive(),
        }
    }
}

/// Query bounds for a single calendar day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRange {
    pub day: NaiveDate,
    pub time_min: String,
    pub time_max: String,
}

/// Get the UTC bounds of the day after the anchored "today"
pub fn tomorrow_range(now: DateTime<Utc>, anchor: &DayAnchor) -> TimeRange {
    let today = anchor.today(now);
    let tomorrow = today + Duration::days(1);

    let day = tomorrow.format("%Y-%m-%d");
    let range = TimeRange {
        day: tomorrow,
        time_min: format!("{}T00:00:00Z", day),
        time_max: format!("{}T23:59:59Z", day),
    };

    debug!("Now={} anchored today={} search target={}", now, today, tomorrow);
    range
}

/// Format the event start as `HH:MM` in its own offset, or the all-day label
pub fn format_start_time(event: &CalendarEvent, all_day_label: &str) -> String {
    let Some(raw) = event.start.date_time.as_deref() else {
        return all_day_label.to_string();
    };

    match DateTime::parse_from_rfc3339(raw) {
        Ok(start) => start.format("%H:%M").to_string(),
        Err(e) => {
            warn!("Unparseable start time '{}' on event {}: {}", raw, event.id, e);
            all_day_label.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::google_calendar::models::EventTime;
    use chrono::TimeZone;

    fn fixed(hours: i32) -> DayAnchor {
        DayAnchor::Fixed(FixedOffset::east_opt(hours * 3600).unwrap())
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset("+02:00"), Some(7200));
        assert_eq!(parse_offset("02:00"), Some(7200));
        assert_eq!(parse_offset("-05:30"), Some(-(5 * 3600 + 30 * 60)));
        assert_eq!(parse_offset("+00:00"), Some(0));

        assert_eq!(parse_offset(""), None);
        assert_eq!(parse_offset("+2"), None);
        assert_eq!(parse_offset("+15:00"), None);
        assert_eq!(parse_offset("+02:60"), None);
        assert_eq!(parse_offset("+ab:00"), None);

        // Only the leading sign is allowed
        assert_eq!(parse_offset("+-3:00"), None);
        assert_eq!(parse_offset("++02:00"), None);
        assert_eq!(parse_offset("+02:-30"), None);
        assert_eq!(parse_offset("+02:+30"), None);
        assert_eq!(parse_offset("+:30"), None);
    }

    #[test]
    fn test_tomorrow_range_fixed_offset() {
        // 2024-03-10 12:00 UTC is 14:00 at +02:00, same date
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let range = tomorrow_range(now, &fixed(2));
        assert_eq!(range.day, NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
        assert_eq!(range.time_min, "2024-03-11T00:00:00Z");
        assert_eq!(range.time_max, "2024-03-11T23:59:59Z");
    }

    #[test]
    fn test_offset_crosses_midnight() {
        // 22:30 UTC is already the next day at +02:00
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 22, 30, 0).unwrap();
        assert_eq!(tomorrow_range(now, &fixed(2)).time_min, "2024-03-12T00:00:00Z");
        // Bare UTC stays on the 10th
        assert_eq!(tomorrow_range(now, &fixed(0)).time_min, "2024-03-11T00:00:00Z");
    }

    #[test]
    fn test_range_month_and_year_rollover() {
        let now = Utc.with_ymd_and_hms(2024, 2, 28, 8, 0, 0).unwrap();
        assert_eq!(tomorrow_range(now, &fixed(2)).time_max, "2024-02-29T23:59:59Z");

        let now = Utc.with_ymd_and_hms(2024, 12, 31, 8, 0, 0).unwrap();
        assert_eq!(tomorrow_range(now, &fixed(2)).time_min, "2025-01-01T00:00:00Z");
    }

    #[test]
    fn test_range_is_one_day_after_today() {
        let anchor = fixed(2);
        for hour in 0..24 {
            let now = Utc.with_ymd_and_hms(2024, 6, 15, hour, 17, 0).unwrap();
            let range = tomorrow_range(now, &anchor);
            assert_eq!(range.day, anchor.today(now) + Duration::days(1));
            assert!(range.time_min.ends_with("T00:00:00Z"));
            assert!(range.time_max.ends_with("T23:59:59Z"));
            assert_eq!(range.time_min[..10], range.time_max[..10]);
        }
    }

    #[test]
    fn test_anchor_from_rules() {
        let rules = ReminderRules::default();
        assert_eq!(DayAnchor::from_rules(&rules).unwrap(), fixed(2));

        let rules = ReminderRules {
            timezone: Some("Asia/Jerusalem".to_string()),
            ..Default::default()
        };
        assert_eq!(
            DayAnchor::from_rules(&rules).unwrap(),
            DayAnchor::Zone(chrono_tz::Asia::Jerusalem)
        );

        let rules = ReminderRules {
            timezone: Some("Mars/Olympus".to_string()),
            ..Default::default()
        };
        assert!(DayAnchor::from_rules(&rules).is_err());

        let rules = ReminderRules {
            utc_offset: "two hours".to_string(),
            ..Default::default()
        };
        assert!(DayAnchor::from_rules(&rules).is_err());
    }

    #[test]
    fn test_zone_anchor_follows_dst() {
        // Israel is at +03:00 in summer, so 21:30 UTC is already the next day
        let anchor = DayAnchor::Zone(chrono_tz::Asia::Jerusalem);
        let now = Utc.with_ymd_and_hms(2024, 7, 1, 21, 30, 0).unwrap();
        assert_eq!(tomorrow_range(now, &anchor).time_min, "2024-07-03T00:00:00Z");
    }

    #[test]
    fn test_format_start_time() {
        let mut event = CalendarEvent {
            start: EventTime {
                date_time: Some("2024-03-11T09:05:00+02:00".to_string()),
                date: None,
            },
            ..Default::default()
        };
        // Own offset, not converted to UTC
        assert_eq!(format_start_time(&event, "all day"), "09:05");

        event.start.date_time = Some("2024-03-11T17:45:00Z".to_string());
        assert_eq!(format_start_time(&event, "all day"), "17:45");

        event.start = EventTime {
            date_time: None,
            date: Some("2024-03-11".to_string()),
        };
        assert_eq!(format_start_time(&event, "all day"), "all day");

        event.start.date_time = Some("tomorrow morning".to_string());
        assert_eq!(format_start_time(&event, "all day"), "all day");
    }
}
