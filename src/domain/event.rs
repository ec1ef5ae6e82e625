use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::{ChapelError, Result};

const GOOGLE_CALENDAR_RENDER: &str = "https://calendar.google.com/calendar/render";

/// Calendar entries are created with a fixed length since the CMS stores
/// only a start time.
pub const EVENT_DURATION_HOURS: i64 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// ISO 8601 date or date-time as authored in the CMS
    pub date: String,
    pub image: Option<String>,
    pub cta_link: String,
}

/// Where and under whose name calendar entries are created.
#[derive(Debug, Clone)]
pub struct CalendarDefaults<'a> {
    pub organizer: &'a str,
    pub location: &'a str,
}

impl Event {
    /// Start of the event in UTC.
    ///
    /// Accepts RFC 3339 timestamps, zone-less date-times (read as UTC) and
    /// plain dates (midnight UTC).
    pub fn starts_at(&self) -> Result<DateTime<Utc>> {
        parse_event_date(&self.date)
    }

    /// `"Sunday, August 10, 2025"`
    pub fn display_date(&self) -> Result<String> {
        Ok(self.starts_at()?.format("%A, %B %-d, %Y").to_string())
    }

    /// Last non-empty path segment of the CTA link, used in detail routes.
    pub fn slug(&self) -> &str {
        self.cta_link
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(&self.cta_link)
    }

    pub fn share_url(&self, base_url: &str) -> String {
        format!("{}/events/{}", base_url.trim_end_matches('/'), self.slug())
    }

    /// Google Calendar "add event" link covering the event's time slot.
    pub fn calendar_url(&self, defaults: &CalendarDefaults<'_>) -> Result<String> {
        let start = self.starts_at()?;
        let end = start + Duration::hours(EVENT_DURATION_HOURS);
        let dates = format!("{}/{}", calendar_timestamp(&start), calendar_timestamp(&end));

        let details = match self.description.as_deref() {
            Some(d) if !d.trim().is_empty() => d.to_string(),
            _ => format!(
                "Join us for {} at {}. All are welcome!",
                self.title, defaults.organizer
            ),
        };

        let mut url = url::Url::parse(GOOGLE_CALENDAR_RENDER)?;
        url.query_pairs_mut()
            .append_pair("action", "TEMPLATE")
            .append_pair("text", &self.title)
            .append_pair("dates", &dates)
            .append_pair("details", &details)
            .append_pair("location", defaults.location);
        Ok(url.into())
    }
}

fn calendar_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y%m%dT%H%M%SZ").to_string()
}

fn parse_event_date(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc())
        .map_err(|_| ChapelError::InvalidDate(s.to_string()))
}
