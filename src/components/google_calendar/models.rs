use serde::{Deserialize, Serialize};

/// Calendar event as returned by the `events.list` endpoint, reduced to the fields we read
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    #[serde(default)]
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub color_id: Option<String>,
    #[serde(default)]
    pub start: EventTime,
}

/// Start or end of an event. Timed events carry `date_time`, all-day events carry `date`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    pub date_time: Option<String>,
    pub date: Option<String>,
}

/// One page of an `events.list` response
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EventsPage {
    #[serde(default)]
    pub items: Vec<CalendarEvent>,
    pub next_page_token: Option<String>,
}

impl CalendarEvent {
    /// Summary for display, "No Title" when the event has none
    pub fn title(&self) -> &str {
        self.summary.as_deref().unwrap_or("No Title")
    }
}
