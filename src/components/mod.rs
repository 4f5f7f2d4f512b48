use crate::error::ReminderResult;
use async_trait::async_trait;
use reqwest::StatusCode;

pub mod google_calendar;
pub mod reminder;
pub mod webhook;

use google_calendar::{CalendarEvent, TimeRange};

/// Source of calendar events for a day
#[async_trait]
pub trait EventSource: Send {
    /// List the events inside the range
    async fn list_events(&mut self, range: &TimeRange) -> ReminderResult<Vec<CalendarEvent>>;
}

/// Delivers a reminder message to a phone number
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send one message and report the relay's response status
    async fn notify(&self, phone: &str, message: &str) -> ReminderResult<StatusCode>;
}
