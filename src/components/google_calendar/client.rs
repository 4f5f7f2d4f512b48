use super::models::{CalendarEvent, EventsPage};
use super::time::TimeRange;
use super::token::TokenManager;
use crate::components::EventSource;
use crate::error::{google_calendar_error, ReminderResult};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/calendar/v3";
const PAGE_SIZE: &str = "250";

/// Reads events from one Google Calendar
pub struct GoogleCalendarClient {
    calendar_id: String,
    api_base: String,
    token_manager: TokenManager,
    client: Client,
}

impl GoogleCalendarClient {
    /// Create a client for the given calendar
    pub fn new(calendar_id: impl Into<String>, token_manager: TokenManager, client: Client) -> Self {
        Self {
            calendar_id: calendar_id.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            token_manager,
            client,
        }
    }

    /// Point the client at a different API root
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Build the `events.list` URL for one page of the range
    pub fn events_url(&self, range: &TimeRange, page_token: Option<&str>) -> ReminderResult<Url> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| google_calendar_error("API base URL cannot have a path"))?
            .pop_if_empty()
            .push("calendars")
            .push(&self.calendar_id)
            .push("events");

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("timeMin", &range.time_min)
                .append_pair("timeMax", &range.time_max)
                .append_pair("singleEvents", "true")
                .append_pair("orderBy", "startTime")
                .append_pair("maxResults", PAGE_SIZE);
            if let Some(token) = page_token {
                query.append_pair("pageToken", token);
            }
        }

        Ok(url)
    }

    /// Get every event in the range, following pagination
    pub async fn fetch_events(&mut self, range: &TimeRange) -> ReminderResult<Vec<CalendarEvent>> {
        let access_token = self.token_manager.get_token().await?;

        info!(
            "Querying range: {} to {} for calendar: {}",
            range.time_min, range.time_max, self.calendar_id
        );

        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let url = self.events_url(range, page_token.as_deref())?;

            let response = self
                .client
                .get(url)
                .bearer_auth(&access_token)
                .send()
                .await
                .map_err(|e| google_calendar_error(&format!("Failed to fetch events: {}", e)))?;

            if !response.status().is_success() {
                let status = response.status();
                let error_body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Could not read error response".to_string());
                return Err(google_calendar_error(&format!(
                    "Failed to fetch events: HTTP {} - {}",
                    status, error_body
                )));
            }

            let page: EventsPage = response.json().await.map_err(|e| {
                google_calendar_error(&format!("Failed to parse events response: {}", e))
            })?;

            debug!("Fetched page with {} events", page.items.len());
            events.extend(page.items);

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        info!("Events found count: {}", events.len());
        Ok(events)
    }
}

#[async_trait]
impl EventSource for GoogleCalendarClient {
    async fn list_events(&mut self, range: &TimeRange) -> ReminderResult<Vec<CalendarEvent>> {
        self.fetch_events(range).await
    }
}
