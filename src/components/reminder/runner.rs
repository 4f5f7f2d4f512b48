use super::filter::{Decision, EventFilter, SkipReason};
use crate::components::google_calendar::{tomorrow_range, DayAnchor};
use crate::components::{EventSource, Notifier};
use crate::error::ReminderResult;
use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

/// Counts for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub events_found: usize,
    pub reminders_sent: usize,
    pub webhook_failures: usize,
    pub skipped_color: usize,
    pub skipped_no_phone: usize,
}

/// Fetch tomorrow's events and send a reminder for each matching one.
///
/// Only fetching errors abort the run. A failed webhook call is logged and counted,
/// and the remaining events are still processed.
pub async fn run_reminders(
    filter: &EventFilter,
    anchor: &DayAnchor,
    source: &mut dyn EventSource,
    notifier: &dyn Notifier,
    now: DateTime<Utc>,
) -> ReminderResult<RunSummary> {
    let range = tomorrow_range(now, anchor);
    info!("Search target: {}", range.day);

    let events = source.list_events(&range).await?;
    let mut summary = RunSummary {
        events_found: events.len(),
        ..Default::default()
    };

    if events.is_empty() {
        info!("No events found in range");
        return Ok(summary);
    }

    for event in &events {
        debug!(
            "Checking event: {} | Color: {}",
            event.title(),
            event.color_id.as_deref().unwrap_or("none")
        );

        match filter.evaluate(event) {
            Decision::Skip(SkipReason::ColorMismatch { color_id }) => {
                debug!("Skipped {} (color {} mismatch)", event.title(), color_id);
                summary.skipped_color += 1;
            }
            Decision::Skip(SkipReason::NoPhoneNumber) => {
                debug!("Skipped {} (no phone number)", event.title());
                summary.skipped_no_phone += 1;
            }
            Decision::Send(reminder) => {
                info!("Match: {} at {}, phone {}", reminder.name, reminder.time, reminder.phone);
                match notifier.notify(&reminder.phone, &reminder.message).await {
                    Ok(status) if status.is_success() => summary.reminders_sent += 1,
                    Ok(_) => summary.webhook_failures += 1,
                    Err(e) => {
                        error!("Error sending webhook for {}: {}", reminder.name, e);
                        summary.webhook_failures += 1;
                    }
                }
            }
        }
    }

    info!(
        "Run finished: {} events, {} sent, {} failed, {} skipped by color, {} without phone",
        summary.events_found,
        summary.reminders_sent,
        summary.webhook_failures,
        summary.skipped_color,
        summary.skipped_no_phone
    );

    Ok(summary)
}
