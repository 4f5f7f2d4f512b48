use crate::components::google_calendar::time::format_start_time;
use crate::components::google_calendar::CalendarEvent;
use crate::config::ReminderRules;
use crate::error::{config_error, ReminderResult};
use regex::Regex;

use super::message::render_message;

/// A reminder ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub name: String,
    pub phone: String,
    pub time: String,
    pub message: String,
}

/// Why an event got no reminder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    ColorMismatch { color_id: String },
    NoPhoneNumber,
}

/// Outcome of evaluating one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Send(Reminder),
    Skip(SkipReason),
}

/// Compiled form of [`ReminderRules`]
#[derive(Debug, Clone)]
pub struct EventFilter {
    target_color_id: String,
    phone_regex: Regex,
    all_day_label: String,
    message_template: String,
}

impl EventFilter {
    pub fn new(rules: &ReminderRules) -> ReminderResult<Self> {
        let phone_regex = Regex::new(&rules.phone_pattern)
            .map_err(|e| config_error(&format!("Invalid phone pattern: {}", e)))?;

        Ok(Self {
            target_color_id: rules.target_color_id.clone(),
            phone_regex,
            all_day_label: rules.all_day_label.clone(),
            message_template: rules.message_template.clone(),
        })
    }

    /// Events without a color pass, colored ones must match the target
    pub fn color_matches(&self, color_id: Option<&str>) -> bool {
        match color_id {
            None => true,
            Some(id) => id == self.target_color_id,
        }
    }

    /// First phone number in the text, dashes removed.
    ///
    /// Patterns that can match nothing (`(...)?`) would otherwise yield an empty number.
    pub fn extract_phone(&self, text: &str) -> Option<String> {
        self.phone_regex
            .find_iter(text)
            .map(|m| m.as_str().replace('-', ""))
            .find(|phone| !phone.is_empty())
    }

    /// Decide whether the event gets a reminder and build it
    pub fn evaluate(&self, event: &CalendarEvent) -> Decision {
        if !self.color_matches(event.color_id.as_deref()) {
            return Decision::Skip(SkipReason::ColorMismatch {
                color_id: event.color_id.clone().unwrap_or_default(),
            });
        }

        let Some(phone) = event
            .description
            .as_deref()
            .and_then(|description| self.extract_phone(description))
        else {
            return Decision::Skip(SkipReason::NoPhoneNumber);
        };

        let name = event.title().to_string();
        let time = format_start_time(event, &self.all_day_label);
        let message = render_message(&self.message_template, &name, &time);

        Decision::Send(Reminder {
            name,
            phone,
            time,
            message,
        })
    }
}
