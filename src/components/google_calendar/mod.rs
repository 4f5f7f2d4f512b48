mod client;
pub mod models;
pub mod time;
pub mod token;

pub use client::{GoogleCalendarClient, DEFAULT_API_BASE};
pub use models::CalendarEvent;
pub use time::{tomorrow_range, DayAnchor, TimeRange};
pub use token::TokenManager;
