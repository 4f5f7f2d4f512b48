use crate::error::{config_error, env_error, ReminderResult};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Calendar queried when `TARGET_CALENDAR_EMAIL` is not set
pub const DEFAULT_CALENDAR_ID: &str = "primary";
/// Default location of the Google credentials file
pub const DEFAULT_CREDENTIALS_FILE: &str = "credentials.json";
/// Default location of the optional reminder rules file
pub const DEFAULT_RULES_FILE: &str = "config/reminder.toml";

/// Lavender
pub const DEFAULT_TARGET_COLOR_ID: &str = "1";
/// Israeli mobile number, `05X-XXXXXXX` or `05X-XXX-XXXX`, dashes optional
pub const DEFAULT_PHONE_PATTERN: &str = r"05\d-?\d{3}-?\d{4}";
/// Offset used to decide what "today" is
pub const DEFAULT_UTC_OFFSET: &str = "+02:00";
/// Shown instead of a start time for all-day events
pub const DEFAULT_ALL_DAY_LABEL: &str = "במהלך היום";
/// Reminder text, `{name}` and `{time}` are substituted per event
pub const DEFAULT_MESSAGE_TEMPLATE: &str = "היי {name},\nיש לך מחר תור ב {time} למספרה \nברח' העבודה 1 בית מספר 3 רמה\"ש, הכניסה למתחם הבתים מרח' העבודה 1 או מרח' המלאכה 18, אפשר לחנות ברח' המלאכה.\nנתראה, טליה אברך.";

/// Environment variable names
pub const WEBHOOK_URL_VAR: &str = "MACRODROID_WEBHOOK_URL";
pub const CALENDAR_ID_VAR: &str = "TARGET_CALENDAR_EMAIL";
pub const CREDENTIALS_FILE_VAR: &str = "GOOGLE_CREDENTIALS_FILE";
pub const RULES_FILE_VAR: &str = "REMINDER_CONFIG_FILE";

/// Main configuration structure for a reminder run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Webhook that relays the SMS
    pub webhook_url: String,
    /// Google Calendar ID to query
    pub calendar_id: String,
    /// Service account key or authorized user token file
    pub credentials_file: PathBuf,
    /// Matching and message rules
    pub rules: ReminderRules,
}

/// Rules deciding which events get a reminder and what it says.
///
/// Every field has a default, so the rules file only needs the keys it overrides:
///
/// ```toml
/// target_color_id = "5"
/// timezone = "Asia/Jerusalem"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderRules {
    /// Events with a different color are skipped; events without a color always pass
    pub target_color_id: String,
    /// Regular expression locating the phone number in the event description
    pub phone_pattern: String,
    /// Fixed offset from UTC in `[+|-]HH:MM` form
    pub utc_offset: String,
    /// IANA timezone name, takes precedence over `utc_offset` when set
    pub timezone: Option<String>,
    /// Placeholder for events without a precise start time
    pub all_day_label: String,
    /// Message body with `{name}` and `{time}` placeholders
    pub message_template: String,
}

impl Default for ReminderRules {
    fn default() -> Self {
        Self {
            target_color_id: DEFAULT_TARGET_COLOR_ID.to_string(),
            phone_pattern: DEFAULT_PHONE_PATTERN.to_string(),
            utc_offset: DEFAULT_UTC_OFFSET.to_string(),
            timezone: None,
            all_day_label: DEFAULT_ALL_DAY_LABEL.to_string(),
            message_template: DEFAULT_MESSAGE_TEMPLATE.to_string(),
        }
    }
}

impl ReminderRules {
    /// Load rules from the default location, falling back to defaults when the file does not exist
    pub fn from_default_file(path: &Path) -> ReminderResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    /// Load rules from a TOML file that must exist
    pub fn from_file(path: &Path) -> ReminderResult<Self> {
        if !path.exists() {
            return Err(config_error(&format!("Rules file {} not found", path.display())));
        }

        let content = fs::read_to_string(path)?;
        let rules: ReminderRules = toml::from_str(&content)?;

        if rules.target_color_id.trim().is_empty() {
            return Err(config_error("target_color_id must not be empty"));
        }

        Ok(rules)
    }
}

impl Config {
    /// Load configuration from environment and rules file
    pub fn load() -> ReminderResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        Self::from_source(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup, normally the process environment
    pub fn from_source<F>(get: F) -> ReminderResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get_non_empty = |key: &str| get(key).filter(|value| !value.trim().is_empty());

        let webhook_url = get_non_empty(WEBHOOK_URL_VAR).ok_or_else(|| env_error(WEBHOOK_URL_VAR))?;

        let calendar_id =
            get_non_empty(CALENDAR_ID_VAR).unwrap_or_else(|| DEFAULT_CALENDAR_ID.to_string());

        let credentials_file = PathBuf::from(
            get_non_empty(CREDENTIALS_FILE_VAR).unwrap_or_else(|| DEFAULT_CREDENTIALS_FILE.to_string()),
        );

        // Only the default location may be absent
        let rules = match get_non_empty(RULES_FILE_VAR) {
            Some(path) => ReminderRules::from_file(Path::new(&path))?,
            None => ReminderRules::from_default_file(Path::new(DEFAULT_RULES_FILE))?,
        };

        Ok(Config {
            webhook_url,
            calendar_id,
            credentials_file,
            rules,
        })
    }
}
