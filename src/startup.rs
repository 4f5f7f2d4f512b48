use crate::components::google_calendar::{DayAnchor, GoogleCalendarClient, TokenManager};
use crate::components::reminder::{run_reminders, EventFilter, RunSummary};
use crate::components::webhook::WebhookNotifier;
use crate::config::Config;
use crate::error::{Error, ReminderResult};
use chrono::Utc;
use reqwest::Client;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Run once against the live calendar and webhook
pub async fn run(config: Config) -> ReminderResult<RunSummary> {
    info!("Webhook configured: {}", !config.webhook_url.is_empty());

    let filter = EventFilter::new(&config.rules)?;
    let anchor = DayAnchor::from_rules(&config.rules)?;

    let client = Client::new();
    let token_manager = TokenManager::from_file(&config.credentials_file, client.clone())?;
    let mut calendar = GoogleCalendarClient::new(config.calendar_id.clone(), token_manager, client.clone());
    let notifier = WebhookNotifier::new(config.webhook_url.clone(), client);

    run_reminders(&filter, &anchor, &mut calendar, &notifier, Utc::now()).await
}

/// Run with the best-effort policy: every failure is logged, none is returned
pub async fn run_best_effort() {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return;
        }
    };

    if let Err(e) = run(config).await {
        error!("Reminder run failed: {}", e);
    }
}
