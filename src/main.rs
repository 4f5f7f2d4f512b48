use tor_reminder::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting appointment reminder run");

    // Failures are logged inside, the scheduler always sees success
    startup::run_best_effort().await;

    Ok(())
}
