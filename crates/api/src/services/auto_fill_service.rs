use std::time::Duration;

use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::error::AppError;
use crate::gql::domains::automation::service::auto_fill;
use crate::AppState;

/// Runs the auto-fill engine on a fixed period.
pub struct AutoFillService {
    state: AppState,
    interval: Interval,
}

impl AutoFillService {
    pub fn new(state: AppState, period: Duration) -> Self {
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Self { state, interval }
    }

    /// Start the background auto-fill loop
    pub async fn run(&mut self) {
        info!(
            "Starting auto-fill service (every {}s)",
            self.interval.period().as_secs()
        );

        loop {
            self.interval.tick().await;

            if let Err(e) = self.process().await {
                error!("Error running scheduled auto-fill: {}", e);
            }
        }
    }

    async fn process(&self) -> Result<(), AppError> {
        let report = auto_fill(&self.state).await?;

        if report.assignments_made() > 0 || !report.errors.is_empty() {
            info!(
                assignments = report.assignments_made(),
                errors = report.errors.len(),
                "Scheduled auto-fill placed players"
            );
        } else {
            debug!("Scheduled auto-fill found nothing to do");
        }

        Ok(())
    }
}

/// Spawn the auto-fill service as a background task
pub fn spawn_auto_fill_service(state: AppState, period: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut service = AutoFillService::new(state, period);
        service.run().await;
    })
}
