use crate::api::RouteApi;
use crate::publisher::Publisher;
use crate::report::ReportGenerator;
use std::future::Future;
use std::time::Duration;
use tracing::{error, info};

pub fn interval_from_hours(hours: u64) -> Duration {
    Duration::from_secs(hours.max(1).saturating_mul(60 * 60))
}

/// Generates and publishes a report every `interval` until `shutdown`
/// resolves. A run that is still in progress at shutdown is abandoned.
pub async fn run_until<A, F>(
    generator: &ReportGenerator<A>,
    publisher: &dyn Publisher,
    min_size_override: Option<u8>,
    interval: Duration,
    shutdown: F,
) where
    A: RouteApi,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        let cycle = async {
            publish_once(generator, publisher, min_size_override).await;
            info!("Next route in {} hours", interval.as_secs() / 3600);
            tokio::time::sleep(interval).await;
        };

        tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!("Shutdown requested");
                return;
            }
            _ = cycle => {}
        }
    }
}

// Failures are logged; the schedule keeps going
async fn publish_once<A: RouteApi>(
    generator: &ReportGenerator<A>,
    publisher: &dyn Publisher,
    min_size_override: Option<u8>,
) {
    match generator.generate_report(min_size_override).await {
        Ok(message) => {
            if let Err(e) = publisher.publish(&message).await {
                error!("Failed to publish route message: {}", e);
            }
        }
        Err(e) => error!("Failed to generate daily route message: {}", e),
    }
}
