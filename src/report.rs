use crate::api::RouteApi;
use crate::enricher;
use crate::error::RouteError;
use crate::formatter;
use crate::models::{Airport, ItineraryOffer, RouteDetails, RouteQuery, RouteReport};
use crate::payload::ResearchPayload;
use crate::sampler::{RouteSampler, SamplerSettings};
use crate::selector;
use chrono::{NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

/// Produces one "route of the day" message per call. Holds no state between
/// runs besides its settings, so any scheduler can drive it.
pub struct ReportGenerator<A: RouteApi> {
    api: A,
    min_airport_size: u8,
    sampler: SamplerSettings,
}

impl<A: RouteApi> ReportGenerator<A> {
    pub fn new(api: A, min_airport_size: u8, sampler: SamplerSettings) -> Self {
        Self {
            api,
            min_airport_size,
            sampler,
        }
    }

    pub async fn generate_report(&self, min_size_override: Option<u8>) -> Result<String, RouteError> {
        let mut rng = StdRng::from_entropy();
        let today = Utc::now().date_naive();
        self.generate_report_with(min_size_override, &mut rng, today)
            .await
    }

    /// Same as [`generate_report`](Self::generate_report) with the random
    /// source and report date supplied by the caller.
    pub async fn generate_report_with<R>(
        &self,
        min_size_override: Option<u8>,
        rng: &mut R,
        date: NaiveDate,
    ) -> Result<String, RouteError>
    where
        R: Rng + Send + ?Sized,
    {
        let report = self.build_report(min_size_override, rng).await?;
        Ok(formatter::format_report(&report, date))
    }

    pub async fn build_report<R>(
        &self,
        min_size_override: Option<u8>,
        rng: &mut R,
    ) -> Result<RouteReport, RouteError>
    where
        R: Rng + Send + ?Sized,
    {
        let min_size = min_size_override.unwrap_or(self.min_airport_size);
        let airports = self.api.list_airports(min_size).await.map_err(|e| {
            RouteError::Configuration(format!("Unable to load airport list: {}", e))
        })?;
        info!("{} airports of size {} or larger", airports.len(), min_size);

        let sampler = RouteSampler::new(&self.api, self.sampler.clone());
        let (query, offers) = sampler.find_route(&airports, rng).await?;

        let query = RouteQuery {
            origin: self.with_details(query.origin).await,
            destination: self.with_details(query.destination).await,
        };
        let research = self.research(&query).await;
        let details = enricher::enrich(&query, &research);

        build(query, details, &offers).ok_or_else(|| {
            RouteError::Configuration("sampler returned a route without offers".to_string())
        })
    }

    async fn with_details(&self, airport: Airport) -> Airport {
        match self.api.fetch_airport(&airport).await {
            Ok(details) => airport.merge(details),
            Err(e) => {
                warn!("Failed to fetch airport details for {}: {}", airport.code, e);
                airport
            }
        }
    }

    async fn research(&self, query: &RouteQuery) -> ResearchPayload {
        match self
            .api
            .fetch_research(&query.origin, &query.destination)
            .await
        {
            Ok(research) => research,
            Err(e) => {
                warn!(
                    "Failed to fetch research data for {} -> {}: {}",
                    query.origin.code, query.destination.code, e
                );
                ResearchPayload::default()
            }
        }
    }
}

fn build(
    query: RouteQuery,
    details: RouteDetails,
    offers: &[ItineraryOffer],
) -> Option<RouteReport> {
    let selection = selector::select(offers)?;
    Some(RouteReport {
        flight_type: query.flight_type(),
        query,
        details,
        best_deal: selection.best_deal.clone(),
        best_seller: selection.best_seller.clone(),
    })
}
