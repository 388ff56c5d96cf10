use crate::api::RouteApi;
use crate::error::RouteError;
use crate::models::{Airport, ItineraryOffer, RouteQuery};
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct SamplerSettings {
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            max_attempts: 200,
            retry_delay: Duration::ZERO,
        }
    }
}

#[derive(Debug)]
pub enum SamplerState {
    Sampling { attempt: u32 },
    Found { query: RouteQuery, offers: Vec<ItineraryOffer> },
    Exhausted { attempts: u32 },
}

pub struct RouteSampler<'a, A: RouteApi + ?Sized> {
    api: &'a A,
    settings: SamplerSettings,
}

impl<'a, A: RouteApi + ?Sized> RouteSampler<'a, A> {
    pub fn new(api: &'a A, settings: SamplerSettings) -> Self {
        Self { api, settings }
    }

    /// Returns the first sampled pair with offers.
    ///
    /// Fails with [`RouteError::Configuration`] when fewer than two airports
    /// are eligible and with [`RouteError::Exhausted`] once `max_attempts`
    /// pairs came back empty or failed.
    pub async fn find_route<R>(
        &self,
        airports: &[Airport],
        rng: &mut R,
    ) -> Result<(RouteQuery, Vec<ItineraryOffer>), RouteError>
    where
        R: Rng + Send + ?Sized,
    {
        if airports.len() < 2 {
            return Err(RouteError::Configuration(format!(
                "Not enough airports to generate a random route ({} eligible)",
                airports.len()
            )));
        }

        let mut state = SamplerState::Sampling { attempt: 1 };
        loop {
            state = match state {
                SamplerState::Sampling { attempt } if attempt > self.settings.max_attempts => {
                    SamplerState::Exhausted {
                        attempts: self.settings.max_attempts,
                    }
                }
                SamplerState::Sampling { attempt } => self.attempt(attempt, airports, rng).await,
                SamplerState::Found { query, offers } => return Ok((query, offers)),
                SamplerState::Exhausted { attempts } => {
                    return Err(RouteError::Exhausted { attempts })
                }
            };
        }
    }

    async fn attempt<R>(&self, attempt: u32, airports: &[Airport], rng: &mut R) -> SamplerState
    where
        R: Rng + Send + ?Sized,
    {
        let query = draw_pair(airports, rng);
        info!(
            "Attempt {}/{}: checking route {} -> {}",
            attempt,
            self.settings.max_attempts,
            query.origin.display(),
            query.destination.display()
        );

        match self
            .api
            .search_itineraries(&query.origin, &query.destination)
            .await
        {
            Ok(offers) if !offers.is_empty() => return SamplerState::Found { query, offers },
            Ok(_) => debug!("No itineraries for {} -> {}", query.origin.code, query.destination.code),
            Err(e) => warn!(
                "Unable to search route {} -> {}: {}",
                query.origin.code, query.destination.code, e
            ),
        }

        if attempt >= self.settings.max_attempts {
            return SamplerState::Exhausted {
                attempts: self.settings.max_attempts,
            };
        }
        if !self.settings.retry_delay.is_zero() {
            tokio::time::sleep(self.settings.retry_delay).await;
        }
        SamplerState::Sampling {
            attempt: attempt + 1,
        }
    }
}

/// Two distinct airports, uniformly at random. Callers guarantee `len >= 2`.
fn draw_pair<R: Rng + ?Sized>(airports: &[Airport], rng: &mut R) -> RouteQuery {
    let picked: Vec<&Airport> = airports.choose_multiple(rng, 2).collect();
    RouteQuery {
        origin: picked[0].clone(),
        destination: picked[1].clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::models::Leg;
    use crate::payload::ResearchPayload;
    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    struct ScriptedApi {
        responses: Mutex<VecDeque<Result<Vec<ItineraryOffer>, ApiError>>>,
        searches: AtomicU32,
    }

    impl ScriptedApi {
        fn new(responses: Vec<Result<Vec<ItineraryOffer>, ApiError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                searches: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl RouteApi for ScriptedApi {
        async fn list_airports(&self, _min_size: u8) -> Result<Vec<Airport>, ApiError> {
            Ok(Vec::new())
        }

        async fn search_itineraries(
            &self,
            _origin: &Airport,
            _destination: &Airport,
        ) -> Result<Vec<ItineraryOffer>, ApiError> {
            self.searches.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }

        async fn fetch_research(
            &self,
            _origin: &Airport,
            _destination: &Airport,
        ) -> Result<ResearchPayload, ApiError> {
            Ok(ResearchPayload::default())
        }

        async fn fetch_airport(&self, airport: &Airport) -> Result<Airport, ApiError> {
            Ok(airport.clone())
        }
    }

    fn airport(id: u64, code: &str) -> Airport {
        Airport {
            id,
            code: code.to_string(),
            name: None,
            size: 4,
            country_code: None,
            runway_length: None,
            population: None,
            income_per_capita: None,
        }
    }

    fn offer() -> ItineraryOffer {
        ItineraryOffer {
            legs: vec![Leg::default()],
            total_price: Some(100.0),
            cabin_class: "Economy".to_string(),
            sales_score: None,
        }
    }

    fn settings(max_attempts: u32) -> SamplerSettings {
        SamplerSettings {
            max_attempts,
            retry_delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn single_airport_is_a_configuration_error() {
        let api = ScriptedApi::new(vec![]);
        let sampler = RouteSampler::new(&api, settings(10));
        let mut rng = StdRng::seed_from_u64(1);

        let result = sampler.find_route(&[airport(1, "ARN")], &mut rng).await;

        assert!(matches!(result, Err(RouteError::Configuration(_))));
        assert_eq!(api.searches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failures_and_empty_results_are_retried_until_found() {
        let api = ScriptedApi::new(vec![
            Err(ApiError::Network("connection reset".into())),
            Ok(vec![]),
            Ok(vec![offer()]),
        ]);
        let sampler = RouteSampler::new(&api, settings(10));
        let mut rng = StdRng::seed_from_u64(7);
        let airports = vec![airport(1, "ARN"), airport(2, "SIN"), airport(3, "DOH")];

        let (query, offers) = sampler.find_route(&airports, &mut rng).await.unwrap();

        assert_ne!(query.origin.code, query.destination.code);
        assert_eq!(offers.len(), 1);
        assert_eq!(api.searches.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausts_after_attempt_cap() {
        let api = ScriptedApi::new(vec![Err(ApiError::Parse("garbage".into()))]);
        let sampler = RouteSampler::new(&api, settings(25));
        let mut rng = StdRng::seed_from_u64(3);
        let airports = vec![airport(1, "ARN"), airport(2, "SIN")];

        let result = sampler.find_route(&airports, &mut rng).await;

        assert!(matches!(result, Err(RouteError::Exhausted { attempts: 25 })));
        assert_eq!(api.searches.load(Ordering::SeqCst), 25);
    }

    #[tokio::test]
    async fn zero_cap_never_searches() {
        let api = ScriptedApi::new(vec![Ok(vec![offer()])]);
        let sampler = RouteSampler::new(&api, settings(0));
        let mut rng = StdRng::seed_from_u64(5);
        let airports = vec![airport(1, "ARN"), airport(2, "SIN")];

        let result = sampler.find_route(&airports, &mut rng).await;

        assert!(matches!(result, Err(RouteError::Exhausted { attempts: 0 })));
        assert_eq!(api.searches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn last_allowed_attempt_stops_without_counting_past_cap() {
        let api = ScriptedApi::new(vec![Ok(vec![]), Ok(vec![offer()])]);
        let sampler = RouteSampler::new(&api, settings(1));
        let mut rng = StdRng::seed_from_u64(6);
        let airports = vec![airport(1, "ARN"), airport(2, "SIN")];

        let result = sampler.find_route(&airports, &mut rng).await;

        assert!(matches!(result, Err(RouteError::Exhausted { attempts: 1 })));
        assert_eq!(api.searches.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drawn_pairs_are_always_distinct() {
        let airports = vec![airport(1, "ARN"), airport(2, "SIN")];
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let query = draw_pair(&airports, &mut rng);
            assert_ne!(query.origin.code, query.destination.code);
        }
    }
}
