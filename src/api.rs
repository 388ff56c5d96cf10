use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::models::{Airport, ItineraryOffer};
use crate::payload::{self, RawAirport, ResearchPayload};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::info;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) \
    AppleWebKit/537.36 (KHTML, like Gecko) \
    Chrome/129.0.0.0 Safari/537.36";

/// The MyFly Club endpoints the route pipeline reads from.
#[async_trait]
pub trait RouteApi: Send + Sync {
    async fn list_airports(&self, min_size: u8) -> Result<Vec<Airport>, ApiError>;

    /// An empty vector means the pair has no offers; it is not an error.
    async fn search_itineraries(
        &self,
        origin: &Airport,
        destination: &Airport,
    ) -> Result<Vec<ItineraryOffer>, ApiError>;

    async fn fetch_research(
        &self,
        origin: &Airport,
        destination: &Airport,
    ) -> Result<ResearchPayload, ApiError>;

    /// Detail record for a single airport (runways, catchment).
    async fn fetch_airport(&self, airport: &Airport) -> Result<Airport, ApiError>;
}

pub struct MyFlyClient {
    client: Client,
    base_url: String,
}

impl MyFlyClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn request_json(&self, path: &str) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                url,
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl RouteApi for MyFlyClient {
    async fn list_airports(&self, min_size: u8) -> Result<Vec<Airport>, ApiError> {
        info!("Downloading airport catalogue from MyFly Club");
        let airports = payload::parse_airports(self.request_json("/airports").await?)?;

        Ok(airports
            .into_iter()
            .filter(|airport| airport.size >= min_size)
            .collect())
    }

    async fn search_itineraries(
        &self,
        origin: &Airport,
        destination: &Airport,
    ) -> Result<Vec<ItineraryOffer>, ApiError> {
        let path = format!("/search-route/{}/{}", origin.id, destination.id);
        payload::parse_offers(self.request_json(&path).await?)
    }

    async fn fetch_research(
        &self,
        origin: &Airport,
        destination: &Airport,
    ) -> Result<ResearchPayload, ApiError> {
        let path = format!("/research-link/{}/{}", origin.id, destination.id);
        ResearchPayload::from_value(self.request_json(&path).await?)
    }

    async fn fetch_airport(&self, airport: &Airport) -> Result<Airport, ApiError> {
        let path = format!("/airports/{}", airport.id);
        let raw: RawAirport = payload::from_loose_value(self.request_json(&path).await?)?;

        // Detail records sometimes omit the identifiers the list already gave us.
        let raw = RawAirport {
            id: raw.id.or(Some(airport.id as f64)),
            iata: raw.iata.or_else(|| Some(airport.code.clone())),
            ..raw
        };
        raw.into_airport()
            .ok_or_else(|| ApiError::Parse(format!("airport {} detail has no code", airport.id)))
    }
}
