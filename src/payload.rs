// MyFly Club payloads drift between versions. Every field is an Option and a
// missing or ill-typed key becomes None instead of failing the document.

use crate::error::ApiError;
use crate::models::{Airport, Amenity, ItineraryOffer, Leg, TransportMode};
use serde::de::{self, DeserializeOwned, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::debug;

const ITINERARY_KEYS: [&str; 5] = ["tickets", "itineraries", "results", "routes", "options"];

pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(match_field_case::<T>(value)).ok())
}

/// Accepts JSON numbers as well as numeric strings such as `"12,500"`.
pub fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value))
}

fn number_from_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Field names the derived `Deserialize` of `T` asks for. Empty for anything
/// that is not a plain struct.
fn expected_fields<T: DeserializeOwned>() -> &'static [&'static str] {
    struct FieldRecorder<'a>(&'a mut &'static [&'static str]);

    impl<'de, 'a> Deserializer<'de> for FieldRecorder<'a> {
        type Error = de::value::Error;

        fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, Self::Error> {
            Err(de::Error::custom("not a struct"))
        }

        fn deserialize_struct<V: Visitor<'de>>(
            self,
            _name: &'static str,
            fields: &'static [&'static str],
            _visitor: V,
        ) -> Result<V::Value, Self::Error> {
            *self.0 = fields;
            Err(de::Error::custom("fields recorded"))
        }

        serde::forward_to_deserialize_any! {
            bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
            bytes byte_buf option unit unit_struct newtype_struct seq tuple
            tuple_struct map enum identifier ignored_any
        }
    }

    let mut fields: &'static [&'static str] = &[];
    let _ = T::deserialize(FieldRecorder(&mut fields));
    fields
}

fn folded(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Renames object keys that only differ from a field of `T` by case or
/// separators (`CountryCode`, `country_code` -> `countryCode`). Exact keys
/// always win over folded ones.
pub fn match_field_case<T: DeserializeOwned>(value: Value) -> Value {
    let Value::Object(map) = value else {
        return value;
    };
    let fields = expected_fields::<T>();
    if fields.is_empty() {
        return Value::Object(map);
    }

    let (exact, other): (Vec<_>, Vec<_>) = map
        .into_iter()
        .partition(|(key, _)| fields.contains(&key.as_str()));
    let mut matched: Map<String, Value> = exact.into_iter().collect();
    for (key, value) in other {
        let key_folded = folded(&key);
        match fields.iter().find(|field| folded(field) == key_folded) {
            Some(field) if !matched.contains_key(*field) => {
                matched.insert(field.to_string(), value);
            }
            _ => {
                matched.insert(key, value);
            }
        }
    }
    Value::Object(matched)
}

/// Deserializes `value` as `T` after [`match_field_case`].
pub fn from_loose_value<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(match_field_case::<T>(value))
}

pub fn as_count(value: f64) -> Option<u64> {
    (value >= 0.0).then(|| value.round() as u64)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAirport {
    #[serde(default, deserialize_with = "lenient_number")]
    pub id: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub iata: Option<String>,
    #[serde(default, rename = "IATA", deserialize_with = "lenient")]
    pub iata_upper: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub size: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub airport_size: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub scale: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub country_code: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub country: Option<CountryField>,
    #[serde(default, deserialize_with = "lenient")]
    pub runways: Option<Vec<RawRunway>>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub runway_length: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub max_runway_length: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub population: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub income: Option<f64>,
    #[serde(default, rename = "incomePerCapitaPPP", deserialize_with = "lenient_number")]
    pub income_per_capita_ppp: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub catchment: Option<RawCatchment>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CountryField {
    Code(String),
    Detail {
        #[serde(default, deserialize_with = "lenient")]
        code: Option<String>,
        #[serde(default, deserialize_with = "lenient")]
        iso2: Option<String>,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRunway {
    #[serde(default, deserialize_with = "lenient_number")]
    pub length: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub length_meters: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawCatchment {
    #[serde(default, deserialize_with = "lenient_number")]
    pub population: Option<f64>,
    #[serde(default, rename = "incomePerCapitaPPP", deserialize_with = "lenient_number")]
    pub income_per_capita_ppp: Option<f64>,
    #[serde(default, rename = "incomePPP", deserialize_with = "lenient_number")]
    pub income_ppp: Option<f64>,
}

impl RawAirport {
    /// Airports without a usable id or code cannot be queried and are dropped.
    pub fn into_airport(self) -> Option<Airport> {
        let id = self.id.and_then(as_count).filter(|id| *id > 0)?;
        let code = non_empty(self.iata)
            .or_else(|| non_empty(self.iata_upper))
            .or_else(|| non_empty(self.code))?;

        let country_code = non_empty(self.country_code).or_else(|| match self.country {
            Some(CountryField::Code(code)) => non_empty(Some(code)),
            Some(CountryField::Detail { code, iso2 }) => non_empty(code).or_else(|| non_empty(iso2)),
            None => None,
        });

        let longest_runway = self
            .runways
            .unwrap_or_default()
            .into_iter()
            .filter_map(|r| r.length.or(r.length_meters))
            .filter(|len| *len > 0.0)
            .fold(None, |longest: Option<f64>, len| {
                Some(longest.map_or(len, |l| l.max(len)))
            });
        let runway_length = longest_runway
            .or(self.runway_length)
            .or(self.max_runway_length)
            .filter(|len| *len > 0.0)
            .and_then(as_count)
            .map(|m| m as u32);

        let (catchment_population, catchment_income) = match self.catchment {
            Some(c) => (c.population, c.income_per_capita_ppp.or(c.income_ppp)),
            None => (None, None),
        };

        Some(Airport {
            id,
            code: code.to_uppercase(),
            name: non_empty(self.name),
            size: self
                .size
                .or(self.scale)
                .or(self.airport_size)
                .and_then(as_count)
                .map_or(0, |s| s.min(u8::MAX as u64) as u8),
            country_code: country_code.map(|c| c.to_uppercase()),
            runway_length,
            population: catchment_population.or(self.population).and_then(as_count),
            income_per_capita: catchment_income
                .or(self.income_per_capita_ppp)
                .or(self.income),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLeg {
    #[serde(default, deserialize_with = "lenient")]
    pub from_airport_iata: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub to_airport_iata: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub from_airport_code: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub to_airport_code: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub transport_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub airline_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub flight_code: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub airplane_model_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub duration: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub computed_quality: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub quality: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub features: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub link_class: Option<String>,
}

fn transport_mode(kind: Option<&str>) -> TransportMode {
    match kind.map(|k| k.trim().to_ascii_uppercase()).as_deref() {
        Some("GENERIC_TRANSIT") | Some("GROUND") | Some("BUS") => TransportMode::Ground,
        Some("TRAIN") | Some("RAIL") => TransportMode::Train,
        _ => TransportMode::Flight,
    }
}

pub fn amenities(features: &[String]) -> Vec<Amenity> {
    let mut found = Vec::new();
    let mut push = |amenity: Amenity| {
        if !found.contains(&amenity) {
            found.push(amenity);
        }
    };
    for feature in features {
        let feature = feature.to_ascii_uppercase();
        match feature.as_str() {
            "IFE" => push(Amenity::Ife),
            "WIFI" => push(Amenity::Wifi),
            "POWER_OUTLET" | "POWER" => push(Amenity::PowerOutlet),
            f if f.contains("MEAL") && f.contains("HOT") => push(Amenity::HotMeal),
            f if f.contains("MEAL") || f.contains("BEVERAGE") => push(Amenity::Beverage),
            _ => {}
        }
    }
    found
}

impl From<RawLeg> for Leg {
    fn from(raw: RawLeg) -> Self {
        Self {
            origin: non_empty(raw.from_airport_iata.or(raw.from_airport_code)),
            destination: non_empty(raw.to_airport_iata.or(raw.to_airport_code)),
            mode: transport_mode(raw.transport_type.as_deref()),
            carrier: non_empty(raw.airline_name),
            flight_number: non_empty(raw.flight_code),
            aircraft: non_empty(raw.airplane_model_name),
            duration_minutes: raw.duration.and_then(as_count).map(|m| m as u32),
            quality: raw
                .computed_quality
                .or(raw.quality)
                .and_then(as_count)
                .map(|q| q as u32),
            amenities: amenities(&raw.features.unwrap_or_default()),
            price: raw.price.filter(|p| *p >= 0.0),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItinerary {
    #[serde(default, deserialize_with = "lenient")]
    pub route: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient")]
    pub legs: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient")]
    pub segments: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub total_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub sales: Option<SalesField>,
    #[serde(default, deserialize_with = "lenient")]
    pub bookings: Option<SalesField>,
    #[serde(default, deserialize_with = "lenient")]
    pub popularity: Option<SalesField>,
    #[serde(default, deserialize_with = "lenient")]
    pub demand: Option<SalesField>,
    #[serde(default, deserialize_with = "lenient")]
    pub score: Option<SalesField>,
    #[serde(default, deserialize_with = "lenient")]
    pub ranking: Option<SalesField>,
}

/// A sales figure is either a number or a breakdown whose numeric values are
/// averaged, e.g. `{"economy": 30, "business": 50}` scores 40.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SalesField {
    Score(f64),
    Text(String),
    Breakdown(Map<String, Value>),
}

impl SalesField {
    pub fn score(&self) -> Option<f64> {
        match self {
            SalesField::Score(score) => Some(*score).filter(|s| s.is_finite()),
            SalesField::Text(text) => number_from_value(&Value::String(text.clone())),
            SalesField::Breakdown(map) => {
                let values: Vec<f64> = map.values().filter_map(Value::as_f64).collect();
                (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
            }
        }
    }
}

fn cabin_label(raw: &str) -> String {
    let lower = raw.trim().replace('_', " ").to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "Economy".to_string(),
    }
}

impl RawItinerary {
    /// Itineraries without legs are not bookable and yield `None`.
    pub fn into_offer(self) -> Option<ItineraryOffer> {
        let raw_legs: Vec<RawLeg> = [self.route, self.legs, self.segments]
            .into_iter()
            .flatten()
            .map(|items| items_of::<RawLeg>(items, "leg"))
            .find(|legs| !legs.is_empty())?;

        let cabin_class = raw_legs
            .iter()
            .find_map(|leg| non_empty(leg.link_class.clone()))
            .map(|class| cabin_label(&class))
            .unwrap_or_else(|| "Economy".to_string());

        let legs: Vec<Leg> = raw_legs.into_iter().map(Leg::from).collect();
        let leg_total: f64 = legs.iter().filter_map(|l| l.price).sum();
        let total_price = if leg_total > 0.0 {
            Some(leg_total)
        } else {
            self.price.or(self.total_price).filter(|p| *p >= 0.0)
        };

        Some(ItineraryOffer {
            legs,
            total_price,
            cabin_class,
            sales_score: [
                self.sales,
                self.bookings,
                self.popularity,
                self.demand,
                self.score,
                self.ranking,
            ]
            .iter()
            .flatten()
            .find_map(SalesField::score),
        })
    }
}

fn items_of<T: DeserializeOwned>(items: Vec<Value>, what: &str) -> Vec<T> {
    items
        .into_iter()
        .filter_map(|item| match from_loose_value::<T>(item) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                debug!("Skipping malformed {} entry: {}", what, e);
                None
            }
        })
        .collect()
}

/// `/airports` answers with either a bare array or `{"airports": [...]}`.
pub fn parse_airports(value: Value) -> Result<Vec<Airport>, ApiError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("airports") {
            Some(Value::Array(items)) => items,
            _ => return Err(ApiError::Parse("airport list missing 'airports' array".into())),
        },
        other => {
            return Err(ApiError::Parse(format!(
                "unexpected airport list payload: {}",
                type_name(&other)
            )))
        }
    };

    Ok(items_of::<RawAirport>(items, "airport")
        .into_iter()
        .filter_map(RawAirport::into_airport)
        .collect())
}

/// `/search-route` answers with either a bare array of itineraries or an
/// object carrying them under one of several keys. An object without any of
/// those keys means no offers.
pub fn parse_offers(value: Value) -> Result<Vec<ItineraryOffer>, ApiError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => ITINERARY_KEYS
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) if !items.is_empty() => Some(items),
                _ => None,
            })
            .unwrap_or_default(),
        Value::Null => Vec::new(),
        other => {
            return Err(ApiError::Parse(format!(
                "unexpected search payload: {}",
                type_name(&other)
            )))
        }
    };

    Ok(items_of::<RawItinerary>(items, "itinerary")
        .into_iter()
        .filter_map(RawItinerary::into_offer)
        .collect())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DistanceField {
    Km(f64),
    Breakdown(DistanceBreakdown),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceBreakdown {
    #[serde(default, deserialize_with = "lenient_number")]
    pub direct: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub direct_km: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub km: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AffinityField {
    Text(String),
    Labels(Vec<String>),
    List(Vec<RawAffinity>),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAffinity {
    #[serde(default, deserialize_with = "lenient_number")]
    pub value: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub delta: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DemandField {
    List(Vec<Value>),
    Tiers(DemandTiers),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DemandTiers {
    #[serde(default, deserialize_with = "lenient_number")]
    pub economy: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub eco: Option<f64>,
    #[serde(default, rename = "Y", deserialize_with = "lenient_number")]
    pub y: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub business: Option<f64>,
    #[serde(default, rename = "C", deserialize_with = "lenient_number")]
    pub c: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub first: Option<f64>,
    #[serde(default, rename = "F", deserialize_with = "lenient_number")]
    pub f: Option<f64>,
}

impl DemandField {
    pub fn tier(&self, index: usize) -> Option<f64> {
        match self {
            DemandField::List(values) => values.get(index).and_then(number_from_value),
            DemandField::Tiers(t) => match index {
                0 => t.economy.or(t.eco).or(t.y),
                1 => t.business.or(t.c),
                2 => t.first.or(t.f),
                _ => None,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AirlineField {
    Name(String),
    Detail {
        #[serde(default, deserialize_with = "lenient")]
        name: Option<String>,
        #[serde(default, deserialize_with = "lenient")]
        code: Option<String>,
    },
}

impl AirlineField {
    pub fn name(self) -> Option<String> {
        match self {
            AirlineField::Name(name) => non_empty(Some(name)),
            AirlineField::Detail { name, code } => non_empty(name).or_else(|| non_empty(code)),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLink {
    #[serde(default, deserialize_with = "lenient")]
    pub airline: Option<AirlineField>,
    #[serde(default, deserialize_with = "lenient")]
    pub carrier: Option<AirlineField>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub frequency: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub flights_per_week: Option<f64>,
}

/// `/research-link` payload. Interpretation of these fields lives in the
/// enricher.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchPayload {
    #[serde(default, deserialize_with = "lenient")]
    pub distance: Option<DistanceField>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub distance_km: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub relationship: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub relationship_between_countries: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub affinities: Option<AffinityField>,
    #[serde(default, deserialize_with = "lenient")]
    pub affinity: Option<AffinityField>,
    #[serde(default, deserialize_with = "lenient")]
    pub direct_demand: Option<DemandField>,
    #[serde(default, deserialize_with = "lenient")]
    pub demand: Option<DemandField>,
    #[serde(default, deserialize_with = "lenient")]
    pub existing_links: Option<Vec<RawLink>>,
    #[serde(default, deserialize_with = "lenient")]
    pub links: Option<Vec<RawLink>>,
    #[serde(default, deserialize_with = "lenient")]
    pub direct_links: Option<Vec<RawLink>>,
}

impl ResearchPayload {
    /// Anything that is not a JSON object carries no research data.
    pub fn from_value(value: Value) -> Result<Self, ApiError> {
        match value {
            Value::Object(_) => Ok(from_loose_value(value)?),
            _ => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn airport_list_accepts_wrapped_and_bare_arrays() {
        let bare = json!([{ "id": 1, "iata": "ARN", "size": 4, "countryCode": "SE" }]);
        let wrapped = json!({ "airports": [{ "id": 2, "iata": "SIN", "size": 5 }] });

        assert_eq!(parse_airports(bare).unwrap()[0].code, "ARN");
        assert_eq!(parse_airports(wrapped).unwrap()[0].code, "SIN");
        assert!(parse_airports(json!("nope")).is_err());
    }

    #[test]
    fn airport_without_id_or_code_is_dropped() {
        let airports = parse_airports(json!([
            { "iata": "ARN", "size": 4 },
            { "id": 7, "size": 4 },
            { "id": 8, "code": "sin", "size": "5" },
            42
        ]))
        .unwrap();

        assert_eq!(airports.len(), 1);
        assert_eq!(airports[0].code, "SIN");
        assert_eq!(airports[0].size, 5);
    }

    #[test]
    fn airport_details_prefer_longest_runway_and_catchment() {
        let raw: RawAirport = serde_json::from_value(json!({
            "id": 3,
            "iata": "ARN",
            "name": "Stockholm Arlanda",
            "country": { "code": "se" },
            "runways": [{ "length": 2500 }, { "length": 3301 }, { "length": "bad" }],
            "runwayLength": 1000,
            "population": 10,
            "catchment": { "population": 2417000, "incomePerCapitaPPP": 61000.0 }
        }))
        .unwrap();
        let airport = raw.into_airport().unwrap();

        assert_eq!(airport.runway_length, Some(3301));
        assert_eq!(airport.population, Some(2_417_000));
        assert_eq!(airport.income_per_capita, Some(61000.0));
        assert_eq!(airport.country_code.as_deref(), Some("SE"));
    }

    #[test]
    fn offers_sum_leg_prices_and_drop_legless_itineraries() {
        let offers = parse_offers(json!([
            {
                "route": [
                    { "fromAirportIata": "ARN", "toAirportIata": "DOH", "price": 400,
                      "transportType": "FLIGHT", "features": ["IFE", "WIFI", "HOT_MEAL_SERVICE"],
                      "linkClass": "ECONOMY" },
                    { "fromAirportIata": "DOH", "toAirportIata": "SIN", "price": 338 }
                ],
                "sales": 40
            },
            { "route": [] },
            { "price": 100 }
        ]))
        .unwrap();

        assert_eq!(offers.len(), 1);
        let offer = &offers[0];
        assert_eq!(offer.total_price, Some(738.0));
        assert_eq!(offer.sales_score, Some(40.0));
        assert_eq!(offer.cabin_class, "Economy");
        assert_eq!(offer.stops(), vec!["ARN", "DOH", "SIN"]);
        assert_eq!(
            offer.legs[0].amenities,
            vec![Amenity::Ife, Amenity::Wifi, Amenity::HotMeal]
        );
    }

    #[test]
    fn offers_found_under_wrapper_keys() {
        let payload = json!({
            "tickets": [],
            "itineraries": [{ "legs": [{ "fromAirportIata": "A", "toAirportIata": "B" }], "price": 90 }]
        });
        let offers = parse_offers(payload).unwrap();
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].total_price, Some(90.0));

        assert!(parse_offers(json!({ "message": "no route" })).unwrap().is_empty());
        assert!(parse_offers(json!(12)).is_err());
    }

    #[test]
    fn research_fields_with_wrong_types_degrade_individually() {
        let research = ResearchPayload::from_value(json!({
            "distance": "far",
            "relationship": 2,
            "directDemand": { "economy": 120, "business": "n/a" },
            "existingLinks": "none"
        }))
        .unwrap();

        assert!(research.distance.is_none());
        assert_eq!(research.relationship, Some(2.0));
        let demand = research.direct_demand.unwrap();
        assert_eq!(demand.tier(0), Some(120.0));
        assert_eq!(demand.tier(1), None);
        assert!(research.existing_links.is_none());
    }

    #[test]
    fn keys_match_fields_regardless_of_case() {
        let airports = parse_airports(json!([
            { "ID": 4, "IATA": "got", "Scale": 3, "CountryCode": "se", "Population": 1000 },
            { "id": 5, "iata": "ARN", "Size": 4, "country_code": "SE" }
        ]))
        .unwrap();

        assert_eq!(airports[0].code, "GOT");
        assert_eq!(airports[0].size, 3);
        assert_eq!(airports[0].country_code.as_deref(), Some("SE"));
        assert_eq!(airports[0].population, Some(1000));
        assert_eq!(airports[1].size, 4);
        assert_eq!(airports[1].country_code.as_deref(), Some("SE"));
    }

    #[test]
    fn exact_key_wins_over_case_variant() {
        let matched = match_field_case::<RawRunway>(json!({ "Length": 10, "length": 3000 }));
        let runway: RawRunway = serde_json::from_value(matched).unwrap();
        assert_eq!(runway.length, Some(3000.0));
    }

    #[test]
    fn airport_size_read_from_scale() {
        let airports = parse_airports(json!([{ "id": 9, "iata": "VBY", "Scale": 2 }])).unwrap();
        assert_eq!(airports[0].size, 2);
    }

    #[test]
    fn zero_length_runways_are_ignored() {
        let all_zero: RawAirport = serde_json::from_value(json!({
            "id": 1, "iata": "XXX", "runways": [{ "length": 0 }, { "length": "0" }]
        }))
        .unwrap();
        assert_eq!(all_zero.into_airport().unwrap().runway_length, None);

        let mixed: RawAirport = serde_json::from_value(json!({
            "id": 2, "iata": "YYY", "runways": [{ "length": 0 }, { "length": 1800 }]
        }))
        .unwrap();
        assert_eq!(mixed.into_airport().unwrap().runway_length, Some(1800));
    }

    #[test]
    fn sales_score_from_aliases_and_breakdowns() {
        let leg = json!([{ "fromAirportIata": "A", "toAirportIata": "B" }]);
        let offers = parse_offers(json!([
            { "route": leg, "Demand": 12 },
            { "route": leg, "ranking": "7" },
            { "route": leg, "sales": { "economy": 30, "business": 50, "note": "x" } },
            { "route": leg, "sales": {}, "score": 3 },
            { "route": leg }
        ]))
        .unwrap();

        let scores: Vec<Option<f64>> = offers.iter().map(|o| o.sales_score).collect();
        assert_eq!(scores, vec![Some(12.0), Some(7.0), Some(40.0), Some(3.0), None]);
    }

    #[test]
    fn leg_keys_in_other_cases_are_read() {
        let offers = parse_offers(json!([{
            "Route": [{ "FromAirportIata": "ARN", "to_airport_iata": "SIN", "Price": 500 }]
        }]))
        .unwrap();

        assert_eq!(offers[0].stops(), vec!["ARN", "SIN"]);
        assert_eq!(offers[0].total_price, Some(500.0));
    }
}
