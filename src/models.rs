#[derive(Debug, Clone)]
pub struct Airport {
    pub id: u64,
    pub code: String,
    pub name: Option<String>,
    pub size: u8,
    pub country_code: Option<String>,
    /// Longest runway in metres.
    pub runway_length: Option<u32>,
    pub population: Option<u64>,
    pub income_per_capita: Option<f64>,
}

impl Airport {
    /// Overlays values from the detail endpoint; anything the detail payload
    /// lacks keeps the value from the airport list.
    pub fn merge(self, details: Airport) -> Airport {
        Airport {
            id: self.id,
            code: self.code,
            name: details.name.or(self.name),
            size: self.size.max(details.size),
            country_code: details.country_code.or(self.country_code),
            runway_length: details.runway_length.or(self.runway_length),
            population: details.population.or(self.population),
            income_per_capita: details.income_per_capita.or(self.income_per_capita),
        }
    }

    pub fn display(&self) -> String {
        match &self.name {
            Some(name) => format!("{} ({})", self.code, name),
            None => self.code.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RouteQuery {
    pub origin: Airport,
    pub destination: Airport,
}

impl PartialEq for RouteQuery {
    fn eq(&self, other: &Self) -> bool {
        self.origin.code == other.origin.code && self.destination.code == other.destination.code
    }
}

impl Eq for RouteQuery {}

impl RouteQuery {
    pub fn flight_type(&self) -> FlightType {
        FlightType::between(&self.origin, &self.destination)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightType {
    Domestic,
    International,
}

impl FlightType {
    pub fn between(origin: &Airport, destination: &Airport) -> Self {
        if origin.country_code == destination.country_code {
            FlightType::Domestic
        } else {
            FlightType::International
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FlightType::Domestic => "Domestic",
            FlightType::International => "International",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportMode {
    #[default]
    Flight,
    Ground,
    Train,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Amenity {
    HotMeal,
    Beverage,
    Ife,
    Wifi,
    PowerOutlet,
}

impl Amenity {
    pub fn label(&self) -> &'static str {
        match self {
            Amenity::HotMeal => "hot meal service",
            Amenity::Beverage => "beverage service",
            Amenity::Ife => "IFE",
            Amenity::Wifi => "wifi",
            Amenity::PowerOutlet => "power outlet",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Leg {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub mode: TransportMode,
    pub carrier: Option<String>,
    pub flight_number: Option<String>,
    pub aircraft: Option<String>,
    pub duration_minutes: Option<u32>,
    pub quality: Option<u32>,
    pub amenities: Vec<Amenity>,
    pub price: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct ItineraryOffer {
    pub legs: Vec<Leg>,
    pub total_price: Option<f64>,
    pub cabin_class: String,
    pub sales_score: Option<f64>,
}

impl ItineraryOffer {
    /// Airport codes in travel order with repeats removed, e.g. `ARN - DOH - SIN`.
    pub fn stops(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = Vec::new();
        for leg in &self.legs {
            for code in [leg.origin.as_deref(), leg.destination.as_deref()]
                .into_iter()
                .flatten()
            {
                if !codes.contains(&code) {
                    codes.push(code);
                }
            }
        }
        codes
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Affinity {
    pub delta: i32,
    pub label: String,
}

#[derive(Debug, Clone, Default)]
pub struct CountryRelationship {
    pub score: Option<i32>,
    pub affinities: Vec<Affinity>,
}

/// Economy / business / first demand. `None` means the tier was not reported,
/// which is different from a reported zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectDemandStats {
    pub economy: Option<u64>,
    pub business: Option<u64>,
    pub first: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExistingLink {
    pub airline: Option<String>,
    pub frequency: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunwayRestriction {
    pub length: u32,
    pub limiting_airport: String,
}

/// Everything the enricher could derive for a route; each field degrades
/// independently.
#[derive(Debug, Clone, Default)]
pub struct RouteDetails {
    pub distance_km: Option<f64>,
    pub runway: Option<RunwayRestriction>,
    pub population: (Option<u64>, Option<u64>),
    pub income: (Option<f64>, Option<f64>),
    pub relationship: CountryRelationship,
    pub demand: DirectDemandStats,
    pub existing_links: Vec<ExistingLink>,
}

#[derive(Debug, Clone)]
pub struct RouteReport {
    pub query: RouteQuery,
    pub details: RouteDetails,
    pub flight_type: FlightType,
    pub best_deal: ItineraryOffer,
    pub best_seller: ItineraryOffer,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airport(id: u64, code: &str, name: Option<&str>) -> Airport {
        Airport {
            id,
            code: code.to_string(),
            name: name.map(str::to_string),
            size: 4,
            country_code: None,
            runway_length: None,
            population: None,
            income_per_capita: None,
        }
    }

    fn query(origin: Airport, destination: Airport) -> RouteQuery {
        RouteQuery {
            origin,
            destination,
        }
    }

    #[test]
    fn route_queries_are_equal_by_code_pair() {
        let plain = query(airport(1, "ARN", None), airport(2, "SIN", None));
        let detailed = query(
            airport(1, "ARN", Some("Stockholm Arlanda")),
            Airport {
                runway_length: Some(4000),
                ..airport(2, "SIN", Some("Changi"))
            },
        );

        assert_eq!(plain, detailed);
    }

    #[test]
    fn route_query_direction_matters() {
        let outbound = query(airport(1, "ARN", None), airport(2, "SIN", None));
        let inbound = query(airport(2, "SIN", None), airport(1, "ARN", None));
        let elsewhere = query(airport(1, "ARN", None), airport(3, "DOH", None));

        assert_ne!(outbound, inbound);
        assert_ne!(outbound, elsewhere);
    }

    #[test]
    fn merge_prefers_detail_values_and_keeps_list_identity() {
        let listed = Airport {
            population: Some(10),
            ..airport(1, "ARN", Some("Arlanda"))
        };
        let details = Airport {
            runway_length: Some(3301),
            ..airport(99, "XXX", None)
        };

        let merged = listed.merge(details);

        assert_eq!(merged.id, 1);
        assert_eq!(merged.code, "ARN");
        assert_eq!(merged.name.as_deref(), Some("Arlanda"));
        assert_eq!(merged.runway_length, Some(3301));
        assert_eq!(merged.population, Some(10));
    }
}
