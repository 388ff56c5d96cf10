use crate::models::{
    Affinity, Airport, CountryRelationship, DirectDemandStats, ExistingLink, RouteDetails,
    RouteQuery, RunwayRestriction,
};
use crate::payload::{as_count, AffinityField, DemandField, DistanceField, RawLink, ResearchPayload};
use tracing::debug;

pub fn enrich(query: &RouteQuery, research: &ResearchPayload) -> RouteDetails {
    let origin = &query.origin;
    let destination = &query.destination;

    RouteDetails {
        distance_km: distance_km(research),
        runway: runway_restriction(origin, destination),
        population: (origin.population, destination.population),
        income: (origin.income_per_capita, destination.income_per_capita),
        relationship: relationship(research),
        demand: direct_demand(research),
        existing_links: existing_links(research),
    }
}

fn distance_km(research: &ResearchPayload) -> Option<f64> {
    let reported = match &research.distance {
        Some(DistanceField::Km(km)) => Some(*km),
        Some(DistanceField::Breakdown(b)) => b.direct.or(b.direct_km).or(b.km),
        None => None,
    };
    reported.or(research.distance_km).filter(|km| *km > 0.0)
}

/// The shorter of the two runways limits which aircraft can fly the route.
/// On a tie the origin is named.
pub fn runway_restriction(origin: &Airport, destination: &Airport) -> Option<RunwayRestriction> {
    let (from, to) = (origin.runway_length?, destination.runway_length?);
    let (length, limiting) = if from <= to {
        (from, origin)
    } else {
        (to, destination)
    };
    Some(RunwayRestriction {
        length,
        limiting_airport: limiting.code.clone(),
    })
}

/// Monotonic in the score; the game reports relationships from -2 to 2 and
/// anything beyond is clamped to the extreme label.
pub fn relationship_label(score: i32) -> &'static str {
    match score {
        i32::MIN..=-2 => "Very Poor",
        -1 => "Poor",
        0 => "Neutral",
        1 => "Good",
        _ => "Very Good",
    }
}

fn relationship(research: &ResearchPayload) -> CountryRelationship {
    let score = research
        .relationship
        .or(research.relationship_between_countries)
        .map(|s| s.round() as i32);

    let affinities = match research.affinities.as_ref().or(research.affinity.as_ref()) {
        Some(AffinityField::Text(text)) => text
            .split([';', ',', '\n'])
            .filter_map(parse_affinity)
            .collect(),
        Some(AffinityField::Labels(labels)) => labels.iter().filter_map(|l| parse_affinity(l)).collect(),
        Some(AffinityField::List(items)) => items
            .iter()
            .filter_map(|item| {
                let delta = item.delta.or(item.value)?.round() as i32;
                let label = item
                    .label
                    .as_deref()
                    .or(item.description.as_deref())
                    .map(str::trim)
                    .filter(|l| !l.is_empty())?;
                Some(Affinity {
                    delta,
                    label: label.to_string(),
                })
            })
            .collect(),
        None => Vec::new(),
    };

    CountryRelationship { score, affinities }
}

/// Parses `Shared language (+2)`, `+2 Shared language` or `2: Shared language`.
/// A bare leading number such as `2024 Olympic partners` is part of the label.
pub fn parse_affinity(text: &str) -> Option<Affinity> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(open) = text.rfind('(') {
        let inner = text[open + 1..].trim_end_matches(')').trim();
        if let Ok(delta) = inner.parse::<i32>() {
            let label = text[..open].trim();
            if !label.is_empty() {
                return Some(Affinity {
                    delta,
                    label: label.to_string(),
                });
            }
        }
    }

    let signed = text.starts_with(['+', '-']);
    let number_end = text
        .char_indices()
        .take_while(|(i, c)| c.is_ascii_digit() || (*i == 0 && signed))
        .map(|(i, c)| i + c.len_utf8())
        .last();

    if let Some(end) = number_end {
        let rest = &text[end..];
        if signed || rest.trim_start().starts_with(':') {
            if let Ok(delta) = text[..end].parse::<i32>() {
                let label = rest.trim_start_matches([':', ' ']).trim();
                if !label.is_empty() {
                    return Some(Affinity {
                        delta,
                        label: label.to_string(),
                    });
                }
            }
        }
    }

    debug!("Ignoring unrecognised affinity '{}'", text);
    None
}

fn direct_demand(research: &ResearchPayload) -> DirectDemandStats {
    let Some(demand) = research.direct_demand.as_ref().or(research.demand.as_ref()) else {
        return DirectDemandStats::default();
    };
    let tier = |field: &DemandField, index| field.tier(index).and_then(as_count);

    DirectDemandStats {
        economy: tier(demand, 0),
        business: tier(demand, 1),
        first: tier(demand, 2),
    }
}

/// Missing or unreadable link data means no links, never a guess.
fn existing_links(research: &ResearchPayload) -> Vec<ExistingLink> {
    research
        .existing_links
        .as_ref()
        .or(research.links.as_ref())
        .or(research.direct_links.as_ref())
        .map(|links| links.iter().cloned().map(existing_link).collect())
        .unwrap_or_default()
}

fn existing_link(raw: RawLink) -> ExistingLink {
    ExistingLink {
        airline: raw
            .airline
            .and_then(|a| a.name())
            .or_else(|| raw.carrier.and_then(|c| c.name()))
            .or(raw.name),
        frequency: raw
            .frequency
            .or(raw.flights_per_week)
            .and_then(as_count)
            .map(|f| f as u32),
    }
}
