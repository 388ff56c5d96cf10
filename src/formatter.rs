use crate::enricher::relationship_label;
use crate::models::{
    Airport, DirectDemandStats, ExistingLink, ItineraryOffer, Leg, RouteDetails, RouteReport,
    TransportMode,
};
use chrono::NaiveDate;

const DATE_FORMAT: &str = "%d %B %Y";
const MISSING: &str = "–";

pub fn format_report(report: &RouteReport, date: NaiveDate) -> String {
    let mut lines = vec![
        format!("Random Route of the Day:  {}", date.format(DATE_FORMAT)),
        String::new(),
        format!(
            "{} - {}",
            airport_title(&report.query.origin),
            airport_title(&report.query.destination)
        ),
        String::new(),
    ];

    lines.extend(metadata_lines(&report.details));
    lines.push(format!("Flight Type: {}", report.flight_type.label()));
    lines.push(format!("Direct Demand: {}", demand(&report.details.demand)));
    lines.push(String::new());

    lines.extend(direct_link_lines(&report.details.existing_links));
    lines.push(String::new());

    lines.push("Tickets".to_string());
    lines.push(String::new());
    lines.push("Best Deal".to_string());
    lines.extend(itinerary_lines(&report.best_deal));
    lines.push(String::new());
    lines.push("Best Seller".to_string());
    lines.extend(itinerary_lines(&report.best_seller));

    lines.join("\n").trim().to_string()
}

/// Regional-indicator flag for a two-letter country code.
pub fn country_flag(code: &str) -> Option<String> {
    let code = code.trim();
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    code.to_ascii_uppercase()
        .chars()
        .map(|c| char::from_u32(0x1F1E6 + (c as u32 - 'A' as u32)))
        .collect()
}

pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Whole currency units, e.g. `$1,234`.
pub fn format_price(amount: f64) -> String {
    format!("${}", group_thousands(amount.max(0.0).round() as u64))
}

pub fn format_duration(minutes: u32) -> String {
    let plural = |n: u32, unit: &str| {
        if n == 1 {
            format!("{} {}", n, unit)
        } else {
            format!("{} {}s", n, unit)
        }
    };

    match (minutes / 60, minutes % 60) {
        (0, mins) => plural(mins, "minute"),
        (hours, 0) => plural(hours, "hour"),
        (hours, mins) => format!("{} {}", plural(hours, "hour"), plural(mins, "minute")),
    }
}

fn airport_title(airport: &Airport) -> String {
    let mut title = match &airport.name {
        Some(name) => format!("{} ({})", name, airport.code),
        None => airport.code.clone(),
    };
    if let Some(flag) = airport.country_code.as_deref().and_then(country_flag) {
        title.push(' ');
        title.push_str(&flag);
    }
    title
}

fn metadata_lines(details: &RouteDetails) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(km) = details.distance_km {
        lines.push(format!(
            "Distance (direct): {} km",
            group_thousands(km.round() as u64)
        ));
    }
    if let Some(runway) = &details.runway {
        lines.push(format!(
            "Runway Restriction: {}m ({})",
            group_thousands(runway.length as u64),
            runway.limiting_airport
        ));
    }

    let population = |p: Option<u64>| p.map_or_else(|| "Unknown".to_string(), group_thousands);
    lines.push(format!(
        "Population: {} / {}",
        population(details.population.0),
        population(details.population.1)
    ));

    let income = |i: Option<f64>| i.map_or_else(|| MISSING.to_string(), format_price);
    lines.push(format!(
        "Income per Capita, PPP: {} / {}",
        income(details.income.0),
        income(details.income.1)
    ));

    if let Some(score) = details.relationship.score {
        lines.push(format!(
            "Relationship between Countries: {} ({})",
            score,
            relationship_label(score)
        ));
    }
    if !details.relationship.affinities.is_empty() {
        let affinities: Vec<String> = details
            .relationship
            .affinities
            .iter()
            .map(|a| format!("{:+} {}", a.delta, a.label))
            .collect();
        lines.push(format!("Affinities: {}", affinities.join(", ")));
    }

    lines
}

fn demand(stats: &DirectDemandStats) -> String {
    [stats.economy, stats.business, stats.first]
        .iter()
        .map(|tier| tier.map_or_else(|| MISSING.to_string(), group_thousands))
        .collect::<Vec<_>>()
        .join(" / ")
}

fn direct_link_lines(links: &[ExistingLink]) -> Vec<String> {
    if links.is_empty() {
        return vec!["No existing direct links".to_string()];
    }

    let mut lines = vec!["Existing direct links:".to_string()];
    for link in links {
        lines.push(format!(
            "- {} ({} per week)",
            link.airline.as_deref().unwrap_or("Unknown carrier"),
            link.frequency
                .map_or_else(|| "n/a".to_string(), |f| f.to_string())
        ));
    }
    lines
}

fn itinerary_lines(offer: &ItineraryOffer) -> Vec<String> {
    let stops = offer.stops();
    let mut header = if stops.is_empty() {
        "Itinerary".to_string()
    } else {
        stops.join(" - ")
    };
    if let Some(price) = offer.total_price.filter(|p| *p > 0.0) {
        header.push_str(&format!(" — {} ({})", format_price(price), offer.cabin_class));
    }

    let mut lines = vec![header];
    for leg in &offer.legs {
        lines.push(travel_line(leg));
        if let Some(detail) = detail_line(leg, &offer.cabin_class) {
            lines.push(detail);
        }
    }
    lines
}

fn travel_line(leg: &Leg) -> String {
    let (departure, arrival) = match leg.mode {
        TransportMode::Flight => ("🛫", "🛬"),
        TransportMode::Ground => ("🚌", "🚌"),
        TransportMode::Train => ("🚆", "🚆"),
    };
    format!(
        "{} {} - {} {}",
        departure,
        leg.origin.as_deref().unwrap_or("???"),
        leg.destination.as_deref().unwrap_or("???"),
        arrival
    )
}

fn detail_line(leg: &Leg, cabin_class: &str) -> Option<String> {
    let duration = leg
        .duration_minutes
        .filter(|m| *m > 0)
        .map(format_duration);

    if leg.mode == TransportMode::Ground {
        return Some(match duration {
            Some(d) => format!("Local Transit | Duration: {}", d),
            None => "Local Transit".to_string(),
        });
    }

    let mut details: Vec<String> = Vec::new();
    match (&leg.carrier, &leg.flight_number) {
        (Some(carrier), Some(number)) => details.push(format!("{} - {}", carrier, number)),
        (Some(only), None) | (None, Some(only)) => details.push(only.clone()),
        (None, None) => {}
    }
    if let Some(aircraft) = &leg.aircraft {
        details.push(format!("| {}", aircraft));
    }
    if let Some(d) = duration {
        details.push(format!("| Duration: {}", d));
    }
    if let Some(price) = leg.price.filter(|p| *p > 0.0) {
        details.push(format!("| {} ({})", format_price(price), cabin_class));
    }
    if let Some(quality) = leg.quality.filter(|q| *q > 0) {
        details.push(format!("with {} quality", quality));
    }
    if !leg.amenities.is_empty() {
        let amenities: Vec<&str> = leg.amenities.iter().map(|a| a.label()).collect();
        details.push(format!("including {}", amenities.join(", ")));
    }

    (!details.is_empty()).then(|| details.join(" "))
}
