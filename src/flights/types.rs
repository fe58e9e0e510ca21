//! Flight provider wire types and offer summarization

use crate::db::FlightOfferSummary;
use serde::Deserialize;

/// One offer as returned by the provider, provider-ranked
#[derive(Debug, Clone, Deserialize)]
pub struct FlightOffer {
    pub id: String,
    pub price: OfferPrice,
    pub itineraries: Vec<Itinerary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OfferPrice {
    pub total: String,
    pub currency: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Itinerary {
    /// ISO 8601 duration, e.g. "PT7H55M"
    pub duration: String,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub departure: SegmentEndpoint,
    pub arrival: SegmentEndpoint,
    pub carrier_code: String,
    pub number: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentEndpoint {
    pub iata_code: String,
    pub at: String,
}

/// How many offers are surfaced to the user out of the (capped)
/// provider response.
pub const SURFACED_OFFERS: usize = 3;

/// Reduce provider offers to the markdown block embedded in the flight
/// prompt plus the typed records attached as message metadata.
///
/// Offers missing an itinerary or segment are skipped rather than
/// failing the batch.
pub fn summarize_offers(offers: &[FlightOffer]) -> (String, Vec<FlightOfferSummary>) {
    let summaries: Vec<FlightOfferSummary> = offers
        .iter()
        .take(SURFACED_OFFERS)
        .filter_map(|offer| {
            let itinerary = offer.itineraries.first()?;
            let segment = itinerary.segments.first()?;
            Some(FlightOfferSummary {
                carrier_code: segment.carrier_code.clone(),
                flight_number: segment.number.clone(),
                price_total: offer.price.total.clone(),
                currency: offer.price.currency.clone(),
                duration: humanize_duration(&itinerary.duration),
                stops: (itinerary.segments.len() as u32).saturating_sub(1),
            })
        })
        .collect();

    let block = summaries
        .iter()
        .map(|s| {
            let stops = if s.stops == 0 {
                "Direct".to_string()
            } else {
                format!("{} stop(s)", s.stops)
            };
            format!(
                "**{} {}**\n- **{} {}** | {} | {}",
                s.carrier_code, s.flight_number, s.currency, s.price_total, s.duration, stops
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    (block, summaries)
}

/// "PT7H55M" -> "7h55m"
fn humanize_duration(iso: &str) -> String {
    iso.trim_start_matches("PT").to_lowercase()
}
