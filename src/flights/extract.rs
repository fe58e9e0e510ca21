//! Heuristic search-parameter recovery from free text
//!
//! Best effort only. A message that doesn't look like a concrete
//! flight request yields `None` and the handler answers without live
//! offers.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

static ORIGIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)from\s+([a-zA-Z\s]+?)(?:\s+to|\s+for)").expect("valid origin pattern")
});

static DESTINATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)to\s+([a-zA-Z\s]+?)(?:\s+on|\s+for|$)").expect("valid destination pattern")
});

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:on|for)\s+([0-9]{1,2}(?:st|nd|rd|th)?\s+[a-zA-Z]+|[0-9]{4}-[0-9]{2}-[0-9]{2}|tomorrow|today)",
    )
    .expect("valid date pattern")
});

/// Parameters for a one-way offer search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub adults: u32,
}

/// Recover search parameters from a user message. Requires both an
/// origin and a destination phrase; the date falls back to tomorrow.
pub fn extract_search_params(text: &str, today: NaiveDate) -> Option<SearchParams> {
    let origin = ORIGIN_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| location_code(m.as_str()))?;
    let destination = DESTINATION_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| location_code(m.as_str()))?;

    let departure_date = DATE_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| parse_date(m.as_str(), today))
        .unwrap_or_else(|| today.succ_opt().unwrap_or(today));

    Some(SearchParams {
        origin,
        destination,
        departure_date,
        adults: 1,
    })
}

/// Crude place-name to code mapping: first three letters, upper-cased.
/// Works for messages that already name an airport code and degrades
/// to a guess otherwise.
fn location_code(raw: &str) -> String {
    raw.trim().chars().take(3).collect::<String>().to_uppercase()
}

fn parse_date(raw: &str, today: NaiveDate) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("today") {
        return Some(today);
    }
    if raw.eq_ignore_ascii_case("tomorrow") {
        return today.succ_opt();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    // "21st September" style; retry with the current year appended
    let stripped = strip_ordinal(raw);
    let with_year = format!("{} {}", stripped, today.format("%Y"));
    NaiveDate::parse_from_str(&with_year, "%d %B %Y")
        .or_else(|_| NaiveDate::parse_from_str(&with_year, "%d %b %Y"))
        .ok()
}

fn strip_ordinal(raw: &str) -> String {
    let mut parts = raw.splitn(2, char::is_whitespace);
    let day = parts.next().unwrap_or(raw);
    let rest = parts.next().unwrap_or("");
    let day = day
        .trim_end_matches("st")
        .trim_end_matches("nd")
        .trim_end_matches("rd")
        .trim_end_matches("th");
    if rest.is_empty() {
        day.to_string()
    } else {
        format!("{day} {rest}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 25).unwrap()
    }

    #[test]
    fn recovers_codes_and_defaults_to_tomorrow() {
        let params = extract_search_params("Find flights from NYC to LAX", today()).unwrap();
        assert_eq!(params.origin, "NYC");
        assert_eq!(params.destination, "LAX");
        assert_eq!(
            params.departure_date,
            NaiveDate::from_ymd_opt(2026, 8, 26).unwrap()
        );
        assert_eq!(params.adults, 1);
    }

    #[test]
    fn honors_explicit_iso_date() {
        let params =
            extract_search_params("flights from JFK to SFO on 2026-12-24", today()).unwrap();
        assert_eq!(
            params.departure_date,
            NaiveDate::from_ymd_opt(2026, 12, 24).unwrap()
        );
    }

    #[test]
    fn honors_today_and_tomorrow_words() {
        let t = extract_search_params("fly from BOS to MIA for today", today()).unwrap();
        assert_eq!(t.departure_date, today());

        let tm = extract_search_params("fly from BOS to MIA for tomorrow", today()).unwrap();
        assert_eq!(tm.departure_date, NaiveDate::from_ymd_opt(2026, 8, 26).unwrap());
    }

    #[test]
    fn honors_ordinal_day_and_month() {
        let params =
            extract_search_params("fly from LHR to CDG on 21st September", today()).unwrap();
        assert_eq!(
            params.departure_date,
            NaiveDate::from_ymd_opt(2026, 9, 21).unwrap()
        );
    }

    #[test]
    fn place_names_become_three_letter_guesses() {
        let params =
            extract_search_params("Book a flight from Boston to Paris", today()).unwrap();
        assert_eq!(params.origin, "BOS");
        assert_eq!(params.destination, "PAR");
    }

    #[test]
    fn missing_origin_or_destination_yields_none() {
        assert!(extract_search_params("find me a flight to LAX", today()).is_none());
        assert!(extract_search_params("any good flight deals?", today()).is_none());
    }
}
