//! Intent classification and agent routing
//!
//! Classification is keyword membership, not NLU: two fixed
//! vocabularies checked case-insensitively. Routing is a stateless
//! per-turn decision table; it never looks at prior turns.

use crate::db::AgentType;

const FLIGHT_KEYWORDS: &[&str] = &["flight", "fly", "airline"];
const HOTEL_KEYWORDS: &[&str] = &["hotel", "accommodation", "stay"];

/// Classified topics for one message. Non-empty by construction:
/// when neither vocabulary matches the set reads as `{general}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntentSet {
    pub flight: bool,
    pub hotel: bool,
}

impl IntentSet {
    pub fn general(self) -> bool {
        !self.flight && !self.hotel
    }
}

/// Total function: every input maps to a non-empty intent set.
pub fn classify(text: &str) -> IntentSet {
    let lower = text.to_lowercase();
    IntentSet {
        flight: FLIGHT_KEYWORDS.iter().any(|k| lower.contains(k)),
        hotel: HOTEL_KEYWORDS.iter().any(|k| lower.contains(k)),
    }
}

/// Select the specialist handler for a classified message.
///
/// Both topics (or neither) go to the coordinator; a single topic goes
/// to its specialist.
pub fn route(intents: IntentSet) -> AgentType {
    match (intents.flight, intents.hotel) {
        (true, true) => AgentType::Coordinator,
        (true, false) => AgentType::Flight,
        (false, true) => AgentType::Hotel,
        (false, false) => AgentType::Coordinator,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flight_keywords_classify_as_flight_only() {
        for text in ["book a flight", "I want to FLY", "which airline is best?"] {
            let intents = classify(text);
            assert!(intents.flight, "{text}");
            assert!(!intents.hotel, "{text}");
            assert_eq!(route(intents), AgentType::Flight);
        }
    }

    #[test]
    fn hotel_keywords_classify_as_hotel_only() {
        for text in ["need a hotel", "Accommodation in Rome", "where should I stay"] {
            let intents = classify(text);
            assert!(intents.hotel, "{text}");
            assert!(!intents.flight, "{text}");
            assert_eq!(route(intents), AgentType::Hotel);
        }
    }

    #[test]
    fn both_topics_route_to_coordinator() {
        let intents = classify("book me a hotel and a flight to Paris");
        assert!(intents.flight);
        assert!(intents.hotel);
        assert_eq!(route(intents), AgentType::Coordinator);
    }

    #[test]
    fn unmatched_text_is_general_and_routes_to_coordinator() {
        let intents = classify("what should I pack for Iceland?");
        assert!(intents.general());
        assert_eq!(route(intents), AgentType::Coordinator);
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert!(classify("FLIGHT").flight);
        assert!(classify("HoTeL").hotel);
    }

    #[test]
    fn substring_matches_count() {
        // Membership is substring-based by design; "flying" contains "fly".
        assert!(classify("flying to Tokyo").flight);
        assert!(classify("extended stays").hotel);
    }
}
