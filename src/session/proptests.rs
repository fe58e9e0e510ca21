//! Property-based tests for the session machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::*;
use crate::db::{AgentStatus, AgentType, Message, Role};
use chrono::Utc;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::User), Just(Role::Assistant), Just(Role::Agent)]
}

fn arb_agent_type() -> impl Strategy<Value = AgentType> {
    prop_oneof![
        Just(AgentType::Coordinator),
        Just(AgentType::Flight),
        Just(AgentType::Hotel),
    ]
}

fn arb_agent_status() -> impl Strategy<Value = AgentStatus> {
    prop_oneof![
        Just(AgentStatus::Thinking),
        Just(AgentStatus::Searching),
        Just(AgentStatus::Completed),
        Just(AgentStatus::Interrupted),
    ]
}

// Small id pool so duplicate pushes actually occur
fn arb_message() -> impl Strategy<Value = Message> {
    (
        0u8..6,
        arb_role(),
        "[a-zA-Z ]{0,20}",
        proptest::option::of(arb_agent_type()),
        proptest::option::of(arb_agent_status()),
    )
        .prop_map(|(id, role, content, agent_type, agent_status)| Message {
            id: format!("m{id}"),
            conversation_id: "conv".to_string(),
            sequence_id: i64::from(id),
            role,
            content,
            agent_type,
            agent_status,
            metadata: None,
            created_at: Utc::now(),
        })
}

fn arb_dispatch_result() -> impl Strategy<Value = DispatchResult> {
    prop_oneof![
        Just(DispatchResult::Success),
        "[a-z ]{1,20}".prop_map(|error| DispatchResult::Failure { error }),
    ]
}

fn arb_event() -> impl Strategy<Value = SessionEvent> {
    prop_oneof![
        "[a-zA-Z ]{1,20}".prop_map(|text| SessionEvent::Send { text }),
        Just(SessionEvent::Interrupt),
        (0u64..8, arb_dispatch_result()).prop_map(|(token, result)| {
            SessionEvent::DispatchResolved {
                token: TokenId(token),
                result,
            }
        }),
        arb_message().prop_map(|message| SessionEvent::Push { message }),
        "[a-z ]{1,20}".prop_map(|error| SessionEvent::LoadFailed { error }),
    ]
}

// ============================================================================
// Invariants
// ============================================================================

proptest! {
    /// Dispatched token ids strictly increase, so a resolution can
    /// never be mistaken for a later turn's.
    #[test]
    fn token_ids_strictly_increase(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut session = Session::new();
        let mut last_token = 0u64;

        for event in events {
            for effect in session.handle(event) {
                if let SessionEffect::DispatchTurn { token, .. } = effect {
                    prop_assert!(token.0 > last_token);
                    last_token = token.0;
                }
            }
        }
    }

    /// Every Send leaves exactly one turn in flight, whatever came
    /// before it.
    #[test]
    fn send_always_leaves_one_turn_in_flight(
        events in proptest::collection::vec(arb_event(), 0..40),
        text in "[a-z]{1,10}",
    ) {
        let mut session = Session::new();
        for event in events {
            session.handle(event);
        }

        let effects = session.handle(SessionEvent::Send { text });
        prop_assert!(session.state().is_in_flight());

        let dispatches = effects
            .iter()
            .filter(|e| matches!(e, SessionEffect::DispatchTurn { .. }))
            .count();
        prop_assert_eq!(dispatches, 1);
    }

    /// After an interrupt no resolution can reopen the session; only a
    /// new Send does.
    #[test]
    fn interrupt_is_final_for_the_turn(
        prefix in proptest::collection::vec(arb_event(), 0..20),
        resolutions in proptest::collection::vec((0u64..8, arb_dispatch_result()), 0..10),
    ) {
        let mut session = Session::new();
        for event in prefix {
            session.handle(event);
        }
        session.handle(SessionEvent::Interrupt);
        prop_assert_eq!(session.state(), SessionState::Idle);

        for (token, result) in resolutions {
            let effects = session.handle(SessionEvent::DispatchResolved {
                token: TokenId(token),
                result,
            });
            prop_assert!(effects.is_empty());
            prop_assert_eq!(session.state(), SessionState::Idle);
        }
    }

    /// A resolution carrying anything but the current token produces
    /// no effects at all.
    #[test]
    fn stale_resolutions_are_silent(
        events in proptest::collection::vec(arb_event(), 0..40),
        token in 0u64..8,
        result in arb_dispatch_result(),
    ) {
        let mut session = Session::new();
        for event in events {
            session.handle(event);
        }

        if session.state().current_token() != Some(TokenId(token)) {
            let effects = session.handle(SessionEvent::DispatchResolved {
                token: TokenId(token),
                result,
            });
            prop_assert!(effects.is_empty());
        }
    }

    /// Realtime pushes never touch the dispatch state.
    #[test]
    fn pushes_never_change_state(
        events in proptest::collection::vec(arb_event(), 0..20),
        message in arb_message(),
    ) {
        let mut session = Session::new();
        for event in events {
            session.handle(event);
        }

        let before = session.state();
        session.handle(SessionEvent::Push { message });
        prop_assert_eq!(session.state(), before);
    }

    /// Each message id is appended at most once regardless of how many
    /// times the mirror delivers it.
    #[test]
    fn duplicate_pushes_append_once(
        events in proptest::collection::vec(arb_event(), 0..60),
    ) {
        let mut session = Session::new();
        let mut appended = std::collections::HashMap::new();

        for event in events {
            for effect in session.handle(event) {
                if let SessionEffect::AppendMessage { message } = effect {
                    *appended.entry(message.id).or_insert(0u32) += 1;
                }
            }
        }

        for (id, count) in appended {
            prop_assert_eq!(count, 1, "message {} appended {} times", id, count);
        }
    }

    /// Cancellation is always requested for the superseded token, and
    /// for nothing else.
    #[test]
    fn send_while_in_flight_cancels_exactly_the_old_token(
        first in "[a-z]{1,10}",
        second in "[a-z]{1,10}",
    ) {
        let mut session = Session::new();
        session.handle(SessionEvent::Send { text: first });
        let old = session.state().current_token().unwrap();

        let effects = session.handle(SessionEvent::Send { text: second });
        let cancelled: Vec<TokenId> = effects
            .iter()
            .filter_map(|e| match e {
                SessionEffect::CancelToken { token } => Some(*token),
                _ => None,
            })
            .collect();
        prop_assert_eq!(cancelled, vec![old]);
    }
}
