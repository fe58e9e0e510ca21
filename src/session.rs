//! Client-side session coordination
//!
//! Implements the Elm Architecture pattern with pure state transitions.
//! The machine owns what a connected client knows about one
//! conversation: whether a turn is in flight, which messages have been
//! applied, and which agent status is on display. The driver executes
//! the resulting effects and provides cooperative cancellation.

mod driver;
mod effect;
mod event;
mod state;
mod transition;

#[cfg(test)]
mod proptests;

pub use driver::{DispatchClient, SessionDriver};
pub use effect::SessionEffect;
pub use event::{DispatchResult, SessionEvent};
pub use state::{SessionState, TokenId};
pub use transition::Session;
