//! HTTP API for the travel-agent backend

mod handlers;
mod sse;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::dispatch::Dispatcher;
use crate::store::MessageStore;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub store: Arc<MessageStore>,
}

impl AppState {
    pub fn new(dispatcher: Arc<Dispatcher>, store: Arc<MessageStore>) -> Self {
        Self { dispatcher, store }
    }
}
