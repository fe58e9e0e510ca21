//! Advisory model abstraction
//!
//! Provides a common interface to the hosted text-generation provider
//! that writes the user-facing answers.

mod error;
mod gateway;
mod types;

pub use error::{AdvisoryError, AdvisoryErrorKind};
pub use gateway::GatewayAdvisor;
pub use types::{ChatMessage, ChatRole};

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for advisory text generation
#[async_trait]
pub trait Advisor: Send + Sync {
    /// Generate a reply given a role prompt, prior history and the
    /// latest user message. Any provider failure is fatal for the
    /// turn that requested it.
    async fn generate(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        latest: &str,
    ) -> Result<String, AdvisoryError>;
}

/// Logging wrapper for advisory services
pub struct TracedAdvisor {
    inner: Arc<dyn Advisor>,
}

impl TracedAdvisor {
    pub fn new(inner: Arc<dyn Advisor>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl Advisor for TracedAdvisor {
    async fn generate(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
        latest: &str,
    ) -> Result<String, AdvisoryError> {
        let start = std::time::Instant::now();
        let result = self.inner.generate(system_prompt, history, latest).await;
        let duration = start.elapsed();

        match &result {
            Ok(text) => {
                tracing::info!(
                    duration_ms = %duration.as_millis(),
                    history_len = history.len(),
                    response_chars = text.len(),
                    "Advisory request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    duration_ms = %duration.as_millis(),
                    kind = ?e.kind,
                    error = %e.message,
                    "Advisory request failed"
                );
            }
        }

        result
    }
}
