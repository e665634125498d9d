use std::{future::Future, time::Duration};

use tokio_retry::{strategy::FixedInterval, Retry};
use tracing::warn;

use crate::{
    envelope::ActivityEnvelope,
    error::TransportError,
    transport::{BotTransport, TransportResponse},
};

/// Fixed-interval retry for transport failures. Always makes at least one
/// attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub const fn immediate(max_attempts: usize) -> Self {
        Self {
            max_attempts,
            delay: Duration::ZERO,
        }
    }

    fn strategy(&self) -> impl Iterator<Item = Duration> {
        FixedInterval::new(self.delay).take(self.max_attempts.saturating_sub(1))
    }

    /// Runs `action` until it succeeds or attempts run out. The closure gets
    /// the 1-based attempt number.
    pub async fn run<T, E, F, Fut>(&self, mut action: F) -> Result<T, E>
    where
        F: FnMut(usize) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 0usize;
        Retry::spawn(self.strategy(), || {
            attempt = attempt.saturating_add(1);
            action(attempt)
        })
        .await
    }
}

/// Posts one envelope under `policy`, logging each failed attempt.
pub async fn post_with_retry(
    transport: &dyn BotTransport,
    policy: &RetryPolicy,
    conversation_id: &str,
    token: &str,
    envelope: &ActivityEnvelope,
) -> Result<TransportResponse, TransportError> {
    let max_attempts = policy.max_attempts.max(1);
    policy
        .run(|attempt| async move {
            transport
                .post_activity(conversation_id, token, envelope)
                .await
                .inspect_err(|err| {
                    warn!(attempt, max_attempts, error = %err, "Activity post attempt failed");
                })
        })
        .await
}
