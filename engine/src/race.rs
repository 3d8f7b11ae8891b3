//! The two-phase race between both sources.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;

use ceprace_config::RaceConfig;
use ceprace_types::{Endpoint, Envelope};

use crate::Lookup;

/// One slot per source, so no lookup ever blocks on send.
pub const RESULT_CHANNEL_CAPACITY: usize = 2;

/// Terminal state of a race.
#[derive(Debug, Clone, PartialEq)]
pub enum RaceOutcome {
    /// Nothing arrived before the race timeout.
    TimedOut,
    /// The slower source missed the secondary timeout.
    FastestOnly { fastest: Envelope },
    BothReported { fastest: Envelope, second: Envelope },
}

impl RaceOutcome {
    #[must_use]
    pub fn fastest(&self) -> Option<&Envelope> {
        match self {
            RaceOutcome::TimedOut => None,
            RaceOutcome::FastestOnly { fastest } | RaceOutcome::BothReported { fastest, .. } => {
                Some(fastest)
            }
        }
    }

    #[must_use]
    pub fn second(&self) -> Option<&Envelope> {
        match self {
            RaceOutcome::BothReported { second, .. } => Some(second),
            RaceOutcome::TimedOut | RaceOutcome::FastestOnly { .. } => None,
        }
    }

    /// Envelopes in arrival order.
    pub fn envelopes(&self) -> impl Iterator<Item = &Envelope> {
        self.fastest().into_iter().chain(self.second())
    }

    /// True when at least one envelope carries domain data rather than an error.
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.envelopes().any(|envelope| !envelope.is_error())
    }

    #[must_use]
    pub const fn phase_name(&self) -> &'static str {
        match self {
            RaceOutcome::TimedOut => "timed_out",
            RaceOutcome::FastestOnly { .. } => "fastest_only",
            RaceOutcome::BothReported { .. } => "both_reported",
        }
    }
}

/// Race both configured sources for `code`.
///
/// Both lookups are spawned before the first wait. The first envelope to reach the
/// channel is the fastest, whichever source sent it. The loser is never cancelled:
/// it finishes on its own and its send is discarded once the race has settled.
pub async fn race<L: Lookup>(code: &str, config: &RaceConfig, lookup: Arc<L>) -> RaceOutcome {
    let (tx, mut rx) = mpsc::channel(RESULT_CHANNEL_CAPACITY);

    for endpoint in config.endpoints() {
        spawn_lookup(
            Arc::clone(&lookup),
            endpoint.clone(),
            code.to_string(),
            config.request_timeout(),
            tx.clone(),
        );
    }
    // Only the lookups hold senders now.
    drop(tx);

    let fastest = tokio::select! {
        Some(envelope) = rx.recv() => envelope,
        () = sleep(config.race_timeout()) => {
            tracing::info!(
                code,
                timeout_ms = config.race_timeout().as_millis() as u64,
                "No source answered before the race timeout"
            );
            return RaceOutcome::TimedOut;
        }
    };
    tracing::debug!(source = %fastest.source(), error = fastest.is_error(), "Fastest result");

    let outcome = tokio::select! {
        Some(second) = rx.recv() => RaceOutcome::BothReported { fastest, second },
        () = sleep(config.secondary_timeout()) => RaceOutcome::FastestOnly { fastest },
    };
    tracing::info!(code, phase = outcome.phase_name(), "Race settled");
    outcome
}

fn spawn_lookup<L: Lookup>(
    lookup: Arc<L>,
    endpoint: Endpoint,
    code: String,
    timeout: Duration,
    tx: mpsc::Sender<Envelope>,
) {
    tokio::spawn(async move {
        let envelope = lookup.lookup(&endpoint, &code, timeout).await;
        if tx.send(envelope).await.is_err() {
            tracing::debug!(source = %endpoint.source(), "Race already settled, result discarded");
        }
    });
}
