//! Race coordination for ceprace.
//!
//! # State machine
//!
//! ```text
//! Racing --first envelope--> SecondaryWait --second envelope--> BothReported
//!    |                             |
//!    +--race timeout--> TimedOut   +--secondary timeout--> FastestOnly
//! ```
//!
//! Both lookups run as independent tasks and report over a shared channel sized so
//! neither send can block. The coordinator suspends only twice: once for the first
//! of {envelope, race timeout}, once for the first of {envelope, secondary timeout}.
//!
//! Lookups go through the [`Lookup`] trait; [`HttpLookup`] is the production
//! implementation backed by `ceprace-providers`.

mod lookup;
mod race;

use std::sync::Arc;

pub use ceprace_config::RaceConfig;
pub use ceprace_types::{Endpoint, Envelope, Payload, Source};
pub use lookup::{HttpLookup, Lookup};
pub use race::{RESULT_CHANNEL_CAPACITY, RaceOutcome, race};

/// Race both public services over HTTP.
pub async fn lookup_cep(code: &str, config: &RaceConfig) -> RaceOutcome {
    race(code, config, Arc::new(HttpLookup)).await
}
