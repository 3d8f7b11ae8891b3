use std::time::Duration;

use ceprace_types::{Endpoint, Envelope};

/// One source lookup, as seen by the race.
///
/// Implementations must always resolve to an [`Envelope`]; failures belong in an
/// error payload, not a panic.
pub trait Lookup: Send + Sync + 'static {
    fn lookup(
        &self,
        endpoint: &Endpoint,
        code: &str,
        timeout: Duration,
    ) -> impl Future<Output = Envelope> + Send;
}

/// Production lookup over HTTP.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpLookup;

impl Lookup for HttpLookup {
    fn lookup(
        &self,
        endpoint: &Endpoint,
        code: &str,
        timeout: Duration,
    ) -> impl Future<Output = Envelope> + Send {
        ceprace_providers::fetch(endpoint, code, timeout)
    }
}
