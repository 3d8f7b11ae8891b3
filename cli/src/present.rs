//! Plain-text rendering of race outcomes.

use std::fmt::Write;

use ceprace_engine::{Envelope, RaceOutcome};
use serde_json::{Map, Value};

pub const FASTEST_LABEL: &str = "Fastest result";
pub const SECOND_LABEL: &str = "Second API result (slower)";
pub const TIMEOUT_NOTICE: &str = "Both APIs exceeded the response time.";

/// Two lines: the source, then the payload as a flat key/value listing.
#[must_use]
pub fn render_envelope(label: &str, envelope: &Envelope) -> String {
    format!(
        "{label}: API {}\nData: {}\n",
        envelope.source(),
        render_fields(envelope.payload().fields())
    )
}

#[must_use]
pub fn render_timeout() -> &'static str {
    TIMEOUT_NOTICE
}

#[must_use]
pub fn render_outcome(outcome: &RaceOutcome) -> String {
    match outcome {
        RaceOutcome::TimedOut => format!("{}\n", render_timeout()),
        RaceOutcome::FastestOnly { fastest } => render_envelope(FASTEST_LABEL, fastest),
        RaceOutcome::BothReported { fastest, second } => {
            let mut out = render_envelope(FASTEST_LABEL, fastest);
            out.push_str(&render_envelope(SECOND_LABEL, second));
            out
        }
    }
}

fn render_fields(fields: &Map<String, Value>) -> String {
    let mut out = String::from("{");
    for (i, (key, value)) in fields.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        match value {
            Value::String(s) => {
                let _ = write!(out, "{key}: {s}");
            }
            other => {
                let _ = write!(out, "{key}: {other}");
            }
        }
    }
    out.push('}');
    out
}
