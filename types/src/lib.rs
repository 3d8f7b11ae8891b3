//! Core domain types for ceprace.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

mod envelope;
pub use envelope::{ERROR_KEY, EmptyPayloadError, Envelope, Payload};

use std::fmt;

// ============================================================================
// Source Types
// ============================================================================

/// The postal-code lookup services raced against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    BrasilApi,
    ViaCep,
}

impl Source {
    pub const ALL: [Source; 2] = [Source::BrasilApi, Source::ViaCep];

    /// Label shown to the user.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Source::BrasilApi => "BrasilAPI",
            Source::ViaCep => "ViaCEP",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Endpoint
// ============================================================================

/// Where a [`Source`] is queried.
///
/// The lookup URL is `base_url + code + suffix`. The code is inserted
/// verbatim; callers decide whether to validate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    source: Source,
    base_url: String,
    suffix: String,
}

impl Endpoint {
    pub fn new(source: Source, base_url: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            source,
            base_url: base_url.into(),
            suffix: suffix.into(),
        }
    }

    #[must_use]
    pub fn source(&self) -> Source {
        self.source
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    #[must_use]
    pub fn url_for(&self, code: &str) -> String {
        let mut url =
            String::with_capacity(self.base_url.len() + code.len() + self.suffix.len());
        url.push_str(&self.base_url);
        url.push_str(code);
        url.push_str(&self.suffix);
        url
    }
}
