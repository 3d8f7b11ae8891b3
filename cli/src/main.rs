//! ceprace CLI - reads a CEP from stdin and races two lookup services.
//!
//! ```text
//! main() -> load config -> prompt_code() -> lookup_cep() -> render_outcome()
//! ```
//!
//! # Exit status
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | At least one source returned data |
//! | 1 | Race timed out, or every reported source failed |
//! | 2 | Startup failure (config or stdin) |
//!
//! Logs go to stderr, filtered by `RUST_LOG` (default `warn`), so stdout carries
//! only the prompt and the results.

mod input;
mod present;

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use ceprace_config::{CepraceConfig, RaceConfig};
use ceprace_engine::{RaceOutcome, lookup_cep};

const EXIT_DATA: u8 = 0;
const EXIT_NO_DATA: u8 = 1;
const EXIT_STARTUP: u8 = 2;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap_or_else(|_| EnvFilter::new("error"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(outcome) => ExitCode::from(exit_status(&outcome)),
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(EXIT_STARTUP)
        }
    }
}

async fn run() -> Result<RaceOutcome> {
    let file_config = CepraceConfig::load().context("loading configuration")?;
    let config =
        RaceConfig::from_env(file_config.as_ref()).context("resolving configuration")?;
    tracing::debug!(?config, "Configuration resolved");

    let code = {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        input::prompt_code(&mut stdin.lock(), &mut stdout).context("reading CEP from stdin")?
    };

    let outcome = lookup_cep(&code, &config).await;

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(present::render_outcome(&outcome).as_bytes())
        .and_then(|()| stdout.flush())
        .context("writing results")?;

    Ok(outcome)
}

fn exit_status(outcome: &RaceOutcome) -> u8 {
    if outcome.has_data() {
        EXIT_DATA
    } else {
        EXIT_NO_DATA
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ceprace_engine::{Envelope, Payload, Source};
    use serde_json::{Value, json};

    fn data(source: Source) -> Envelope {
        let Value::Object(fields) = json!({"cep": "01001000"}) else {
            panic!("expected object");
        };
        Envelope::new(source, Payload::data(fields).unwrap())
    }

    #[test]
    fn timed_out_exits_with_no_data() {
        assert_eq!(exit_status(&RaceOutcome::TimedOut), EXIT_NO_DATA);
    }

    #[test]
    fn only_errors_exits_with_no_data() {
        let fastest_only = RaceOutcome::FastestOnly {
            fastest: Envelope::failed(Source::BrasilApi, "connection refused"),
        };
        assert_eq!(exit_status(&fastest_only), EXIT_NO_DATA);

        let both_failed = RaceOutcome::BothReported {
            fastest: Envelope::failed(Source::ViaCep, "dns error"),
            second: Envelope::failed(Source::BrasilApi, "timed out"),
        };
        assert_eq!(exit_status(&both_failed), EXIT_NO_DATA);
    }

    #[test]
    fn any_data_exits_successfully() {
        let mixed = RaceOutcome::BothReported {
            fastest: Envelope::failed(Source::ViaCep, "dns error"),
            second: data(Source::BrasilApi),
        };
        assert_eq!(exit_status(&mixed), EXIT_DATA);
        assert_eq!(
            exit_status(&RaceOutcome::FastestOnly {
                fastest: data(Source::ViaCep)
            }),
            EXIT_DATA
        );
    }
}
