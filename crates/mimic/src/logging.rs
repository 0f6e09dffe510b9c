//! Subscriber setup for the demo.
//!
//! `MIMIC_LOG` takes precedence over `RUST_LOG`. With neither set no
//! subscriber is installed and engine events are dropped.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter directives read before `RUST_LOG`.
pub const LOG_VAR: &str = "MIMIC_LOG";

static INIT: Once = Once::new();

/// Install a stderr subscriber if a log filter is configured.
pub fn init() {
    INIT.call_once(|| {
        let Some(directives) = directives(std::env::var(LOG_VAR).ok(), std::env::var("RUST_LOG").ok())
        else {
            return;
        };
        let filter = EnvFilter::try_new(&directives).unwrap_or_else(|err| {
            eprintln!("warning: ignoring log filter `{directives}`: {err}");
            EnvFilter::new("warn")
        });
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .init();
    });
}

fn directives(mimic: Option<String>, rust: Option<String>) -> Option<String> {
    [mimic, rust]
        .into_iter()
        .flatten()
        .find(|directives| !directives.trim().is_empty())
}
