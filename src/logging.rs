//! Tracing subscriber setup.
//!
//! `HELPDESK_LOG` takes precedence over `RUST_LOG`, which takes precedence
//! over the `-v`/`-q` command line flags.

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

pub const LOG_ENV: &str = "HELPDESK_LOG";

pub fn level(verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

pub fn init_subscriber(verbose: u8, quiet: bool) {
    let filter = build_env_filter(level(verbose, quiet));
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose > 0)
        .without_time();
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

fn build_env_filter(level: Level) -> EnvFilter {
    if let Ok(directives) = std::env::var(LOG_ENV) {
        if let Ok(filter) = EnvFilter::try_new(&directives) {
            return filter;
        }
    }
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new(format!(
        "warn,helpdesk={}",
        level.as_str().to_ascii_lowercase()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity() {
        assert_eq!(level(0, false), Level::WARN);
        assert_eq!(level(1, false), Level::INFO);
        assert_eq!(level(2, false), Level::DEBUG);
        assert_eq!(level(3, false), Level::TRACE);
        assert_eq!(level(4, false), Level::TRACE);
        assert_eq!(level(2, true), Level::ERROR);
    }
}
