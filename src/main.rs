use crate::config::{Config, DeskSection, Settings};
use crate::events::{EventSink, LogSink, Tee};
use crate::simulation::Simulation;
use crate::stats::Summary;
use clap::{ArgAction, Parser};
use eyre::{Context, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

mod config;
mod desk;
mod display;
mod error;
mod events;
mod logging;
mod model;
mod simulation;
mod stats;
mod workers;

/// Exit status used when the configuration is unusable.
const CONFIG_ERROR: u8 = 2;

#[derive(Parser, Debug)]
#[command(author, version, about = "Simulate students seeking help from tutors")]
struct Args {
    /// Use FILE instead of helpdesk.toml
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Seed the students' random think times
    #[arg(short, long)]
    seed: Option<u64>,
    /// Set verbosity level
    #[arg(short, action = ArgAction::Count)]
    verbose: u8,
    /// Only print the final summary and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
    /// Number of students
    students: Option<usize>,
    /// Number of tutors
    tutors: Option<usize>,
    /// Number of waiting chairs
    chairs: Option<usize>,
    /// Number of sessions each student needs
    helps: Option<u32>,
}

impl Args {
    fn desk(&self) -> DeskSection {
        DeskSection {
            students: self.students,
            tutors: self.tutors,
            chairs: self.chairs,
            helps: self.helps,
        }
    }
}

fn configure(args: &Args) -> Result<Settings, error::Error> {
    let mut config = Config::load_or_default(args.config.as_deref())?;
    config.override_desk(&args.desk());
    if args.seed.is_some() {
        config.timing.seed = args.seed;
    }
    Ok(config.validate()?)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let args = Args::parse();
    logging::init_subscriber(args.verbose, args.quiet);
    let settings = match configure(&args) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {:?}", eyre::Report::new(e));
            return Ok(ExitCode::from(CONFIG_ERROR));
        }
    };
    let summary = Arc::new(Summary::new(settings.students));
    let sinks: Vec<Arc<dyn EventSink>> = vec![Arc::new(LogSink), summary.clone()];
    let report = Simulation::new(settings, Arc::new(Tee::new(sinks)))
        .run()
        .await
        .context("simulation aborted")?;
    display::display_stats(&report);
    display::display_tutors(&report);
    display::display_priorities(&summary);
    display::display_unlucky(&summary);
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, Error};

    #[test]
    fn configuration_errors_are_reported_once() {
        let args = Args::parse_from(["helpdesk", "-c", "/nonexistent/helpdesk.toml"]);
        let e = configure(&args).unwrap_err();
        assert!(matches!(e, Error::Config(ConfigError::Read { .. })));
        let report = format!("{:?}", eyre::Report::new(e));
        assert_eq!(report.matches("invalid configuration").count(), 1);
    }

    #[test]
    fn positional_values_override_the_file() {
        let args = Args::parse_from(["helpdesk", "0", "1", "1", "1"]);
        assert!(matches!(
            configure(&args),
            Err(Error::Config(ConfigError::NotPositive("students")))
        ));
        let args = Args::parse_from(["helpdesk", "-s", "9", "3", "2", "1", "4"]);
        let settings = configure(&args).unwrap();
        assert_eq!(
            (settings.students, settings.tutors, settings.chairs, settings.helps),
            (3, 2, 1, 4)
        );
        assert_eq!(settings.timing.seed, Some(9));
    }
}
