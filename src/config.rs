use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "helpdesk.toml";

/// Contents of the configuration file. Every value is optional; the command
/// line fills in or overrides the desk dimensions.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub desk: DeskSection,
    pub timing: Timing,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeskSection {
    pub students: Option<usize>,
    pub tutors: Option<usize>,
    pub chairs: Option<usize>,
    pub helps: Option<u32>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Timing {
    /// Students work alone for a random time below this bound.
    pub max_think_us: u64,
    pub session_us: u64,
    pub seed: Option<u64>,
}

impl Default for Timing {
    fn default() -> Self {
        Timing {
            max_think_us: 2000,
            session_us: 200,
            seed: None,
        }
    }
}

impl Timing {
    pub fn session(&self) -> Duration {
        Duration::from_micros(self.session_us)
    }
}

/// A validated configuration, ready to run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub students: usize,
    pub tutors: usize,
    pub chairs: usize,
    pub helps: u32,
    pub timing: Timing,
}

impl Config {
    pub fn parse(path: &Path, content: &str) -> Result<Config, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Config::parse(path, &content)
    }

    /// Load the given file, or the default one if it exists.
    pub fn load_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
        match path {
            Some(path) => Config::load(path),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Config::load(&default)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    pub fn override_desk(&mut self, overrides: &DeskSection) {
        let desk = &mut self.desk;
        desk.students = overrides.students.or(desk.students);
        desk.tutors = overrides.tutors.or(desk.tutors);
        desk.chairs = overrides.chairs.or(desk.chairs);
        desk.helps = overrides.helps.or(desk.helps);
    }

    pub fn validate(&self) -> Result<Settings, ConfigError> {
        let desk = &self.desk;
        let students = desk.students.ok_or(ConfigError::Missing("students"))?;
        let tutors = desk.tutors.ok_or(ConfigError::Missing("tutors"))?;
        let chairs = desk.chairs.ok_or(ConfigError::Missing("chairs"))?;
        let helps = desk.helps.ok_or(ConfigError::Missing("helps"))?;
        if students == 0 {
            return Err(ConfigError::NotPositive("students"));
        }
        if tutors == 0 {
            return Err(ConfigError::NotPositive("tutors"));
        }
        if chairs == 0 && helps > 0 {
            return Err(ConfigError::NoChairs { helps });
        }
        Ok(Settings {
            students,
            tutors,
            chairs,
            helps,
            timing: self.timing.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desk(students: usize, tutors: usize, chairs: usize, helps: u32) -> DeskSection {
        DeskSection {
            students: Some(students),
            tutors: Some(tutors),
            chairs: Some(chairs),
            helps: Some(helps),
        }
    }

    #[test]
    fn parse_full_file() {
        let config = Config::parse(
            Path::new("test.toml"),
            r#"
            [desk]
            students = 10
            tutors = 3
            chairs = 4
            helps = 2

            [timing]
            max_think_us = 500
            session_us = 50
            seed = 7
            "#,
        )
        .unwrap();
        let settings = config.validate().unwrap();
        assert_eq!(settings.students, 10);
        assert_eq!(settings.tutors, 3);
        assert_eq!(settings.chairs, 4);
        assert_eq!(settings.helps, 2);
        assert_eq!(settings.timing.seed, Some(7));
        assert_eq!(settings.timing.session(), Duration::from_micros(50));
    }

    #[test]
    fn timing_defaults() {
        let config = Config::parse(Path::new("test.toml"), "[desk]\nstudents = 1").unwrap();
        assert_eq!(config.timing, Timing::default());
        assert_eq!(config.timing.max_think_us, 2000);
        assert_eq!(config.timing.session_us, 200);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            Config::parse(Path::new("test.toml"), "[desk]\nstudent = 1"),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn command_line_wins() {
        let mut config =
            Config::parse(Path::new("test.toml"), "[desk]\nstudents = 1\ntutors = 1").unwrap();
        config.override_desk(&DeskSection {
            students: Some(5),
            chairs: Some(2),
            helps: Some(3),
            ..DeskSection::default()
        });
        let settings = config.validate().unwrap();
        assert_eq!(
            (settings.students, settings.tutors, settings.chairs, settings.helps),
            (5, 1, 2, 3)
        );
    }

    #[test]
    fn validation() {
        let validate = |desk: DeskSection| {
            Config {
                desk,
                ..Config::default()
            }
            .validate()
        };
        assert!(matches!(
            validate(DeskSection::default()),
            Err(ConfigError::Missing("students"))
        ));
        assert!(matches!(
            validate(desk(0, 1, 1, 1)),
            Err(ConfigError::NotPositive("students"))
        ));
        assert!(matches!(
            validate(desk(1, 0, 1, 1)),
            Err(ConfigError::NotPositive("tutors"))
        ));
        assert!(matches!(
            validate(desk(1, 1, 0, 1)),
            Err(ConfigError::NoChairs { helps: 1 })
        ));
        assert!(validate(desk(1, 1, 0, 0)).is_ok());
        assert!(validate(desk(3, 1, 1, 2)).is_ok());
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            Config::load(Path::new("/nonexistent/helpdesk.toml")),
            Err(ConfigError::Read { .. })
        ));
    }
}
