use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::workflow::LeavePolicy;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub workflow: WorkflowConfig,
    pub reminders: ReminderConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct WorkflowConfig {
    /// Shared channel where new requests and reminders are broadcast.
    pub coordination_channel: String,
    pub maximum_leave_days: i64,
    pub maximum_wait_days: i64,
    pub minimum_lead_days: i64,
}

#[derive(Clone, Debug)]
pub struct ReminderConfig {
    /// Cron expression for the reminder scan; 5-field expressions are
    /// accepted and normalized by the scheduler.
    pub schedule: String,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub coordination_channel: Option<String>,
    pub maximum_leave_days: Option<i64>,
    pub maximum_wait_days: Option<i64>,
    pub minimum_lead_days: Option<i64>,
    pub reminder_schedule: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workflow: WorkflowConfig {
                coordination_channel: "leave-coordination".to_string(),
                maximum_leave_days: 28,
                maximum_wait_days: 7,
                minimum_lead_days: 14,
            },
            reminders: ReminderConfig { schedule: "0 0 7 * * *".to_string() },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("leavebot.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn leave_policy(&self) -> LeavePolicy {
        LeavePolicy {
            minimum_lead_days: self.workflow.minimum_lead_days,
            maximum_leave_days: self.workflow.maximum_leave_days,
            maximum_wait_days: self.workflow.maximum_wait_days,
        }
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(workflow) = patch.workflow {
            if let Some(coordination_channel) = workflow.coordination_channel {
                self.workflow.coordination_channel = coordination_channel;
            }
            if let Some(maximum_leave_days) = workflow.maximum_leave_days {
                self.workflow.maximum_leave_days = maximum_leave_days;
            }
            if let Some(maximum_wait_days) = workflow.maximum_wait_days {
                self.workflow.maximum_wait_days = maximum_wait_days;
            }
            if let Some(minimum_lead_days) = workflow.minimum_lead_days {
                self.workflow.minimum_lead_days = minimum_lead_days;
            }
        }

        if let Some(reminders) = patch.reminders {
            if let Some(schedule) = reminders.schedule {
                self.reminders.schedule = schedule;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("LEAVEBOT_COORDINATION_CHANNEL") {
            self.workflow.coordination_channel = value;
        }
        if let Some(value) = read_env("LEAVEBOT_MAXIMUM_LEAVE_DAYS") {
            self.workflow.maximum_leave_days = parse_days("LEAVEBOT_MAXIMUM_LEAVE_DAYS", &value)?;
        }
        if let Some(value) = read_env("LEAVEBOT_MAXIMUM_WAIT_DAYS") {
            self.workflow.maximum_wait_days = parse_days("LEAVEBOT_MAXIMUM_WAIT_DAYS", &value)?;
        }
        if let Some(value) = read_env("LEAVEBOT_MINIMUM_LEAD_DAYS") {
            self.workflow.minimum_lead_days = parse_days("LEAVEBOT_MINIMUM_LEAD_DAYS", &value)?;
        }
        if let Some(value) = read_env("LEAVEBOT_REMINDER_SCHEDULE") {
            self.reminders.schedule = value;
        }
        if let Some(value) = read_env("LEAVEBOT_LOG_LEVEL") {
            self.logging.level = value;
        }
        if let Some(value) = read_env("LEAVEBOT_LOG_FORMAT") {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(coordination_channel) = overrides.coordination_channel {
            self.workflow.coordination_channel = coordination_channel;
        }
        if let Some(maximum_leave_days) = overrides.maximum_leave_days {
            self.workflow.maximum_leave_days = maximum_leave_days;
        }
        if let Some(maximum_wait_days) = overrides.maximum_wait_days {
            self.workflow.maximum_wait_days = maximum_wait_days;
        }
        if let Some(minimum_lead_days) = overrides.minimum_lead_days {
            self.workflow.minimum_lead_days = minimum_lead_days;
        }
        if let Some(reminder_schedule) = overrides.reminder_schedule {
            self.reminders.schedule = reminder_schedule;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workflow.coordination_channel.trim().is_empty() {
            return Err(ConfigError::Validation(
                "workflow.coordination_channel must not be empty".to_string(),
            ));
        }
        if self.workflow.maximum_leave_days < 1 {
            return Err(ConfigError::Validation(
                "workflow.maximum_leave_days must be at least 1".to_string(),
            ));
        }
        if self.workflow.maximum_wait_days < 1 {
            return Err(ConfigError::Validation(
                "workflow.maximum_wait_days must be at least 1".to_string(),
            ));
        }
        if self.workflow.minimum_lead_days < 0 {
            return Err(ConfigError::Validation(
                "workflow.minimum_lead_days must not be negative".to_string(),
            ));
        }
        if self.reminders.schedule.trim().is_empty() {
            return Err(ConfigError::Validation(
                "reminders.schedule must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    workflow: Option<WorkflowPatch>,
    reminders: Option<ReminderPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct WorkflowPatch {
    coordination_channel: Option<String>,
    maximum_leave_days: Option<i64>,
    maximum_wait_days: Option<i64>,
    minimum_lead_days: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct ReminderPatch {
    schedule: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("leavebot.toml"), PathBuf::from("config/leavebot.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    toml::from_str::<ConfigPatch>(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_days(key: &str, value: &str) -> Result<i64, ConfigError> {
    value.trim().parse::<i64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};

    #[test]
    fn defaults_match_the_documented_limits() {
        let config = AppConfig::default();
        assert_eq!(config.workflow.coordination_channel, "leave-coordination");
        assert_eq!(config.workflow.maximum_leave_days, 28);
        assert_eq!(config.workflow.maximum_wait_days, 7);
        assert_eq!(config.workflow.minimum_lead_days, 14);
        assert_eq!(config.reminders.schedule, "0 0 7 * * *");
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn file_patch_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "[workflow]\ncoordination_channel = \"approvers\"\nmaximum_leave_days = 21\n\n\
             [reminders]\nschedule = \"0 0 9 * * *\"\n\n[logging]\nformat = \"json\"\n"
        )
        .expect("write config");

        let config = AppConfig::load(LoadOptions {
            config_path: Some(file.path().to_path_buf()),
            require_file: true,
            overrides: ConfigOverrides::default(),
        })
        .expect("load");

        assert_eq!(config.workflow.coordination_channel, "approvers");
        assert_eq!(config.workflow.maximum_leave_days, 21);
        assert_eq!(config.workflow.maximum_wait_days, 7, "untouched fields keep defaults");
        assert_eq!(config.reminders.schedule, "0 0 9 * * *");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let result = AppConfig::load(LoadOptions {
            config_path: Some("does-not-exist.toml".into()),
            require_file: true,
            overrides: ConfigOverrides::default(),
        });

        assert!(matches!(result, Err(ConfigError::MissingConfigFile(_))));
    }

    #[test]
    fn programmatic_overrides_win_over_defaults() {
        let config = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                minimum_lead_days: Some(7),
                coordination_channel: Some("people-ops".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .expect("load");

        assert_eq!(config.workflow.minimum_lead_days, 7);
        assert_eq!(config.workflow.coordination_channel, "people-ops");
    }

    #[test]
    fn env_override_with_garbage_day_count_is_rejected() {
        // Only this test touches the variable, so no cross-test races.
        std::env::set_var("LEAVEBOT_MAXIMUM_LEAVE_DAYS", "four weeks");
        let result = AppConfig::load(LoadOptions::default());
        std::env::remove_var("LEAVEBOT_MAXIMUM_LEAVE_DAYS");

        assert!(matches!(result, Err(ConfigError::InvalidEnvOverride { .. })));
    }

    #[test]
    fn validation_rejects_nonsense_limits() {
        let mut config = AppConfig::default();
        config.workflow.maximum_leave_days = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let mut config = AppConfig::default();
        config.workflow.coordination_channel = "  ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        assert!("verbose".parse::<LogFormat>().is_err());
        assert_eq!("Pretty".parse::<LogFormat>().expect("parse"), LogFormat::Pretty);
    }

    #[test]
    fn leave_policy_mirrors_the_workflow_limits() {
        let config = AppConfig::default();
        let policy = config.leave_policy();
        assert_eq!(policy.minimum_lead_days, 14);
        assert_eq!(policy.maximum_leave_days, 28);
        assert_eq!(policy.maximum_wait_days, 7);
    }
}
