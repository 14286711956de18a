use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use bitflags::bitflags;
use tracing::Level;

use crate::cli::CliArgs;
use crate::config::{load_and_validate_config, ConfigError, ScraperConfig};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Flags: u8 {
        const INCLUDE = 0x01;
        const EXCLUDE = 0x02;
        const SAVE_LOG = 0x04;
        const CLEAN_LOG = 0x08;
    }
}

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub boards: Vec<String>,
    pub exclude_boards: bool,
    pub request_time_limit: f64,
    pub output_path: PathBuf,
    pub save_log: bool,
    pub clean_log: bool,
    pub log_retention_days: u64,
    pub verbosity: Level,
    pub quiet: bool,
    pub flags: Flags,
}

impl Settings {
    /// Builds settings from the config file when `--config` was given, otherwise from the arguments.
    ///
    /// Verbosity, quiet and log retention always come from the command line.
    pub fn resolve(args: &CliArgs) -> Result<Settings, ConfigError> {
        if args.config {
            let config = ScraperConfig::try_from(load_and_validate_config(&args.config_file)?)?;
            Ok(Settings::from_config(config, args))
        } else {
            Ok(Settings::from_args(args))
        }
    }

    pub fn from_args(args: &CliArgs) -> Settings {
        let mut settings = Settings {
            boards: args.boards.clone(),
            exclude_boards: args.exclude,
            request_time_limit: args.request_time_limit,
            output_path: args.output_path.clone(),
            save_log: args.save_log,
            clean_log: args.clean_log,
            log_retention_days: args.log_retention_days,
            verbosity: args.verbosity,
            quiet: args.quiet,
            flags: Flags::empty(),
        };
        settings.flags = settings.compute_flags();
        settings
    }

    pub fn from_config(config: ScraperConfig, args: &CliArgs) -> Settings {
        let mut settings = Settings {
            boards: config.boards,
            exclude_boards: config.exclude_boards,
            request_time_limit: config.request_time_limit,
            output_path: config.output_path,
            save_log: config.save_log,
            clean_log: config.clean_log,
            log_retention_days: args.log_retention_days,
            verbosity: args.verbosity,
            quiet: args.quiet,
            flags: Flags::empty(),
        };
        settings.flags = settings.compute_flags();
        settings
    }

    fn compute_flags(&self) -> Flags {
        let mut flags = if self.exclude_boards {
            Flags::EXCLUDE
        } else {
            Flags::INCLUDE
        };
        if self.save_log {
            flags |= Flags::SAVE_LOG;
        }
        if self.clean_log {
            flags |= Flags::CLEAN_LOG;
        }
        flags
    }
}

impl Display for Settings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "  Flags:       {:?}", self.flags)?;
        if self.boards.is_empty() {
            writeln!(f, "  Boards:      all")?;
        } else {
            let boards: Vec<String> = self.boards.iter().map(|b| format!("/{}/", b)).collect();
            let mode = if self.exclude_boards { "all except " } else { "" };
            writeln!(f, "  Boards:      {}{}", mode, boards.join(", "))?;
        }
        writeln!(f, "  Throttle:    {}s", self.request_time_limit)?;
        writeln!(f, "  Output:      {}", self.output_path.display())?;
        writeln!(f, "  Log Level:   {}", self.verbosity)?;
        if self.clean_log {
            writeln!(f, "  Retention:   {} days", self.log_retention_days)?;
        }
        Ok(())
    }
}
