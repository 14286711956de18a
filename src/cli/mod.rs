use std::ffi::OsString;
use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use tracing::Level;

/// Parsed command line, before any config file is consulted.
#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    pub config: bool,
    pub config_file: PathBuf,
    pub boards: Vec<String>,
    pub exclude: bool,
    pub request_time_limit: f64,
    pub output_path: PathBuf,
    pub save_log: bool,
    pub clean_log: bool,
    pub log_retention_days: u64,
    pub verbosity: Level,
    pub quiet: bool,
}

pub fn build_arg_parser() -> Command {
    Command::new("board-scraper")
        .version(env!("CARGO_PKG_VERSION"))
        .author("seska <seska@seska.io>")
        .about("Collects threads from image board boards, politely.")
        .arg(Arg::new("config")
            .short('c')
            .long("config")
            .action(ArgAction::SetTrue)
            .help("Load settings from the config file (see --config-file) instead of the command line."))
        .arg(Arg::new("config-file")
            .long("config-file")
            .value_name("PATH")
            .env("BOARD_SCRAPER_CONFIG_FILE")
            .default_value("config.json")
            .value_parser(value_parser!(PathBuf))
            .help("Config file read when --config is given."))
        .arg(Arg::new("boards")
            .short('b')
            .long("boards")
            .value_name("BOARD")
            .num_args(0..)
            .action(ArgAction::Append)
            .help("Boards to include, by short name, e.g. '-b a c g sci' collects /a/, /c/, /g/ and /sci/."))
        .arg(Arg::new("exclude")
            .short('e')
            .long("exclude")
            .action(ArgAction::SetTrue)
            .help("Treat the boards after -b as an exclusion list, e.g. '-b a c -e' collects everything but /a/ and /c/."))
        .arg(Arg::new("request-time-limit")
            .long("request-time-limit")
            .value_name("SECONDS")
            .default_value("1")
            .value_parser(parse_request_time_limit)
            .help("Wait time between each request, at least 1 second."))
        .arg(Arg::new("output-path")
            .long("output-path")
            .value_name("PATH")
            .env("BOARD_SCRAPER_OUTPUT_PATH")
            .default_value(".")
            .value_parser(value_parser!(PathBuf))
            .help("Folder that receives scraped output and the logs folder."))
        .arg(Arg::new("save-log")
            .long("no-save-log")
            .action(ArgAction::SetFalse)
            .help("Do not write log files."))
        .arg(Arg::new("clean-log")
            .long("no-clean-log")
            .action(ArgAction::SetFalse)
            .help("Do not remove old log files."))
        .arg(Arg::new("log-retention-days")
            .long("log-retention-days")
            .value_name("DAYS")
            .default_value("3")
            .value_parser(value_parser!(u64))
            .help("Log files older than this many days are removed on startup."))
        .arg(Arg::new("verbosity")
            .short('v')
            .action(ArgAction::Count)
            .help("Raises console log verbosity. Set multiple times."))
        .arg(Arg::new("quiet")
            .short('q')
            .long("quiet")
            .action(ArgAction::SetTrue)
            .help("Suppresses the startup banner."))
}

/// Validates `--request-time-limit`: any float of at least 1.
pub fn parse_request_time_limit(value: &str) -> Result<f64, String> {
    let limit: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    // NaN fails this comparison too
    if !(limit >= 1.0) {
        return Err(format!(
            "--request-time-limit value should be at least 1, now is {}",
            value
        ));
    }
    Ok(limit)
}

impl CliArgs {
    /// Parses the process arguments, exiting with a usage message on error.
    pub fn parse() -> CliArgs {
        CliArgs::from_matches(&build_arg_parser().get_matches())
    }

    pub fn try_parse_from<I, T>(args: I) -> Result<CliArgs, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = build_arg_parser().try_get_matches_from(args)?;
        Ok(CliArgs::from_matches(&matches))
    }

    pub fn from_matches(args: &ArgMatches) -> CliArgs {
        CliArgs {
            config: args.get_flag("config"),
            config_file: args
                .get_one::<PathBuf>("config-file")
                .cloned()
                .unwrap_or_else(|| PathBuf::from("config.json")),
            boards: args
                .get_many::<String>("boards")
                .map(|boards| boards.cloned().collect())
                .unwrap_or_default(),
            exclude: args.get_flag("exclude"),
            request_time_limit: args.get_one::<f64>("request-time-limit").copied().unwrap_or(1.0),
            output_path: args
                .get_one::<PathBuf>("output-path")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(".")),
            save_log: args.get_flag("save-log"),
            clean_log: args.get_flag("clean-log"),
            log_retention_days: args.get_one::<u64>("log-retention-days").copied().unwrap_or(3),
            verbosity: match args.get_count("verbosity") {
                0 => Level::INFO,
                1 => Level::DEBUG,
                _ => Level::TRACE,
            },
            quiet: args.get_flag("quiet"),
        }
    }
}
