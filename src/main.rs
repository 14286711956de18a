use anyhow::Context;
use tracing::{debug, info, warn};

use board_scraper::cli::CliArgs;
use board_scraper::config::Settings;
use board_scraper::logging::{retention_days, timestamp, LogManager, LOG_TARGET};
use board_scraper::ui::banner;

const LOG_FOLDER: &str = "logs";

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let settings = Settings::resolve(&args).context("could not load settings")?;

    let mut log_manager = LogManager::new(&settings.output_path, LOG_FOLDER, settings.save_log)
        .context("could not create the log folder")?;
    log_manager.setup(settings.verbosity)?;
    log_manager.install_global()?;

    if args.config {
        debug!(target: LOG_TARGET, "Loaded config from {}", args.config_file.display());
    }
    if !settings.quiet {
        banner::print_banner(&settings);
    }

    if settings.clean_log {
        let removed = log_manager
            .cleanup_old_logs(retention_days(settings.log_retention_days))
            .context("could not clean up old logs")?;
        info!(target: LOG_TARGET, "Removed {} old log file(s)", removed.len());
        if !settings.quiet {
            println!("{}", banner::cleanup_summary(removed.len(), settings.log_retention_days));
        }
    }

    for file in log_manager.log_files() {
        debug!(target: LOG_TARGET, "Writing log to {}", file.display());
    }
    if settings.boards.is_empty() && settings.exclude_boards {
        warn!(target: LOG_TARGET, "--exclude given without boards, every board will be collected");
    }

    info!(
        target: LOG_TARGET,
        "Run {}{} ready: {} board(s), {}s between requests",
        timestamp::day_stamp(),
        timestamp::time_stamp(),
        if settings.boards.is_empty() { "all".to_string() } else { settings.boards.len().to_string() },
        settings.request_time_limit
    );

    Ok(())
}
