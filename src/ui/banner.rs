use colored::Colorize;
use console::Emoji;

use crate::config::Settings;

static THREAD: Emoji = Emoji("🧵", "|");
static HEARTS: Emoji = Emoji("💖💖💖", "<3 ");
static BROOM: Emoji = Emoji("🧹", "~");

/// Startup banner followed by the resolved settings.
pub fn banner(settings: &Settings) -> String {
    let mut builder = string_builder::Builder::default();

    builder.append("      __                         __\n");
    builder.append("     / /_  ____  ____ __________/ /\n");
    builder.append("    / __ \\/ __ \\/ __ `/ ___/ __  /\n");
    builder.append("   / /_/ / /_/ / /_/ / /  / /_/ /\n");
    builder.append("  /_.___/\\____/\\__,_/_/   \\__,_/  scraper\n");
    builder.append(format!("  v{}\n\n", env!("CARGO_PKG_VERSION")));
    builder.append(format!("  {}    a patient board scraper\n", THREAD));
    builder.append(format!("  {}    from seska with {}\n", THREAD, HEARTS));
    builder.append(format!("  {}\n", THREAD));
    builder.append(format!("  {}    usage: board-scraper -b <BOARD>...\n", THREAD));
    builder.append(format!("  {}\n\n", THREAD));
    builder.append(format!("{}\n", settings));

    builder.string().unwrap_or_default()
}

pub fn print_banner(settings: &Settings) {
    print!("{}", banner(settings));
}

/// One line summary of a log cleanup pass.
pub fn cleanup_summary(removed: usize, retention_days: u64) -> String {
    let count = removed.to_string();
    format!(
        "{} Removed {} log file(s) older than {} days",
        BROOM,
        if removed > 0 { count.yellow() } else { count.green() },
        retention_days
    )
}
