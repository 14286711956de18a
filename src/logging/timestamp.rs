use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// Format used for log file names, e.g. `2024_03_09_17_04_55`.
pub const FULL_TIME_FORMAT: &str = "%Y_%m_%d_%H_%M_%S";

/// UTC timestamp to second precision, suitable for a filename.
pub fn full_time() -> String {
    format_full_time(Utc::now())
}

pub fn format_full_time(at: DateTime<Utc>) -> String {
    at.format(FULL_TIME_FORMAT).to_string()
}

/// Reads the stamp a log file name ends with, e.g. `info_log_2024_03_09_17_04_55.log`.
///
/// Names without a trailing stamp yield `None`.
pub fn parse_log_stamp(file_name: &str) -> Option<DateTime<Utc>> {
    let stem = file_name.strip_suffix(".log")?;
    let start = stem.len().checked_sub(STAMP_LEN)?;
    let stamp = stem.get(start..)?;
    NaiveDateTime::parse_from_str(stamp, FULL_TIME_FORMAT)
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

const STAMP_LEN: usize = "yyyy_mm_dd_hh_mm_ss".len();

/// Current UTC day as `YYYY_MM_DD`.
pub fn day_stamp() -> String {
    Utc::now().format("%Y_%m_%d").to_string()
}

/// Current UTC time of day as `_HH_MM_SS`, appended to a day stamp when labelling a run.
pub fn time_stamp() -> String {
    Utc::now().format("_%H_%M_%S").to_string()
}
