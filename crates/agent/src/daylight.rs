use chrono::{DateTime, TimeZone, Timelike};

pub const DAYLIGHT_START_HOUR: u32 = 6;
pub const DAYLIGHT_END_HOUR: u32 = 18;

/// True iff the clock hour falls inside the daylight window [06:00, 18:00).
/// The loop driver evaluates it against host local time; no timezone
/// configuration.
pub fn is_daytime_at<Tz: TimeZone>(t: &DateTime<Tz>) -> bool {
    (DAYLIGHT_START_HOUR..DAYLIGHT_END_HOUR).contains(&t.hour())
}
