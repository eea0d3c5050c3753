use chrono::Utc;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// Elapsed time since `epoch_millis`, in the largest whole unit: `"3 minutes"`.
pub fn ago_in_words(epoch_millis: i64) -> String {
    ago_in_words_at(epoch_millis, Utc::now().timestamp_millis())
}

/// Same as [`ago_in_words`] against a fixed clock. Timestamps in the future
/// read as `"0 seconds"`.
pub fn ago_in_words_at(epoch_millis: i64, now_millis: i64) -> String {
    let elapsed = now_millis.saturating_sub(epoch_millis).max(0) / 1000;

    let (count, unit) = match elapsed {
        s if s < MINUTE => (s, "second"),
        s if s < HOUR => (s / MINUTE, "minute"),
        s if s < DAY => (s / HOUR, "hour"),
        s if s < MONTH => (s / DAY, "day"),
        s if s < YEAR => (s / MONTH, "month"),
        s => (s / YEAR, "year"),
    };

    if count == 1 {
        format!("{count} {unit}")
    } else {
        format!("{count} {unit}s")
    }
}
