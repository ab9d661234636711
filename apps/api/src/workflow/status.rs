//! Rotating status line shown while a roadmap is generating. Cosmetic only: it
//! follows the wall clock, not the request.

use chrono::{DateTime, Utc};

pub const STATUS_MESSAGES: [&str; 6] = [
    "Scanning resume...",
    "Analyzing skill gaps...",
    "Checking ATS compatibility...",
    "Generating milestones...",
    "Curating resources...",
    "Finalizing roadmap...",
];

pub const ROTATION_MS: i64 = 1500;

pub fn status_message(started_at: DateTime<Utc>, now: DateTime<Utc>) -> &'static str {
    let elapsed_ms = (now - started_at).num_milliseconds().max(0);
    let index = (elapsed_ms / ROTATION_MS) as usize % STATUS_MESSAGES.len();
    STATUS_MESSAGES[index]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_rotates_every_interval_and_wraps() {
        let start = Utc::now();
        assert_eq!(status_message(start, start), "Scanning resume...");
        assert_eq!(
            status_message(start, start + Duration::milliseconds(1499)),
            "Scanning resume..."
        );
        assert_eq!(
            status_message(start, start + Duration::milliseconds(1500)),
            "Analyzing skill gaps..."
        );
        assert_eq!(
            status_message(start, start + Duration::milliseconds(6 * 1500)),
            "Scanning resume..."
        );
    }

    #[test]
    fn test_clock_skew_shows_first_message() {
        let start = Utc::now();
        assert_eq!(
            status_message(start, start - Duration::seconds(5)),
            "Scanning resume..."
        );
    }
}
