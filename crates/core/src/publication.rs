//! Publication helpers shared by the router and the scheduled jobs.
//!
//! Title extraction, SEO strings, publish-date parsing and the
//! scheduled/published decision. None of these touch the network.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::RecordStatus;
use crate::types::Timestamp;
use crate::workflow::WorkflowError;

/// Lines starting with this marker are treated as the article heading.
pub const HEADING_MARKER: char = '#';

/// Drafts containing this marker are considered failed generations.
pub const ERROR_MARKER: &str = "Error";

/// Maximum length of a local post title in characters.
pub const MAX_TITLE_LENGTH: usize = 100;

/// Format accepted from the browser's `datetime-local` input.
pub const PUBLISH_DATE_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Format written to the external store.
const EXTERNAL_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.000Z";

/// Where a finished draft is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishTarget {
    /// A `posts` row in the local database.
    Local,
    /// An external record marked published right away.
    ExternalImmediate,
    /// An external record with a caller-supplied publish date.
    ExternalScheduled,
}

/// Title of a draft: the first heading line with every marker stripped, or
/// `fallback` when the draft has no heading.
pub fn extract_title(draft: &str, fallback: &str) -> String {
    draft
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with(HEADING_MARKER))
        .map(|line| line.replace(HEADING_MARKER, "").trim().to_string())
        .unwrap_or_else(|| fallback.to_string())
}

/// Meta description derived from the title and primary keyword.
pub fn seo_summary(title: &str, primary_keyword: &str) -> String {
    format!("{title} - Explore insights on {primary_keyword} and more.")
}

/// Keyword list stored on local posts.
pub fn seo_keywords(primary_keyword: &str, additional_keywords: &str) -> String {
    format!("{primary_keyword}, {additional_keywords}")
}

/// Returns `true` if the draft carries the failed-generation marker.
pub fn contains_error_marker(draft: &str) -> bool {
    draft.contains(ERROR_MARKER)
}

/// Truncate `value` to at most `max` characters.
pub fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

/// Parse a caller-supplied publish date.
///
/// Accepts `YYYY-MM-DDTHH:MM` (interpreted as UTC) and RFC 3339.
pub fn parse_publish_date(input: &str) -> Result<Timestamp, WorkflowError> {
    let input = input.trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, PUBLISH_DATE_INPUT_FORMAT) {
        return Ok(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(input)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| WorkflowError::DateFormat(format!("Invalid date format: {e}")))
}

/// `Scheduled` iff `publish_at` is strictly after `now`.
pub fn status_for(publish_at: Timestamp, now: Timestamp) -> RecordStatus {
    if publish_at > now {
        RecordStatus::Scheduled
    } else {
        RecordStatus::Published
    }
}

/// Render a timestamp the way the external store expects it.
pub fn format_external_timestamp(ts: Timestamp) -> String {
    ts.format(EXTERNAL_TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone};

    use super::*;

    #[test]
    fn title_from_heading() {
        assert_eq!(extract_title("# My Title\nBody", "Topic"), "My Title");
    }

    #[test]
    fn title_falls_back_to_topic() {
        assert_eq!(extract_title("Just a body\nwith lines", "Topic"), "Topic");
        assert_eq!(extract_title("", "Topic"), "Topic");
    }

    #[test]
    fn title_uses_first_heading_and_strips_all_markers() {
        let draft = "intro\n  ## Sub #1 heading  \n# Later";
        assert_eq!(extract_title(draft, "Topic"), "Sub 1 heading");
    }

    #[test]
    fn seo_strings() {
        assert_eq!(
            seo_summary("Green Tea", "tea"),
            "Green Tea - Explore insights on tea and more."
        );
        assert_eq!(seo_keywords("tea", "matcha, oolong"), "tea, matcha, oolong");
    }

    #[test]
    fn error_marker_detection() {
        assert!(contains_error_marker("Error generating content: boom"));
        assert!(!contains_error_marker("# All good"));
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate_chars("ééééé", 3), "ééé");
        assert_eq!(truncate_chars("ab", 10), "ab");
    }

    #[test]
    fn parse_datetime_local_input() {
        let parsed = parse_publish_date("2030-05-01T09:30").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2030, 5, 1, 9, 30, 0).unwrap());
    }

    #[test]
    fn parse_rfc3339_input() {
        let parsed = parse_publish_date("2030-05-01T11:30:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2030, 5, 1, 9, 30, 0).unwrap());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_matches!(
            parse_publish_date("next tuesday"),
            Err(WorkflowError::DateFormat(msg)) if msg.starts_with("Invalid date format")
        );
    }

    #[test]
    fn past_timestamp_is_published() {
        let now = Utc::now();
        assert_eq!(status_for(now - Duration::hours(1), now), RecordStatus::Published);
        assert_eq!(status_for(now, now), RecordStatus::Published);
    }

    #[test]
    fn future_timestamp_is_scheduled() {
        let now = Utc::now();
        assert_eq!(status_for(now + Duration::minutes(1), now), RecordStatus::Scheduled);
    }

    #[test]
    fn external_timestamp_format() {
        let ts = Utc.with_ymd_and_hms(2030, 5, 1, 9, 30, 0).unwrap();
        assert_eq!(format_external_timestamp(ts), "2030-05-01T09:30:00.000Z");
    }

    #[test]
    fn publish_target_wire_names() {
        let target: PublishTarget = serde_json::from_str("\"external_scheduled\"").unwrap();
        assert_eq!(target, PublishTarget::ExternalScheduled);
    }
}
