//! Progress extraction from engine output
//!
//! [`ProgressParser`] turns a line such as
//! `frame=  120 fps= 30 q=28.0 size=  1024kB time=00:00:04.00 bitrate=...`
//! into a [`ProgressSample`]; [`ProgressTracker`] turns a sample into a
//! [`ProgressPercent`] once the total duration is known. Neither does I/O.

use crate::domain::model::{ProgressPercent, ProgressSample};

const MS_PER_HOUR: u64 = 3_600_000;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_SECOND: u64 = 1_000;

/// Extracts elapsed time from free-form engine output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressParser {
    marker: String,
}

impl Default for ProgressParser {
    fn default() -> Self {
        Self::new("time=")
    }
}

impl ProgressParser {
    /// Create a parser that looks for timestamps after `marker`
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Parse one line of output. Lines without a usable timestamp yield `None`.
    pub fn parse(&self, line: &str) -> Option<ProgressSample> {
        if self.marker.is_empty() {
            return None;
        }
        let start = line.find(&self.marker)? + self.marker.len();
        let rest = &line[start..];
        let end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == ':' || c == '.'))
            .unwrap_or(rest.len());

        parse_timestamp(&rest[..end]).map(|elapsed_ms| ProgressSample { elapsed_ms })
    }
}

/// Parse `H:M:S.F` into milliseconds. The fraction digits are a literal
/// millisecond count: `00:00:01.5` is 1005 ms, `00:00:01.500` is 1500 ms.
pub fn parse_timestamp(token: &str) -> Option<u64> {
    let mut parts = token.split(':');
    let hours = parse_field(parts.next()?)?;
    let minutes = parse_field(parts.next()?)?;
    let seconds_part = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let (seconds, fraction) = seconds_part.split_once('.')?;
    let seconds = parse_field(seconds)?;
    let fraction = parse_field(fraction)?;

    hours
        .checked_mul(MS_PER_HOUR)?
        .checked_add(minutes.checked_mul(MS_PER_MINUTE)?)?
        .checked_add(seconds.checked_mul(MS_PER_SECOND)?)?
        .checked_add(fraction)
}

fn parse_field(field: &str) -> Option<u64> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Converts elapsed time into a clamped percentage of a known total
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressTracker {
    total_duration_ms: Option<u64>,
}

impl ProgressTracker {
    /// A zero or missing duration produces a tracker that never reports
    pub fn new(total_duration_ms: Option<u64>) -> Self {
        Self {
            total_duration_ms: total_duration_ms.filter(|ms| *ms > 0),
        }
    }

    pub fn total_duration_ms(&self) -> Option<u64> {
        self.total_duration_ms
    }

    /// floor(elapsed / total * 100), clamped to 0..=100
    pub fn percent(&self, elapsed_ms: i64) -> Option<ProgressPercent> {
        let total = i128::from(self.total_duration_ms?);
        let raw = i128::from(elapsed_ms) * 100;
        Some(ProgressPercent::clamped(raw.div_euclid(total)))
    }

    /// Convenience for samples produced by [`ProgressParser`]
    pub fn percent_for(&self, sample: ProgressSample) -> Option<ProgressPercent> {
        let elapsed = i64::try_from(sample.elapsed_ms).unwrap_or(i64::MAX);
        self.percent(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elapsed(line: &str) -> Option<u64> {
        ProgressParser::default().parse(line).map(|s| s.elapsed_ms)
    }

    #[test]
    fn test_line_without_timestamp_is_ignored() {
        assert_eq!(elapsed("Input #0, mov,mp4,m4a,3gp,3g2,mj2, from 'in.mp4':"), None);
        assert_eq!(elapsed(""), None);
        assert_eq!(elapsed("Press [q] to stop, [?] for help"), None);
    }

    #[test]
    fn test_parse_reference_timestamp() {
        assert_eq!(elapsed("time=01:02:03.456"), Some(3_723_456));
    }

    #[test]
    fn test_parse_full_stats_line() {
        let line = "frame=  100 fps= 30 q=28.0 size=    1024kB time=00:00:10.000 bitrate= 838.9kbits/s speed=1.2x";
        assert_eq!(elapsed(line), Some(10_000));
    }

    #[test]
    fn test_fraction_is_taken_verbatim() {
        assert_eq!(elapsed("time=00:00:05.50"), Some(5_050));
        assert_eq!(elapsed("time=00:00:05.500"), Some(5_500));
        assert_eq!(elapsed("time=0:01:00.000"), Some(60_000));
    }

    #[test]
    fn test_malformed_timestamps_are_no_match() {
        assert_eq!(elapsed("time=N/A bitrate=N/A"), None);
        assert_eq!(elapsed("time=00:05.00"), None);
        assert_eq!(elapsed("time=00:00:05"), None);
        assert_eq!(elapsed("time=00:00:05."), None);
        assert_eq!(elapsed("time=00::05.00"), None);
        assert_eq!(elapsed("time=1:2:3:4.5"), None);
        assert_eq!(elapsed("time=00:00:05.1.2"), None);
        assert_eq!(elapsed("time= 00:00:05.00"), None);
    }

    #[test]
    fn test_overflowing_timestamp_is_no_match() {
        assert_eq!(elapsed("time=99999999999999999999:00:00.000"), None);
        assert_eq!(elapsed("time=18446744073709:00:00.000"), None);
    }

    #[test]
    fn test_only_first_marker_is_considered() {
        assert_eq!(elapsed("time=N/A later time=00:00:01.000"), None);
        assert_eq!(elapsed("time=00:00:02.000 time=00:00:03.000"), Some(2_000));
    }

    #[test]
    fn test_custom_marker() {
        let parser = ProgressParser::new("out_time=");
        assert_eq!(parser.marker(), "out_time=");
        assert_eq!(
            parser.parse("out_time=00:00:01.000").map(|s| s.elapsed_ms),
            Some(1_000)
        );
        assert_eq!(parser.parse("time=00:00:01.000"), None);
        assert_eq!(ProgressParser::new("").parse("time=00:00:01.000"), None);
    }

    #[test]
    fn test_tracker_floors_percentage() {
        let tracker = ProgressTracker::new(Some(10_000_000));
        assert_eq!(tracker.percent(3_723_456), Some(ProgressPercent::clamped(37)));
    }

    #[test]
    fn test_tracker_caps_at_hundred() {
        let tracker = ProgressTracker::new(Some(60_000));
        assert_eq!(tracker.percent(60_000).map(|p| p.value()), Some(100));
        assert_eq!(tracker.percent(61_000).map(|p| p.value()), Some(100));
        assert_eq!(tracker.percent(i64::MAX).map(|p| p.value()), Some(100));
    }

    #[test]
    fn test_tracker_clamps_negative_to_zero() {
        let tracker = ProgressTracker::new(Some(60_000));
        assert_eq!(tracker.percent(-1).map(|p| p.value()), Some(0));
        assert_eq!(tracker.percent(i64::MIN).map(|p| p.value()), Some(0));
    }

    #[test]
    fn test_tracker_without_duration_reports_nothing() {
        assert_eq!(ProgressTracker::new(None).percent(1_000), None);
        assert_eq!(ProgressTracker::new(Some(0)).percent(1_000), None);
        assert_eq!(ProgressTracker::new(Some(0)).total_duration_ms(), None);
    }

    #[test]
    fn test_parser_and_tracker_together() {
        let parser = ProgressParser::default();
        let tracker = ProgressTracker::new(Some(60_000));
        let percents: Vec<u8> = [
            "frame=    0 time=0:00:00.000 bitrate=N/A",
            "frame=  900 time=0:00:30.000 bitrate=812kbits/s",
            "encoder: libopenh264",
            "frame= 1800 time=0:01:00.000 bitrate=790kbits/s",
        ]
        .iter()
        .filter_map(|line| parser.parse(line))
        .filter_map(|sample| tracker.percent_for(sample))
        .map(|p| p.value())
        .collect();

        assert_eq!(percents, vec![0, 50, 100]);
    }
}
