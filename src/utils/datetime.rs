//! Centralized datetime handling utilities
//!
//! Upstream contest APIs disagree about timestamp representations: epoch
//! seconds, RFC3339 strings with offsets, and naive datetime strings with no
//! timezone at all. This module provides one tolerant parser so every source
//! adapter resolves to `DateTime<Utc>` the same way.
//!
//! # Features
//!
//! - Flexible parsing from multiple datetime formats
//! - Epoch-seconds conversion with range checking
//! - Consistent UTC timezone handling
//! - Error types specific to datetime operations

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

/// Errors that can occur during datetime operations
#[derive(Error, Debug)]
pub enum DateTimeError {
    /// Invalid datetime format provided
    #[error("Invalid datetime format: '{input}' - expected RFC3339 (2025-06-14T20:00:00Z) or a known naive format (14 Jun 2025 20:00:00)")]
    InvalidFormat { input: String },

    /// Timestamp is outside the representable range
    #[error("Timestamp out of range: {input}")]
    OutOfRange { input: String },
}

/// Centralized datetime parsing utilities
pub struct DateTimeParser;

impl DateTimeParser {
    /// Parse a datetime string from the formats seen across upstream APIs.
    ///
    /// Supports:
    /// - RFC3339 with timezone: "2025-06-14T20:00:00Z"
    /// - RFC3339 with offset: "2025-06-14T20:00:00+05:30"
    /// - ISO without timezone (assumed UTC): "2025-06-14T20:00:00"
    /// - Space-separated (assumed UTC): "2025-06-14 20:00:00"
    /// - Listing format (assumed UTC): "14 Jun 2025 20:00:00"
    ///
    /// Naive formats carry no offset; they are interpreted as UTC. Sources
    /// that also publish an offset-carrying field should prefer that field
    /// and only fall back to the naive one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use contest_hub::utils::datetime::DateTimeParser;
    ///
    /// let dt1 = DateTimeParser::parse_flexible("2025-06-14T20:00:00Z").unwrap();
    /// let dt2 = DateTimeParser::parse_flexible("2025-06-14 20:00:00").unwrap();
    /// assert_eq!(dt1, dt2);
    /// ```
    pub fn parse_flexible(datetime_str: &str) -> Result<DateTime<Utc>, DateTimeError> {
        let trimmed = datetime_str.trim();

        // Try RFC3339 first (most common for APIs)
        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(dt.with_timezone(&Utc));
        }

        // Offset-carrying variant RFC3339 rejects (no colon in offset, etc.)
        if let Ok(dt) = DateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%z") {
            return Ok(dt.with_timezone(&Utc));
        }

        // Naive datetime formats (assume UTC)
        let naive_formats = [
            "%Y-%m-%d %H:%M:%S",    // space-separated ISO
            "%Y-%m-%dT%H:%M:%S%.f", // ISO without timezone, optional fraction
            "%d %b %Y %H:%M:%S",    // contest listing format, "14 Jun 2025 20:00:00"
            "%d %B %Y %H:%M:%S",    // same with the month spelled out
        ];

        for format in &naive_formats {
            if let Ok(naive_dt) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(DateTime::from_naive_utc_and_offset(naive_dt, Utc));
            }
        }

        Err(DateTimeError::InvalidFormat {
            input: datetime_str.to_string(),
        })
    }

    /// Convert epoch seconds into a UTC instant.
    ///
    /// Rejects values chrono cannot represent instead of clamping them, so a
    /// garbage upstream timestamp surfaces as a parse failure rather than a
    /// contest scheduled at the edge of time.
    pub fn parse_epoch_seconds(secs: i64) -> Result<DateTime<Utc>, DateTimeError> {
        Utc.timestamp_opt(secs, 0)
            .single()
            .ok_or_else(|| DateTimeError::OutOfRange {
                input: secs.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};

    #[test]
    fn test_parse_rfc3339() {
        let dt = DateTimeParser::parse_flexible("2025-06-14T20:00:00Z").unwrap();
        assert_eq!(dt.year(), 2025);
        assert_eq!(dt.month(), 6);
        assert_eq!(dt.day(), 14);
        assert_eq!(dt.hour(), 20);
        assert_eq!(dt.minute(), 0);
    }

    #[test]
    fn test_parse_with_offset_converts_to_utc() {
        let dt = DateTimeParser::parse_flexible("2025-06-14T20:00:00+05:30").unwrap();
        assert_eq!(dt.hour(), 14);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn test_parse_space_separated() {
        let dt = DateTimeParser::parse_flexible("2025-06-14 20:00:00").unwrap();
        assert_eq!(dt.year(), 2025);
        assert_eq!(dt.hour(), 20);
    }

    #[test]
    fn test_parse_listing_format() {
        let dt = DateTimeParser::parse_flexible("14 Jun 2025 20:00:00").unwrap();
        assert_eq!(dt.year(), 2025);
        assert_eq!(dt.month(), 6);
        assert_eq!(dt.day(), 14);
        assert_eq!(dt.hour(), 20);
    }

    #[test]
    fn test_invalid_format() {
        let result = DateTimeParser::parse_flexible("not-a-date");
        match result {
            Err(DateTimeError::InvalidFormat { input }) => {
                assert_eq!(input, "not-a-date");
            }
            other => panic!("Expected InvalidFormat error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_epoch_seconds() {
        let dt = DateTimeParser::parse_epoch_seconds(1_749_931_200).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 6, 14, 20, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_epoch_rejects_out_of_range() {
        assert!(DateTimeParser::parse_epoch_seconds(i64::MAX).is_err());
    }
}
