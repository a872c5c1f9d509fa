//! Resolving "today" for the engine.

use anyhow::{Result, anyhow};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use triage_core::validate::DATE_FORMAT;

/// Current calendar date in an IANA timezone like "America/Chicago".
pub fn today_in(tz: &str) -> Result<NaiveDate> {
    let tz: Tz = tz.parse().map_err(|_| anyhow!("invalid timezone: {tz}"))?;
    Ok(Utc::now().with_timezone(&tz).date_naive())
}

/// Parse an explicit `--today` value (YYYY-MM-DD).
pub fn parse_today(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| anyhow!("invalid date '{s}' (expected YYYY-MM-DD): {e}"))
}

/// `--today` wins; otherwise the wall-clock date in the configured timezone.
pub fn resolve_today(explicit: Option<&str>, tz: &str) -> Result<NaiveDate> {
    match explicit {
        Some(s) => parse_today(s),
        None => today_in(tz),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_today() {
        assert_eq!(
            parse_today(" 2026-10-14 ").unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
        );
        assert!(parse_today("10/14/2026").is_err());
    }

    #[test]
    fn test_explicit_date_skips_timezone_lookup() {
        // An invalid timezone is never consulted when a date is given.
        let d = resolve_today(Some("2026-02-20"), "Not/AZone").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2026, 2, 20).unwrap());
    }

    #[test]
    fn test_invalid_timezone() {
        let err = today_in("Mars/Olympus").unwrap_err();
        assert!(err.to_string().contains("invalid timezone"));
        assert!(today_in("America/Chicago").is_ok());
    }
}
