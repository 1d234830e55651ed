//! Duration parsing for human-readable config values like "24h" or "30m".

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{de, Deserialize, Deserializer};

/// Parse a duration string like "1d", "24h", "30m", "90s".
///
/// Supported units: `d` (days), `h` (hours), `m` (minutes), `s` (seconds).
/// Input is case-insensitive and surrounding whitespace is ignored.
///
/// # Examples
///
/// ```
/// use ledgerline::duration::parse_duration;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration("24h").unwrap(), Duration::from_secs(24 * 60 * 60));
/// assert_eq!(parse_duration("30m").unwrap(), Duration::from_secs(30 * 60));
/// ```
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim().to_lowercase();
    let (num, unit) = match s.chars().last() {
        Some(unit @ ('d' | 'h' | 'm' | 's')) => (&s[..s.len() - 1], unit),
        _ => anyhow::bail!("Duration must end with d, h, m, or s"),
    };

    let num: u64 = num.parse().context("Invalid number in duration")?;

    let secs = match unit {
        'd' => num
            .checked_mul(24 * 60 * 60)
            .context("Duration is too large")?,
        'h' => num.checked_mul(60 * 60).context("Duration is too large")?,
        'm' => num.checked_mul(60).context("Duration is too large")?,
        's' => num,
        _ => unreachable!(),
    };

    Ok(Duration::from_secs(secs))
}

/// Serde deserializer for config fields holding "24h"-style durations.
pub fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_duration(&value).map_err(de::Error::custom)
}
