use regex::Regex;

use crate::error::{Error, Result};

/// Parse a budget marker from input text.
/// Returns (remaining text, hours) after removing a [budget:...] or [b:...] marker.
/// The marker body accepts every format `parse_duration` understands.
pub fn parse_budget(input: &str) -> (String, Option<f64>) {
    let input = input.trim();

    // Match [budget:...] or [b:...] pattern (case insensitive)
    let re = Regex::new(r"(?i)\[(budget|b):([^\]]+)\]").expect("budget marker pattern is valid");

    if let Some(caps) = re.captures(input) {
        let (Some(full_match), Some(body)) = (caps.get(0), caps.get(2)) else {
            return (input.to_string(), None);
        };

        if let Ok(hours) = parse_duration(body.as_str()) {
            let before = &input[..full_match.start()];
            let after = &input[full_match.end()..];
            let result = format!("{}{}", before, after);
            let result = result.split_whitespace().collect::<Vec<_>>().join(" ");
            return (result, Some(hours));
        }
    }

    (input.to_string(), None)
}

/// Parse a duration into fractional hours.
/// Supported formats:
/// - decimal hours (1.5, 1,5)
/// - clock style (1:30, 1:30:15)
/// - unit style (1h30m, 2h 15m 10s, 90m, 45s)
///
/// A leading `-` negates the result.
pub fn parse_duration(input: &str) -> Result<f64> {
    let s = input.trim().to_lowercase();
    let (negative, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, s.as_str()),
    };

    let hours = parse_decimal(body)
        .or_else(|| parse_clock(body))
        .or_else(|| parse_units(body))
        .ok_or_else(|| Error::InvalidDuration(input.trim().to_string()))?;

    Ok(if negative { -hours } else { hours })
}

fn parse_decimal(s: &str) -> Option<f64> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return None;
    }
    s.replace(',', ".").parse().ok().filter(|hours: &f64| hours.is_finite())
}

/// h:mm or h:mm:ss
fn parse_clock(s: &str) -> Option<f64> {
    let parts: Vec<&str> = s.split(':').collect();

    match parts.len() {
        2 | 3 => {
            let hours: u64 = parts[0].parse().ok()?;
            let minutes: u64 = parts[1].parse().ok()?;
            let seconds: u64 = match parts.get(2) {
                Some(sec) => sec.parse().ok()?,
                None => 0,
            };

            if minutes > 59 || seconds > 59 {
                return None;
            }

            to_hours(hours, minutes, seconds)
        }
        _ => None,
    }
}

fn parse_units(s: &str) -> Option<f64> {
    let re = Regex::new(r"^(?:(\d+)\s*h)?\s*(?:(\d+)\s*m)?\s*(?:(\d+)\s*s)?$")
        .expect("unit duration pattern is valid");
    let caps = re.captures(s)?;

    // The pattern also matches an empty string; require at least one unit.
    if caps.get(1).is_none() && caps.get(2).is_none() && caps.get(3).is_none() {
        return None;
    }

    let field = |i: usize| -> Option<u64> {
        match caps.get(i) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };

    to_hours(field(1)?, field(2)?, field(3)?)
}

/// `None` when the total does not fit in a `u64` of seconds.
fn to_hours(hours: u64, minutes: u64, seconds: u64) -> Option<f64> {
    let total = hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)?;
    Some(total as f64 / 3600.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_hours() {
        assert_eq!(parse_duration("1.5").unwrap(), 1.5);
        assert_eq!(parse_duration("2").unwrap(), 2.0);
        assert_eq!(parse_duration("0,25").unwrap(), 0.25);
    }

    #[test]
    fn test_clock_format() {
        assert_eq!(parse_duration("1:30").unwrap(), 1.5);
        assert_eq!(parse_duration("0:00:36").unwrap(), 0.01);
    }

    #[test]
    fn test_clock_rejects_overflowing_minutes() {
        assert!(parse_duration("1:75").is_err());
    }

    #[test]
    fn test_unit_format() {
        assert_eq!(parse_duration("1h30m").unwrap(), 1.5);
        assert_eq!(parse_duration("90m").unwrap(), 1.5);
        assert_eq!(parse_duration("2h 15m").unwrap(), 2.25);
        assert_eq!(parse_duration("36s").unwrap(), 0.01);
        assert_eq!(parse_duration("1H").unwrap(), 1.0);
    }

    #[test]
    fn test_negative_duration() {
        assert_eq!(parse_duration("-1:30").unwrap(), -1.5);
        assert_eq!(parse_duration("- 45m").unwrap(), -0.75);
    }

    #[test]
    fn test_invalid_duration() {
        assert!(matches!(parse_duration("soon"), Err(Error::InvalidDuration(s)) if s == "soon"));
        assert!(parse_duration("").is_err());
        assert!(parse_duration("h").is_err());
    }

    #[test]
    fn test_out_of_range_duration_is_invalid() {
        assert!(parse_duration("9999999999999999:00").is_err());
        assert!(parse_duration("9999999999999999h").is_err());
        assert!(parse_duration("1h 99999999999999999999m").is_err());
        assert!(parse_duration(&"9".repeat(400)).is_err());
    }

    #[test]
    fn test_out_of_range_budget_marker_is_kept() {
        let (text, hours) = parse_budget("Task [b:9999999999999999h]");
        assert_eq!(text, "Task [b:9999999999999999h]");
        assert!(hours.is_none());
    }

    #[test]
    fn test_budget_marker() {
        let (text, hours) = parse_budget("Write report [budget:1h30m]");
        assert_eq!(text, "Write report");
        assert_eq!(hours, Some(1.5));
    }

    #[test]
    fn test_budget_short_alias_in_the_middle() {
        let (text, hours) = parse_budget("Review [B:0:45] pull requests");
        assert_eq!(text, "Review pull requests");
        assert_eq!(hours, Some(0.75));
    }

    #[test]
    fn test_no_budget_marker() {
        let (text, hours) = parse_budget("Just an activity");
        assert_eq!(text, "Just an activity");
        assert!(hours.is_none());
    }

    #[test]
    fn test_unparseable_budget_marker_is_kept() {
        let (text, hours) = parse_budget("Task [b:later]");
        assert_eq!(text, "Task [b:later]");
        assert!(hours.is_none());
    }
}
