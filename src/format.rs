use chrono::TimeDelta;

/// Largest whole number of seconds a `TimeDelta` holds.
const MAX_SECONDS: i64 = i64::MAX / 1000;

/// Render fractional hours as `HH:MM`, or `HH:MM:SS` when `with_seconds` is set.
/// Negative values get a leading `-`; the stopwatch label uses that to show
/// time spent against the balance. Values beyond what a `TimeDelta` holds
/// are clamped, and NaN renders as zero.
pub fn format_hours(hours: f64, with_seconds: bool) -> String {
    // `as` saturates and maps NaN to 0
    let total = ((hours.abs() * 3600.0).round() as i64).min(MAX_SECONDS);
    let delta = TimeDelta::try_seconds(total).unwrap_or_else(TimeDelta::zero);

    let sign = if hours < 0.0 && total > 0 { "-" } else { "" };
    let h = delta.num_hours();
    let m = delta.num_minutes() % 60;

    if with_seconds {
        let s = delta.num_seconds() % 60;
        format!("{}{:02}:{:02}:{:02}", sign, h, m, s)
    } else {
        format!("{}{:02}:{:02}", sign, h, m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_and_half_hours() {
        assert_eq!(format_hours(1.5, false), "01:30");
        assert_eq!(format_hours(2.0, true), "02:00:00");
    }

    #[test]
    fn test_negative_elapsed_with_seconds() {
        assert_eq!(format_hours(-5.0 / 3600.0, true), "-00:00:05");
        assert_eq!(format_hours(-(3725.0 / 3600.0), true), "-01:02:05");
    }

    #[test]
    fn test_zero_has_no_sign() {
        assert_eq!(format_hours(0.0, true), "00:00:00");
        assert_eq!(format_hours(-0.0, false), "00:00");
    }

    #[test]
    fn test_seconds_dropped_without_precision() {
        assert_eq!(format_hours(0.25 + 30.0 / 3600.0, false), "00:15");
    }

    #[test]
    fn test_hours_beyond_a_day() {
        assert_eq!(format_hours(125.75, false), "125:45");
    }

    #[test]
    fn test_huge_values_are_clamped() {
        assert_eq!(format_hours(-1e300, true), "-2562047788015:12:55");
        assert_eq!(format_hours(1e300, false), "2562047788015:12");
        assert_eq!(format_hours(f64::INFINITY, true), "2562047788015:12:55");
        assert_eq!(format_hours(f64::NEG_INFINITY, false), "-2562047788015:12");
    }

    #[test]
    fn test_nan_renders_as_zero() {
        assert_eq!(format_hours(f64::NAN, true), "00:00:00");
    }
}
