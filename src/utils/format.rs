//! Time formatting helpers
//!
//! Shared by the recording timer and the playback countdown.

/// Format a number of seconds as `mm:ss`, flooring to whole seconds.
///
/// Negative and non-finite inputs render as `00:00`. Minutes are not
/// wrapped into hours, so 3600 seconds renders as `60:00`.
pub fn format_mmss(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let mins = total / 60;
    let secs = total % 60;
    format!("{:02}:{:02}", mins, secs)
}

/// Remaining playback time, never below zero
pub fn remaining_secs(duration: f64, position: f64) -> f64 {
    (duration - position).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_zero() {
        assert_eq!(format_mmss(0.0), "00:00");
    }

    #[test]
    fn test_format_minutes_and_seconds() {
        assert_eq!(format_mmss(65.0), "01:05");
        assert_eq!(format_mmss(3599.0), "59:59");
    }

    #[test]
    fn test_format_floors_fractions() {
        assert_eq!(format_mmss(59.999), "00:59");
        assert_eq!(format_mmss(32.4), "00:32");
    }

    #[test]
    fn test_format_negative_and_nan() {
        assert_eq!(format_mmss(-3.0), "00:00");
        assert_eq!(format_mmss(f64::NAN), "00:00");
    }

    #[test]
    fn test_remaining_clamps() {
        assert_eq!(remaining_secs(42.0, 10.0), 32.0);
        assert_eq!(remaining_secs(5.0, 7.5), 0.0);
    }
}
