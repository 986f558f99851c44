//! ISO-8601 duration handling for catalog metadata (`PT1H2M3S` and friends)

const DATE_UNITS: &[(char, u64)] = &[('D', 86_400)];
const TIME_UNITS: &[(char, u64)] = &[('H', 3_600), ('M', 60), ('S', 1)];

/// Parses an ISO-8601 duration into whole seconds.
///
/// Accepts `P[nD][T[nH][nM][nS]]` with units in that order, each at most once.
/// Returns `None` for anything else, including a duration with no components.
pub fn parse_duration(raw: &str) -> Option<u32> {
    let rest = raw.trim().strip_prefix('P')?;

    let (date_part, time_part) = match rest.split_once('T') {
        Some((_, "")) => return None,
        Some((date, time)) => (date, time),
        None => (rest, ""),
    };

    let (date_seconds, date_count) = sum_components(date_part, DATE_UNITS)?;
    let (time_seconds, time_count) = sum_components(time_part, TIME_UNITS)?;

    if date_count + time_count == 0 {
        return None;
    }

    u32::try_from(date_seconds + time_seconds).ok()
}

/// Formats seconds as `M:SS`, or `H:MM:SS` once there is at least one hour
pub fn format_seconds(total: u32) -> String {
    let hours = total / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Formats a raw ISO-8601 duration for display; unparsable input shows as `0:00`
pub fn format_duration(raw: &str) -> String {
    parse_duration(raw)
        .map(format_seconds)
        .unwrap_or_else(|| "0:00".to_string())
}

/// Sums `<digits><unit>` pairs. Units must appear in the order given by
/// `units`, at most once each, with no trailing digits.
fn sum_components(part: &str, units: &[(char, u64)]) -> Option<(u64, usize)> {
    let mut total: u64 = 0;
    let mut count = 0;
    let mut next_unit = 0;
    let mut digits = String::new();

    for c in part.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }

        if digits.is_empty() {
            return None;
        }

        let offset = units[next_unit..].iter().position(|(unit, _)| *unit == c)?;
        let (_, scale) = units[next_unit + offset];
        let value: u64 = digits.parse().ok()?;

        total = total.checked_add(value.checked_mul(scale)?)?;
        count += 1;
        next_unit += offset + 1;
        digits.clear();
    }

    if !digits.is_empty() {
        return None;
    }

    Some((total, count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_full_duration() {
        assert_eq!(format_duration("PT1H2M3S"), "1:02:03");
    }

    #[test]
    fn test_format_minutes_only() {
        assert_eq!(format_duration("PT5M"), "5:00");
    }

    #[test]
    fn test_format_seconds_only() {
        assert_eq!(format_duration("PT45S"), "0:45");
    }

    #[test]
    fn test_format_unparsable_is_zero() {
        assert_eq!(format_duration(""), "0:00");
        assert_eq!(format_duration("garbage"), "0:00");
        assert_eq!(format_duration("PT"), "0:00");
        assert_eq!(format_duration("12:30"), "0:00");
    }

    #[test]
    fn test_format_is_idempotent() {
        let raw = "PT12M7S";
        assert_eq!(format_duration(raw), format_duration(raw));
        assert_eq!(format_duration(raw), "12:07");
    }

    #[test]
    fn test_format_hours_pad_minutes() {
        assert_eq!(format_duration("PT2H"), "2:00:00");
        assert_eq!(format_duration("PT1H5S"), "1:00:05");
    }

    #[test]
    fn test_parse_components() {
        assert_eq!(parse_duration("PT1H2M3S"), Some(3723));
        assert_eq!(parse_duration("PT15M"), Some(900));
        assert_eq!(parse_duration("PT0S"), Some(0));
    }

    #[test]
    fn test_parse_days_fold_into_hours() {
        assert_eq!(parse_duration("P1DT2H"), Some(93_600));
        assert_eq!(format_duration("P1DT2H"), "26:00:00");
        assert_eq!(parse_duration("P0D"), Some(0));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(parse_duration("PT5"), None);
        assert_eq!(parse_duration("PTM"), None);
        assert_eq!(parse_duration("PT3S2M"), None);
        assert_eq!(parse_duration("PT1M1M"), None);
        assert_eq!(parse_duration("P1DT"), None);
        assert_eq!(parse_duration("T5M"), None);
        assert_eq!(parse_duration("PT1.5S"), None);
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(0), "0:00");
        assert_eq!(format_seconds(59), "0:59");
        assert_eq!(format_seconds(720), "12:00");
        assert_eq!(format_seconds(3600), "1:00:00");
    }
}
