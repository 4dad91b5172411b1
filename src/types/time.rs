//! `M:SS` time labels used by build order steps and the overlay timer

/// Format a number of seconds as `M:SS`.
///
/// Minutes are unbounded and seconds are zero-padded to two digits. Values at
/// or below zero format as `"0:00"`.
///
/// # Examples
/// ```
/// use rts_overlay::types::format_time;
/// assert_eq!(format_time(0), "0:00");
/// assert_eq!(format_time(-12), "0:00");
/// assert_eq!(format_time(65), "1:05");
/// assert_eq!(format_time(3725), "62:05");
/// ```
pub fn format_time(seconds: i64) -> String {
    if seconds <= 0 {
        return "0:00".to_string();
    }
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Parse a `M:SS` label into seconds.
///
/// Returns `None` for anything that is not exactly two colon-separated
/// non-negative integers.
///
/// # Examples
/// ```
/// use rts_overlay::types::parse_time;
/// assert_eq!(parse_time("1:05"), Some(65));
/// assert_eq!(parse_time("0:00"), Some(0));
/// assert_eq!(parse_time("1:05:00"), None);
/// assert_eq!(parse_time("-1:05"), None);
/// assert_eq!(parse_time("ab"), None);
/// ```
pub fn parse_time(label: &str) -> Option<u32> {
    let (minutes, seconds) = label.trim().split_once(':')?;
    if seconds.contains(':') {
        return None;
    }

    let minutes = parse_component(minutes)?;
    let seconds = parse_component(seconds)?;
    minutes.checked_mul(60)?.checked_add(seconds)
}

fn parse_component(part: &str) -> Option<u32> {
    // `u32::from_str` accepts a leading '+', which is not a valid label
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}
