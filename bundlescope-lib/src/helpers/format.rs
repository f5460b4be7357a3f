use chrono::DateTime;

const NOT_AVAILABLE: &str = "n/a";
const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a byte count in kilobytes below one million bytes and in megabytes above.
///
/// The sign is preserved. Non-finite values format as `n/a`.
#[must_use]
pub fn format_size(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    let magnitude = value.abs();
    let sign = if value < 0.0 { -1.0 } else { 1.0 };

    if magnitude < 1000.0 * 1000.0 {
        format!("{} kb", to_fixed(sign * (magnitude / 1024.0), 2))
    } else {
        format!("{} mb", to_fixed(sign * (magnitude / 1024.0 / 1024.0), 2))
    }
}

/// Format milliseconds as whole milliseconds below one second, or tenths of seconds above.
#[must_use]
pub fn format_duration(ms: f64) -> String {
    if !ms.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    let magnitude = ms.abs();
    let sign = if ms < 0.0 { -1.0 } else { 1.0 };

    if magnitude < 1000.0 {
        format!("{} ms", to_fixed(sign * magnitude, 0))
    } else {
        format!("{} sec", to_fixed(sign * (magnitude / 1000.0), 1))
    }
}

/// Format with a fixed number of decimals, rounding halves away from zero.
#[must_use]
pub fn to_fixed(value: f64, digits: u32) -> String {
    if !value.is_finite() {
        return js_number(value);
    }

    if value < 0.0 {
        return format!("-{}", to_fixed(-value, digits));
    }

    let digits = digits.min(100);
    let width = digits as usize;
    let factor = 10f64.powi(i32::try_from(digits).unwrap_or(100));
    let rounded = (value * factor).round() / factor;

    if rounded.is_finite() {
        format!("{:.width$}", rounded.abs())
    } else {
        format!("{value:.width$}")
    }
}

/// Relative change of `a` over the baseline `b`, in percent.
///
/// A zero baseline yields 100 when `a` is non-zero and 0 when both are zero.
#[must_use]
pub fn percent_from(a: f64, b: f64, digits: Option<u32>) -> f64 {
    let a_set = a != 0.0 && !a.is_nan();
    let b_set = b != 0.0 && !b.is_nan();

    if a_set && !b_set {
        return 100.0;
    }

    if !a_set && !b_set {
        return 0.0;
    }

    let percent = (a / b - 1.0) * 100.0;
    digits.map_or(percent, |digits| to_fixed(percent, digits).parse().unwrap_or(percent))
}

/// Render a number the way a script runtime prints it: integers without a fraction.
#[must_use]
pub fn js_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }

    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    if value == 0.0 {
        return "0".to_string();
    }

    if value.fract() == 0.0 && value.abs() < 1e21 {
        return format!("{value:.0}");
    }

    value.to_string()
}

/// Format a millisecond Unix timestamp in UTC.
#[must_use]
pub fn format_date(timestamp_ms: i64, format: Option<&str>) -> Option<String> {
    let date = DateTime::from_timestamp_millis(timestamp_ms)?;
    Some(date.format(format.unwrap_or(DEFAULT_DATE_FORMAT)).to_string())
}

/// Extension of the last path segment, including the dot.
///
/// Dot files without a further extension have none.
#[must_use]
pub fn file_ext(path: Option<&str>) -> String {
    let Some(path) = path else {
        return String::new();
    };

    let trimmed = path.trim_end_matches(['/', '\\']);
    let base = trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed);

    match base.rfind('.') {
        Some(index) if index > 0 => base[index..].to_string(),
        _ => String::new(),
    }
}

/// Parse the leading base-10 integer of a string, ignoring leading whitespace.
#[must_use]
pub fn to_number(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
