//! Formatting helpers shared by HTML and PDF rendering

/// Format a non-negative integer string with thousands separators
pub fn format_number<T: ToString>(n: T) -> String {
    group_digits(&n.to_string(), ",")
}

fn group_digits(digits: &str, separator: &str) -> String {
    let mut result = String::new();
    let mut count = 0;
    for c in digits.chars().rev() {
        if count == 3 {
            result.push_str(&separator.chars().rev().collect::<String>());
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    result.chars().rev().collect()
}

/// Format an amount with fixed decimals and grouped thousands
///
/// `format_amount(-1234567.5, 2, ",")` gives `-1,234,567.50`.
pub fn format_amount(value: f64, decimal_places: u32, separator: &str) -> String {
    let fixed = format!("{:.*}", decimal_places as usize, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (fixed.clone(), None),
    };

    let mut out = String::new();
    // "-0.00" reads as noise in a ledger
    if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push_str(&group_digits(&int_part, separator));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(&frac);
    }
    out
}

/// Escape text for safe interpolation into HTML and attribute values
pub fn escape_html(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Shorten text to `max` characters, appending "..." when cut
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Date part (`YYYY-MM-DD`) of an ISO timestamp such as `2024-05-01T10:20:00.000Z`
pub fn date_part(timestamp: &str) -> &str {
    timestamp.split('T').next().unwrap_or(timestamp)
}
