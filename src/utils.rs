use chrono::{DateTime, Utc};

/// Shortens a hash or address for display, eg. `0xc43c...37ea`.
pub fn short_hex(value: &str) -> String {
    if value.len() <= 12 {
        return value.to_string();
    }
    format!("{}...{}", &value[..6], &value[value.len() - 4..])
}

pub fn mask_url(url: &str) -> String {
    if let Some(scheme_end) = url.find("://") {
        let scheme = &url[..scheme_end + 3];
        if let Some(host_end) = url[scheme_end + 3..].find('/') {
            let host = &url[scheme_end + 3..scheme_end + 3 + host_end];
            return format!("{scheme}{host}/***/");
        }
    }
    "***".to_string()
}

/// Formats an amount with thousands separators, eg. `1,234,567.891`.
/// Trailing `.0` is dropped when `decimals` is zero.
pub fn group_thousands(amount: f64, decimals: usize) -> String {
    let formatted = format!("{amount:.decimals$}");
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Renders a unix timestamp the way alert messages stamp transactions.
pub fn format_utc_stamp(unix_secs: i64) -> String {
    match DateTime::<Utc>::from_timestamp(unix_secs, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S, UTC").to_string(),
        None => "n/a".to_string(),
    }
}

/// Local timestamp used as the first line of every alert message.
pub fn now_stamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S, UTC").to_string()
}
