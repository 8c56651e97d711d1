//! Text parsing and formatting helpers.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalise a name or anime title: accents are stripped (NFKD without
/// combining marks), `ـ`, `-` and `_` become spaces, whitespace is
/// collapsed and every word is title-cased.
pub fn normalize_title(raw: &str) -> String {
    let stripped: String = raw.nfkd().filter(|c| !is_combining_mark(*c)).collect();
    stripped
        .replace(['ـ', '-', '_'], " ")
        .split_whitespace()
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Escape HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Parse duration string (e.g., "30m", "12h", "3d", "1w").
///
/// Supported units:
/// - m: minutes
/// - h: hours
/// - d: days
/// - w: weeks
pub fn parse_duration(input: &str) -> Option<std::time::Duration> {
    let input = input.trim();
    if input.is_empty() || !input.is_char_boundary(input.len() - 1) {
        return None;
    }

    let (digits, unit) = input.split_at(input.len() - 1);
    let amount: u64 = digits.parse().ok()?;

    let unit_secs: u64 = match unit {
        "m" => 60,
        "h" => 3600,
        "d" => 86400,
        "w" => 604800,
        _ => return None,
    };
    let seconds = amount.checked_mul(unit_secs)?;

    Some(std::time::Duration::from_secs(seconds))
}

/// Remaining time of a ban, in days and hours (or hours and minutes
/// under a day).
pub fn format_remaining(secs: u64) -> String {
    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    let mins = (secs % 3600) / 60;

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins.max(1))
    }
}

/// Short form used for spam blocks, e.g. "11m 30s".
pub fn format_min_sec(secs: u64) -> String {
    format!("{}m {}s", secs / 60, secs % 60)
}

/// One page of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Zero-based page index after clamping.
    pub index: usize,
    pub total: usize,
    pub start: usize,
    pub end: usize,
}

/// Split `len` items into pages of `per_page`, clamping `page` into range.
/// An empty list still has one (empty) page.
pub fn paginate(len: usize, page: usize, per_page: usize) -> Page {
    let per_page = per_page.max(1);
    let total = len.div_ceil(per_page).max(1);
    let index = page.min(total - 1);
    let start = index * per_page;
    let end = (start + per_page).min(len);

    Page {
        index,
        total,
        start,
        end,
    }
}

/// Parse a Telegram id argument.
pub fn parse_id(arg: &str) -> Option<i64> {
    arg.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("natsuki_subaru"), "Natsuki Subaru");
        assert_eq!(normalize_title("re-zero   KARA"), "Re Zero Kara");
        assert_eq!(normalize_title("ـrem"), "Rem");
        assert_eq!(normalize_title("   "), "");
        assert_eq!(normalize_title("rémi_sama"), "Remi Sama");
        assert_eq!(normalize_title("pokémon"), "Pokemon");
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<b>&"), "&lt;b&gt;&amp;");
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("30m"), Some(std::time::Duration::from_secs(1800)));
        assert_eq!(parse_duration("1h"), Some(std::time::Duration::from_secs(3600)));
        assert_eq!(parse_duration("1d"), Some(std::time::Duration::from_secs(86400)));
        assert_eq!(parse_duration("1w"), Some(std::time::Duration::from_secs(604800)));
        assert_eq!(parse_duration("invalid"), None);
        assert_eq!(parse_duration("5ч"), None);
        assert_eq!(parse_duration("30500000000000000w"), None);
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(2 * 86400 + 3 * 3600), "2d 3h");
        assert_eq!(format_remaining(3600 + 120), "1h 2m");
        assert_eq!(format_remaining(10), "1m");
        assert_eq!(format_min_sec(690), "11m 30s");
    }

    #[test]
    fn test_paginate() {
        assert_eq!(paginate(0, 3, 15), Page { index: 0, total: 1, start: 0, end: 0 });
        assert_eq!(paginate(31, 2, 15), Page { index: 2, total: 3, start: 30, end: 31 });
        assert_eq!(paginate(31, 9, 15).index, 2);
        assert_eq!(paginate(30, 1, 15), Page { index: 1, total: 2, start: 15, end: 30 });
    }
}
