//! Reading time estimation for articles and lessons
//!
//! Content may contain HTML markup; tags are stripped before counting words.

use once_cell::sync::Lazy;
use regex::Regex;

/// Average adult reading speed (words per minute)
pub const WORDS_PER_MINUTE: usize = 225;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("static pattern"));

/// Count whitespace-separated words after removing HTML tags
pub fn word_count(content: &str) -> usize {
    HTML_TAG.replace_all(content, "").split_whitespace().count()
}

/// Estimate reading time in whole minutes, rounded up, never below 1
///
/// # Examples
///
/// ```
/// use npulse_common::reading_time::calculate_reading_time;
///
/// assert_eq!(calculate_reading_time(""), 1);
/// assert_eq!(calculate_reading_time(&"word ".repeat(225)), 1);
/// assert_eq!(calculate_reading_time(&"word ".repeat(226)), 2);
/// assert_eq!(calculate_reading_time("<p>short</p>"), 1);
/// ```
pub fn calculate_reading_time(content: &str) -> u32 {
    let words = word_count(content);
    let minutes = words.div_ceil(WORDS_PER_MINUTE);
    u32::try_from(minutes).unwrap_or(u32::MAX).max(1)
}

/// Format a reading time for display
///
/// # Examples
///
/// ```
/// use npulse_common::reading_time::format_reading_time;
///
/// assert_eq!(format_reading_time(1), "1 min read");
/// assert_eq!(format_reading_time(12), "12 min read");
/// assert_eq!(format_reading_time(60), "1 hour read");
/// assert_eq!(format_reading_time(125), "2 hours 5 min read");
/// ```
pub fn format_reading_time(minutes: u32) -> String {
    if minutes == 1 {
        return "1 min read".to_string();
    }
    if minutes < 60 {
        return format!("{} min read", minutes);
    }

    let hours = minutes / 60;
    let remaining = minutes % 60;
    let unit = if hours > 1 { "hours" } else { "hour" };

    if remaining == 0 {
        format!("{} {} read", hours, unit)
    } else {
        format!("{} {} {} min read", hours, unit, remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count_ignores_markup() {
        assert_eq!(word_count("<h1>Hello</h1> <p class=\"x\">big   world</p>"), 3);
        assert_eq!(word_count("   "), 0);
    }

    #[test]
    fn test_tags_do_not_split_words() {
        // Adjacent tags join their text, matching a plain strip
        assert_eq!(word_count("un<b>break</b>able"), 1);
    }

    #[test]
    fn test_whitespace_only_is_one_minute() {
        assert_eq!(calculate_reading_time("\n\t  "), 1);
    }

    #[test]
    fn test_long_article() {
        let text = "lorem ".repeat(225 * 10 + 1);
        assert_eq!(calculate_reading_time(&text), 11);
    }

    #[test]
    fn test_format_zero_minutes() {
        assert_eq!(format_reading_time(0), "0 min read");
    }

    #[test]
    fn test_format_hour_boundaries() {
        assert_eq!(format_reading_time(59), "59 min read");
        assert_eq!(format_reading_time(61), "1 hour 1 min read");
        assert_eq!(format_reading_time(120), "2 hours read");
    }
}
