//! Emoji prefixes for recommendation section headings.

/// Checked in order; the first keyword found in the heading wins.
pub const HEADING_ICONS: &[(&str, &str)] = &[
    ("breakfast", "🥐"),
    ("lunch", "🥗"),
    ("dinner", "🍽️"),
    ("snack", "🍎"),
    ("exercise", "💪"),
    ("workout", "🏋️"),
];

pub const HEADING_SELECTOR: &str = "h2, h3";
pub const CONTENT_SELECTOR: &str = ".recommendation-content";

pub fn heading_icon(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    HEADING_ICONS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, icon)| *icon)
}

pub fn prefixed(icon: &str, html: &str) -> String {
    format!("{icon} {html}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_case_insensitively() {
        assert_eq!(heading_icon("Healthy BREAKFAST ideas"), Some("🥐"));
        assert_eq!(heading_icon("Evening workout"), Some("🏋️"));
    }

    #[test]
    fn first_keyword_in_table_wins() {
        // "lunch" precedes "snack" in the table regardless of text order.
        assert_eq!(heading_icon("Snack or lunch?"), Some("🥗"));
        assert_eq!(heading_icon("Post-exercise snack"), Some("🍎"));
    }

    #[test]
    fn unrelated_heading_is_untouched() {
        assert_eq!(heading_icon("Hydration"), None);
    }
}
