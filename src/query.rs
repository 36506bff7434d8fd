//! The `message` query parameter used for post-redirect notices.

use std::borrow::Cow;

pub const MESSAGE_PARAM: &str = "message";

/// First value of `name` in `search` (with or without the leading `?`),
/// decoded the way `URLSearchParams` does.
pub fn param(search: &str, name: &str) -> Option<String> {
    pairs(search).find_map(|raw| {
        let (key, value) = raw.split_once('=').unwrap_or((raw, ""));
        (form_decode(key) == name).then(|| form_decode(value))
    })
}

/// Percent-decode a value once more. Text that does not decode to UTF-8 is
/// returned as given.
pub fn decode_component(value: &str) -> Cow<'_, str> {
    urlencoding::decode(value).unwrap_or(Cow::Borrowed(value))
}

fn pairs(search: &str) -> impl Iterator<Item = &str> {
    search
        .strip_prefix('?')
        .unwrap_or(search)
        .split('&')
        .filter(|p| !p.is_empty())
}

fn form_decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_and_decodes_message() {
        assert_eq!(
            param("?message=Hello%20there", MESSAGE_PARAM).as_deref(),
            Some("Hello there")
        );
        assert_eq!(
            param("a=1&message=Saved+profile", MESSAGE_PARAM).as_deref(),
            Some("Saved profile")
        );
        assert_eq!(param("?other=1", MESSAGE_PARAM), None);
    }

    #[test]
    fn first_occurrence_wins() {
        assert_eq!(param("?message=a&message=b", MESSAGE_PARAM).as_deref(), Some("a"));
    }

    #[test]
    fn second_decode_falls_back_on_bad_utf8() {
        assert_eq!(decode_component("50%25 off"), "50% off");
        assert_eq!(decode_component("%FF"), "%FF");
    }
}
