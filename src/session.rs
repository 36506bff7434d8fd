//! Session detection from the `user_id` cookie.
//!
//! The identity is only a presence flag for UI branching; nothing here
//! validates it.

pub const SESSION_COOKIE: &str = "user_id";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    current_user: Option<String>,
}

impl Session {
    /// Parse a `document.cookie` style header (`k=v; k2=v2`).
    pub fn from_cookie_header(header: &str) -> Self {
        Self {
            current_user: cookie_value(header, SESSION_COOKIE)
                .filter(|v| !v.is_empty())
                .map(str::to_string),
        }
    }

    pub fn current_user(&self) -> Option<&str> {
        self.current_user.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_user.is_some()
    }

    pub fn clear(&mut self) {
        self.current_user = None;
    }
}

/// Value of the first cookie named `name`, i.e. everything after its first `=`.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|entry| entry.strip_prefix(name)?.strip_prefix('='))
}
