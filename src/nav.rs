//! Navigation rules: which menu entries are visible for a session, and which
//! link is marked active for the current path.

pub const HIDDEN_CLASS: &str = "hidden";
pub const ACTIVE_CLASS: &str = "active";

/// Pages the navigation knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Profile,
    Recommendations,
    Logout,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Profile => "/profile",
            Route::Recommendations => "/recommendations",
            Route::Logout => "/logout",
        }
    }

    /// Exact match only; `/profile/` or `/profile?x=1` are not recognised.
    pub fn from_href(href: &str) -> Option<Route> {
        Route::all().iter().copied().find(|r| r.path() == href)
    }

    pub fn all() -> &'static [Route] {
        &[
            Route::Login,
            Route::Register,
            Route::Profile,
            Route::Recommendations,
            Route::Logout,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Shown,
    Hidden,
}

/// Visibility of a nav item linking to `href`.
pub fn nav_visibility(href: &str, logged_in: bool) -> Visibility {
    match (Route::from_href(href), logged_in) {
        (Some(Route::Login | Route::Register), true) => Visibility::Hidden,
        (Some(Route::Profile | Route::Recommendations | Route::Logout), false) => {
            Visibility::Hidden
        }
        _ => Visibility::Shown,
    }
}

pub fn is_active_link(href: Option<&str>, current_path: &str) -> bool {
    href == Some(current_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logged_in_hides_auth_pages() {
        assert_eq!(nav_visibility("/login", true), Visibility::Hidden);
        assert_eq!(nav_visibility("/register", true), Visibility::Hidden);
        assert_eq!(nav_visibility("/profile", true), Visibility::Shown);
        assert_eq!(nav_visibility("/recommendations", true), Visibility::Shown);
        assert_eq!(nav_visibility("/logout", true), Visibility::Shown);
    }

    #[test]
    fn logged_out_hides_member_pages() {
        assert_eq!(nav_visibility("/login", false), Visibility::Shown);
        assert_eq!(nav_visibility("/register", false), Visibility::Shown);
        assert_eq!(nav_visibility("/profile", false), Visibility::Hidden);
        assert_eq!(nav_visibility("/recommendations", false), Visibility::Hidden);
        assert_eq!(nav_visibility("/logout", false), Visibility::Hidden);
    }

    #[test]
    fn unknown_links_stay_visible() {
        assert_eq!(nav_visibility("/", false), Visibility::Shown);
        assert_eq!(nav_visibility("/about", true), Visibility::Shown);
        assert_eq!(nav_visibility("/profile/", false), Visibility::Shown);
    }

    #[test]
    fn route_inventory_round_trips_paths() {
        for r in Route::all() {
            assert_eq!(Route::from_href(r.path()), Some(*r));
        }
    }

    #[test]
    fn active_link_is_exact_match() {
        assert!(is_active_link(Some("/profile"), "/profile"));
        assert!(!is_active_link(Some("/profile"), "/profile/"));
        assert!(!is_active_link(None, "/profile"));
    }
}
