//! The page component.
//!
//! One `DietApp` is built per page load. Construction reads the session cookie,
//! fixes up the navigation, wires form/button/logout listeners, highlights the
//! active link and fades the main container in.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::config::UiConfig;
use crate::decorate::{self, CONTENT_SELECTOR, HEADING_SELECTOR};
use crate::dom::{Dom, EventKind, EventOutcome};
use crate::error::Result;
use crate::nav::{self, Route, Visibility, ACTIVE_CLASS, HIDDEN_CLASS};
use crate::notify::{ToastLevel, EXIT_ANIMATION, TOAST_STYLE};
use crate::schedule::{Scheduler, TaskHandle};
use crate::session::Session;
use crate::validate::{check_confirmation, check_email, check_required, FieldProblem};

pub const FIELD_ERROR_CLASS: &str = "field-error";
pub const WELCOME_CLASS: &str = "welcome-message";
pub const FADE_IN_CLASS: &str = "fade-in";

const CONTAINER: &str = ".container";
const SUBMIT_BUTTON: &str = r#"button[type="submit"]"#;
const LOGOUT_LINK: &str = r#"a[href="/logout"]"#;

const FIELD_ERROR_STYLE: &[(&str, &str)] = &[
    ("color", "var(--error-color)"),
    ("font-size", "0.875rem"),
    ("margin-top", "0.25rem"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Proceed,
    Blocked,
}

impl From<SubmitOutcome> for EventOutcome {
    fn from(outcome: SubmitOutcome) -> Self {
        match outcome {
            SubmitOutcome::Proceed => EventOutcome::Continue,
            SubmitOutcome::Blocked => EventOutcome::PreventDefault,
        }
    }
}

/// A toast on screen. Cancelling `dismiss` keeps it up indefinitely.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast<N> {
    pub node: N,
    pub dismiss: TaskHandle,
}

pub struct DietApp<D: Dom, S: Scheduler> {
    dom: D,
    scheduler: S,
    config: UiConfig,
    session: RefCell<Session>,
}

impl<D: Dom, S: Scheduler> DietApp<D, S> {
    /// Build and initialise the component. Listeners hold clones of the
    /// returned `Rc`, so the app lives as long as the page's handlers do.
    pub fn new(dom: D, scheduler: S, config: UiConfig) -> Rc<Self> {
        let app = Rc::new(Self {
            dom,
            scheduler,
            config,
            session: RefCell::new(Session::default()),
        });
        app.check_user_status();
        app.update_navigation();
        app.initialize_event_listeners();
        app.add_page_transitions();
        app
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    pub fn current_user(&self) -> Option<String> {
        self.session.borrow().current_user().map(str::to_string)
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.borrow().is_logged_in()
    }

    pub fn check_user_status(&self) {
        let session = Session::from_cookie_header(&self.dom.cookie());
        match session.current_user() {
            Some(user) => debug!(user, "session cookie present"),
            None => debug!("no session cookie"),
        }
        *self.session.borrow_mut() = session;
    }

    pub fn update_navigation(&self) {
        let logged_in = self.is_logged_in();

        for item in self.dom.query_all(None, ".nav-item") {
            let Some(link) = self.dom.query(Some(&item), "a") else {
                continue;
            };
            let href = self.dom.attribute(&link, "href").unwrap_or_default();
            match nav::nav_visibility(&href, logged_in) {
                Visibility::Hidden => self.dom.add_class(&item, HIDDEN_CLASS),
                Visibility::Shown => self.dom.remove_class(&item, HIDDEN_CLASS),
            }
        }

        if logged_in && self.dom.query(None, &format!(".{WELCOME_CLASS}")).is_none() {
            self.add_welcome_message();
        }
    }

    pub fn add_welcome_message(&self) {
        let Some(container) = self.dom.query(None, CONTAINER) else {
            debug!("no {CONTAINER} on page; skipping welcome banner");
            return;
        };
        if self
            .dom
            .query(Some(&container), &format!(".{WELCOME_CLASS}"))
            .is_some()
        {
            return;
        }
        let result = self
            .welcome_banner()
            .and_then(|banner| self.dom.prepend_child(&container, &banner));
        if let Err(e) = result {
            warn!("failed to add welcome banner: {e}");
        }
    }

    fn welcome_banner(&self) -> Result<D::Node> {
        let banner = self.dom.create_element("div")?;
        self.dom
            .set_class_name(&banner, &format!("{WELCOME_CLASS} {FADE_IN_CLASS}"));

        let title = self.dom.create_element("h3")?;
        self.dom.set_text(&title, &self.config.welcome.title);
        self.dom.append_child(&banner, &title)?;

        let body = self.dom.create_element("p")?;
        self.dom.set_text(&body, &self.config.welcome.body);
        self.dom.append_child(&banner, &body)?;

        Ok(banner)
    }

    fn initialize_event_listeners(self: &Rc<Self>) {
        for form in self.dom.query_all(None, "form") {
            let app = Rc::clone(self);
            self.listen(&form, EventKind::Submit, move |form| {
                app.handle_form_submit(form).into()
            });
        }

        for button in self.dom.query_all(None, SUBMIT_BUTTON) {
            let app = Rc::clone(self);
            self.listen(&button, EventKind::Click, move |button| {
                app.handle_button_click(button)
            });
        }

        for link in self.dom.query_all(None, LOGOUT_LINK) {
            let app = Rc::clone(self);
            self.listen(&link, EventKind::Click, move |_| app.handle_logout());
        }

        self.set_active_navigation();
    }

    fn listen(
        &self,
        node: &D::Node,
        kind: EventKind,
        handler: impl FnMut(&D::Node) -> EventOutcome + 'static,
    ) {
        if let Err(e) = self.dom.listen(node, kind, Box::new(handler)) {
            warn!("failed to attach {} listener: {e}", kind.as_str());
        }
    }

    /// Validate `form`. Every problem found in this pass stays visible; a
    /// blocked submission must have its default action prevented.
    pub fn handle_form_submit(&self, form: &D::Node) -> SubmitOutcome {
        let mut valid = true;

        for field in self.dom.query_all(Some(form), "[required]") {
            match check_required(&self.dom.value(&field)) {
                Some(problem) => {
                    self.report(&field, problem);
                    valid = false;
                }
                None => self.clear_field_error(&field),
            }
        }

        if let Some(email) = self.dom.query(Some(form), r#"input[type="email"]"#) {
            if let Some(problem) = check_email(&self.dom.value(&email)) {
                self.report(&email, problem);
                valid = false;
            }
        }

        let password = self.dom.query(Some(form), r#"input[name="password"]"#);
        let confirm = self
            .dom
            .query(Some(form), r#"input[name="confirm_password"]"#);
        if let (Some(password), Some(confirm)) = (password, confirm) {
            let mismatch =
                check_confirmation(&self.dom.value(&password), &self.dom.value(&confirm));
            if let Some(problem) = mismatch {
                self.report(&confirm, problem);
                valid = false;
            }
        }

        if !valid {
            info!("form submission blocked by validation");
            return SubmitOutcome::Blocked;
        }

        if let Some(button) = self.dom.query(Some(form), SUBMIT_BUTTON) {
            self.set_button_loading(&button);
        }
        SubmitOutcome::Proceed
    }

    fn report(&self, field: &D::Node, problem: FieldProblem) {
        self.show_field_error(field, problem.message(&self.config));
    }

    /// Submit buttons are left to the form's submit handler.
    pub fn handle_button_click(&self, button: &D::Node) -> EventOutcome {
        let kind = self
            .dom
            .attribute(button, "type")
            .map(|t| t.trim().to_ascii_lowercase());
        if matches!(kind.as_deref(), Some("button" | "reset")) {
            self.set_button_loading(button);
        }
        EventOutcome::Continue
    }

    pub fn handle_logout(&self) -> EventOutcome {
        if self.dom.confirm(&self.config.logout_prompt) {
            self.session.borrow_mut().clear();
            if let Err(e) = self.dom.navigate(Route::Logout.path()) {
                warn!("logout navigation failed: {e}");
            }
        }
        EventOutcome::PreventDefault
    }

    /// Show the loading label and disable `button`, reverting after the
    /// fallback delay unless the page has navigated away by then. Returns
    /// `None` if the button is already loading.
    pub fn set_button_loading(&self, button: &D::Node) -> Option<TaskHandle> {
        let label = &self.config.loading_label;
        let original = self.dom.text(button);
        if self.dom.is_disabled(button) && &original == label {
            return None;
        }

        self.dom.set_text(button, label);
        self.dom.set_disabled(button, true);

        let dom = self.dom.clone();
        let button = button.clone();
        let revert = Box::new(move || {
            if !dom.is_connected(&button) {
                return;
            }
            dom.set_text(&button, &original);
            dom.set_disabled(&button, false);
        });
        match self.scheduler.schedule(self.config.loading_fallback(), revert) {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("could not schedule loading fallback: {e}");
                None
            }
        }
    }

    /// Replace any error shown for `field` with `message`.
    pub fn show_field_error(&self, field: &D::Node, message: &str) {
        self.clear_field_error(field);
        if let Err(e) = self.attach_field_error(field, message) {
            warn!("failed to show field error: {e}");
        }
    }

    fn attach_field_error(&self, field: &D::Node, message: &str) -> Result<()> {
        let error = self.dom.create_element("div")?;
        self.dom.set_class_name(&error, FIELD_ERROR_CLASS);
        for (property, value) in FIELD_ERROR_STYLE {
            self.dom.set_style(&error, property, value)?;
        }
        self.dom.set_text(&error, message);

        self.dom
            .set_style(field, "border-color", "var(--error-color)")?;
        self.dom.insert_after(field, &error)
    }

    pub fn clear_field_error(&self, field: &D::Node) {
        if let Some(next) = self.dom.next_sibling(field) {
            if self.dom.has_class(&next, FIELD_ERROR_CLASS) {
                self.dom.remove(&next);
            }
        }
        if let Err(e) = self.dom.set_style(field, "border-color", "") {
            debug!("could not reset field border: {e}");
        }
    }

    pub fn set_active_navigation(&self) {
        let path = self.dom.location_path();
        for link in self.dom.query_all(None, ".nav-links a") {
            self.dom.remove_class(&link, ACTIVE_CLASS);
            let href = self.dom.attribute(&link, "href");
            if nav::is_active_link(href.as_deref(), &path) {
                self.dom.add_class(&link, ACTIVE_CLASS);
            }
        }
    }

    pub fn add_page_transitions(&self) {
        if let Some(container) = self.dom.query(None, CONTAINER) {
            self.dom.add_class(&container, FADE_IN_CLASS);
        }
    }

    /// Append a toast to `<body>`; it starts its exit animation after the
    /// notification delay and is removed once that animation has run.
    pub fn show_notification(&self, message: &str, level: ToastLevel) -> Option<Toast<D::Node>> {
        let Some(body) = self.dom.body() else {
            warn!("document has no <body>; dropping notification");
            return None;
        };
        let node = match self
            .toast_element(message, level)
            .and_then(|node| self.dom.append_child(&body, &node).map(|()| node))
        {
            Ok(node) => node,
            Err(e) => {
                warn!("failed to show notification: {e}");
                return None;
            }
        };

        let dom = self.dom.clone();
        let scheduler = self.scheduler.clone();
        let exit = self.config.notification_exit();
        let toast = node.clone();
        let dismiss = Box::new(move || {
            if !dom.is_connected(&toast) {
                return;
            }
            if let Err(e) = dom.set_style(&toast, "animation", EXIT_ANIMATION) {
                debug!("toast exit animation not applied: {e}");
            }
            let remove = {
                let dom = dom.clone();
                let toast = toast.clone();
                Box::new(move || {
                    if dom.is_connected(&toast) {
                        dom.remove(&toast);
                    }
                })
            };
            if let Err(e) = scheduler.schedule(exit, remove) {
                warn!("could not schedule toast removal: {e}");
                dom.remove(&toast);
            }
        });

        match self
            .scheduler
            .schedule(self.config.notification_delay(), dismiss)
        {
            Ok(dismiss) => Some(Toast { node, dismiss }),
            Err(e) => {
                warn!("could not schedule toast dismissal: {e}");
                self.dom.remove(&node);
                None
            }
        }
    }

    fn toast_element(&self, message: &str, level: ToastLevel) -> Result<D::Node> {
        let node = self.dom.create_element("div")?;
        self.dom.set_class_name(&node, &level.class_name());
        for (property, value) in TOAST_STYLE {
            self.dom.set_style(&node, property, value)?;
        }
        self.dom
            .set_style(&node, "background-color", level.background())?;
        self.dom.set_text(&node, message);
        Ok(node)
    }

    /// Prefix recommendation headings with an icon. Not idempotent: calling it
    /// twice prefixes twice.
    pub fn format_recommendations(&self) {
        for block in self.dom.query_all(None, CONTENT_SELECTOR) {
            for heading in self.dom.query_all(Some(&block), HEADING_SELECTOR) {
                if let Some(icon) = decorate::heading_icon(&self.dom.text(&heading)) {
                    let html = self.dom.inner_html(&heading);
                    self.dom
                        .set_inner_html(&heading, &decorate::prefixed(icon, &html));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::dom::memory::{MemoryDom, NodeId};
    use crate::schedule::manual::ManualScheduler;

    fn app_on(dom: &MemoryDom) -> (Rc<DietApp<MemoryDom, ManualScheduler>>, ManualScheduler) {
        let scheduler = ManualScheduler::new();
        let app = DietApp::new(dom.clone(), scheduler.clone(), UiConfig::default());
        (app, scheduler)
    }

    fn field(dom: &MemoryDom, parent: &NodeId) -> NodeId {
        dom.child(parent, "input", "")
    }

    #[test]
    fn field_error_is_replaced_not_stacked() {
        let dom = MemoryDom::new("/register", "");
        let group = dom.child(&dom.body_node(), "div", "form-group");
        let input = field(&dom, &group);
        let (app, _) = app_on(&dom);

        app.show_field_error(&input, "first");
        app.show_field_error(&input, "second");

        let errors = dom.query_all(Some(&group), ".field-error");
        assert_eq!(errors.len(), 1);
        assert_eq!(dom.text(&errors[0]), "second");
        assert_eq!(dom.style(&input, "border-color").as_deref(), Some("var(--error-color)"));
        assert_eq!(dom.style(&errors[0], "font-size").as_deref(), Some("0.875rem"));

        app.clear_field_error(&input);
        app.clear_field_error(&input);
        assert!(dom.query(Some(&group), ".field-error").is_none());
        assert_eq!(dom.style(&input, "border-color"), None);
    }

    #[test]
    fn errors_on_sibling_fields_are_independent() {
        let dom = MemoryDom::new("/register", "");
        let form = dom.child(&dom.body_node(), "form", "");
        let a = field(&dom, &form);
        let b = field(&dom, &form);
        let (app, _) = app_on(&dom);

        app.show_field_error(&a, "a");
        app.show_field_error(&b, "b");
        assert_eq!(dom.query_all(Some(&form), ".field-error").len(), 2);

        app.clear_field_error(&b);
        let left = dom.query_all(Some(&form), ".field-error");
        assert_eq!(left.len(), 1);
        assert_eq!(dom.text(&left[0]), "a");
    }

    #[test]
    fn loading_state_reverts_after_fallback() {
        let dom = MemoryDom::new("/", "");
        let button = dom.child(&dom.body_node(), "button", "btn");
        dom.set_text_content(&button, "Save");
        let (app, scheduler) = app_on(&dom);

        assert!(app.set_button_loading(&button).is_some());
        assert_eq!(dom.text(&button), "Loading...");
        assert!(dom.is_disabled(&button));

        // Already loading: the original label must not be overwritten.
        assert!(app.set_button_loading(&button).is_none());

        scheduler.advance(Duration::from_millis(9_999));
        assert!(dom.is_disabled(&button));
        scheduler.advance(Duration::from_millis(1));
        assert_eq!(dom.text(&button), "Save");
        assert!(!dom.is_disabled(&button));
    }

    #[test]
    fn revert_skips_detached_button() {
        let dom = MemoryDom::new("/", "");
        let button = dom.child(&dom.body_node(), "button", "");
        dom.set_text_content(&button, "Go");
        let (app, scheduler) = app_on(&dom);

        app.set_button_loading(&button);
        dom.remove(&button);
        scheduler.advance(Duration::from_secs(10));
        assert_eq!(dom.text(&button), "Loading...");
    }

    #[test]
    fn submit_buttons_defer_to_form_handler() {
        let dom = MemoryDom::new("/", "");
        let body = dom.body_node();
        let submit = dom.child(&body, "button", "");
        dom.set_attr(&submit, "type", "submit");
        dom.set_text_content(&submit, "Send");
        let plain = dom.child(&body, "button", "");
        dom.set_attr(&plain, "type", "button");
        dom.set_text_content(&plain, "Refresh");
        let (app, _) = app_on(&dom);

        assert_eq!(dom.dispatch(&submit, EventKind::Click), EventOutcome::Continue);
        assert_eq!(dom.text(&submit), "Send");

        assert_eq!(app.handle_button_click(&plain), EventOutcome::Continue);
        assert_eq!(dom.text(&plain), "Loading...");
    }

    #[test]
    fn logout_cancel_keeps_session_and_stays() {
        let dom = MemoryDom::new("/profile", "user_id=7");
        let link = dom.child(&dom.body_node(), "a", "");
        dom.set_attr(&link, "href", "/logout");
        let (app, _) = app_on(&dom);

        dom.answer_confirm(false);
        assert_eq!(dom.dispatch(&link, EventKind::Click), EventOutcome::PreventDefault);
        assert_eq!(dom.prompts(), vec!["Are you sure you want to logout?".to_string()]);
        assert!(dom.navigations().is_empty());
        assert_eq!(app.current_user().as_deref(), Some("7"));
    }

    #[test]
    fn logout_confirm_clears_session_and_navigates() {
        let dom = MemoryDom::new("/profile", "user_id=7");
        let link = dom.child(&dom.body_node(), "a", "");
        dom.set_attr(&link, "href", "/logout");
        let (app, _) = app_on(&dom);

        assert_eq!(dom.dispatch(&link, EventKind::Click), EventOutcome::PreventDefault);
        assert_eq!(dom.navigations(), vec!["/logout".to_string()]);
        assert!(!app.is_logged_in());
    }

    #[test]
    fn welcome_banner_is_first_and_unique() {
        let dom = MemoryDom::new("/profile", "user_id=1");
        let container = dom.child(&dom.body_node(), "main", "container");
        let existing = dom.child(&container, "h1", "");
        let (app, _) = app_on(&dom);

        app.update_navigation();
        app.add_welcome_message();

        let banners = dom.query_all(None, ".welcome-message");
        assert_eq!(banners.len(), 1);
        assert_eq!(dom.children(&container)[0], banners[0]);
        assert_eq!(dom.children(&container)[1], existing);
        assert!(dom.has_class(&banners[0], "fade-in"));
        assert!(dom.text(&banners[0]).starts_with("Welcome to Your Health Dashboard!"));
        assert!(dom.has_class(&container, "fade-in"));
    }

    #[test]
    fn no_banner_when_logged_out() {
        let dom = MemoryDom::new("/", "");
        dom.child(&dom.body_node(), "main", "container");
        let _ = app_on(&dom);
        assert!(dom.query(None, ".welcome-message").is_none());
    }

    #[test]
    fn active_link_follows_exact_path() {
        let dom = MemoryDom::new("/profile", "user_id=1");
        let links = dom.child(&dom.body_node(), "ul", "nav-links");
        let mut anchors = Vec::new();
        for href in ["/profile", "/profile/", "/recommendations"] {
            let a = dom.child(&links, "a", "active");
            dom.set_attr(&a, "href", href);
            anchors.push(a);
        }
        let _ = app_on(&dom);

        let active: Vec<bool> = anchors.iter().map(|a| dom.has_class(a, "active")).collect();
        assert_eq!(active, vec![true, false, false]);
    }

    #[test]
    fn toast_is_styled_and_removed_after_exit() {
        let dom = MemoryDom::new("/", "");
        let (app, scheduler) = app_on(&dom);

        let toast = app.show_notification("Saved", ToastLevel::Warning).unwrap();
        assert!(dom.has_class(&toast.node, "notification"));
        assert!(dom.has_class(&toast.node, "warning"));
        assert_eq!(dom.style(&toast.node, "position").as_deref(), Some("fixed"));
        assert_eq!(
            dom.style(&toast.node, "background-color").as_deref(),
            Some("var(--warning-color)")
        );

        scheduler.advance(Duration::from_millis(5_000));
        assert_eq!(dom.style(&toast.node, "animation").as_deref(), Some(EXIT_ANIMATION));
        assert!(dom.is_connected(&toast.node));

        scheduler.advance(Duration::from_millis(300));
        assert!(!dom.is_connected(&toast.node));
    }

    #[test]
    fn cancelled_dismissal_keeps_toast() {
        let dom = MemoryDom::new("/", "");
        let (app, scheduler) = app_on(&dom);

        let toast = app.show_notification("Pinned", ToastLevel::Info).unwrap();
        scheduler.cancel(toast.dismiss);
        scheduler.advance(Duration::from_secs(60));
        assert!(dom.is_connected(&toast.node));
    }

    #[test]
    fn recommendations_get_icons_once_per_call() {
        let dom = MemoryDom::new("/recommendations", "user_id=1");
        let content = dom.child(&dom.body_node(), "div", "recommendation-content");
        let breakfast = dom.child(&content, "h2", "");
        dom.set_text_content(&breakfast, "Breakfast");
        let other = dom.child(&content, "h3", "");
        dom.set_text_content(&other, "Notes");
        let outside = dom.child(&dom.body_node(), "h2", "");
        dom.set_text_content(&outside, "Lunch");
        let (app, _) = app_on(&dom);

        app.format_recommendations();
        assert_eq!(dom.text(&breakfast), "🥐 Breakfast");
        assert_eq!(dom.text(&other), "Notes");
        assert_eq!(dom.text(&outside), "Lunch");

        app.format_recommendations();
        assert_eq!(dom.text(&breakfast), "🥐 🥐 Breakfast");
    }
}
