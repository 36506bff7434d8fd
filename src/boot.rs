//! Page-ready bootstrap.

use std::rc::Rc;

use tracing::{debug, warn};

use crate::app::DietApp;
use crate::config::UiConfig;
use crate::dom::Dom;
use crate::nav::Route;
use crate::notify::{self, ToastLevel};
use crate::query::{self, MESSAGE_PARAM};
use crate::schedule::Scheduler;

/// Run once the document has been parsed: inject the toast keyframes, build
/// the app, schedule heading decoration on the recommendations page and turn a
/// `?message=` redirect notice into a success toast.
pub fn boot<D: Dom, S: Scheduler>(dom: D, scheduler: S, config: UiConfig) -> Rc<DietApp<D, S>> {
    notify::inject_animation_styles(&dom);
    let app = DietApp::new(dom, scheduler, config);

    if app.dom().location_path() == Route::Recommendations.path() {
        schedule_decoration(&app);
    }
    show_redirect_message(&app);
    app
}

// Content may still be rendering when the page becomes ready; decoration runs
// once, after a fixed delay.
fn schedule_decoration<D: Dom, S: Scheduler>(app: &Rc<DietApp<D, S>>) {
    let target = Rc::clone(app);
    let task = Box::new(move || target.format_recommendations());
    if let Err(e) = app.scheduler().schedule(app.config().decorate_delay(), task) {
        warn!("could not schedule recommendation formatting: {e}");
    }
}

fn show_redirect_message<D: Dom, S: Scheduler>(app: &DietApp<D, S>) {
    let dom = app.dom();
    let search = dom.location_search();
    let Some(raw) = query::param(&search, MESSAGE_PARAM).filter(|m| !m.is_empty()) else {
        return;
    };

    let message = query::decode_component(&raw);
    debug!(%message, "showing redirect message");
    app.show_notification(&message, ToastLevel::Success);

    // The whole query string goes, not just `message`.
    if let Err(e) = dom.replace_url(&dom.location_path()) {
        warn!("could not clean message from url: {e}");
    }
}
