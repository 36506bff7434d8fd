use diet_ui::config;
use tracing::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

mod console;
mod document;
mod timers;

pub use document::BrowserDom;
pub use timers::WindowScheduler;

/// Boot the page once the document has been parsed.
pub fn start() {
    console::init_tracing();

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    let ready_state = js_sys::Reflect::get(&document, &JsValue::from_str("readyState"))
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_default();
    if ready_state != "loading" {
        run();
        return;
    }

    let on_ready = Closure::once_into_js(run);
    if let Err(e) =
        document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())
    {
        warn!("could not wait for DOMContentLoaded ({e:?}); booting now");
        run();
    }
}

fn run() {
    let Some(dom) = BrowserDom::from_window() else {
        warn!("no window/document; page script not started");
        return;
    };
    let scheduler = WindowScheduler::new(dom.window().clone());
    let config = config::load(&dom);
    let app = diet_ui::boot(dom, scheduler, config);
    info!(logged_in = app.is_logged_in(), "page script ready");
}
