use diet_ui::dom::{Dom, EventKind, EventOutcome, Handler};
use diet_ui::error::{Result, UiError};
use tracing::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlDocument, HtmlElement, HtmlInputElement,
    HtmlSelectElement, HtmlTextAreaElement, NodeList, Window,
};

fn js_err(what: &str, e: JsValue) -> UiError {
    UiError::Js(format!("{what}: {e:?}"))
}

/// The live page document.
#[derive(Clone)]
pub struct BrowserDom {
    window: Window,
    document: Document,
}

impl BrowserDom {
    pub fn from_window() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    fn style_target<'a>(&self, node: &'a Element) -> Result<&'a HtmlElement> {
        node.dyn_ref::<HtmlElement>()
            .ok_or(UiError::MissingElement("styleable element"))
    }
}

fn elements(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|n| n.dyn_into::<Element>().ok())
        .collect()
}

impl Dom for BrowserDom {
    type Node = Element;

    fn query(&self, scope: Option<&Element>, selector: &str) -> Option<Element> {
        let found = match scope {
            Some(el) => el.query_selector(selector),
            None => self.document.query_selector(selector),
        };
        found.unwrap_or_else(|e| {
            debug!("querySelector({selector}) failed: {e:?}");
            None
        })
    }

    fn query_all(&self, scope: Option<&Element>, selector: &str) -> Vec<Element> {
        let found = match scope {
            Some(el) => el.query_selector_all(selector),
            None => self.document.query_selector_all(selector),
        };
        match found {
            Ok(list) => elements(list),
            Err(e) => {
                debug!("querySelectorAll({selector}) failed: {e:?}");
                Vec::new()
            }
        }
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(|b| b.unchecked_into::<Element>())
    }

    fn head(&self) -> Option<Element> {
        self.document.head().map(|h| h.unchecked_into::<Element>())
    }

    fn next_sibling(&self, node: &Element) -> Option<Element> {
        node.next_element_sibling()
    }

    fn is_connected(&self, node: &Element) -> bool {
        node.is_connected()
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn value(&self, node: &Element) -> String {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(area) = node.dyn_ref::<HtmlTextAreaElement>() {
            area.value()
        } else if let Some(select) = node.dyn_ref::<HtmlSelectElement>() {
            select.value()
        } else {
            String::new()
        }
    }

    fn text(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn inner_html(&self, node: &Element) -> String {
        node.inner_html()
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn is_disabled(&self, node: &Element) -> bool {
        if let Some(button) = node.dyn_ref::<HtmlButtonElement>() {
            button.disabled()
        } else if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.disabled()
        } else {
            node.has_attribute("disabled")
        }
    }

    fn create_element(&self, tag: &str) -> Result<Element> {
        self.document
            .create_element(tag)
            .map_err(|e| js_err("createElement", e))
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) -> Result<()> {
        node.set_attribute(name, value)
            .map_err(|e| js_err("setAttribute", e))
    }

    fn set_class_name(&self, node: &Element, class_name: &str) {
        node.set_class_name(class_name);
    }

    fn add_class(&self, node: &Element, class: &str) {
        if let Err(e) = node.class_list().add_1(class) {
            debug!("classList.add({class}) failed: {e:?}");
        }
    }

    fn remove_class(&self, node: &Element, class: &str) {
        if let Err(e) = node.class_list().remove_1(class) {
            debug!("classList.remove({class}) failed: {e:?}");
        }
    }

    fn set_text(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn set_inner_html(&self, node: &Element, html: &str) {
        node.set_inner_html(html);
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) -> Result<()> {
        let style = self.style_target(node)?.style();
        if value.is_empty() {
            style
                .remove_property(property)
                .map(|_| ())
                .map_err(|e| js_err("style.removeProperty", e))
        } else {
            style
                .set_property(property, value)
                .map_err(|e| js_err("style.setProperty", e))
        }
    }

    fn set_disabled(&self, node: &Element, disabled: bool) {
        if let Some(button) = node.dyn_ref::<HtmlButtonElement>() {
            button.set_disabled(disabled);
        } else if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.set_disabled(disabled);
        } else if disabled {
            let _ = node.set_attribute("disabled", "");
        } else {
            let _ = node.remove_attribute("disabled");
        }
    }

    fn append_child(&self, parent: &Element, child: &Element) -> Result<()> {
        parent
            .append_child(child)
            .map(|_| ())
            .map_err(|e| js_err("appendChild", e))
    }

    fn prepend_child(&self, parent: &Element, child: &Element) -> Result<()> {
        parent
            .prepend_with_node_1(child)
            .map_err(|e| js_err("prepend", e))
    }

    fn insert_after(&self, reference: &Element, node: &Element) -> Result<()> {
        reference
            .after_with_node_1(node)
            .map_err(|e| js_err("after", e))
    }

    fn remove(&self, node: &Element) {
        node.remove();
    }

    fn listen(&self, node: &Element, kind: EventKind, mut handler: Handler<Element>) -> Result<()> {
        let target = node.clone();
        let callback = Closure::wrap(Box::new(move |ev: web_sys::Event| {
            if handler(&target) == EventOutcome::PreventDefault {
                ev.prevent_default();
            }
        }) as Box<dyn FnMut(_)>);
        node.add_event_listener_with_callback(kind.as_str(), callback.as_ref().unchecked_ref())
            .map_err(|e| js_err("addEventListener", e))?;
        // Listeners live as long as the page.
        callback.forget();
        Ok(())
    }

    fn cookie(&self) -> String {
        self.document
            .dyn_ref::<HtmlDocument>()
            .and_then(|d| d.cookie().ok())
            .unwrap_or_default()
    }

    fn location_path(&self) -> String {
        self.window.location().pathname().unwrap_or_default()
    }

    fn location_search(&self) -> String {
        self.window.location().search().unwrap_or_default()
    }

    fn replace_url(&self, url: &str) -> Result<()> {
        let history = self
            .window
            .history()
            .map_err(|e| js_err("history", e))?;
        history
            .replace_state_with_url(&js_sys::Object::new(), &self.document.title(), Some(url))
            .map_err(|e| js_err("history.replaceState", e))
    }

    fn navigate(&self, url: &str) -> Result<()> {
        self.window
            .location()
            .set_href(url)
            .map_err(|e| js_err("location.href", e))
    }

    fn confirm(&self, message: &str) -> bool {
        self.window.confirm_with_message(message).unwrap_or(false)
    }
}
