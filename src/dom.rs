//! The DOM as an injected capability.
//!
//! `DietApp` never touches a browser directly: it queries, mutates and listens
//! through [`Dom`]. The wasm crate implements it over `web_sys`; tests use
//! [`memory::MemoryDom`].

pub mod memory;
pub mod selector;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Submit,
    Click,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Submit => "submit",
            EventKind::Click => "click",
        }
    }
}

/// What a handler wants done with the event's default action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Continue,
    PreventDefault,
}

pub type Handler<N> = Box<dyn FnMut(&N) -> EventOutcome>;

pub trait Dom: Clone + 'static {
    type Node: Clone + PartialEq + 'static;

    /// First match in document order. `scope = None` searches the whole document.
    fn query(&self, scope: Option<&Self::Node>, selector: &str) -> Option<Self::Node>;
    fn query_all(&self, scope: Option<&Self::Node>, selector: &str) -> Vec<Self::Node>;

    fn body(&self) -> Option<Self::Node>;
    fn head(&self) -> Option<Self::Node>;
    fn next_sibling(&self, node: &Self::Node) -> Option<Self::Node>;
    /// Still attached to the document.
    fn is_connected(&self, node: &Self::Node) -> bool;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    /// Current value of a form control; empty for anything else.
    fn value(&self, node: &Self::Node) -> String;
    fn text(&self, node: &Self::Node) -> String;
    fn inner_html(&self, node: &Self::Node) -> String;
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn is_disabled(&self, node: &Self::Node) -> bool;

    fn create_element(&self, tag: &str) -> Result<Self::Node>;
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str) -> Result<()>;
    fn set_class_name(&self, node: &Self::Node, class_name: &str);
    fn add_class(&self, node: &Self::Node, class: &str);
    fn remove_class(&self, node: &Self::Node, class: &str);
    fn set_text(&self, node: &Self::Node, text: &str);
    fn set_inner_html(&self, node: &Self::Node, html: &str);
    /// An empty `value` removes the declaration.
    fn set_style(&self, node: &Self::Node, property: &str, value: &str) -> Result<()>;
    fn set_disabled(&self, node: &Self::Node, disabled: bool);

    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<()>;
    fn prepend_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<()>;
    fn insert_after(&self, reference: &Self::Node, node: &Self::Node) -> Result<()>;
    /// Detach `node`; a no-op if it is already detached.
    fn remove(&self, node: &Self::Node);

    fn listen(&self, node: &Self::Node, kind: EventKind, handler: Handler<Self::Node>)
        -> Result<()>;

    fn cookie(&self) -> String;
    fn location_path(&self) -> String;
    /// Query string including the leading `?`, or empty.
    fn location_search(&self) -> String;
    /// Rewrite the address bar without reloading (history replace).
    fn replace_url(&self, url: &str) -> Result<()>;
    fn navigate(&self, url: &str) -> Result<()>;
    /// Blocking yes/no prompt.
    fn confirm(&self, message: &str) -> bool;
}
