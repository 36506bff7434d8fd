//! An in-memory document implementing [`Dom`].
//!
//! Enough of the DOM to drive the page logic on the host: an element tree with
//! attributes, classes, inline styles, form values and event listeners, plus the
//! browser bits the app reads (cookie, location, history, confirm dialogs).
//!
//! Markup passed to `set_inner_html` is stored verbatim as text; it is not
//! parsed into elements.

use std::cell::RefCell;
use std::rc::Rc;

use super::selector::{SelectorList, SelectorTarget};
use super::{Dom, EventKind, EventOutcome, Handler};
use crate::error::{Result, UiError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

const ROOT: NodeId = NodeId(0);
const HEAD: NodeId = NodeId(1);
const BODY: NodeId = NodeId(2);

#[derive(Debug, Default)]
struct NodeData {
    tag: String,
    attrs: Vec<(String, String)>,
    classes: Vec<String>,
    style: Vec<(String, String)>,
    text: String,
    value: Option<String>,
    disabled: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Default)]
struct Tree {
    nodes: Vec<NodeData>,
}

#[derive(Debug, Default)]
struct BrowserState {
    cookie: String,
    path: String,
    search: String,
    confirm_answer: bool,
    prompts: Vec<String>,
    replaced_urls: Vec<String>,
    navigations: Vec<String>,
}

struct Listener {
    node: NodeId,
    kind: EventKind,
    handler: Rc<RefCell<Handler<NodeId>>>,
}

#[derive(Clone)]
pub struct MemoryDom {
    tree: Rc<RefCell<Tree>>,
    browser: Rc<RefCell<BrowserState>>,
    listeners: Rc<RefCell<Vec<Listener>>>,
}

impl Tree {
    fn new() -> Self {
        let mut tree = Tree::default();
        tree.nodes.push(NodeData {
            tag: "html".to_string(),
            children: vec![HEAD, BODY],
            ..NodeData::default()
        });
        for tag in ["head", "body"] {
            tree.nodes.push(NodeData {
                tag: tag.to_string(),
                parent: Some(ROOT),
                ..NodeData::default()
            });
        }
        tree
    }

    fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node_mut(id).parent.take() {
            self.node_mut(parent).children.retain(|c| *c != id);
        }
    }

    fn connected(&self, mut id: NodeId) -> bool {
        loop {
            if id == ROOT {
                return true;
            }
            match self.node(id).parent {
                Some(p) => id = p,
                None => return false,
            }
        }
    }

    fn descendants(&self, scope: NodeId, out: &mut Vec<NodeId>) {
        for child in &self.node(scope).children {
            out.push(*child);
            self.descendants(*child, out);
        }
    }

    fn text_content(&self, id: NodeId) -> String {
        let node = self.node(id);
        let mut out = node.text.clone();
        for child in &node.children {
            out.push_str(&self.text_content(*child));
        }
        out
    }

    fn markup(&self, id: NodeId) -> String {
        let node = self.node(id);
        let mut out = node.text.clone();
        for child in &node.children {
            let c = self.node(*child);
            let class = if c.classes.is_empty() {
                String::new()
            } else {
                format!(" class=\"{}\"", c.classes.join(" "))
            };
            out.push_str(&format!("<{tag}{class}>{}</{tag}>", self.markup(*child), tag = c.tag));
        }
        out
    }

    fn clear_children(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.node_mut(id).children);
        for child in children {
            self.node_mut(child).parent = None;
        }
    }
}

impl SelectorTarget for Tree {
    type Id = NodeId;

    fn tag(&self, id: NodeId) -> &str {
        &self.node(id).tag
    }

    fn attr(&self, id: NodeId, name: &str) -> Option<String> {
        let node = self.node(id);
        if name == "class" {
            return (!node.classes.is_empty()).then(|| node.classes.join(" "));
        }
        node.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }

    fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.node(id).classes.iter().any(|c| c == class)
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }
}

impl MemoryDom {
    /// Empty document (`<html><head/><body/></html>`) at `path` with the given
    /// cookie header. `path` may carry a query string.
    pub fn new(path: &str, cookie: &str) -> Self {
        let (path, search) = match path.find('?') {
            Some(i) => (&path[..i], &path[i..]),
            None => (path, ""),
        };
        Self {
            tree: Rc::new(RefCell::new(Tree::new())),
            browser: Rc::new(RefCell::new(BrowserState {
                cookie: cookie.to_string(),
                path: path.to_string(),
                search: search.to_string(),
                confirm_answer: true,
                ..BrowserState::default()
            })),
            listeners: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn body_node(&self) -> NodeId {
        BODY
    }

    pub fn head_node(&self) -> NodeId {
        HEAD
    }

    /// Create a detached element.
    pub fn element(&self, tag: &str) -> NodeId {
        let mut tree = self.tree.borrow_mut();
        tree.nodes.push(NodeData {
            tag: tag.to_ascii_lowercase(),
            ..NodeData::default()
        });
        NodeId(tree.nodes.len() - 1)
    }

    /// Create `tag` with `class` and append it to `parent`.
    pub fn child(&self, parent: &NodeId, tag: &str, class: &str) -> NodeId {
        let id = self.element(tag);
        self.set_class_name(&id, class);
        self.append(parent, &id);
        id
    }

    pub fn append(&self, parent: &NodeId, child: &NodeId) {
        let mut tree = self.tree.borrow_mut();
        tree.detach(*child);
        tree.node_mut(*child).parent = Some(*parent);
        tree.node_mut(*parent).children.push(*child);
    }

    pub fn set_attr(&self, node: &NodeId, name: &str, value: &str) {
        if name == "class" {
            self.set_class_name(node, value);
            return;
        }
        let mut tree = self.tree.borrow_mut();
        let attrs = &mut tree.node_mut(*node).attrs;
        match attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => attrs.push((name.to_string(), value.to_string())),
        }
    }

    pub fn set_value(&self, node: &NodeId, value: &str) {
        self.tree.borrow_mut().node_mut(*node).value = Some(value.to_string());
    }

    pub fn set_text_content(&self, node: &NodeId, text: &str) {
        self.set_text(node, text);
    }

    pub fn style(&self, node: &NodeId, property: &str) -> Option<String> {
        self.tree
            .borrow()
            .node(*node)
            .style
            .iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v.clone())
    }

    pub fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.tree.borrow().node(*node).children.clone()
    }

    /// Answer given to every subsequent `confirm` prompt.
    pub fn answer_confirm(&self, answer: bool) {
        self.browser.borrow_mut().confirm_answer = answer;
    }

    pub fn prompts(&self) -> Vec<String> {
        self.browser.borrow().prompts.clone()
    }

    pub fn replaced_urls(&self) -> Vec<String> {
        self.browser.borrow().replaced_urls.clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.browser.borrow().navigations.clone()
    }

    /// Current address as `path + search`.
    pub fn url(&self) -> String {
        let b = self.browser.borrow();
        format!("{}{}", b.path, b.search)
    }

    /// Fire `kind` on `node`, running its listeners in registration order.
    pub fn dispatch(&self, node: &NodeId, kind: EventKind) -> EventOutcome {
        let handlers: Vec<_> = self
            .listeners
            .borrow()
            .iter()
            .filter(|l| l.node == *node && l.kind == kind)
            .map(|l| Rc::clone(&l.handler))
            .collect();

        let mut outcome = EventOutcome::Continue;
        for handler in handlers {
            let mut handler = handler.borrow_mut();
            if (*handler)(node) == EventOutcome::PreventDefault {
                outcome = EventOutcome::PreventDefault;
            }
        }
        outcome
    }

    fn matching(&self, scope: Option<&NodeId>, selector: &str) -> Vec<NodeId> {
        let list = SelectorList::parse(selector);
        let tree = self.tree.borrow();
        let mut candidates = Vec::new();
        tree.descendants(scope.copied().unwrap_or(ROOT), &mut candidates);
        candidates
            .into_iter()
            .filter(|id| list.matches(&*tree, *id))
            .collect()
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn query(&self, scope: Option<&NodeId>, selector: &str) -> Option<NodeId> {
        self.matching(scope, selector).into_iter().next()
    }

    fn query_all(&self, scope: Option<&NodeId>, selector: &str) -> Vec<NodeId> {
        self.matching(scope, selector)
    }

    fn body(&self) -> Option<NodeId> {
        Some(BODY)
    }

    fn head(&self) -> Option<NodeId> {
        Some(HEAD)
    }

    fn next_sibling(&self, node: &NodeId) -> Option<NodeId> {
        let tree = self.tree.borrow();
        let parent = tree.node(*node).parent?;
        let siblings = &tree.node(parent).children;
        let pos = siblings.iter().position(|c| c == node)?;
        siblings.get(pos + 1).copied()
    }

    fn is_connected(&self, node: &NodeId) -> bool {
        self.tree.borrow().connected(*node)
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.tree.borrow().attr(*node, name)
    }

    fn value(&self, node: &NodeId) -> String {
        let tree = self.tree.borrow();
        let data = tree.node(*node);
        match data.value.clone() {
            Some(v) => v,
            None if matches!(data.tag.as_str(), "input" | "textarea" | "select") => {
                tree.attr(*node, "value").unwrap_or_default()
            }
            None => String::new(),
        }
    }

    fn text(&self, node: &NodeId) -> String {
        self.tree.borrow().text_content(*node)
    }

    fn inner_html(&self, node: &NodeId) -> String {
        self.tree.borrow().markup(*node)
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        SelectorTarget::has_class(&*self.tree.borrow(), *node, class)
    }

    fn is_disabled(&self, node: &NodeId) -> bool {
        self.tree.borrow().node(*node).disabled
    }

    fn create_element(&self, tag: &str) -> Result<NodeId> {
        Ok(self.element(tag))
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) -> Result<()> {
        self.set_attr(node, name, value);
        Ok(())
    }

    fn set_class_name(&self, node: &NodeId, class_name: &str) {
        self.tree.borrow_mut().node_mut(*node).classes =
            class_name.split_whitespace().map(str::to_string).collect();
    }

    fn add_class(&self, node: &NodeId, class: &str) {
        let mut tree = self.tree.borrow_mut();
        let classes = &mut tree.node_mut(*node).classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    fn remove_class(&self, node: &NodeId, class: &str) {
        self.tree
            .borrow_mut()
            .node_mut(*node)
            .classes
            .retain(|c| c != class);
    }

    fn set_text(&self, node: &NodeId, text: &str) {
        let mut tree = self.tree.borrow_mut();
        tree.clear_children(*node);
        tree.node_mut(*node).text = text.to_string();
    }

    fn set_inner_html(&self, node: &NodeId, html: &str) {
        self.set_text(node, html);
    }

    fn set_style(&self, node: &NodeId, property: &str, value: &str) -> Result<()> {
        let mut tree = self.tree.borrow_mut();
        let style = &mut tree.node_mut(*node).style;
        style.retain(|(k, _)| k != property);
        if !value.is_empty() {
            style.push((property.to_string(), value.to_string()));
        }
        Ok(())
    }

    fn set_disabled(&self, node: &NodeId, disabled: bool) {
        self.tree.borrow_mut().node_mut(*node).disabled = disabled;
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<()> {
        self.append(parent, child);
        Ok(())
    }

    fn prepend_child(&self, parent: &NodeId, child: &NodeId) -> Result<()> {
        let mut tree = self.tree.borrow_mut();
        tree.detach(*child);
        tree.node_mut(*child).parent = Some(*parent);
        tree.node_mut(*parent).children.insert(0, *child);
        Ok(())
    }

    fn insert_after(&self, reference: &NodeId, node: &NodeId) -> Result<()> {
        let mut tree = self.tree.borrow_mut();
        let parent = tree
            .node(*reference)
            .parent
            .ok_or(UiError::MissingElement("parent of insertion point"))?;
        tree.detach(*node);
        let siblings = &tree.node(parent).children;
        let pos = siblings
            .iter()
            .position(|c| c == reference)
            .map_or(siblings.len(), |p| p + 1);
        tree.node_mut(*node).parent = Some(parent);
        tree.node_mut(parent).children.insert(pos, *node);
        Ok(())
    }

    fn remove(&self, node: &NodeId) {
        self.tree.borrow_mut().detach(*node);
    }

    fn listen(&self, node: &NodeId, kind: EventKind, handler: Handler<NodeId>) -> Result<()> {
        self.listeners.borrow_mut().push(Listener {
            node: *node,
            kind,
            handler: Rc::new(RefCell::new(handler)),
        });
        Ok(())
    }

    fn cookie(&self) -> String {
        self.browser.borrow().cookie.clone()
    }

    fn location_path(&self) -> String {
        self.browser.borrow().path.clone()
    }

    fn location_search(&self) -> String {
        self.browser.borrow().search.clone()
    }

    fn replace_url(&self, url: &str) -> Result<()> {
        let mut b = self.browser.borrow_mut();
        let (path, search) = match url.find('?') {
            Some(i) => (&url[..i], &url[i..]),
            None => (url, ""),
        };
        b.path = path.to_string();
        b.search = search.to_string();
        b.replaced_urls.push(url.to_string());
        Ok(())
    }

    fn navigate(&self, url: &str) -> Result<()> {
        self.browser.borrow_mut().navigations.push(url.to_string());
        Ok(())
    }

    fn confirm(&self, message: &str) -> bool {
        let mut b = self.browser.borrow_mut();
        b.prompts.push(message.to_string());
        b.confirm_answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queries_follow_document_order_and_scope() {
        let dom = MemoryDom::new("/", "");
        let body = dom.body_node();
        let nav = dom.child(&body, "ul", "nav-links");
        let a1 = dom.child(&nav, "a", "");
        let outside = dom.child(&body, "a", "");
        let a2 = dom.child(&nav, "a", "");

        assert_eq!(dom.query_all(None, ".nav-links a"), vec![a1, a2]);
        assert_eq!(dom.query_all(None, "a"), vec![a1, outside, a2]);
        assert_eq!(dom.query(Some(&nav), "a"), Some(a1));
    }

    #[test]
    fn insert_after_places_next_sibling() {
        let dom = MemoryDom::new("/", "");
        let body = dom.body_node();
        let first = dom.child(&body, "input", "");
        let last = dom.child(&body, "input", "");
        let err = dom.element("div");

        dom.insert_after(&first, &err).unwrap();
        assert_eq!(dom.children(&body), vec![first, err, last]);
        assert_eq!(dom.next_sibling(&first), Some(err));
    }

    #[test]
    fn removed_nodes_are_disconnected() {
        let dom = MemoryDom::new("/", "");
        let body = dom.body_node();
        let wrap = dom.child(&body, "div", "");
        let inner = dom.child(&wrap, "span", "");

        assert!(dom.is_connected(&inner));
        dom.remove(&wrap);
        assert!(!dom.is_connected(&inner));
        dom.remove(&wrap);
    }

    #[test]
    fn empty_style_value_clears_property() {
        let dom = MemoryDom::new("/", "");
        let el = dom.child(&dom.body_node(), "input", "");
        dom.set_style(&el, "border-color", "red").unwrap();
        assert_eq!(dom.style(&el, "border-color").as_deref(), Some("red"));
        dom.set_style(&el, "border-color", "").unwrap();
        assert_eq!(dom.style(&el, "border-color"), None);
    }

    #[test]
    fn location_splits_query() {
        let dom = MemoryDom::new("/recommendations?message=hi", "");
        assert_eq!(dom.location_path(), "/recommendations");
        assert_eq!(dom.location_search(), "?message=hi");
    }
}
