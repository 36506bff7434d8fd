//! Toast notifications: levels, inline styling and the slide animations.

use tracing::warn;

use crate::dom::Dom;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastLevel {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl ToastLevel {
    pub fn label(self) -> &'static str {
        match self {
            ToastLevel::Success => "success",
            ToastLevel::Error => "error",
            ToastLevel::Warning => "warning",
            ToastLevel::Info => "info",
        }
    }

    pub fn class_name(self) -> String {
        format!("notification {}", self.label())
    }

    pub fn background(self) -> &'static str {
        match self {
            ToastLevel::Success => "var(--success-color)",
            ToastLevel::Error => "var(--error-color)",
            ToastLevel::Warning => "var(--warning-color)",
            ToastLevel::Info => "var(--primary-color)",
        }
    }
}

pub const TOAST_STYLE: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("top", "20px"),
    ("right", "20px"),
    ("padding", "1rem 1.5rem"),
    ("border-radius", "8px"),
    ("color", "white"),
    ("font-weight", "500"),
    ("z-index", "1000"),
    ("animation", "slideIn 0.3s ease-out"),
];

pub const EXIT_ANIMATION: &str = "slideOut 0.3s ease-in";

pub const KEYFRAMES_ID: &str = "diet-ui-keyframes";

pub const KEYFRAMES_CSS: &str = "
@keyframes slideIn {
    from { transform: translateX(100%); opacity: 0; }
    to { transform: translateX(0); opacity: 1; }
}

@keyframes slideOut {
    from { transform: translateX(0); opacity: 1; }
    to { transform: translateX(100%); opacity: 0; }
}
";

/// Add the `slideIn`/`slideOut` keyframes to `<head>` once per document.
pub fn inject_animation_styles<D: Dom>(dom: &D) {
    if dom.query(None, &format!("#{KEYFRAMES_ID}")).is_some() {
        return;
    }
    let Some(head) = dom.head() else {
        warn!("document has no <head>; toast animations unavailable");
        return;
    };
    let result = dom.create_element("style").and_then(|style| {
        dom.set_attribute(&style, "id", KEYFRAMES_ID)?;
        dom.set_text(&style, KEYFRAMES_CSS);
        dom.append_child(&head, &style)
    });
    if let Err(e) = result {
        warn!("failed to inject toast keyframes: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::memory::MemoryDom;

    #[test]
    fn levels_map_to_css_variables() {
        assert_eq!(ToastLevel::Success.background(), "var(--success-color)");
        assert_eq!(ToastLevel::Error.background(), "var(--error-color)");
        assert_eq!(ToastLevel::Warning.background(), "var(--warning-color)");
        assert_eq!(ToastLevel::default(), ToastLevel::Info);
        assert_eq!(ToastLevel::Info.background(), "var(--primary-color)");
        assert_eq!(ToastLevel::Warning.class_name(), "notification warning");
    }

    #[test]
    fn keyframes_are_injected_once() {
        let dom = MemoryDom::new("/", "");
        inject_animation_styles(&dom);
        inject_animation_styles(&dom);

        let styles = dom.query_all(Some(&dom.head_node()), "style");
        assert_eq!(styles.len(), 1);
        assert!(dom.text(&styles[0]).contains("@keyframes slideOut"));
    }
}
