//! Page-level settings: timings, labels and validation messages.
//!
//! A page may override any of them with an embedded JSON block:
//!
//! ```html
//! <script id="diet-ui-config" type="application/json">{"notification_ms": 8000}</script>
//! ```

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dom::Dom;

pub const CONFIG_ELEMENT_SELECTOR: &str = "#diet-ui-config";

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UiConfig {
    pub loading_label: String,
    /// Revert delay for a button left in the loading state.
    pub loading_fallback_ms: u32,
    /// Time a toast stays up before its exit animation starts.
    pub notification_ms: u32,
    pub notification_exit_ms: u32,
    pub decorate_delay_ms: u32,
    pub logout_prompt: String,
    pub welcome: WelcomeText,
    pub messages: ValidationMessages,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WelcomeText {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ValidationMessages {
    pub required: String,
    pub invalid_email: String,
    pub password_mismatch: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            loading_label: "Loading...".to_string(),
            loading_fallback_ms: 10_000,
            notification_ms: 5_000,
            notification_exit_ms: 300,
            decorate_delay_ms: 500,
            logout_prompt: "Are you sure you want to logout?".to_string(),
            welcome: WelcomeText::default(),
            messages: ValidationMessages::default(),
        }
    }
}

impl Default for WelcomeText {
    fn default() -> Self {
        Self {
            title: "Welcome to Your Health Dashboard!".to_string(),
            body: "Get personalized diet and exercise recommendations based on your profile."
                .to_string(),
        }
    }
}

impl Default for ValidationMessages {
    fn default() -> Self {
        Self {
            required: "This field is required".to_string(),
            invalid_email: "Please enter a valid email address".to_string(),
            password_mismatch: "Passwords do not match".to_string(),
        }
    }
}

impl UiConfig {
    pub fn loading_fallback(&self) -> Duration {
        Duration::from_millis(self.loading_fallback_ms.into())
    }

    pub fn notification_delay(&self) -> Duration {
        Duration::from_millis(self.notification_ms.into())
    }

    pub fn notification_exit(&self) -> Duration {
        Duration::from_millis(self.notification_exit_ms.into())
    }

    pub fn decorate_delay(&self) -> Duration {
        Duration::from_millis(self.decorate_delay_ms.into())
    }

    #[cfg(feature = "serde")]
    pub fn from_json(raw: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Read the embedded config block, falling back to defaults.
pub fn load<D: Dom>(dom: &D) -> UiConfig {
    let Some(node) = dom.query(None, CONFIG_ELEMENT_SELECTOR) else {
        return UiConfig::default();
    };
    from_block(&dom.text(&node))
}

#[cfg(feature = "serde")]
fn from_block(raw: &str) -> UiConfig {
    if raw.trim().is_empty() {
        return UiConfig::default();
    }
    match UiConfig::from_json(raw) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!("{e}; using default page config");
            UiConfig::default()
        }
    }
}

#[cfg(not(feature = "serde"))]
fn from_block(_raw: &str) -> UiConfig {
    tracing::debug!("page config block ignored (built without serde)");
    UiConfig::default()
}
