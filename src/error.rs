use thiserror::Error;

/// Failures raised by the DOM capability layer.
///
/// None of these are surfaced to the user; the component logs them and skips
/// the affected step.
#[derive(Error, Debug)]
pub enum UiError {
    #[cfg(feature = "serde")]
    #[error("invalid page config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("browser call failed: {0}")]
    Js(String),

    #[error("missing element: {0}")]
    MissingElement(&'static str),
}

pub type Result<T> = std::result::Result<T, UiError>;
