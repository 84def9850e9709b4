/// Convenience result type used across plotine.
pub type PlotResult<T> = Result<T, PlotError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Structural-limit conditions (layer stack depth, popping the root layer)
/// are deliberately *not* represented here: those operations report a no-op
/// `false` and leave the plot untouched.
#[derive(thiserror::Error, Debug)]
pub enum PlotError {
    /// Invalid user-provided data (empty paths, non-finite sizes, ...).
    #[error("validation error: {0}")]
    Validation(String),

    /// Unrecognized axis label format tag; the previous format stays active.
    #[error("label format error: {0}")]
    Format(String),

    /// Errors while shaping or measuring text.
    #[error("text error: {0}")]
    Text(String),

    /// Errors raised by a canvas backend while producing output.
    #[error("canvas error: {0}")]
    Canvas(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlotError {
    /// Build a [`PlotError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PlotError::Format`] value.
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Build a [`PlotError::Text`] value.
    pub fn text(msg: impl Into<String>) -> Self {
        Self::Text(msg.into())
    }

    /// Build a [`PlotError::Canvas`] value.
    pub fn canvas(msg: impl Into<String>) -> Self {
        Self::Canvas(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
