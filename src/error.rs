use thiserror::Error;

/// Errors that can occur while tracing a cut path.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum TraceError {
    /// No pixel above the alpha threshold, or the boundary walk found
    /// fewer than three distinct cells.
    #[error("could not detect a silhouette in this image")]
    NoForegroundPixels,

    /// The outward offset produced no usable polygon. Recoverable:
    /// the raw contour can be used as the cut path instead.
    #[error("offset computation failed: {0}")]
    OffsetComputationFailure(String),

    /// The boundary walk ran past its step cap without closing.
    #[error("boundary walk did not close after {steps} steps")]
    StepLimitExceeded { steps: usize },

    #[error("failed to load image: {0}")]
    ImageLoad(String),

    #[error("failed to render preview: {0}")]
    Render(String),
}

impl TraceError {
    /// Whether the pipeline can continue with a degraded result.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TraceError::OffsetComputationFailure(_))
    }
}
