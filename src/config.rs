/// All tracing parameters in one struct.
/// Adjustable at runtime (for editor sliders) and cheap to clone
/// into background trace jobs.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceConfig {
    // -- Mask stage --
    /// Alpha cutoff (0-255). A pixel is foreground iff its alpha is
    /// strictly greater than this. Low values keep faint antialiased
    /// edge pixels out of the silhouette.
    pub alpha_threshold: u8,

    // -- Offset stage --
    /// Outward margin of the cut line, in pixels.
    pub margin: f64,
    /// Fixed-point scale: coordinates are multiplied by this and rounded
    /// to integers before offsetting. 100 = 1/100 pixel resolution.
    pub precision: f64,
    /// Maximum deviation (pixels) when flattening round joins into lines.
    pub arc_tolerance: f64,
    /// RDP simplification epsilon (pixels) applied to the contour before
    /// offsetting. 0 = keep every staircase vertex.
    pub simplify_epsilon: f64,
}

impl TraceConfig {
    /// Offset-stage parameters derived from this config.
    pub fn offset_options(&self) -> crate::offset::OffsetOptions {
        crate::offset::OffsetOptions {
            precision: self.precision,
            arc_tolerance: self.arc_tolerance,
            simplify_epsilon: self.simplify_epsilon,
        }
    }
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            alpha_threshold: 10,
            margin: 6.0,
            precision: 100.0,
            arc_tolerance: 0.1,
            simplify_epsilon: 0.5,
        }
    }
}
