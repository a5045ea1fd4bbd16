//! stickercut: raster artwork → die-cut line.
//!
//! Finds the silhouette of the visible pixels in an image with an alpha
//! channel and grows it outward by a margin, producing the closed vector
//! path a sticker cutter follows.
//!
//! # Example
//!
//! ```no_run
//! use stickercut::{trace, TraceConfig};
//!
//! let image = image::open("sticker.png")?.into_rgba8();
//! let result = trace(&image, &TraceConfig::default())?;
//! println!("{}", result.cut_path.to_svg());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

mod config;
mod geom;

pub mod contour;
pub mod error;
pub mod mask;
pub mod offset;
pub mod output;
pub mod path;
pub mod render;
pub mod sticker;

// Re-export kurbo so downstream users get the same version
// used by CutPath and the transform argument.
pub use kurbo;

pub use config::TraceConfig;
pub use contour::Contour;
pub use error::TraceError;
pub use mask::AlphaMask;
pub use offset::OffsetPolygon;
pub use path::CutPath;
pub use sticker::{CutPathSlot, TraceTicket};

use image::{GenericImageView, Pixel, RgbaImage};
use kurbo::Affine;
use rayon::prelude::*;
use std::time::Instant;

/// Everything one trace produces.
#[derive(Debug, Clone)]
pub struct TraceResult {
    /// Raw silhouette boundary in pixel cells.
    pub contour: Contour,
    /// The contour grown by the margin, when offsetting succeeded.
    pub offset: Option<OffsetPolygon>,
    /// Cut line: the offset polygon, or the raw contour as fallback.
    pub cut_path: CutPath,
    /// Why offsetting failed, when the cut path fell back to the contour.
    pub offset_error: Option<TraceError>,
}

impl TraceResult {
    /// Whether the cut path is the raw contour rather than the offset one.
    pub fn is_fallback(&self) -> bool {
        self.offset.is_none()
    }
}

/// Full pipeline in pixel space: image → mask → contour → offset → path.
pub fn trace<I>(image: &I, config: &TraceConfig) -> Result<TraceResult, TraceError>
where
    I: GenericImageView,
    I::Pixel: Pixel<Subpixel = u8>,
{
    trace_with_transform(image, config, Affine::IDENTITY)
}

/// Full pipeline, mapping the cut path through `transform` (pixel space
/// → the sticker's placement space).
pub fn trace_with_transform<I>(
    image: &I,
    config: &TraceConfig,
    transform: Affine,
) -> Result<TraceResult, TraceError>
where
    I: GenericImageView,
    I::Pixel: Pixel<Subpixel = u8>,
{
    let t_start = Instant::now();

    // ── Mask ──────────────────────────────────────────────
    let mask = mask::build_mask(image, config.alpha_threshold);
    tracing::debug!(
        width = mask.width(),
        height = mask.height(),
        threshold = config.alpha_threshold,
        foreground = mask.count(),
        "mask built"
    );

    // ── Contour ───────────────────────────────────────────
    let contour = contour::trace(&mask)?;
    tracing::debug!(
        points = contour.len(),
        area = contour.area(),
        "contour traced"
    );

    // ── Offset (falls back to the raw contour) ────────────
    let (offset, offset_error) =
        match offset::offset(&contour, config.margin, &config.offset_options()) {
            Ok(polygon) => {
                tracing::debug!(points = polygon.len(), area = polygon.area(), "contour offset");
                (Some(polygon), None)
            }
            Err(e) => {
                tracing::warn!("{e}; using the raw contour as cut path");
                (None, Some(e))
            }
        };

    // ── Emit ──────────────────────────────────────────────
    let cut_path = match &offset {
        Some(polygon) => path::emit(polygon, transform),
        None => path::emit(&contour, transform),
    };

    tracing::info!(
        "traced {}x{} px: contour {} points, cut path {} segments, margin {}{} ({}ms)",
        mask.width(),
        mask.height(),
        contour.len(),
        cut_path.lines().len(),
        config.margin,
        if offset.is_none() { " (fallback)" } else { "" },
        t_start.elapsed().as_millis(),
    );

    Ok(TraceResult {
        contour,
        offset,
        cut_path,
        offset_error,
    })
}

/// Trace independent images in parallel. Results keep the input order.
pub fn trace_batch(
    images: &[RgbaImage],
    config: &TraceConfig,
) -> Vec<Result<TraceResult, TraceError>> {
    images.par_iter().map(|image| trace(image, config)).collect()
}
