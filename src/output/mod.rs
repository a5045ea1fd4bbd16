//! Export backends for cut paths.

pub mod svg;
