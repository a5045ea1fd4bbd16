//! SVG export: the source image plus its cut line.
//!
//! The cut path's data goes into the document verbatim, so a cutter or
//! vector editor sees exactly the traced outline.

use std::fmt::Write;

use crate::path::CutPath;
use crate::render::CutLineStyle;

/// Build a standalone SVG document.
///
/// `image_href`, when given, is referenced by an `<image>` element
/// covering the `width × height` canvas underneath the cut line.
pub fn document(
    width: u32,
    height: u32,
    image_href: Option<&str>,
    cut: &CutPath,
    style: &CutLineStyle,
) -> String {
    let mut svg = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = width,
        h = height
    );
    if let Some(href) = image_href {
        let _ = writeln!(
            svg,
            r#"  <image href="{}" x="0" y="0" width="{}" height="{}"/>"#,
            escape(href),
            width,
            height
        );
    }
    if !cut.is_empty() {
        let [r, g, b] = style.color;
        let _ = writeln!(
            svg,
            r##"  <path id="cut-line" d="{}" fill="none" stroke="#{:02x}{:02x}{:02x}" stroke-opacity="{}" stroke-width="{}"/>"##,
            cut.to_svg(),
            r,
            g,
            b,
            style.opacity,
            style.width
        );
    }
    svg.push_str("</svg>\n");
    svg
}

/// Escape text for use inside a double-quoted XML attribute.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
