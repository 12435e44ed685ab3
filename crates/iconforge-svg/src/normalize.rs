//! # Icon Normalizer
//!
//! Canonicalizes raw icon markup before either pipeline sees it:
//! - `currentColor` (any case) becomes literal black
//! - stroke-only icons get black strokes and a visible stroke width
//! - `em`, `rem` and `%` sizes become the viewBox dimensions
//!
//! Rewrites are attribute-level on the document tree. Path data is never
//! touched and normalizing twice yields the same document.

use crate::document::SvgDocument;
use crate::error::SvgResult;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

const BLACK: &str = "#000000";
const DEFAULT_STROKE_WIDTH: &str = "2";

fn current_color_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)currentcolor").expect("invalid currentColor regex"))
}

fn relative_length_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*[0-9.]+\s*(em|rem|%)\s*$").expect("invalid relative length regex")
    })
}

/// Parse and normalize icon markup
pub fn normalize_icon(markup: &str) -> SvgResult<SvgDocument> {
    let mut doc = SvgDocument::parse(markup)?;
    normalize_document(&mut doc);
    Ok(doc)
}

/// Normalize a parsed document in place
pub fn normalize_document(doc: &mut SvgDocument) {
    replace_current_color(doc);
    force_visible_strokes(doc);
    resolve_relative_sizes(doc);
}

fn replace_current_color(doc: &mut SvgDocument) {
    let pattern = current_color_pattern();
    let mut replaced = 0usize;

    doc.root.visit_mut(&mut |el| {
        for (_, value) in el.attributes.iter_mut() {
            if pattern.is_match(value) {
                *value = pattern.replace_all(value, BLACK).into_owned();
                replaced += 1;
            }
        }
    });
    doc.root.visit_text_mut(&mut |text| {
        if pattern.is_match(text) {
            *text = pattern.replace_all(text, BLACK).into_owned();
            replaced += 1;
        }
    });

    if replaced > 0 {
        debug!("Replaced currentColor in {} places", replaced);
    }
}

fn force_visible_strokes(doc: &mut SvgDocument) {
    let descendants = doc.root.descendants();
    let stroke_only = descendants
        .iter()
        .any(|el| el.attr("fill").is_some_and(|fill| fill.trim() == "none"));
    if !stroke_only {
        return;
    }
    let has_stroke_width = descendants.iter().any(|el| el.has_attr("stroke-width"));

    let mut width_added = has_stroke_width;
    doc.root.visit_mut(&mut |el| {
        if el.has_attr("stroke") {
            el.set_attr("stroke", BLACK);
            if !width_added {
                el.set_attr("stroke-width", DEFAULT_STROKE_WIDTH);
                width_added = true;
            }
        }
    });
    debug!("Forced black strokes on stroke-only icon");
}

fn resolve_relative_sizes(doc: &mut SvgDocument) {
    let Some((_, _, vb_width, vb_height)) = doc.view_box_numbers() else {
        return;
    };
    let pattern = relative_length_pattern();

    doc.root.visit_mut(&mut |el| {
        for (key, replacement) in [("width", vb_width), ("height", vb_height)] {
            if el.attr(key).is_some_and(|value| pattern.is_match(value)) {
                el.set_attr(key, format_number(replacement));
            }
        }
    });
}

fn format_number(value: f64) -> String {
    format!("{}", value)
}
