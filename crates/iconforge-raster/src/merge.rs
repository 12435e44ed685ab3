//! Multi-path document assembly
//!
//! Canvas metadata is captured from the first traced component and reused for
//! the whole document. Later components whose canvas differs are logged and
//! recorded rather than silently folded in.

use crate::tracer::TracedPath;
use iconforge_svg::{CanvasMeta, Element, SvgDocument, SVG_NAMESPACE};
use tracing::warn;

const XML_DECLARATION: &str = r#"<?xml version="1.0" standalone="no"?>"#;

/// One filled path per traced sub-path, under a shared transform group
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergedIconDocument {
    pub canvas: CanvasMeta,
    /// Path data in component-processing order
    pub paths: Vec<String>,
    /// Components whose canvas disagreed with the captured one
    pub canvas_mismatches: Vec<u32>,
}

impl MergedIconDocument {
    /// Merge traced components in order
    pub fn merge(traced: Vec<TracedPath>) -> Self {
        let mut merged = Self::default();
        let mut captured: Option<CanvasMeta> = None;

        for component in traced {
            if let Some(canvas) = &captured {
                if *canvas != component.canvas {
                    warn!(
                        "Component {} canvas differs from captured canvas ({} {} {} vs {} {} {})",
                        component.component,
                        component.canvas.width,
                        component.canvas.height,
                        component.canvas.view_box,
                        canvas.width,
                        canvas.height,
                        canvas.view_box
                    );
                    merged.canvas_mismatches.push(component.component);
                }
            } else {
                captured = Some(component.canvas.clone());
            }
            merged.paths.extend(component.paths);
        }

        merged.canvas = captured.unwrap_or_default();
        merged
    }

    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    pub fn to_document(&self) -> SvgDocument {
        let mut group = Element::new("g");
        if let Some(transform) = &self.canvas.transform {
            group.set_attr("transform", transform.as_str());
        }
        for d in &self.paths {
            group.push(
                Element::new("path")
                    .with_attr("d", d.as_str())
                    .with_attr("fill", "#000000")
                    .with_attr("stroke", "none"),
            );
        }

        SvgDocument::new(
            Element::new("svg")
                .with_attr("version", "1.0")
                .with_attr("xmlns", SVG_NAMESPACE)
                .with_attr("width", self.canvas.width.as_str())
                .with_attr("height", self.canvas.height.as_str())
                .with_attr("viewBox", self.canvas.view_box.as_str())
                .with_attr("preserveAspectRatio", "xMidYMid meet")
                .with_child(group),
        )
    }

    /// Serialize as a standalone SVG file
    pub fn to_svg(&self) -> String {
        self.to_document().to_markup_with_declaration(XML_DECLARATION)
    }
}
