//! Dominant-shape selection
//!
//! Icons often carry stray dots, frames and decorations that should not be
//! extruded. Paths are ranked by the bounding-box area of a coarse sampling
//! and only the largest survives.

use crate::polygon::Bounds;
use crate::sampling::sample_points;
use iconforge_svg::{Element, PathData, SvgDocument};
use tracing::{debug, info};

/// Bounding-box area of path data; `None` when it cannot be sampled
pub fn bbox_area(d: &str, samples: usize) -> Option<f64> {
    let path = PathData::parse(d).ok()?;
    let points = sample_points(&path, samples);
    Bounds::of_points(&points).map(|b| b.area())
}

/// Keep only the path with the largest bounding-box area
///
/// With fewer than two candidate paths the document is returned unchanged,
/// which makes the selection idempotent.
pub fn keep_dominant_path(doc: &SvgDocument, samples: usize) -> SvgDocument {
    let mut best: Option<(f64, &Element)> = None;
    let mut candidates = 0;

    for element in doc.paths() {
        let Some(d) = element.attr("d").map(str::trim).filter(|d| !d.is_empty()) else {
            continue;
        };
        match bbox_area(d, samples) {
            Some(area) if area > 0.0 => {
                candidates += 1;
                if best.map_or(true, |(best_area, _)| area > best_area) {
                    best = Some((area, element));
                }
            }
            _ => debug!("Skipping path without area: {:.40}", d),
        }
    }

    match best {
        Some((area, winner)) if candidates >= 2 => {
            info!(
                "Keeping largest of {} paths (bbox area {:.2})",
                candidates, area
            );
            let mut kept = doc.with_same_canvas();
            let mut path = Element::new("path");
            path.attributes = winner.attributes.clone();
            kept.root.push(path);
            kept
        }
        _ => doc.clone(),
    }
}
