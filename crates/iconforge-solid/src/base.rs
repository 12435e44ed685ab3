//! Base contour construction
//!
//! The base is the outer contour of the main shape with every hole filled
//! (an "O" becomes a disk), grown outward by a caller-chosen distance.

use crate::polygon::{signed_area, Polygon, PolygonShape};
use crate::sampling::{close_ring, Ring};
use cavalier_contours::polyline::{PlineSource, PlineSourceMut, PlineVertex, Polyline};
use iconforge_core::GeometryError;
use iconforge_settings::GeometrySettings;
use iconforge_svg::{Element, SvgDocument};
use lyon::geom::{point, Point};
use std::f64::consts::FRAC_PI_2;
use std::panic;
use tracing::{debug, warn};

/// Consecutive vertices closer than this are merged before offsetting
const VERTEX_TOLERANCE: f64 = 1e-5;

/// A filled base outline and the measurements derived from it
#[derive(Debug, Clone, PartialEq)]
pub struct BaseContour {
    /// Standalone document holding only the base outline
    pub document: SvgDocument,
    /// The closed outline ring
    pub ring: Ring,
    /// Area centroid of the outline
    pub centroid: Point<f64>,
    /// Bounding-box width of the outline, 1.0 when degenerate
    pub width: f64,
}

impl BaseContour {
    /// Path data of the outline (`M x,y L x,y ... Z`)
    pub fn path_data(&self) -> String {
        ring_to_path_data(&self.ring)
    }
}

/// First path element with non-empty data
fn first_path_data(doc: &SvgDocument) -> Option<&str> {
    doc.path_data().into_iter().next().map(str::trim)
}

/// Build the base outline of a document's main shape
pub fn build_base(
    doc: &SvgDocument,
    offset: f64,
    settings: &GeometrySettings,
) -> Result<BaseContour, GeometryError> {
    let d = first_path_data(doc).ok_or(GeometryError::NoPath)?;
    let shape = PolygonShape::from_path_data(d, settings.fine_samples)?;
    let exterior = shape.largest().exterior_only();

    let outline = if offset > 0.0 {
        let grown = offset_outward(&exterior.exterior, offset, settings.arc_segments_per_quadrant);
        match grown
            .into_iter()
            .max_by(|a, b| signed_area(a).abs().total_cmp(&signed_area(b).abs()))
        {
            Some(ring) => ring,
            None => {
                warn!("Offset of {} produced no outline, using the exterior", offset);
                exterior.exterior
            }
        }
    } else {
        exterior.exterior
    };

    if outline.len() < 2 {
        return Err(GeometryError::Degenerate {
            reason: "outline has fewer than two vertices".to_string(),
        });
    }

    let polygon = Polygon::new(outline);
    let centroid = polygon.centroid();
    let width = polygon
        .bounds()
        .map(|b| b.width())
        .filter(|w| *w > 0.0)
        .unwrap_or(1.0);

    let mut document = doc.with_same_canvas();
    document.root.push(
        Element::new("path")
            .with_attr("d", ring_to_path_data(&polygon.exterior))
            .with_attr("fill", "#000000"),
    );
    debug!(
        "Base outline: {} vertices, centroid ({:.3}, {:.3}), width {:.3}",
        polygon.exterior.len(),
        centroid.x,
        centroid.y,
        width
    );

    Ok(BaseContour {
        document,
        ring: polygon.exterior,
        centroid,
        width,
    })
}

/// Serialize a closed ring, closing vertex included
pub fn ring_to_path_data(ring: &[Point<f64>]) -> String {
    let mut parts = Vec::with_capacity(ring.len() + 1);
    for (i, p) in ring.iter().enumerate() {
        let cmd = if i == 0 { "M" } else { "L" };
        parts.push(format!("{} {},{}", cmd, p.x, p.y));
    }
    parts.push("Z".to_string());
    parts.join(" ")
}

/// Grow a ring outward; arcs in the result are flattened
pub fn offset_outward(ring: &[Point<f64>], distance: f64, arc_segments: usize) -> Vec<Ring> {
    let pline = ring_to_polyline(ring);
    if pline.vertex_count() < 3 {
        return Vec::new();
    }

    // Counter-clockwise input: negative offsets move outward
    let offsets = match panic::catch_unwind(panic::AssertUnwindSafe(|| {
        pline.parallel_offset(-distance)
    })) {
        Ok(offsets) => offsets,
        Err(_) => {
            warn!("Panic during parallel offset of base outline");
            return Vec::new();
        }
    };

    offsets
        .iter()
        .filter_map(|p| close_ring(flatten_polyline(p, arc_segments)))
        .collect()
}

fn ring_to_polyline(ring: &[Point<f64>]) -> Polyline<f64> {
    let mut vertices: Vec<Point<f64>> = Vec::with_capacity(ring.len());
    for p in ring {
        if let Some(last) = vertices.last() {
            if (p.x - last.x).hypot(p.y - last.y) < VERTEX_TOLERANCE {
                continue;
            }
        }
        vertices.push(*p);
    }
    if vertices.len() > 1 {
        let (first, last) = (vertices[0], vertices[vertices.len() - 1]);
        if (first.x - last.x).hypot(first.y - last.y) < VERTEX_TOLERANCE {
            vertices.pop();
        }
    }
    if signed_area(&vertices) < 0.0 {
        vertices.reverse();
    }

    let mut pline = Polyline::new();
    for p in vertices {
        pline.add_vertex(PlineVertex::new(p.x, p.y, 0.0));
    }
    pline.set_is_closed(true);
    pline
}

/// Vertices of a closed polyline with bulge arcs split into chords
fn flatten_polyline(pline: &Polyline<f64>, segments_per_quadrant: usize) -> Vec<Point<f64>> {
    let count = pline.vertex_count();
    let mut points = Vec::with_capacity(count);
    for i in 0..count {
        let v1 = pline.at(i);
        let v2 = pline.at((i + 1) % count);
        let start = point(v1.x, v1.y);
        points.push(start);
        if v1.bulge.abs() > VERTEX_TOLERANCE {
            points.extend(arc_points(start, point(v2.x, v2.y), v1.bulge, segments_per_quadrant));
        }
    }
    points
}

/// Interior points of a bulge arc, endpoints excluded
fn arc_points(
    from: Point<f64>,
    to: Point<f64>,
    bulge: f64,
    segments_per_quadrant: usize,
) -> Vec<Point<f64>> {
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let chord = dx.hypot(dy);
    if chord < VERTEX_TOLERANCE {
        return Vec::new();
    }

    let sweep = 4.0 * bulge.atan();
    // Signed distance from chord midpoint to the center, along the left normal
    let offset = chord * (1.0 - bulge * bulge) / (4.0 * bulge);
    let center = point(
        (from.x + to.x) / 2.0 - dy / chord * offset,
        (from.y + to.y) / 2.0 + dx / chord * offset,
    );
    let radius = (from.x - center.x).hypot(from.y - center.y);
    let start_angle = (from.y - center.y).atan2(from.x - center.x);

    let steps = ((sweep.abs() / FRAC_PI_2) * segments_per_quadrant.max(1) as f64).ceil() as usize;
    (1..steps)
        .map(|k| {
            let angle = start_angle + sweep * k as f64 / steps as f64;
            point(center.x + radius * angle.cos(), center.y + radius * angle.sin())
        })
        .collect()
}
