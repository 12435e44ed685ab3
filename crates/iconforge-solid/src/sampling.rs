//! Length-uniform path sampling
//!
//! A path is evaluated at `N` points spread evenly over its total length.
//! Each point belongs to the subpath of the segment it falls in, so a path
//! with several subpaths yields several rings.

use iconforge_svg::{PathData, Segment};
use lyon::geom::Point;

/// A closed ring of sampled points; the last point repeats the first
pub type Ring = Vec<Point<f64>>;

/// Minimum points in a closed ring, closing vertex included
pub const MIN_RING_POINTS: usize = 4;

struct Span<'a> {
    subpath: usize,
    segment: &'a Segment,
    start: f64,
    length: f64,
}

/// Sample `samples` points and group them by subpath, in subpath order
///
/// Subpaths that receive no samples are returned as empty groups.
pub fn sample_by_subpath(path: &PathData, samples: usize) -> Vec<Vec<Point<f64>>> {
    let mut groups = vec![Vec::new(); path.subpaths.len()];

    let mut spans = Vec::new();
    let mut total = 0.0;
    for (index, subpath) in path.subpaths.iter().enumerate() {
        for segment in &subpath.segments {
            let length = segment.length();
            if length > 0.0 {
                spans.push(Span {
                    subpath: index,
                    segment,
                    start: total,
                    length,
                });
                total += length;
            }
        }
    }
    if spans.is_empty() || samples == 0 {
        return groups;
    }

    let mut cursor = 0;
    for i in 0..samples {
        let s = total * i as f64 / samples as f64;
        while cursor + 1 < spans.len() && s >= spans[cursor].start + spans[cursor].length {
            cursor += 1;
        }
        let span = &spans[cursor];
        let local = ((s - span.start) / span.length).clamp(0.0, 1.0);
        groups[span.subpath].push(span.segment.sample(local));
    }
    groups
}

/// All sampled points, regardless of subpath
pub fn sample_points(path: &PathData, samples: usize) -> Vec<Point<f64>> {
    sample_by_subpath(path, samples).into_iter().flatten().collect()
}

/// Closed rings with at least [`MIN_RING_POINTS`] points
pub fn sample_rings(path: &PathData, samples: usize) -> Vec<Ring> {
    sample_by_subpath(path, samples)
        .into_iter()
        .filter_map(close_ring)
        .collect()
}

/// Close a point run explicitly; `None` when too short to enclose anything
pub fn close_ring(mut points: Vec<Point<f64>>) -> Option<Ring> {
    if let (Some(first), Some(last)) = (points.first().copied(), points.last().copied()) {
        if first != last {
            points.push(first);
        }
    }
    (points.len() >= MIN_RING_POINTS).then_some(points)
}
