//! Polygon shapes built from sampled rings
//!
//! Rings are nested by even-odd containment: a ring enclosed by an even
//! number of larger rings is an exterior, a ring enclosed by an odd number is
//! a hole of its innermost enclosing exterior. Rings that cross themselves
//! are first split into simple loops at each crossing, so a bowtie becomes
//! two triangles. This repairs self-overlapping or inconsistently wound icon
//! paths on a best-effort basis.

use crate::sampling::{close_ring, sample_rings, Ring};
use iconforge_core::GeometryError;
use iconforge_svg::PathData;
use lyon::geom::{point, LineSegment, Point};

/// Edge parameters this close to an end are a touch, not a crossing
const CROSSING_MARGIN: f64 = 1e-9;

/// Axis-aligned bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Bounds of a point set, `None` when empty
    pub fn of_points<'a>(points: impl IntoIterator<Item = &'a Point<f64>>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Bounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for p in iter {
            bounds.min_x = bounds.min_x.min(p.x);
            bounds.min_y = bounds.min_y.min(p.y);
            bounds.max_x = bounds.max_x.max(p.x);
            bounds.max_y = bounds.max_y.max(p.y);
        }
        Some(bounds)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// Shoelace area, positive for counter-clockwise rings in a y-up frame
pub fn signed_area(ring: &[Point<f64>]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

/// Area centroid of a ring; the vertex mean when the ring has no area
pub fn ring_centroid(ring: &[Point<f64>]) -> Point<f64> {
    let area = signed_area(ring);
    if area.abs() < f64::EPSILON {
        let n = ring.len().max(1) as f64;
        let (sx, sy) = ring.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        return point(sx / n, sy / n);
    }
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        let cross = a.x * b.y - b.x * a.y;
        cx += (a.x + b.x) * cross;
        cy += (a.y + b.y) * cross;
    }
    point(cx / (6.0 * area), cy / (6.0 * area))
}

/// Even-odd point-in-ring test
pub fn ring_contains(ring: &[Point<f64>], p: Point<f64>) -> bool {
    let mut inside = false;
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// First crossing between two non-adjacent edges of a closed ring
fn first_crossing(ring: &[Point<f64>]) -> Option<(usize, usize, Point<f64>)> {
    let edges = ring.len().saturating_sub(1);
    let interior = CROSSING_MARGIN..=1.0 - CROSSING_MARGIN;
    for i in 0..edges {
        let a = LineSegment {
            from: ring[i],
            to: ring[i + 1],
        };
        for j in (i + 2)..edges {
            // First and last edge share the closing vertex
            if i == 0 && j == edges - 1 {
                continue;
            }
            let b = LineSegment {
                from: ring[j],
                to: ring[j + 1],
            };
            if let Some((t, u)) = a.intersection_t(&b) {
                if interior.contains(&t) && interior.contains(&u) {
                    return Some((i, j, a.sample(t)));
                }
            }
        }
    }
    None
}

/// Split a closed ring into loops that do not cross themselves
///
/// Each crossing of edges `i` and `j` cuts the ring into the loop between
/// them and the loop around the rest. Every loop starts at one of the
/// original vertices, never at a crossing point.
pub fn split_self_crossings(ring: Ring) -> Vec<Ring> {
    let mut pending = vec![ring];
    let mut simple = Vec::new();
    while let Some(ring) = pending.pop() {
        let Some((i, j, crossing)) = first_crossing(&ring) else {
            simple.push(ring);
            continue;
        };
        let mut inner = ring[i + 1..=j].to_vec();
        inner.push(crossing);
        let mut outer = ring[j + 1..].to_vec();
        outer.extend_from_slice(&ring[1..=i]);
        outer.push(crossing);
        pending.extend([inner, outer].into_iter().filter_map(close_ring));
    }
    simple
}

/// An exterior ring with zero or more holes
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub exterior: Ring,
    pub holes: Vec<Ring>,
}

impl Polygon {
    pub fn new(exterior: Ring) -> Self {
        Self {
            exterior,
            holes: Vec::new(),
        }
    }

    /// Enclosed area with holes subtracted
    pub fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(|h| signed_area(h).abs()).sum();
        (signed_area(&self.exterior).abs() - holes).max(0.0)
    }

    /// Area-weighted centroid with holes subtracted
    pub fn centroid(&self) -> Point<f64> {
        let outer = signed_area(&self.exterior).abs();
        let outer_c = ring_centroid(&self.exterior);
        let mut weight = outer;
        let mut cx = outer_c.x * outer;
        let mut cy = outer_c.y * outer;
        for hole in &self.holes {
            let a = signed_area(hole).abs();
            let c = ring_centroid(hole);
            weight -= a;
            cx -= c.x * a;
            cy -= c.y * a;
        }
        if weight <= f64::EPSILON {
            return outer_c;
        }
        point(cx / weight, cy / weight)
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::of_points(&self.exterior)
    }

    /// The same polygon without holes
    pub fn exterior_only(&self) -> Polygon {
        Polygon::new(self.exterior.clone())
    }
}

/// Result of repairing a set of rings
#[derive(Debug, Clone, PartialEq)]
pub enum PolygonShape {
    Single(Polygon),
    Multi(Vec<Polygon>),
}

impl PolygonShape {
    /// Nest rings into polygons; `None` when no ring encloses any area
    pub fn from_rings(rings: Vec<Ring>) -> Option<Self> {
        let mut rings: Vec<(f64, Ring)> = rings
            .into_iter()
            .flat_map(split_self_crossings)
            .map(|ring| (signed_area(&ring).abs(), ring))
            .filter(|(area, _)| *area > f64::EPSILON)
            .collect();
        rings.sort_by(|a, b| b.0.total_cmp(&a.0));

        let mut polygons: Vec<Polygon> = Vec::new();
        // Polygon index for rings that became exteriors
        let mut exterior_of: Vec<Option<usize>> = Vec::with_capacity(rings.len());

        for i in 0..rings.len() {
            let probe = rings[i].1[0];
            let mut depth = 0;
            let mut innermost_exterior = None;
            for j in 0..i {
                if ring_contains(&rings[j].1, probe) {
                    depth += 1;
                    if let Some(index) = exterior_of[j] {
                        innermost_exterior = Some(index);
                    }
                }
            }

            match innermost_exterior {
                Some(owner) if depth % 2 == 1 => {
                    polygons[owner].holes.push(rings[i].1.clone());
                    exterior_of.push(None);
                }
                _ => {
                    polygons.push(Polygon::new(rings[i].1.clone()));
                    exterior_of.push(Some(polygons.len() - 1));
                }
            }
        }

        match polygons.len() {
            0 => None,
            1 => polygons.pop().map(PolygonShape::Single),
            _ => Some(PolygonShape::Multi(polygons)),
        }
    }

    /// Sample path data into a repaired shape
    pub fn from_path_data(d: &str, samples: usize) -> Result<Self, GeometryError> {
        let path = PathData::parse(d).map_err(|_| GeometryError::UnparsablePath)?;
        Self::from_rings(sample_rings(&path, samples)).ok_or(GeometryError::UnparsablePath)
    }

    pub fn parts(&self) -> &[Polygon] {
        match self {
            PolygonShape::Single(p) => std::slice::from_ref(p),
            PolygonShape::Multi(ps) => ps,
        }
    }

    /// The part with the largest area
    pub fn largest(&self) -> &Polygon {
        match self {
            PolygonShape::Single(p) => p,
            PolygonShape::Multi(ps) => ps
                .iter()
                .fold(&ps[0], |best, p| if p.area() > best.area() { p } else { best }),
        }
    }

    pub fn area(&self) -> f64 {
        self.parts().iter().map(Polygon::area).sum()
    }

    /// Area-weighted centroid over all parts
    pub fn centroid(&self) -> Point<f64> {
        let total = self.area();
        if total <= f64::EPSILON {
            return self.largest().centroid();
        }
        let (cx, cy) = self.parts().iter().fold((0.0, 0.0), |(cx, cy), p| {
            let c = p.centroid();
            let a = p.area();
            (cx + c.x * a, cy + c.y * a)
        });
        point(cx / total, cy / total)
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.parts()
            .iter()
            .filter_map(Polygon::bounds)
            .reduce(|a, b| a.union(&b))
    }

    pub fn hole_count(&self) -> usize {
        self.parts().iter().map(|p| p.holes.len()).sum()
    }
}
