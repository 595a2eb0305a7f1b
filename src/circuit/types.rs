//! Core types for circuit representation.

use std::fmt;

use serde::Serialize;

/// An integer grid coordinate.
///
/// Points have no lifecycle of their own: a point exists as soon as a wire or
/// a component terminal references it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    /// Create a new point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The Manhattan neighbours, in the order +x, -x, +y, -y.
    ///
    /// Neighbours that would fall outside the `i32` range are skipped.
    pub fn neighbours(&self) -> impl Iterator<Item = GridPoint> {
        let p = *self;
        [(1, 0), (-1, 0), (0, 1), (0, -1)]
            .into_iter()
            .filter_map(move |(dx, dy)| p.checked_offset(dx, dy))
    }

    /// Offset this point by (dx, dy), or `None` on coordinate overflow.
    pub fn checked_offset(&self, dx: i32, dy: i32) -> Option<Self> {
        Some(GridPoint::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }

    /// Number of unit steps on a Manhattan route to `other`.
    pub fn manhattan_distance(&self, other: GridPoint) -> u64 {
        let dx = (i64::from(self.x) - i64::from(other.x)).unsigned_abs();
        let dy = (i64::from(self.y) - i64::from(other.y)).unsigned_abs();
        dx + dy
    }
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A zero-resistance link between two points.
///
/// The endpoints are stored in canonical order (smaller point first), so
/// `Wire::new(a, b) == Wire::new(b, a)`. Adjacency is not required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Wire {
    a: GridPoint,
    b: GridPoint,
}

impl Wire {
    /// Create a canonical wire between two points.
    pub fn new(p: GridPoint, q: GridPoint) -> Self {
        if p <= q {
            Self { a: p, b: q }
        } else {
            Self { a: q, b: p }
        }
    }

    /// The canonical first endpoint.
    pub fn a(&self) -> GridPoint {
        self.a
    }

    /// The canonical second endpoint.
    pub fn b(&self) -> GridPoint {
        self.b
    }

    /// Both endpoints as a tuple.
    pub fn endpoints(&self) -> (GridPoint, GridPoint) {
        (self.a, self.b)
    }
}

impl fmt::Display for Wire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.a, self.b)
    }
}

/// A unique identifier for a component in the circuit.
///
/// Ids are handed out in creation order and never reused, so comparing ids
/// compares creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ComponentId(pub usize);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

/// Identifier of a node-equivalence class produced by the topology resolver.
///
/// Only the partition is meaningful; the raw number carries no physical
/// information and may change whenever the topology changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ClassId(pub usize);

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_is_unordered() {
        let p = GridPoint::new(3, 1);
        let q = GridPoint::new(2, 5);
        assert_eq!(Wire::new(p, q), Wire::new(q, p));
        assert_eq!(Wire::new(p, q).a(), q);
    }

    #[test]
    fn test_neighbours_order() {
        let n: Vec<_> = GridPoint::new(0, 0).neighbours().collect();
        assert_eq!(n.len(), 4);
        assert_eq!(n[0], GridPoint::new(1, 0));
        assert_eq!(n[3], GridPoint::new(0, -1));
    }

    #[test]
    fn test_neighbours_at_coordinate_limits() {
        let n: Vec<_> = GridPoint::new(i32::MAX, i32::MIN).neighbours().collect();
        let expected = vec![
            GridPoint::new(i32::MAX - 1, i32::MIN),
            GridPoint::new(i32::MAX, i32::MIN + 1),
        ];
        assert_eq!(n, expected);
    }

    #[test]
    fn test_manhattan_distance() {
        let p = GridPoint::new(-2, 3);
        assert_eq!(p.manhattan_distance(GridPoint::new(1, -1)), 7);
        let far = GridPoint::new(i32::MIN, i32::MIN);
        let distance = far.manhattan_distance(GridPoint::new(i32::MAX, i32::MAX));
        assert_eq!(distance, 2 * u64::from(u32::MAX));
    }
}
