//! Topology resolver: merges points joined by wires or closed switches into
//! node-equivalence classes.

use crate::circuit::{CircuitTopology, ClassId, GridPoint};

/// Disjoint-set forest over dense indices, with path halving and union by
/// rank.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    /// Create `n` singleton sets.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    /// Find the representative of `x`.
    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merge the sets containing `a` and `b`. Returns false if they were
    /// already merged.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }

    /// Check whether `a` and `b` are in the same set.
    pub fn connected(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }
}

/// The partition of every referenced point into node classes.
///
/// Class ids are dense (`0..num_classes`) and numbered by the smallest point
/// of each class, so the same topology always yields the same ids.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeClasses {
    /// Every referenced point, sorted
    points: Vec<GridPoint>,
    /// Class of `points[i]`
    class_of: Vec<ClassId>,
    num_classes: usize,
}

impl NodeClasses {
    /// Resolve the node classes of a topology.
    ///
    /// Wires and closed switches merge their endpoints. Resistors,
    /// lightbulbs, batteries and open switches never do, but their terminals
    /// are still points (a lone terminal is its own class).
    pub fn build(topology: &CircuitTopology) -> Self {
        let points: Vec<GridPoint> = topology.points().into_iter().collect();
        let index = |p: GridPoint| points.binary_search(&p).ok();

        let mut uf = UnionFind::new(points.len());
        let links = topology
            .wires()
            .iter()
            .map(|w| w.endpoints())
            .chain(topology.switches().iter().filter(|s| s.closed).map(|s| (s.a, s.b)));
        for (p, q) in links {
            if let (Some(i), Some(j)) = (index(p), index(q)) {
                uf.union(i, j);
            }
        }

        let mut root_class: Vec<Option<ClassId>> = vec![None; points.len()];
        let mut class_of = Vec::with_capacity(points.len());
        let mut num_classes = 0;
        for i in 0..points.len() {
            let root = uf.find(i);
            let class = *root_class[root].get_or_insert_with(|| {
                num_classes += 1;
                ClassId(num_classes - 1)
            });
            class_of.push(class);
        }

        Self {
            points,
            class_of,
            num_classes,
        }
    }

    /// The class holding `p`, or `None` if nothing references `p`.
    pub fn resolve(&self, p: GridPoint) -> Option<ClassId> {
        self.points.binary_search(&p).ok().map(|i| self.class_of[i])
    }

    /// Check whether two points share a class.
    pub fn same_class(&self, a: GridPoint, b: GridPoint) -> bool {
        match (self.resolve(a), self.resolve(b)) {
            (Some(ca), Some(cb)) => ca == cb,
            _ => false,
        }
    }

    /// Number of classes.
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Number of referenced points.
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Check whether no point is referenced.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate over `(point, class)` pairs in point order.
    pub fn iter(&self) -> impl Iterator<Item = (GridPoint, ClassId)> + '_ {
        self.points.iter().copied().zip(self.class_of.iter().copied())
    }

    /// Points of one class, sorted.
    pub fn members(&self, class: ClassId) -> Vec<GridPoint> {
        self.iter().filter(|&(_, c)| c == class).map(|(p, _)| p).collect()
    }
}
