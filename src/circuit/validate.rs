//! Structural validation of a resolved circuit.

use tracing::warn;

use super::types::{ClassId, GridPoint};
use super::CircuitTopology;
use crate::error::SolveError;
use crate::solver::{NodeClasses, UnionFind};

/// Reject circuits whose MNA system cannot have a meaningful unique solution.
///
/// Checks, in order:
/// - no battery is shorted by wires or closed switches
/// - every node class has a path to ground through components
/// - every battery has a return path that does not run through itself
///
/// A circuit that passes can still be numerically singular (two ideal
/// batteries in parallel, for example); the LU factorization catches those.
pub fn validate_classes(
    topology: &CircuitTopology,
    classes: &NodeClasses,
    ground: ClassId,
) -> Result<(), SolveError> {
    let resolve = |a: GridPoint, b: GridPoint| classes.resolve(a).zip(classes.resolve(b));

    let resistive: Vec<(ClassId, ClassId)> = topology
        .resistors()
        .iter()
        .map(|r| (r.a, r.b))
        .chain(topology.lightbulbs().iter().map(|lb| (lb.a, lb.b)))
        .filter_map(|(a, b)| resolve(a, b))
        .filter(|(ca, cb)| ca != cb)
        .collect();
    let sources: Vec<(ClassId, ClassId)> = topology
        .batteries()
        .iter()
        .filter_map(|b| resolve(b.plus, b.minus))
        .collect();

    for (battery, &(p, m)) in topology.batteries().iter().zip(&sources) {
        if p == m {
            warn!(
                plus = %battery.plus,
                minus = %battery.minus,
                "battery shorted by a zero-resistance loop"
            );
            return Err(SolveError::SingularSystem);
        }
    }

    let mut all = UnionFind::new(classes.num_classes());
    for &(a, b) in resistive.iter().chain(&sources) {
        all.union(a.0, b.0);
    }
    if let Some((point, _)) = classes.iter().find(|&(_, c)| !all.connected(c.0, ground.0)) {
        warn!(%point, "floating section has no path to ground");
        return Err(SolveError::SingularSystem);
    }

    for (k, (battery, &(p, m))) in topology.batteries().iter().zip(&sources).enumerate() {
        let mut others = UnionFind::new(classes.num_classes());
        let other_sources = sources
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != k)
            .map(|(_, edge)| edge);
        for &(a, b) in resistive.iter().chain(other_sources) {
            others.union(a.0, b.0);
        }
        if !others.connected(p.0, m.0) {
            warn!(plus = %battery.plus, minus = %battery.minus, "battery has no return path");
            return Err(SolveError::SingularSystem);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: i32, y: i32) -> GridPoint {
        GridPoint::new(x, y)
    }

    fn check(t: &CircuitTopology) -> Result<(), SolveError> {
        let classes = NodeClasses::build(t);
        let ground = classes.resolve(t.batteries()[0].minus).unwrap();
        validate_classes(t, &classes, ground)
    }

    #[test]
    fn test_closed_loop_passes() {
        let mut t = CircuitTopology::new();
        t.add_battery(pt(0, 0), pt(0, 2), 9.0).unwrap();
        t.add_resistor(pt(0, 0), pt(0, 2), 100.0).unwrap();
        assert_eq!(check(&t), Ok(()));
    }

    #[test]
    fn test_shorted_battery() {
        let mut t = CircuitTopology::new();
        t.add_battery(pt(0, 0), pt(0, 2), 9.0).unwrap();
        t.add_wire_path(pt(0, 0), pt(0, 2)).unwrap();
        assert_eq!(check(&t), Err(SolveError::SingularSystem));
    }

    #[test]
    fn test_floating_section() {
        let mut t = CircuitTopology::new();
        t.add_battery(pt(0, 0), pt(0, 2), 9.0).unwrap();
        t.add_resistor(pt(0, 0), pt(0, 2), 100.0).unwrap();
        t.add_resistor(pt(5, 0), pt(5, 2), 100.0).unwrap();
        assert_eq!(check(&t), Err(SolveError::SingularSystem));
    }

    #[test]
    fn test_open_battery() {
        let mut t = CircuitTopology::new();
        t.add_battery(pt(0, 0), pt(0, 2), 9.0).unwrap();
        t.add_resistor(pt(0, 0), pt(2, 0), 100.0).unwrap();
        assert_eq!(check(&t), Err(SolveError::SingularSystem));
    }
}
