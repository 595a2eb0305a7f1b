//! Mapping the solved unknown vector back onto the grid.

use std::collections::BTreeMap;

use super::failure::BulbReading;
use super::mna::{MnaLayout, MnaMatrix};
use super::union_find::NodeClasses;
use crate::circuit::{CircuitTopology, ClassId, ComponentId, GridPoint, Wire};

/// A complete DC solution.
///
/// Produced wholesale by every successful solve; nothing in it is updated
/// incrementally.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveResult {
    /// Voltage of every node class (ground is 0)
    pub node_voltage: BTreeMap<ClassId, f64>,
    /// Voltage of every referenced point
    pub point_voltage: BTreeMap<GridPoint, f64>,
    /// Signed current from terminal `a` to `b` of each resistor
    pub resistor_current: BTreeMap<ComponentId, f64>,
    /// Power dissipated by each resistor
    pub resistor_power: BTreeMap<ComponentId, f64>,
    /// Branch current of each battery
    pub battery_current: BTreeMap<ComponentId, f64>,
    /// Current, power, brightness and fire state of each lightbulb
    pub lightbulbs: BTreeMap<ComponentId, BulbReading>,
    /// Display current of each wire, flowing from its first endpoint
    pub wire_current: BTreeMap<Wire, f64>,
    /// The point whose class was fixed at 0 V
    pub ground_point: GridPoint,
}

impl SolveResult {
    /// Voltage at a point, if the point is part of the circuit.
    pub fn voltage_at(&self, p: GridPoint) -> Option<f64> {
        self.point_voltage.get(&p).copied()
    }

    /// Display current of the wire between two points.
    pub fn wire_current_between(&self, p: GridPoint, q: GridPoint) -> Option<f64> {
        self.wire_current.get(&Wire::new(p, q)).copied()
    }

    /// Current through a resistor, lightbulb or battery.
    pub fn component_current(&self, id: ComponentId) -> Option<f64> {
        self.resistor_current
            .get(&id)
            .or_else(|| self.battery_current.get(&id))
            .copied()
            .or_else(|| self.lightbulbs.get(&id).map(|lb| lb.current))
    }
}

/// Build the result bundle from a solved system.
pub fn map_results(
    topology: &CircuitTopology,
    classes: &NodeClasses,
    layout: &MnaLayout,
    matrix: &MnaMatrix,
    ground_point: GridPoint,
) -> SolveResult {
    let node_voltage: BTreeMap<ClassId, f64> = (0..classes.num_classes())
        .map(ClassId)
        .map(|c| (c, matrix.voltage(layout.node_index(c))))
        .collect();

    let point_voltage: BTreeMap<GridPoint, f64> = classes
        .iter()
        .map(|(p, c)| (p, node_voltage[&c]))
        .collect();
    let v = |p: GridPoint| point_voltage.get(&p).copied().unwrap_or(0.0);

    let mut resistor_current = BTreeMap::new();
    let mut resistor_power = BTreeMap::new();
    for r in topology.resistors() {
        let (va, vb) = (v(r.a), v(r.b));
        let i = r.current(va, vb);
        resistor_current.insert(r.id, i);
        resistor_power.insert(r.id, (i * (va - vb)).abs());
    }

    let lightbulbs: BTreeMap<ComponentId, BulbReading> = topology
        .lightbulbs()
        .iter()
        .map(|lb| {
            let (va, vb) = (v(lb.a), v(lb.b));
            let i = lb.current(va, vb);
            (lb.id, BulbReading::classify(i, (i * (va - vb)).abs()))
        })
        .collect();

    let battery_current: BTreeMap<ComponentId, f64> = topology
        .batteries()
        .iter()
        .enumerate()
        .map(|(k, b)| (b.id, matrix.x[layout.branch_index(k)]))
        .collect();

    let wire_current = topology
        .wires()
        .iter()
        .map(|w| {
            (
                *w,
                terminal_balance(topology, w.a(), &resistor_current, &lightbulbs, &battery_current),
            )
        })
        .collect();

    SolveResult {
        node_voltage,
        point_voltage,
        resistor_current,
        resistor_power,
        battery_current,
        lightbulbs,
        wire_current,
        ground_point,
    }
}

/// Signed sum of the component currents attached directly to point `p`.
///
/// Two-terminal elements count `+I` at terminal `a` and `-I` at `b`;
/// batteries count `+I` at `plus` and `-I` at `minus`. Only terminals sitting
/// exactly on `p` contribute, so this is a local indicator for drawing, not
/// the full current of the node.
fn terminal_balance(
    topology: &CircuitTopology,
    p: GridPoint,
    resistor_current: &BTreeMap<ComponentId, f64>,
    lightbulbs: &BTreeMap<ComponentId, BulbReading>,
    battery_current: &BTreeMap<ComponentId, f64>,
) -> f64 {
    let signed = |a: GridPoint, b: GridPoint, i: f64| {
        if a == p {
            i
        } else if b == p {
            -i
        } else {
            0.0
        }
    };

    let resistors: f64 = topology
        .resistors()
        .iter()
        .map(|r| signed(r.a, r.b, resistor_current[&r.id]))
        .sum();
    let bulbs: f64 = topology
        .lightbulbs()
        .iter()
        .map(|lb| signed(lb.a, lb.b, lightbulbs[&lb.id].current))
        .sum();
    let batteries: f64 = topology
        .batteries()
        .iter()
        .map(|b| signed(b.plus, b.minus, battery_current[&b.id]))
        .sum();

    resistors + bulbs + batteries
}
