//! Editable circuit state.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::trace;

use super::types::{ComponentId, GridPoint, Wire};
use crate::components::{Battery, Component, Lightbulb, Resistor, Switch};
use crate::error::{GridError, Result};

/// Longest route, in unit wires, that [`CircuitTopology::add_wire_path`] lays.
pub const MAX_ROUTE_LENGTH: u64 = 10_000;

/// What an [`CircuitTopology::erase_at`] call removed.
#[derive(Debug, Clone, PartialEq)]
pub enum Erased {
    /// A single wire leaving the point
    Wire(Wire),
    /// Every component with a terminal on the point
    Components(Vec<ComponentId>),
}

/// The wires and components of a grid circuit.
///
/// This value is owned by the caller (the editor, the CLI, a test) and is only
/// borrowed immutably by the solver. Component lists keep creation order,
/// which matters: the first battery defines ground.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CircuitTopology {
    wires: BTreeSet<Wire>,
    resistors: Vec<Resistor>,
    batteries: Vec<Battery>,
    lightbulbs: Vec<Lightbulb>,
    switches: Vec<Switch>,
    #[serde(skip)]
    next_id: usize,
}

impl CircuitTopology {
    /// Create an empty topology.
    pub fn new() -> Self {
        Self::default()
    }

    // ============ Accessors ============

    /// All wires, in canonical order.
    pub fn wires(&self) -> &BTreeSet<Wire> {
        &self.wires
    }

    /// Resistors in creation order.
    pub fn resistors(&self) -> &[Resistor] {
        &self.resistors
    }

    /// Batteries in creation order. Index 0 defines ground.
    pub fn batteries(&self) -> &[Battery] {
        &self.batteries
    }

    /// Lightbulbs in creation order.
    pub fn lightbulbs(&self) -> &[Lightbulb] {
        &self.lightbulbs
    }

    /// Switches in creation order.
    pub fn switches(&self) -> &[Switch] {
        &self.switches
    }

    /// Check whether nothing has been placed.
    pub fn is_empty(&self) -> bool {
        self.wires.is_empty()
            && self.resistors.is_empty()
            && self.batteries.is_empty()
            && self.lightbulbs.is_empty()
            && self.switches.is_empty()
    }

    /// Every point referenced by a wire or a component terminal, sorted.
    pub fn points(&self) -> BTreeSet<GridPoint> {
        let mut pts = BTreeSet::new();
        for w in &self.wires {
            pts.insert(w.a());
            pts.insert(w.b());
        }
        for c in self.components() {
            pts.extend(c.terminals());
        }
        pts
    }

    /// All components: resistors, batteries, lightbulbs, then switches.
    pub fn components(&self) -> impl Iterator<Item = Component> + '_ {
        self.resistors
            .iter()
            .cloned()
            .map(Component::Resistor)
            .chain(self.batteries.iter().cloned().map(Component::Battery))
            .chain(self.lightbulbs.iter().cloned().map(Component::Lightbulb))
            .chain(self.switches.iter().cloned().map(Component::Switch))
    }

    /// Look up a component by id.
    pub fn component(&self, id: ComponentId) -> Option<Component> {
        self.components().find(|c| c.id() == id)
    }

    /// The first component with a terminal on `p`.
    pub fn component_at(&self, p: GridPoint) -> Option<Component> {
        self.components().find(|c| c.touches(p))
    }

    // ============ Wires ============

    /// Add a wire between two points. Returns false if it already existed or
    /// both ends are the same point.
    pub fn add_wire(&mut self, p: GridPoint, q: GridPoint) -> bool {
        if p == q {
            return false;
        }
        self.wires.insert(Wire::new(p, q))
    }

    /// Route an L-shaped Manhattan path from `from` to `to` (horizontal leg
    /// first) and add one wire per unit step. Returns the number of new wires.
    ///
    /// Routes longer than [`MAX_ROUTE_LENGTH`] are rejected without change.
    pub fn add_wire_path(&mut self, from: GridPoint, to: GridPoint) -> Result<usize> {
        let length = from.manhattan_distance(to);
        if length > MAX_ROUTE_LENGTH {
            return Err(GridError::RouteTooLong { from, to, length });
        }
        let path = manhattan_path(from, to);
        let added = path
            .windows(2)
            .filter(|pair| self.add_wire(pair[0], pair[1]))
            .count();
        trace!(%from, %to, added, "routed wire path");
        Ok(added)
    }

    /// Remove a wire. Returns false if it did not exist.
    pub fn remove_wire(&mut self, p: GridPoint, q: GridPoint) -> bool {
        self.wires.remove(&Wire::new(p, q))
    }

    // ============ Components ============

    fn next_id(&mut self) -> ComponentId {
        let id = ComponentId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Place a resistor.
    pub fn add_resistor(
        &mut self,
        a: GridPoint,
        b: GridPoint,
        ohms: f64,
    ) -> Result<ComponentId> {
        let ohms = check_resistance(ohms)?;
        let id = self.next_id();
        self.resistors.push(Resistor::new(id, a, b, ohms));
        Ok(id)
    }

    /// Place a battery.
    pub fn add_battery(
        &mut self,
        plus: GridPoint,
        minus: GridPoint,
        volts: f64,
    ) -> Result<ComponentId> {
        let volts = check_voltage(volts)?;
        let id = self.next_id();
        self.batteries.push(Battery::new(id, plus, minus, volts));
        Ok(id)
    }

    /// Place a lightbulb.
    pub fn add_lightbulb(
        &mut self,
        a: GridPoint,
        b: GridPoint,
        ohms: f64,
    ) -> Result<ComponentId> {
        let ohms = check_resistance(ohms)?;
        let id = self.next_id();
        self.lightbulbs.push(Lightbulb::new(id, a, b, ohms));
        Ok(id)
    }

    /// Place a switch.
    pub fn add_switch(&mut self, a: GridPoint, b: GridPoint, closed: bool) -> ComponentId {
        let id = self.next_id();
        self.switches.push(Switch::new(id, a, b, closed));
        id
    }

    /// Change the resistance of a resistor or lightbulb.
    pub fn set_resistance(&mut self, id: ComponentId, ohms: f64) -> Result<()> {
        let ohms = check_resistance(ohms)?;
        if let Some(r) = self.resistors.iter_mut().find(|r| r.id == id) {
            r.ohms = ohms;
            return Ok(());
        }
        if let Some(lb) = self.lightbulbs.iter_mut().find(|lb| lb.id == id) {
            lb.ohms = ohms;
            return Ok(());
        }
        Err(self.lookup_error(id, "resistor or lightbulb"))
    }

    /// Change the voltage of a battery.
    pub fn set_voltage(&mut self, id: ComponentId, volts: f64) -> Result<()> {
        let volts = check_voltage(volts)?;
        match self.batteries.iter_mut().find(|b| b.id == id) {
            Some(b) => {
                b.volts = volts;
                Ok(())
            }
            None => Err(self.lookup_error(id, "battery")),
        }
    }

    /// Flip a switch, returning its new state.
    pub fn toggle_switch(&mut self, id: ComponentId) -> Result<bool> {
        match self.switches.iter_mut().find(|s| s.id == id) {
            Some(s) => Ok(s.toggle()),
            None => Err(self.lookup_error(id, "switch")),
        }
    }

    /// Open or close a switch.
    pub fn set_switch(&mut self, id: ComponentId, closed: bool) -> Result<()> {
        match self.switches.iter_mut().find(|s| s.id == id) {
            Some(s) => {
                s.set_state(closed);
                Ok(())
            }
            None => Err(self.lookup_error(id, "switch")),
        }
    }

    /// Remove a component of any kind.
    pub fn remove_component(&mut self, id: ComponentId) -> Result<Component> {
        if let Some(i) = self.resistors.iter().position(|r| r.id == id) {
            return Ok(Component::Resistor(self.resistors.remove(i)));
        }
        if let Some(i) = self.batteries.iter().position(|b| b.id == id) {
            return Ok(Component::Battery(self.batteries.remove(i)));
        }
        if let Some(i) = self.lightbulbs.iter().position(|lb| lb.id == id) {
            return Ok(Component::Lightbulb(self.lightbulbs.remove(i)));
        }
        if let Some(i) = self.switches.iter().position(|s| s.id == id) {
            return Ok(Component::Switch(self.switches.remove(i)));
        }
        Err(GridError::ComponentNotFound { id })
    }

    /// The eraser tool.
    ///
    /// A wire from `p` to one of its Manhattan neighbours is removed first,
    /// one wire per call. Only when no such wire exists are the components
    /// touching `p` removed, all at once.
    pub fn erase_at(&mut self, p: GridPoint) -> Erased {
        for q in p.neighbours() {
            let wire = Wire::new(p, q);
            if self.wires.remove(&wire) {
                return Erased::Wire(wire);
            }
        }

        let mut removed = Vec::new();
        self.resistors
            .retain(|r| keep_unless_touching(r.id, [r.a, r.b], p, &mut removed));
        self.batteries
            .retain(|b| keep_unless_touching(b.id, [b.plus, b.minus], p, &mut removed));
        self.lightbulbs
            .retain(|lb| keep_unless_touching(lb.id, [lb.a, lb.b], p, &mut removed));
        self.switches
            .retain(|s| keep_unless_touching(s.id, [s.a, s.b], p, &mut removed));
        Erased::Components(removed)
    }

    /// Remove everything. Ids keep counting up.
    pub fn clear(&mut self) {
        self.wires.clear();
        self.resistors.clear();
        self.batteries.clear();
        self.lightbulbs.clear();
        self.switches.clear();
    }

    fn lookup_error(&self, id: ComponentId, expected: &'static str) -> GridError {
        if self.component(id).is_some() {
            GridError::WrongComponentKind { id, expected }
        } else {
            GridError::ComponentNotFound { id }
        }
    }
}

fn keep_unless_touching(
    id: ComponentId,
    terminals: [GridPoint; 2],
    p: GridPoint,
    removed: &mut Vec<ComponentId>,
) -> bool {
    if terminals.contains(&p) {
        removed.push(id);
        false
    } else {
        true
    }
}

/// L-shaped grid path: x first along `from.y`, then y along `to.x`.
///
/// Holds one point per unit step; callers bound the length first.
pub fn manhattan_path(from: GridPoint, to: GridPoint) -> Vec<GridPoint> {
    let step_x = if to.x >= from.x { 1 } else { -1 };
    let step_y = if to.y >= from.y { 1 } else { -1 };

    let mut path = Vec::new();
    let mut x = from.x;
    loop {
        path.push(GridPoint::new(x, from.y));
        if x == to.x {
            break;
        }
        x += step_x;
    }
    let mut y = from.y;
    while y != to.y {
        y += step_y;
        path.push(GridPoint::new(to.x, y));
    }
    path
}

fn check_resistance(ohms: f64) -> Result<f64> {
    if !ohms.is_finite() {
        return Err(GridError::InvalidValue {
            quantity: "resistance",
            value: ohms,
            message: "must be finite",
        });
    }
    if ohms <= 0.0 {
        return Err(GridError::InvalidValue {
            quantity: "resistance",
            value: ohms,
            message: "must be greater than zero",
        });
    }
    Ok(ohms)
}

fn check_voltage(volts: f64) -> Result<f64> {
    if !volts.is_finite() {
        return Err(GridError::InvalidValue {
            quantity: "voltage",
            value: volts,
            message: "must be finite",
        });
    }
    Ok(volts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: i32, y: i32) -> GridPoint {
        GridPoint::new(x, y)
    }

    #[test]
    fn test_manhattan_path_horizontal_first() {
        let path = manhattan_path(pt(0, 0), pt(2, -1));
        assert_eq!(path, vec![pt(0, 0), pt(1, 0), pt(2, 0), pt(2, -1)]);
        assert_eq!(manhattan_path(pt(3, 3), pt(3, 3)), vec![pt(3, 3)]);
    }

    #[test]
    fn test_add_wire_path_counts_new_wires() {
        let mut t = CircuitTopology::new();
        assert_eq!(t.add_wire_path(pt(0, 0), pt(2, 2)).unwrap(), 4);
        // The reverse route turns at the other corner.
        assert_eq!(t.add_wire_path(pt(2, 2), pt(0, 0)).unwrap(), 4);
        assert_eq!(t.wires().len(), 8);
        assert!(!t.add_wire(pt(5, 5), pt(5, 5)));
    }

    #[test]
    fn test_add_wire_path_rejects_long_routes() {
        let mut t = CircuitTopology::new();
        let limit = MAX_ROUTE_LENGTH as i32;
        assert_eq!(t.add_wire_path(pt(0, 0), pt(limit, 0)).unwrap(), limit as usize);

        t.clear();
        assert!(matches!(
            t.add_wire_path(pt(0, 0), pt(limit, 1)),
            Err(GridError::RouteTooLong { length, .. }) if length == MAX_ROUTE_LENGTH + 1
        ));
        assert!(t.add_wire_path(pt(i32::MIN, 0), pt(i32::MAX, 0)).is_err());
        assert!(t.is_empty());
    }

    #[test]
    fn test_erase_at_coordinate_limits() {
        let mut t = CircuitTopology::new();
        let corner = pt(i32::MAX, i32::MAX);
        t.add_wire(corner, pt(i32::MAX, i32::MAX - 1));
        let r = t.add_resistor(corner, pt(i32::MAX - 3, i32::MAX), 10.0).unwrap();

        assert_eq!(
            t.erase_at(corner),
            Erased::Wire(Wire::new(corner, pt(i32::MAX, i32::MAX - 1)))
        );
        assert_eq!(t.erase_at(corner), Erased::Components(vec![r]));
        assert_eq!(t.erase_at(pt(i32::MIN, i32::MIN)), Erased::Components(vec![]));
    }

    #[test]
    fn test_ids_follow_creation_order() {
        let mut t = CircuitTopology::new();
        let r = t.add_resistor(pt(0, 0), pt(2, 0), 100.0).unwrap();
        let b = t.add_battery(pt(0, 2), pt(0, 0), 9.0).unwrap();
        let s = t.add_switch(pt(2, 0), pt(2, 2), true);
        assert!(r < b && b < s);
        t.remove_component(r).unwrap();
        let r2 = t.add_resistor(pt(0, 0), pt(2, 0), 100.0).unwrap();
        assert!(r2 > s);
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut t = CircuitTopology::new();
        assert!(matches!(
            t.add_resistor(pt(0, 0), pt(1, 0), 0.0),
            Err(GridError::InvalidValue { .. })
        ));
        assert!(t.add_lightbulb(pt(0, 0), pt(1, 0), f64::NAN).is_err());
        assert!(t.add_battery(pt(0, 0), pt(1, 0), f64::INFINITY).is_err());
        assert!(t.add_battery(pt(0, 0), pt(1, 0), 0.0).is_ok());
    }

    #[test]
    fn test_edit_wrong_kind() {
        let mut t = CircuitTopology::new();
        let b = t.add_battery(pt(0, 0), pt(0, 2), 9.0).unwrap();
        assert!(matches!(
            t.set_resistance(b, 10.0),
            Err(GridError::WrongComponentKind { .. })
        ));
        assert!(matches!(
            t.toggle_switch(ComponentId(99)),
            Err(GridError::ComponentNotFound { .. })
        ));
        t.set_voltage(b, 4.5).unwrap();
        assert_eq!(t.batteries()[0].volts, 4.5);
    }

    #[test]
    fn test_erase_prefers_wire() {
        let mut t = CircuitTopology::new();
        t.add_wire(pt(0, 0), pt(1, 0));
        t.add_wire(pt(0, 0), pt(0, 1));
        let r = t.add_resistor(pt(0, 0), pt(-2, 0), 10.0).unwrap();

        assert_eq!(t.erase_at(pt(0, 0)), Erased::Wire(Wire::new(pt(0, 0), pt(1, 0))));
        assert_eq!(t.erase_at(pt(0, 0)), Erased::Wire(Wire::new(pt(0, 0), pt(0, 1))));
        assert_eq!(t.erase_at(pt(0, 0)), Erased::Components(vec![r]));
        assert!(t.is_empty());
    }

    #[test]
    fn test_points_include_isolated_terminals() {
        let mut t = CircuitTopology::new();
        t.add_switch(pt(4, 4), pt(4, 6), false);
        let pts = t.points();
        assert!(pts.contains(&pt(4, 4)));
        assert!(pts.contains(&pt(4, 6)));
        assert_eq!(t.component_at(pt(4, 6)).map(|c| c.kind()), Some("switch"));
    }
}
