//! Main simulator interface.

use tracing::{debug, info};

use super::{solve, SolveResult, SolverConfig};
use crate::circuit::{CircuitTopology, ComponentId, GridPoint};
use crate::error::{Result, SolveError};

/// An editing session: a topology plus the outcome of the last solve.
///
/// Any edit discards the previous result, so a result is never shown for a
/// topology it was not computed from. Once the circuit has solved at least
/// once, toggling a switch re-solves on its own, even after a failed solve or
/// other edits, which keeps the display live while the user flips switches.
/// Only [`Simulator::clear`] turns that off again.
#[derive(Debug, Default)]
pub struct Simulator {
    /// The circuit being edited
    topology: CircuitTopology,
    /// Solver settings
    config: SolverConfig,
    /// Result of the last successful solve, cleared on edit
    result: Option<SolveResult>,
    /// Error of the last failed solve, cleared on edit
    last_error: Option<SolveError>,
    /// Set by the first successful solve, reset only by `clear`
    has_solved: bool,
}

impl Simulator {
    /// Create a new simulator for the given topology with default configuration.
    pub fn new(topology: CircuitTopology) -> Self {
        Self::with_config(topology, SolverConfig::default())
    }

    /// Create a new simulator for the given topology with custom configuration.
    pub fn with_config(topology: CircuitTopology, config: SolverConfig) -> Self {
        Self {
            topology,
            config,
            result: None,
            last_error: None,
            has_solved: false,
        }
    }

    /// Get a reference to the topology.
    pub fn topology(&self) -> &CircuitTopology {
        &self.topology
    }

    /// Get the solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// The current result, if the last solve succeeded and nothing changed since.
    pub fn result(&self) -> Option<&SolveResult> {
        self.result.as_ref()
    }

    /// The error of the last solve attempt, if it failed.
    pub fn last_error(&self) -> Option<SolveError> {
        self.last_error
    }

    /// Check whether a result is currently showing.
    pub fn is_solved(&self) -> bool {
        self.result.is_some()
    }

    /// Solve the current topology, replacing any previous outcome.
    pub fn solve(&mut self) -> std::result::Result<&SolveResult, SolveError> {
        match solve(&self.topology, &self.config) {
            Ok(result) => {
                info!(
                    classes = result.node_voltage.len(),
                    fires = result.lightbulbs.values().filter(|b| b.on_fire).count(),
                    "circuit solved"
                );
                self.last_error = None;
                self.has_solved = true;
                Ok(&*self.result.insert(result))
            }
            Err(e) => {
                self.result = None;
                self.last_error = Some(e);
                Err(e)
            }
        }
    }

    /// Apply an edit to the topology. The previous outcome is discarded.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut CircuitTopology) -> R) -> R {
        self.invalidate();
        f(&mut self.topology)
    }

    /// Remove everything from the topology and forget that it ever solved.
    pub fn clear(&mut self) {
        self.invalidate();
        self.topology.clear();
        self.has_solved = false;
    }

    /// Flip a switch, returning its new state.
    ///
    /// If the circuit has ever solved, it is solved again right away; a
    /// failure there leaves the session unsolved with the error recorded
    /// (it is not returned, since the toggle itself succeeded).
    pub fn toggle_switch(&mut self, id: ComponentId) -> Result<bool> {
        let closed = self.topology.toggle_switch(id)?;
        self.invalidate();
        if self.has_solved {
            // The outcome is stored on the session either way.
            let _ = self.solve();
        }
        Ok(closed)
    }

    /// Voltage at a point in the current result.
    pub fn voltage_at(&self, p: GridPoint) -> Option<f64> {
        self.result.as_ref()?.voltage_at(p)
    }

    /// Display current of a wire in the current result.
    pub fn wire_current(&self, p: GridPoint, q: GridPoint) -> Option<f64> {
        self.result.as_ref()?.wire_current_between(p, q)
    }

    fn invalidate(&mut self) {
        if self.result.is_some() || self.last_error.is_some() {
            debug!("topology changed, discarding previous solve");
        }
        self.result = None;
        self.last_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pt(x: i32, y: i32) -> GridPoint {
        GridPoint::new(x, y)
    }

    /// 9 V battery feeding a 100 ohm resistor through a switch.
    fn switched_loop(closed: bool) -> (Simulator, ComponentId, ComponentId) {
        let mut t = CircuitTopology::new();
        t.add_battery(pt(0, 0), pt(0, 4), 9.0).unwrap();
        t.add_wire_path(pt(0, 0), pt(2, 0)).unwrap();
        let sw = t.add_switch(pt(2, 0), pt(2, 2), closed);
        let r = t.add_resistor(pt(2, 2), pt(2, 4), 100.0).unwrap();
        t.add_wire_path(pt(2, 4), pt(0, 4)).unwrap();
        (Simulator::new(t), sw, r)
    }

    #[test]
    fn test_solve_and_edit_invalidates() {
        let (mut sim, _, r) = switched_loop(true);
        let current = sim.solve().unwrap().resistor_current[&r];
        assert_relative_eq!(current, 0.09, max_relative = 1e-9);
        assert!(sim.is_solved());

        sim.edit(|t| t.set_resistance(r, 50.0)).unwrap();
        assert!(!sim.is_solved());
        assert_eq!(sim.voltage_at(pt(2, 2)), None);

        let current = sim.solve().unwrap().resistor_current[&r];
        assert_relative_eq!(current, 0.18, max_relative = 1e-9);
    }

    #[test]
    fn test_failure_clears_result() {
        let (mut sim, _, _) = switched_loop(true);
        sim.solve().unwrap();
        sim.edit(|t| t.add_resistor(pt(9, 0), pt(9, 2), 10.0)).unwrap();
        assert_eq!(sim.solve().err(), Some(SolveError::SingularSystem));
        assert!(sim.result().is_none());
        assert_eq!(sim.last_error(), Some(SolveError::SingularSystem));
    }

    #[test]
    fn test_toggle_recovers_after_failed_resolve() {
        let (mut sim, sw, r) = switched_loop(true);
        sim.solve().unwrap();

        // Opening the only loop fails the automatic re-solve.
        assert!(!sim.toggle_switch(sw).unwrap());
        assert!(!sim.is_solved());
        assert_eq!(sim.last_error(), Some(SolveError::SingularSystem));

        // Closing it again solves once more.
        assert!(sim.toggle_switch(sw).unwrap());
        assert!(sim.is_solved());
        assert_eq!(sim.last_error(), None);
        let current = sim.result().unwrap().resistor_current[&r];
        assert_relative_eq!(current, 0.09, max_relative = 1e-9);
    }

    #[test]
    fn test_toggle_resolves_after_edit() {
        let (mut sim, sw, r) = switched_loop(true);
        sim.solve().unwrap();
        sim.edit(|t| t.set_resistance(r, 50.0)).unwrap();
        assert!(!sim.is_solved());

        sim.toggle_switch(sw).unwrap();
        assert_eq!(sim.last_error(), Some(SolveError::SingularSystem));
        sim.toggle_switch(sw).unwrap();
        let current = sim.result().unwrap().resistor_current[&r];
        assert_relative_eq!(current, 0.18, max_relative = 1e-9);
    }

    #[test]
    fn test_toggle_before_first_solve_and_after_clear() {
        let (mut sim, sw, _) = switched_loop(true);
        sim.toggle_switch(sw).unwrap();
        sim.toggle_switch(sw).unwrap();
        assert!(!sim.is_solved());
        assert_eq!(sim.last_error(), None);

        sim.solve().unwrap();
        sim.clear();
        assert!(sim.topology().is_empty());
        assert!(!sim.is_solved());

        let sw = sim.edit(|t| t.add_switch(pt(0, 0), pt(1, 0), true));
        sim.toggle_switch(sw).unwrap();
        assert!(!sim.is_solved());
        assert_eq!(sim.last_error(), None);
    }

    #[test]
    fn test_toggle_resolves_when_solved() {
        let mut t = CircuitTopology::new();
        t.add_battery(pt(0, 0), pt(0, 4), 9.0).unwrap();
        t.add_resistor(pt(0, 0), pt(0, 4), 100.0).unwrap();
        let branch = t.add_resistor(pt(0, 0), pt(2, 0), 100.0).unwrap();
        let sw = t.add_switch(pt(2, 0), pt(0, 4), true);
        let mut sim = Simulator::new(t);

        let current = sim.solve().unwrap().resistor_current[&branch];
        assert_relative_eq!(current, 0.09, max_relative = 1e-9);

        sim.toggle_switch(sw).unwrap();
        let current = sim.result().unwrap().resistor_current[&branch];
        assert!(current.abs() < 1e-12);

        sim.toggle_switch(sw).unwrap();
        let current = sim.result().unwrap().resistor_current[&branch];
        assert_relative_eq!(current, 0.09, max_relative = 1e-9);
    }

    #[test]
    fn test_toggle_unknown_switch() {
        let (mut sim, _, r) = switched_loop(true);
        assert!(sim.toggle_switch(r).is_err());
        assert!(sim.toggle_switch(ComponentId(1234)).is_err());
    }
}
