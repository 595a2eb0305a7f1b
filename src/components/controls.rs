//! User-operated controls.

use serde::Serialize;

use crate::circuit::{ComponentId, GridPoint};

/// A switch component.
///
/// A closed switch is an ideal wire and merges its terminals into one node.
/// An open switch contributes nothing: no connectivity and no current.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Switch {
    pub id: ComponentId,
    pub a: GridPoint,
    pub b: GridPoint,
    pub closed: bool,
}

impl Switch {
    /// Create a new switch.
    pub fn new(id: ComponentId, a: GridPoint, b: GridPoint, closed: bool) -> Self {
        Self { id, a, b, closed }
    }

    /// Set the switch state.
    pub fn set_state(&mut self, closed: bool) {
        self.closed = closed;
    }

    /// Toggle the switch state, returning the new state.
    pub fn toggle(&mut self) -> bool {
        self.closed = !self.closed;
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut sw = Switch::new(ComponentId(0), GridPoint::new(0, 0), GridPoint::new(1, 0), true);
        assert!(!sw.toggle());
        assert!(sw.toggle());
        sw.set_state(false);
        assert!(!sw.closed);
    }
}
