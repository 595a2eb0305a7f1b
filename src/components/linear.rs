//! Linear resistive components: Resistor and Lightbulb.

use serde::Serialize;

use crate::circuit::{ComponentId, GridPoint};

/// A resistor component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resistor {
    pub id: ComponentId,
    pub a: GridPoint,
    pub b: GridPoint,
    /// Resistance in ohms (always > 0)
    pub ohms: f64,
}

impl Resistor {
    /// Create a new resistor.
    pub fn new(id: ComponentId, a: GridPoint, b: GridPoint, ohms: f64) -> Self {
        Self { id, a, b, ohms }
    }

    /// Get the conductance (1/R).
    pub fn conductance(&self) -> f64 {
        1.0 / self.ohms
    }

    /// Current flowing from `a` to `b` for the given terminal voltages.
    pub fn current(&self, va: f64, vb: f64) -> f64 {
        (va - vb) / self.ohms
    }
}

/// A lightbulb component.
///
/// Electrically a plain resistor. Its brightness and overload state are
/// derived from the dissipated power after each solve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lightbulb {
    pub id: ComponentId,
    pub a: GridPoint,
    pub b: GridPoint,
    /// Filament resistance in ohms (always > 0)
    pub ohms: f64,
}

impl Lightbulb {
    /// Create a new lightbulb.
    pub fn new(id: ComponentId, a: GridPoint, b: GridPoint, ohms: f64) -> Self {
        Self { id, a, b, ohms }
    }

    /// Get the conductance (1/R).
    pub fn conductance(&self) -> f64 {
        1.0 / self.ohms
    }

    /// Current flowing from `a` to `b` for the given terminal voltages.
    pub fn current(&self, va: f64, vb: f64) -> f64 {
        (va - vb) / self.ohms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_resistor_conductance() {
        let r = Resistor::new(
            ComponentId(0),
            GridPoint::new(0, 0),
            GridPoint::new(2, 0),
            1000.0,
        );
        assert_relative_eq!(r.conductance(), 0.001);
    }

    #[test]
    fn test_current_direction() {
        let lb = Lightbulb::new(
            ComponentId(1),
            GridPoint::new(0, 0),
            GridPoint::new(0, 2),
            50.0,
        );
        assert_relative_eq!(lb.current(5.0, 0.0), 0.1);
        assert_relative_eq!(lb.current(0.0, 5.0), -0.1);
    }
}
