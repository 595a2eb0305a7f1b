//! Ideal voltage sources.

use serde::Serialize;

use crate::circuit::{ComponentId, GridPoint};

/// An ideal battery.
///
/// Batteries require an extra row/column in the MNA matrix for the branch
/// current. The source enforces: V(plus) - V(minus) = volts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Battery {
    pub id: ComponentId,
    pub plus: GridPoint,
    pub minus: GridPoint,
    /// Terminal voltage (may be zero)
    pub volts: f64,
}

impl Battery {
    /// Create a new battery.
    pub fn new(id: ComponentId, plus: GridPoint, minus: GridPoint, volts: f64) -> Self {
        Self {
            id,
            plus,
            minus,
            volts,
        }
    }
}
