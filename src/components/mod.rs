//! Component models for the grid circuit.
//!
//! This module provides the four placeable component kinds:
//! - Linear: Resistor, Lightbulb
//! - Sources: Battery
//! - Controls: Switch
//!
//! Wires are not components; they live in the topology as plain edges.

mod controls;
mod linear;
mod sources;

pub use controls::Switch;
pub use linear::{Lightbulb, Resistor};
pub use sources::Battery;

use serde::Serialize;

use crate::circuit::{ComponentId, GridPoint};

/// A placed circuit component.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Component {
    Resistor(Resistor),
    Battery(Battery),
    Lightbulb(Lightbulb),
    Switch(Switch),
}

impl Component {
    /// Get the component ID.
    pub fn id(&self) -> ComponentId {
        match self {
            Component::Resistor(r) => r.id,
            Component::Battery(b) => b.id,
            Component::Lightbulb(l) => l.id,
            Component::Switch(s) => s.id,
        }
    }

    /// Get the two terminals. For a battery this is `[plus, minus]`.
    pub fn terminals(&self) -> [GridPoint; 2] {
        match self {
            Component::Resistor(r) => [r.a, r.b],
            Component::Battery(b) => [b.plus, b.minus],
            Component::Lightbulb(l) => [l.a, l.b],
            Component::Switch(s) => [s.a, s.b],
        }
    }

    /// Check whether a terminal sits on the given point.
    pub fn touches(&self, p: GridPoint) -> bool {
        self.terminals().contains(&p)
    }

    /// Human-readable kind name.
    pub fn kind(&self) -> &'static str {
        match self {
            Component::Resistor(_) => "resistor",
            Component::Battery(_) => "battery",
            Component::Lightbulb(_) => "lightbulb",
            Component::Switch(_) => "switch",
        }
    }
}
