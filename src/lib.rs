//! # Grid Circuit Core
//!
//! A DC circuit solver for circuits drawn on an integer grid.
//!
//! This library provides:
//! - An editable topology of wires, resistors, batteries, lightbulbs and switches
//! - Modified Nodal Analysis (MNA) based DC operating-point solving
//! - Lightbulb brightness and overload ("on fire") classification
//! - A text netlist DSL for describing grid circuits
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`circuit`] - Grid points, wires and the editable topology
//! - [`components`] - Component models (resistors, batteries, lightbulbs, switches)
//! - [`solver`] - Node resolution, MNA assembly, LU solving and result mapping
//! - [`dsl`] - Parser for the netlist description language
//! - [`report`] - Printable and JSON views of a result (CLI only)
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! gridcircuit lamp.grid --toggle SW1 --json
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmGridSim } from 'gridcircuit_core';
//!
//! const sim = WasmGridSim.from_netlist(netlistText);
//! sim.solve();
//! ```
//!
//! ## Solving Method
//!
//! Every solve is a full recomputation from the topology:
//!
//! 1. Merge points joined by wires or closed switches into node classes
//! 2. Fix the class of the first battery's minus terminal at 0 V
//! 3. Reject floating sections and batteries with no return path
//! 4. Assemble the MNA system with one current unknown per battery
//! 5. Solve Ax = z by LU decomposition with partial pivoting
//! 6. Map node voltages back onto points and derive currents and powers

pub mod circuit;
pub mod components;
pub mod dsl;
pub mod error;
pub mod solver;

#[cfg(feature = "cli")]
pub mod report;

// Re-export main types for convenience
pub use circuit::{CircuitTopology, ComponentId, GridPoint};
pub use error::{GridError, Result, SolveError};
pub use solver::{solve, Simulator, SolveResult, SolverConfig};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmGridSim;

/// Resistance given to a new resistor, in ohms
pub const DEFAULT_RESISTANCE: f64 = 100.0;

/// Voltage given to a new battery, in volts
pub const DEFAULT_VOLTAGE: f64 = 9.0;

/// Resistance given to a new lightbulb, in ohms
pub const DEFAULT_BULB_RESISTANCE: f64 = 50.0;
