//! WASM bindings for the grid circuit solver.
//!
//! This module provides JavaScript-friendly bindings for a browser-based
//! grid editor. Points are passed as separate `x`, `y` integers and
//! components are referred to by their numeric id.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmGridSim } from 'gridcircuit_core';
//!
//! await init();
//!
//! const sim = new WasmGridSim();
//! sim.add_battery(0, 0, 0, 4, 9);
//! sim.add_wire(0, 0, 3, 0);
//! const lamp = sim.add_lightbulb(3, 0, 3, 4, 50);
//! sim.add_wire(3, 4, 0, 4);
//!
//! if (sim.solve()) {
//!   console.log(sim.voltage_at(3, 0), sim.bulb_brightness(lamp));
//! } else {
//!   console.log(sim.last_error());
//! }
//! ```

use std::collections::BTreeMap;

use wasm_bindgen::prelude::*;

use crate::circuit::{ComponentId, Erased, GridPoint};
use crate::dsl::Netlist;
use crate::solver::{Simulator, SolverConfig};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// WASM-compatible grid circuit session.
///
/// This struct wraps the native `Simulator`; every edit discards the current
/// result, exactly as in the native API.
#[wasm_bindgen]
pub struct WasmGridSim {
    simulator: Simulator,
    names: BTreeMap<String, ComponentId>,
}

impl Default for WasmGridSim {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl WasmGridSim {
    /// Create an empty session.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmGridSim {
        WasmGridSim {
            simulator: Simulator::default(),
            names: BTreeMap::new(),
        }
    }

    /// Create a session from netlist text.
    ///
    /// # Arguments
    /// * `netlist` - The circuit in grid netlist format
    /// * `pivot_tolerance` - LU pivot tolerance (default: 1e-12)
    #[wasm_bindgen]
    pub fn from_netlist(
        netlist: &str,
        pivot_tolerance: Option<f64>,
    ) -> Result<WasmGridSim, JsValue> {
        let Netlist { topology, names } = Netlist::load(netlist).map_err(js_err)?;
        let mut config = SolverConfig::default();
        if let Some(tol) = pivot_tolerance {
            config = config.with_pivot_tolerance(tol);
        }
        Ok(WasmGridSim {
            simulator: Simulator::with_config(topology, config),
            names,
        })
    }

    /// Id of a component named in the loaded netlist.
    #[wasm_bindgen]
    pub fn component_id(&self, name: &str) -> Option<usize> {
        self.names.get(name).map(|id| id.0)
    }

    // ============ Editing ============

    /// Lay a Manhattan wire route, returning the number of new unit wires.
    ///
    /// Fails without change if the route is too long.
    #[wasm_bindgen]
    pub fn add_wire(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) -> Result<usize, JsValue> {
        let (from, to) = (GridPoint::new(x0, y0), GridPoint::new(x1, y1));
        self.simulator
            .edit(|t| t.add_wire_path(from, to))
            .map_err(js_err)
    }

    /// Remove the unit wire between two adjacent points.
    #[wasm_bindgen]
    pub fn remove_wire(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) -> bool {
        let (p, q) = (GridPoint::new(x0, y0), GridPoint::new(x1, y1));
        self.simulator.edit(|t| t.remove_wire(p, q))
    }

    /// Place a resistor, returning its id.
    ///
    /// Fails if `ohms` is not a finite positive number.
    #[wasm_bindgen]
    pub fn add_resistor(
        &mut self,
        ax: i32,
        ay: i32,
        bx: i32,
        by: i32,
        ohms: f64,
    ) -> Result<usize, JsValue> {
        let (a, b) = (GridPoint::new(ax, ay), GridPoint::new(bx, by));
        let id = self.simulator.edit(|t| t.add_resistor(a, b, ohms)).map_err(js_err)?;
        Ok(id.0)
    }

    /// Place a battery with its plus terminal at `(px, py)`, returning its id.
    #[wasm_bindgen]
    pub fn add_battery(
        &mut self,
        px: i32,
        py: i32,
        mx: i32,
        my: i32,
        volts: f64,
    ) -> Result<usize, JsValue> {
        let (plus, minus) = (GridPoint::new(px, py), GridPoint::new(mx, my));
        let id = self
            .simulator
            .edit(|t| t.add_battery(plus, minus, volts))
            .map_err(js_err)?;
        Ok(id.0)
    }

    /// Place a lightbulb, returning its id.
    #[wasm_bindgen]
    pub fn add_lightbulb(
        &mut self,
        ax: i32,
        ay: i32,
        bx: i32,
        by: i32,
        ohms: f64,
    ) -> Result<usize, JsValue> {
        let (a, b) = (GridPoint::new(ax, ay), GridPoint::new(bx, by));
        let id = self.simulator.edit(|t| t.add_lightbulb(a, b, ohms)).map_err(js_err)?;
        Ok(id.0)
    }

    /// Place a switch in the given state, returning its id.
    #[wasm_bindgen]
    pub fn add_switch(&mut self, ax: i32, ay: i32, bx: i32, by: i32, closed: bool) -> usize {
        let (a, b) = (GridPoint::new(ax, ay), GridPoint::new(bx, by));
        self.simulator.edit(|t| t.add_switch(a, b, closed)).0
    }

    /// Remove a component by id. Its netlist name, if any, is forgotten.
    #[wasm_bindgen]
    pub fn remove_component(&mut self, id: usize) -> Result<(), JsValue> {
        let id = ComponentId(id);
        self.simulator.edit(|t| t.remove_component(id)).map_err(js_err)?;
        self.names.retain(|_, v| *v != id);
        Ok(())
    }

    /// Change the resistance of a resistor or lightbulb.
    #[wasm_bindgen]
    pub fn set_resistance(&mut self, id: usize, ohms: f64) -> Result<(), JsValue> {
        self.simulator
            .edit(|t| t.set_resistance(ComponentId(id), ohms))
            .map_err(js_err)
    }

    /// Change the voltage of a battery.
    #[wasm_bindgen]
    pub fn set_voltage(&mut self, id: usize, volts: f64) -> Result<(), JsValue> {
        self.simulator
            .edit(|t| t.set_voltage(ComponentId(id), volts))
            .map_err(js_err)
    }

    /// Flip a switch, returning its new state.
    ///
    /// Re-solves right away once the circuit has solved at least once.
    #[wasm_bindgen]
    pub fn toggle_switch(&mut self, id: usize) -> Result<bool, JsValue> {
        self.simulator.toggle_switch(ComponentId(id)).map_err(js_err)
    }

    /// Erase tool: removes one wire next to the point, or else every
    /// component touching it. Returns the number of items removed.
    #[wasm_bindgen]
    pub fn erase_at(&mut self, x: i32, y: i32) -> usize {
        match self.simulator.edit(|t| t.erase_at(GridPoint::new(x, y))) {
            Erased::Wire(_) => 1,
            Erased::Components(ids) => {
                self.names.retain(|_, v| !ids.contains(v));
                ids.len()
            }
        }
    }

    /// Remove everything and start a fresh session.
    #[wasm_bindgen]
    pub fn clear(&mut self) {
        self.simulator.clear();
        self.names.clear();
    }

    // ============ Solving ============

    /// Solve the circuit. Returns `false` on failure; see `last_error`.
    #[wasm_bindgen]
    pub fn solve(&mut self) -> bool {
        self.simulator.solve().is_ok()
    }

    /// Whether a result is currently showing.
    #[wasm_bindgen(getter)]
    pub fn is_solved(&self) -> bool {
        self.simulator.is_solved()
    }

    /// Message of the last failed solve, or `undefined`.
    #[wasm_bindgen]
    pub fn last_error(&self) -> Option<String> {
        self.simulator.last_error().map(|e| e.to_string())
    }

    /// Voltage at a point, or `undefined` if unsolved or not in the circuit.
    #[wasm_bindgen]
    pub fn voltage_at(&self, x: i32, y: i32) -> Option<f64> {
        self.simulator.voltage_at(GridPoint::new(x, y))
    }

    /// Current through the wire, flowing from `(x0, y0)` toward `(x1, y1)`.
    #[wasm_bindgen]
    pub fn wire_current(&self, x0: i32, y0: i32, x1: i32, y1: i32) -> Option<f64> {
        let (p, q) = (GridPoint::new(x0, y0), GridPoint::new(x1, y1));
        let current = self.simulator.wire_current(p, q)?;
        // Stored from the canonical (smaller) endpoint
        Some(if p <= q { current } else { -current })
    }

    /// Current through a resistor, lightbulb or battery.
    ///
    /// Resistors and lightbulbs report the current from terminal `a` to `b`;
    /// batteries report the current into their plus terminal.
    #[wasm_bindgen]
    pub fn component_current(&self, id: usize) -> Option<f64> {
        self.simulator.result()?.component_current(ComponentId(id))
    }

    /// Brightness of a lightbulb, from 0 to 1.
    #[wasm_bindgen]
    pub fn bulb_brightness(&self, id: usize) -> Option<f64> {
        let reading = self.simulator.result()?.lightbulbs.get(&ComponentId(id))?;
        Some(reading.brightness)
    }

    /// Whether a lightbulb is overloaded.
    #[wasm_bindgen]
    pub fn bulb_on_fire(&self, id: usize) -> Option<bool> {
        let reading = self.simulator.result()?.lightbulbs.get(&ComponentId(id))?;
        Some(reading.on_fire)
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
