//! Printable and serializable views of a solve result.
//!
//! [`SolveResult`] is keyed by grid points and wires, which cannot be JSON
//! object keys, so the report flattens every map into a list of entries and
//! attaches the netlist names of the components.

use std::fmt;

use serde::Serialize;

use crate::circuit::{ComponentId, GridPoint};
use crate::dsl::Netlist;
use crate::error::SolveError;
use crate::solver::{BulbReading, SolveResult};

/// Flattened solve result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub ground: GridPoint,
    pub points: Vec<PointEntry>,
    pub resistors: Vec<ResistorEntry>,
    pub batteries: Vec<BatteryEntry>,
    pub lightbulbs: Vec<BulbEntry>,
    pub wires: Vec<WireEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointEntry {
    pub point: GridPoint,
    pub voltage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResistorEntry {
    pub name: String,
    pub current: f64,
    pub power: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatteryEntry {
    pub name: String,
    /// Current into the plus terminal
    pub current: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulbEntry {
    pub name: String,
    #[serde(flatten)]
    pub reading: BulbReading,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireEntry {
    pub from: GridPoint,
    pub to: GridPoint,
    /// Current flowing from `from` to `to`
    pub current: f64,
}

/// Outcome of a CLI run, as printed with `--json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Solved(Report),
    Failed { error: String },
}

impl Outcome {
    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl From<SolveError> for Outcome {
    fn from(e: SolveError) -> Self {
        Outcome::Failed {
            error: e.to_string(),
        }
    }
}

impl Report {
    /// Build a report, naming components after the netlist that produced them.
    pub fn new(result: &SolveResult, netlist: &Netlist) -> Self {
        let name = |id: ComponentId| {
            netlist
                .name_of(id)
                .map_or_else(|| id.to_string(), str::to_string)
        };

        Self {
            ground: result.ground_point,
            points: result
                .point_voltage
                .iter()
                .map(|(&point, &voltage)| PointEntry { point, voltage })
                .collect(),
            resistors: result
                .resistor_current
                .iter()
                .map(|(&id, &current)| ResistorEntry {
                    name: name(id),
                    current,
                    power: result.resistor_power.get(&id).copied().unwrap_or(0.0),
                })
                .collect(),
            batteries: result
                .battery_current
                .iter()
                .map(|(&id, &current)| BatteryEntry {
                    name: name(id),
                    current,
                })
                .collect(),
            lightbulbs: result
                .lightbulbs
                .iter()
                .map(|(&id, &reading)| BulbEntry {
                    name: name(id),
                    reading,
                })
                .collect(),
            wires: result
                .wire_current
                .iter()
                .map(|(wire, &current)| WireEntry {
                    from: wire.a(),
                    to: wire.b(),
                    current,
                })
                .collect(),
        }
    }

    /// Lightbulbs currently burning.
    pub fn fires(&self) -> impl Iterator<Item = &BulbEntry> {
        self.lightbulbs.iter().filter(|b| b.reading.on_fire)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ground: {}", self.ground)?;

        writeln!(f, "\nPoint voltages:")?;
        for p in &self.points {
            writeln!(f, "  {:<12} {:>12.6} V", p.point.to_string(), p.voltage)?;
        }

        if !self.resistors.is_empty() {
            writeln!(f, "\nResistors:")?;
            for r in &self.resistors {
                writeln!(
                    f,
                    "  {:<12} {:>12.6} A {:>12.6} W",
                    r.name, r.current, r.power
                )?;
            }
        }

        writeln!(f, "\nBatteries:")?;
        for b in &self.batteries {
            writeln!(f, "  {:<12} {:>12.6} A", b.name, b.current)?;
        }

        if !self.lightbulbs.is_empty() {
            writeln!(f, "\nLightbulbs:")?;
            for lb in &self.lightbulbs {
                let r = &lb.reading;
                writeln!(
                    f,
                    "  {:<12} {:>12.6} A {:>12.6} W  brightness {:>5.1}%{}",
                    lb.name,
                    r.current,
                    r.power,
                    r.brightness * 100.0,
                    if r.on_fire { "  ON FIRE" } else { "" }
                )?;
            }
        }

        if !self.wires.is_empty() {
            writeln!(f, "\nWires:")?;
            for w in &self.wires {
                writeln!(
                    f,
                    "  {:<12} -> {:<12} {:>12.6} A",
                    w.from.to_string(),
                    w.to.to_string(),
                    w.current
                )?;
            }
        }

        Ok(())
    }
}
