//! DSL (Domain Specific Language) parser for grid circuit netlists.
//!
//! A netlist places components and wires on the integer grid. It is
//! line-oriented and human-editable, so circuits can be kept in files and
//! solved from the command line.
//!
//! # Grammar Overview
//!
//! ```text
//! netlist     = { line }
//! line        = comment | wire | component | empty
//! comment     = ('#' | ';') { any_char }
//! wire        = ".wire" point point
//! component   = name point point [value | state]
//!
//! point       = integer ',' integer
//! name        = identifier       (type taken from its prefix)
//! value       = number [unit_suffix]
//! state       = "open" | "closed" | "on" | "off"
//!
//! number      = ['-'] digit+ ['.' digit+] [('e'|'E') ['-'|'+'] digit+]
//! unit_suffix = 'p' | 'n' | 'u' | 'm' | 'k' | 'M' | 'G'
//! identifier  = (letter | '_') { letter | digit | '_' }
//! ```
//!
//! # Component Types
//!
//! | Prefix | Description | Syntax | Default |
//! |--------|-------------|--------|---------|
//! | R | Resistor | `R<name> <a> <b> [ohms]` | 100 |
//! | B, V | Battery | `B<name> <plus> <minus> [volts]` | 9 |
//! | L | Lightbulb | `L<name> <a> <b> [ohms]` | 50 |
//! | SW | Switch | `SW<name> <a> <b> [open\|closed]` | closed |
//!
//! `.wire` lays a Manhattan route between two points: first along x, then
//! along y.
//!
//! # Example
//!
//! ```text
//! # 9 V battery lighting a bulb through a switch
//! B1   0,0  0,4  9
//! .wire 0,0 3,0
//! SW1  3,0  3,2  closed
//! L1   3,2  3,4
//! .wire 3,4 0,4
//! ```

mod ast;
mod lexer;
mod parser;

use std::collections::BTreeMap;

pub use ast::*;
pub use lexer::{parse_value, Lexer, Token, TokenKind};
pub use parser::Parser;
use tracing::debug;

use crate::circuit::{CircuitTopology, ComponentId};
use crate::error::{GridError, Result};
use crate::{DEFAULT_BULB_RESISTANCE, DEFAULT_RESISTANCE, DEFAULT_VOLTAGE};

/// Parse a netlist string into an AST.
pub fn parse(input: &str) -> Result<NetlistAst> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer)?;
    parser.parse()
}

/// Parse a netlist file.
#[cfg(feature = "cli")]
pub fn parse_file(path: &std::path::Path) -> Result<NetlistAst> {
    let content = std::fs::read_to_string(path).map_err(|e| GridError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&content)
}

/// A loaded netlist: the topology plus the names given to its components.
#[derive(Debug, Clone, Default)]
pub struct Netlist {
    pub topology: CircuitTopology,
    pub names: BTreeMap<String, ComponentId>,
}

impl Netlist {
    /// Parse and build a netlist in one step.
    pub fn load(input: &str) -> Result<Self> {
        Self::from_ast(&parse(input)?)
    }

    /// Build a topology from a parsed AST.
    ///
    /// Components are added in file order, so the first battery in the file
    /// defines ground.
    pub fn from_ast(ast: &NetlistAst) -> Result<Self> {
        let mut netlist = Self::default();

        for wire in &ast.wires {
            netlist
                .topology
                .add_wire_path(wire.from, wire.to)
                .map_err(|e| GridError::parse(wire.line, e.to_string()))?;
        }

        for def in &ast.components {
            if netlist.names.contains_key(&def.name) {
                return Err(GridError::DuplicateComponent {
                    name: def.name.clone(),
                });
            }
            let id = netlist.add_component(def)?;
            netlist.names.insert(def.name.clone(), id);
        }

        debug!(
            wires = netlist.topology.wires().len(),
            components = netlist.names.len(),
            "netlist loaded"
        );
        Ok(netlist)
    }

    fn add_component(&mut self, def: &ComponentDef) -> Result<ComponentId> {
        let [a, b] = def.terminals;
        let topology = &mut self.topology;
        let added = match def.component_type {
            ComponentType::Resistor => {
                topology.add_resistor(a, b, def.value.unwrap_or(DEFAULT_RESISTANCE))
            }
            ComponentType::Battery => {
                topology.add_battery(a, b, def.value.unwrap_or(DEFAULT_VOLTAGE))
            }
            ComponentType::Lightbulb => {
                topology.add_lightbulb(a, b, def.value.unwrap_or(DEFAULT_BULB_RESISTANCE))
            }
            ComponentType::Switch => Ok(topology.add_switch(a, b, def.closed.unwrap_or(true))),
        };
        added.map_err(|e| GridError::invalid_component(&def.name, def.line, e.to_string()))
    }

    /// Look up a component by name.
    pub fn id(&self, name: &str) -> Option<ComponentId> {
        self.names.get(name).copied()
    }

    /// Name of a component, if it has one.
    pub fn name_of(&self, id: ComponentId) -> Option<&str> {
        self.names
            .iter()
            .find(|(_, v)| **v == id)
            .map(|(k, _)| k.as_str())
    }

    /// Look up a switch by name.
    pub fn switch(&self, name: &str) -> Result<ComponentId> {
        self.id(name)
            .filter(|id| self.topology.switches().iter().any(|s| s.id == *id))
            .ok_or_else(|| GridError::UnknownSwitch {
                name: name.to_string(),
            })
    }
}
