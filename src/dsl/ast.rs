//! Abstract Syntax Tree types for the netlist DSL.

use crate::circuit::GridPoint;

/// Complete AST representation of a parsed netlist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetlistAst {
    /// Wire routes in file order
    pub wires: Vec<WireDef>,
    /// Component instances in file order (creation order)
    pub components: Vec<ComponentDef>,
}

impl NetlistAst {
    /// Create a new empty netlist AST.
    pub fn new() -> Self {
        Self::default()
    }
}

/// A `.wire` directive: a Manhattan route between two points.
#[derive(Debug, Clone, PartialEq)]
pub struct WireDef {
    pub from: GridPoint,
    pub to: GridPoint,
    /// Source line number for error reporting
    pub line: usize,
}

/// A component definition from the DSL.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDef {
    /// Component type (R, B, L, SW)
    pub component_type: ComponentType,
    /// Unique component name
    pub name: String,
    /// Terminal points; `[plus, minus]` for a battery
    pub terminals: [GridPoint; 2],
    /// Resistance or voltage, if given
    pub value: Option<f64>,
    /// Switch state, if given
    pub closed: Option<bool>,
    /// Source line number for error reporting
    pub line: usize,
}

/// Component types supported by the DSL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentType {
    /// Resistor
    Resistor,
    /// Battery
    Battery,
    /// Lightbulb
    Lightbulb,
    /// Switch
    Switch,
}

impl ComponentType {
    /// Parse a component type from the leading letters of its name.
    ///
    /// `SW` is checked before the single-letter prefixes.
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.to_ascii_uppercase();
        if upper.starts_with("SW") {
            return Some(Self::Switch);
        }
        match upper.chars().next()? {
            'R' => Some(Self::Resistor),
            'B' | 'V' => Some(Self::Battery),
            'L' => Some(Self::Lightbulb),
            _ => None,
        }
    }

    /// Whether a numeric value may follow the terminals.
    pub fn takes_value(&self) -> bool {
        !matches!(self, Self::Switch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_type_from_name() {
        assert_eq!(ComponentType::from_name("R12"), Some(ComponentType::Resistor));
        assert_eq!(ComponentType::from_name("bat"), Some(ComponentType::Battery));
        assert_eq!(ComponentType::from_name("V1"), Some(ComponentType::Battery));
        assert_eq!(ComponentType::from_name("Lamp"), Some(ComponentType::Lightbulb));
        assert_eq!(ComponentType::from_name("SW1"), Some(ComponentType::Switch));
        assert_eq!(ComponentType::from_name("S1"), None);
    }
}
