//! Error types for the grid circuit solver.
//!
//! Solving can fail in exactly three user-recoverable ways, captured by
//! [`SolveError`]. Everything else that can go wrong (editing a component
//! that no longer exists, a bad netlist line, an unreadable file) is covered
//! by the unified [`GridError`], which wraps [`SolveError`] transparently.

use thiserror::Error;

use crate::circuit::{ComponentId, GridPoint};

/// Result type alias using [`GridError`].
pub type Result<T> = std::result::Result<T, GridError>;

/// Why a solve request produced no result.
///
/// The messages are shown to the user verbatim and may span several lines.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveError {
    /// No wire or component references any point.
    #[error("Nothing to solve.")]
    EmptyCircuit,

    /// There is no battery, so no ground can be chosen.
    #[error("Add at least one battery.")]
    NoBattery,

    /// The linear system has no unique solution.
    #[error(
        "Can't solve circuit (singular).\nCheck for floating sections or\n\
         battery loops with no resistance."
    )]
    SingularSystem,
}

/// Unified error type for all grid circuit operations.
#[derive(Error, Debug)]
pub enum GridError {
    // ============ Solve Errors ============
    #[error(transparent)]
    Solve(#[from] SolveError),

    // ============ Editing Errors ============
    /// No component with this id exists in the topology
    #[error("Component {id} not found")]
    ComponentNotFound { id: ComponentId },

    /// The component exists but is of a different kind than required
    #[error("Component {id} is not a {expected}")]
    WrongComponentKind {
        id: ComponentId,
        expected: &'static str,
    },

    /// A resistance or voltage value that cannot be stamped
    #[error("Invalid {quantity} value {value}: {message}")]
    InvalidValue {
        quantity: &'static str,
        value: f64,
        message: &'static str,
    },

    /// A wire route with more unit steps than the editor lays in one go
    #[error("Wire route from {from} to {to} is {length} steps long")]
    RouteTooLong {
        from: GridPoint,
        to: GridPoint,
        length: u64,
    },

    // ============ Netlist Errors ============
    /// Error during lexical analysis
    #[error("Lexer error at line {line}, column {column}: {message}")]
    LexerError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Error during parsing
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Invalid component definition
    #[error("Invalid component '{name}' at line {line}: {message}")]
    InvalidComponent {
        name: String,
        line: usize,
        message: String,
    },

    /// Duplicate component name
    #[error("Duplicate component name '{name}'")]
    DuplicateComponent { name: String },

    /// A switch name that the loaded netlist does not define
    #[error("Unknown switch '{name}'")]
    UnknownSwitch { name: String },

    // ============ I/O Errors ============
    /// Error reading circuit file
    #[error("Failed to read circuit file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl GridError {
    /// Create a lexer error
    pub fn lexer(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::LexerError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid component error
    pub fn invalid_component(
        name: impl Into<String>,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidComponent {
            name: name.into(),
            line,
            message: message.into(),
        }
    }

    /// Get the underlying solve error, if this is one.
    pub fn as_solve_error(&self) -> Option<SolveError> {
        match self {
            Self::Solve(e) => Some(*e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singular_message_is_multiline() {
        let msg = SolveError::SingularSystem.to_string();
        assert_eq!(msg.lines().count(), 3);
        assert!(msg.starts_with("Can't solve circuit"));
        assert!(msg.ends_with("or\nbattery loops with no resistance."));
    }

    #[test]
    fn test_solve_error_is_transparent() {
        let err: GridError = SolveError::NoBattery.into();
        assert_eq!(err.to_string(), "Add at least one battery.");
        assert_eq!(err.as_solve_error(), Some(SolveError::NoBattery));
    }
}
