//! Circuit representation and validation.
//!
//! This module provides the editable state of a grid circuit. The
//! [`CircuitTopology`] struct holds the wire set and the component lists in
//! creation order; the solver borrows it immutably.

mod topology;
mod types;
mod validate;

pub use topology::{manhattan_path, CircuitTopology, Erased, MAX_ROUTE_LENGTH};
pub use types::*;
pub use validate::validate_classes;
