//! DC solver for grid circuits.
//!
//! A solve runs five stages from scratch on an immutable borrow of the
//! topology:
//!
//! 1. [`NodeClasses::build`] merges points joined by wires and closed
//!    switches into node classes.
//! 2. [`assemble`] stamps resistors, lightbulbs and batteries into a
//!    Modified Nodal Analysis system `Ax = z`.
//! 3. [`MnaMatrix::factor_and_solve`] solves it by LU decomposition.
//! 4. [`map_results`] expands class voltages back onto every point and
//!    derives component and wire currents.
//! 5. Lightbulbs are classified for brightness and overload (see
//!    [`failure`]).
//!
//! The matrix structure is:
//! ```text
//! [ G   B ] [ v ]   [ 0 ]
//! [ B'  0 ] [ j ] = [ e ]
//! ```
//!
//! where:
//! - G is the conductance matrix over the non-ground node classes
//! - B connects battery branch currents to their terminal classes
//! - v is the vector of class voltages
//! - j is the vector of battery branch currents
//! - e is the vector of battery voltages

pub mod failure;
mod mna;
mod results;
mod simulator;
mod union_find;

pub use failure::BulbReading;
pub use mna::{assemble, MnaLayout, MnaMatrix};
pub use results::{map_results, SolveResult};
pub use simulator::Simulator;
pub use union_find::{NodeClasses, UnionFind};

use tracing::{debug, warn};

use crate::circuit::{validate_classes, CircuitTopology};
use crate::error::SolveError;

/// Default pivot tolerance for singularity detection.
pub const DEFAULT_PIVOT_TOLERANCE: f64 = 1e-12;

/// Configuration for the solver.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// A pivot no larger than this in the row- and column-equilibrated
    /// matrix marks the system singular.
    pub pivot_tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            pivot_tolerance: DEFAULT_PIVOT_TOLERANCE,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pivot tolerance.
    pub fn with_pivot_tolerance(mut self, pivot_tolerance: f64) -> Self {
        self.pivot_tolerance = pivot_tolerance;
        self
    }
}

/// Compute the full DC solution of a topology.
///
/// Ground is the class of the first battery's minus terminal. The result is
/// a pure function of the topology and `config`.
pub fn solve(
    topology: &CircuitTopology,
    config: &SolverConfig,
) -> Result<SolveResult, SolveError> {
    let classes = NodeClasses::build(topology);
    if classes.is_empty() {
        return Err(SolveError::EmptyCircuit);
    }
    let Some(first) = topology.batteries().first() else {
        return Err(SolveError::NoBattery);
    };

    let ground_point = first.minus;
    let ground = classes
        .resolve(ground_point)
        .ok_or(SolveError::SingularSystem)?;

    validate_classes(topology, &classes, ground)?;

    let layout = MnaLayout::new(classes.num_classes(), ground, topology.batteries().len());
    debug!(
        points = classes.num_points(),
        classes = classes.num_classes(),
        unknowns = layout.matrix_size(),
        "assembling MNA system"
    );

    let mut matrix = assemble(topology, &classes, &layout);
    if let Err(e) = matrix.factor_and_solve(config.pivot_tolerance) {
        warn!("MNA system is singular");
        return Err(e);
    }

    Ok(map_results(topology, &classes, &layout, &matrix, ground_point))
}
