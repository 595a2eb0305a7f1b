//! MNA matrix assembly and solving.

use tracing::trace;

use super::union_find::NodeClasses;
use crate::circuit::{CircuitTopology, ClassId, GridPoint};
use crate::error::SolveError;

/// Mapping from node classes and batteries to rows of the MNA system.
///
/// Rows `0..num_nodes` are the voltages of the non-ground classes in class-id
/// order; rows `num_nodes..num_nodes + num_branches` are the battery branch
/// currents in creation order.
#[derive(Debug, Clone, PartialEq)]
pub struct MnaLayout {
    ground: ClassId,
    node_rows: Vec<Option<usize>>,
    num_nodes: usize,
    num_branches: usize,
}

impl MnaLayout {
    /// Lay out the unknowns for `num_classes` classes and `num_batteries`
    /// batteries, with `ground` excluded.
    pub fn new(num_classes: usize, ground: ClassId, num_batteries: usize) -> Self {
        let mut next = 0;
        let node_rows = (0..num_classes)
            .map(|c| {
                if ClassId(c) == ground {
                    None
                } else {
                    next += 1;
                    Some(next - 1)
                }
            })
            .collect();
        Self {
            ground,
            node_rows,
            num_nodes: next,
            num_branches: num_batteries,
        }
    }

    /// The ground class.
    pub fn ground(&self) -> ClassId {
        self.ground
    }

    /// Number of node-voltage unknowns.
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Number of branch-current unknowns.
    pub fn num_branches(&self) -> usize {
        self.num_branches
    }

    /// Get the total size of the MNA solution vector.
    pub fn matrix_size(&self) -> usize {
        self.num_nodes + self.num_branches
    }

    /// Get the matrix index for a class voltage.
    /// Returns None for ground.
    pub fn node_index(&self, class: ClassId) -> Option<usize> {
        self.node_rows.get(class.0).copied().flatten()
    }

    /// Get the matrix index for the branch current of the `k`-th battery.
    pub fn branch_index(&self, k: usize) -> usize {
        self.num_nodes + k
    }
}

/// MNA matrix system Ax = z.
#[derive(Debug, Clone)]
pub struct MnaMatrix {
    /// System matrix A (row-major)
    pub a: Vec<f64>,
    /// Source vector z
    pub z: Vec<f64>,
    /// Solution vector x
    pub x: Vec<f64>,
    /// Matrix dimension
    pub size: usize,
    /// LU decomposition of A
    pub lu: Vec<f64>,
    /// Pivot indices for LU decomposition
    pub pivots: Vec<usize>,
    /// Row equilibration factors applied before factoring
    pub row_scale: Vec<f64>,
    /// Column equilibration factors applied before factoring
    pub col_scale: Vec<f64>,
}

impl MnaMatrix {
    /// Create a zeroed system of the given dimension.
    pub fn new(size: usize) -> Self {
        Self {
            a: vec![0.0; size * size],
            z: vec![0.0; size],
            x: vec![0.0; size],
            size,
            lu: vec![0.0; size * size],
            pivots: vec![0; size],
            row_scale: vec![1.0; size],
            col_scale: vec![1.0; size],
        }
    }

    /// Get matrix element at (row, col).
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.a[row * self.size + col]
    }

    /// Add to matrix element at (row, col).
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        self.a[row * self.size + col] += value;
    }

    /// Add to source vector element.
    pub fn add_source(&mut self, row: usize, value: f64) {
        self.z[row] += value;
    }

    /// Stamp a conductance between two nodes.
    /// For a conductance G between nodes n1 and n2:
    ///   A[n1,n1] += G
    ///   A[n2,n2] += G
    ///   A[n1,n2] -= G
    ///   A[n2,n1] -= G
    pub fn stamp_conductance(&mut self, n1: Option<usize>, n2: Option<usize>, g: f64) {
        if let Some(i) = n1 {
            self.add(i, i, g);
        }
        if let Some(j) = n2 {
            self.add(j, j, g);
        }
        if let (Some(i), Some(j)) = (n1, n2) {
            self.add(i, j, -g);
            self.add(j, i, -g);
        }
    }

    /// Stamp a voltage source between two nodes with branch current at index br.
    /// V[n+] - V[n-] = E
    pub fn stamp_voltage_source(
        &mut self,
        n_pos: Option<usize>,
        n_neg: Option<usize>,
        br: usize,
        voltage: f64,
    ) {
        if let Some(i) = n_pos {
            self.add(br, i, 1.0);
            self.add(i, br, 1.0);
        }
        if let Some(j) = n_neg {
            self.add(br, j, -1.0);
            self.add(j, br, -1.0);
        }
        self.add_source(br, voltage);
    }

    /// Perform LU decomposition with partial pivoting.
    ///
    /// Rows and then columns of A are scaled so that every one has a largest
    /// entry of magnitude 1; conductances and the unit battery entries then
    /// compare on equal terms. A pivot no larger than `tolerance` in the
    /// scaled matrix marks the system as singular, as does an all-zero row or
    /// column.
    pub fn factor(&mut self, tolerance: f64) -> Result<(), SolveError> {
        let n = self.size;
        self.lu.copy_from_slice(&self.a);

        for i in 0..n {
            let row_max = (0..n).fold(0.0_f64, |m, j| m.max(self.lu[i * n + j].abs()));
            if row_max == 0.0 || !row_max.is_finite() {
                return Err(SolveError::SingularSystem);
            }
            self.row_scale[i] = row_max.recip();
            for j in 0..n {
                self.lu[i * n + j] *= self.row_scale[i];
            }
        }
        for j in 0..n {
            let col_max = (0..n).fold(0.0_f64, |m, i| m.max(self.lu[i * n + j].abs()));
            if col_max == 0.0 {
                return Err(SolveError::SingularSystem);
            }
            self.col_scale[j] = col_max.recip();
            for i in 0..n {
                self.lu[i * n + j] *= self.col_scale[j];
            }
        }

        for i in 0..n {
            self.pivots[i] = i;
        }

        for k in 0..n {
            // Find pivot
            let mut max_val = self.lu[k * n + k].abs();
            let mut max_row = k;

            for i in (k + 1)..n {
                let val = self.lu[i * n + k].abs();
                if val > max_val {
                    max_val = val;
                    max_row = i;
                }
            }

            if max_val <= tolerance {
                return Err(SolveError::SingularSystem);
            }

            // Swap rows if needed
            if max_row != k {
                self.pivots.swap(k, max_row);
                for j in 0..n {
                    self.lu.swap(k * n + j, max_row * n + j);
                }
            }

            // Eliminate
            let pivot = self.lu[k * n + k];
            for i in (k + 1)..n {
                let factor = self.lu[i * n + k] / pivot;
                self.lu[i * n + k] = factor;
                for j in (k + 1)..n {
                    self.lu[i * n + j] -= factor * self.lu[k * n + j];
                }
            }
        }

        Ok(())
    }

    /// Solve the system using the pre-computed LU decomposition.
    pub fn solve(&mut self) -> Result<(), SolveError> {
        let n = self.size;

        // Apply row scaling and pivot permutation to z
        for i in 0..n {
            let row = self.pivots[i];
            self.x[i] = self.z[row] * self.row_scale[row];
        }

        // Forward substitution (L * y = Pb)
        for i in 0..n {
            for j in 0..i {
                self.x[i] -= self.lu[i * n + j] * self.x[j];
            }
        }

        // Back substitution (U * x = y)
        for i in (0..n).rev() {
            for j in (i + 1)..n {
                self.x[i] -= self.lu[i * n + j] * self.x[j];
            }
            self.x[i] /= self.lu[i * n + i];
        }

        // Undo column scaling
        for (x, c) in self.x.iter_mut().zip(&self.col_scale) {
            *x *= c;
        }

        if self.x.iter().all(|v| v.is_finite()) {
            Ok(())
        } else {
            Err(SolveError::SingularSystem)
        }
    }

    /// Factor and solve in one step.
    pub fn factor_and_solve(&mut self, tolerance: f64) -> Result<(), SolveError> {
        self.factor(tolerance)?;
        self.solve()
    }

    /// Get the voltage at a node.
    pub fn voltage(&self, node: Option<usize>) -> f64 {
        match node {
            Some(i) => self.x[i],
            None => 0.0, // Ground
        }
    }
}

/// Resolve both terminals of a two-terminal element.
fn terminal_classes(
    classes: &NodeClasses,
    a: GridPoint,
    b: GridPoint,
) -> Option<(ClassId, ClassId)> {
    classes.resolve(a).zip(classes.resolve(b))
}

/// Stamp every resistor, lightbulb and battery into a fresh MNA system.
///
/// Resistive elements whose terminals share a class are skipped. Switches
/// and wires never appear here; they were folded into the classes.
pub fn assemble(
    topology: &CircuitTopology,
    classes: &NodeClasses,
    layout: &MnaLayout,
) -> MnaMatrix {
    let mut matrix = MnaMatrix::new(layout.matrix_size());

    let resistive = topology
        .resistors()
        .iter()
        .map(|r| (r.a, r.b, r.conductance()))
        .chain(topology.lightbulbs().iter().map(|lb| (lb.a, lb.b, lb.conductance())));

    for (a, b, g) in resistive {
        let Some((ca, cb)) = terminal_classes(classes, a, b) else {
            continue;
        };
        if ca == cb {
            trace!(%a, %b, "skipping self-connected element");
            continue;
        }
        matrix.stamp_conductance(layout.node_index(ca), layout.node_index(cb), g);
    }

    for (k, battery) in topology.batteries().iter().enumerate() {
        let Some((cp, cm)) = terminal_classes(classes, battery.plus, battery.minus) else {
            continue;
        };
        matrix.stamp_voltage_source(
            layout.node_index(cp),
            layout.node_index(cm),
            layout.branch_index(k),
            battery.volts,
        );
    }

    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pt(x: i32, y: i32) -> GridPoint {
        GridPoint::new(x, y)
    }

    #[test]
    fn test_layout_skips_ground() {
        let layout = MnaLayout::new(4, ClassId(1), 2);
        assert_eq!(layout.matrix_size(), 5);
        assert_eq!(layout.node_index(ClassId(0)), Some(0));
        assert_eq!(layout.node_index(ClassId(1)), None);
        assert_eq!(layout.node_index(ClassId(3)), Some(2));
        assert_eq!(layout.branch_index(1), 4);
    }

    #[test]
    fn test_lu_solves_small_system() {
        // 2x + y = 5, x + 3y = 10
        let mut m = MnaMatrix::new(2);
        m.add(0, 0, 2.0);
        m.add(0, 1, 1.0);
        m.add(1, 0, 1.0);
        m.add(1, 1, 3.0);
        m.add_source(0, 5.0);
        m.add_source(1, 10.0);
        m.factor_and_solve(1e-12).unwrap();
        assert_relative_eq!(m.x[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(m.x[1], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_lu_rejects_singular() {
        let mut m = MnaMatrix::new(2);
        m.add(0, 0, 1.0);
        m.add(0, 1, 2.0);
        m.add(1, 0, 2.0);
        m.add(1, 1, 4.0);
        assert_eq!(m.factor(1e-12), Err(SolveError::SingularSystem));

        let mut zero = MnaMatrix::new(3);
        assert_eq!(zero.factor(1e-12), Err(SolveError::SingularSystem));
    }

    #[test]
    fn test_assemble_stamps_and_dimension() {
        // Battery (0,0)+ / (0,2)- ; resistor (0,0)-(2,0) ; lightbulb (2,0)-(0,2)
        let mut t = CircuitTopology::new();
        t.add_battery(pt(0, 0), pt(0, 2), 9.0).unwrap();
        t.add_resistor(pt(0, 0), pt(2, 0), 100.0).unwrap();
        t.add_lightbulb(pt(2, 0), pt(0, 2), 50.0).unwrap();

        let classes = NodeClasses::build(&t);
        let ground = classes.resolve(pt(0, 2)).unwrap();
        let layout = MnaLayout::new(classes.num_classes(), ground, 1);
        let m = assemble(&t, &classes, &layout);

        assert_eq!(m.size, (classes.num_classes() - 1) + 1);
        let plus = layout.node_index(classes.resolve(pt(0, 0)).unwrap()).unwrap();
        let mid = layout.node_index(classes.resolve(pt(2, 0)).unwrap()).unwrap();
        let br = layout.branch_index(0);

        assert_relative_eq!(m.get(plus, plus), 0.01);
        assert_relative_eq!(m.get(mid, mid), 0.01 + 0.02);
        assert_relative_eq!(m.get(plus, mid), -0.01);
        assert_relative_eq!(m.get(plus, br), 1.0);
        assert_relative_eq!(m.get(br, plus), 1.0);
        assert_relative_eq!(m.z[br], 9.0);
    }

    #[test]
    fn test_assemble_skips_shorted_resistor() {
        let mut t = CircuitTopology::new();
        t.add_battery(pt(0, 0), pt(0, 2), 9.0).unwrap();
        t.add_wire(pt(3, 0), pt(4, 0));
        t.add_resistor(pt(3, 0), pt(4, 0), 10.0).unwrap();

        let classes = NodeClasses::build(&t);
        let ground = classes.resolve(pt(0, 2)).unwrap();
        let layout = MnaLayout::new(classes.num_classes(), ground, 1);
        let m = assemble(&t, &classes, &layout);

        let shorted = layout.node_index(classes.resolve(pt(3, 0)).unwrap()).unwrap();
        assert_eq!(m.get(shorted, shorted), 0.0);
    }
}
