use super::structure::StructureError;
use nalgebra::{Matrix3, Vector3};
use std::fmt;

const SPACE_GROUP_TOLERANCE: f64 = 1e-6;
const DISPLAY_EPSILON: f64 = 1e-6;

/// A crystallographic symmetry operator acting on fractional coordinates.
///
/// The operator maps a point `x` to `rotation * x + translation`. Rotations of a
/// real space group are integer matrices in the lattice basis, but they are kept as
/// `f64` so operators coming from upstream detection can carry numerical noise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymOp {
    pub rotation: Matrix3<f64>,
    pub translation: Vector3<f64>,
}

impl SymOp {
    pub fn new(rotation: Matrix3<f64>, translation: Vector3<f64>) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Builds an operator from row-major rotation rows and a translation.
    pub fn from_rows(rows: [[f64; 3]; 3], translation: [f64; 3]) -> Self {
        Self {
            rotation: Matrix3::new(
                rows[0][0], rows[0][1], rows[0][2], rows[1][0], rows[1][1], rows[1][2],
                rows[2][0], rows[2][1], rows[2][2],
            ),
            translation: Vector3::from(translation),
        }
    }

    pub fn identity() -> Self {
        Self::new(Matrix3::identity(), Vector3::zeros())
    }

    /// A pure lattice translation by the given number of unit cells.
    pub fn from_cell_translation(cells: Vector3<i32>) -> Self {
        Self::new(Matrix3::identity(), cells.map(f64::from))
    }

    /// Returns `self ∘ other`, i.e. the operator applying `other` first.
    pub fn compose(&self, other: &SymOp) -> SymOp {
        SymOp {
            rotation: self.rotation * other.rotation,
            translation: self.rotation * other.translation + self.translation,
        }
    }

    pub fn inverse(&self) -> Option<SymOp> {
        let rotation = self.rotation.try_inverse()?;
        Some(SymOp {
            rotation,
            translation: -(rotation * self.translation),
        })
    }

    pub fn apply(&self, point: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * point + self.translation
    }

    pub fn is_identity(&self, tolerance: f64) -> bool {
        (self.rotation - Matrix3::identity()).amax() <= tolerance
            && self.translation.amax() <= tolerance
    }

    /// Whether the rotational part is the identity, i.e. the operator is a pure translation.
    pub fn is_pure_translation(&self, tolerance: f64) -> bool {
        (self.rotation - Matrix3::identity()).amax() <= tolerance
    }

    /// Whether every rotation and translation entry is a finite number.
    pub fn is_finite(&self) -> bool {
        self.rotation.iter().all(|v| v.is_finite()) && self.translation.iter().all(|v| v.is_finite())
    }

    /// Finds the integer cell shift `s` such that `self = Tr(s) ∘ other`.
    ///
    /// Returns `None` when the rotational parts differ or the translational parts
    /// do not differ by a whole lattice vector, both within `tolerance`, and for
    /// operators with non-finite entries.
    pub fn lattice_shift_to(&self, other: &SymOp, tolerance: f64) -> Option<Vector3<i32>> {
        if !self.is_finite() || !other.is_finite() {
            return None;
        }
        if (self.rotation - other.rotation).amax() > tolerance {
            return None;
        }
        let delta = self.translation - other.translation;
        let rounded = delta.map(f64::round);
        if (delta - rounded).amax() > tolerance {
            return None;
        }
        Some(rounded.map(|v| v as i32))
    }
}

impl Default for SymOp {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for SymOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const AXES: [char; 3] = ['x', 'y', 'z'];
        let rows: Vec<String> = (0..3)
            .map(|i| {
                let mut row = String::new();
                for (j, axis) in AXES.iter().enumerate() {
                    let coefficient = self.rotation[(i, j)];
                    if coefficient.abs() < DISPLAY_EPSILON {
                        continue;
                    }
                    if coefficient < 0.0 {
                        row.push('-');
                    } else if !row.is_empty() {
                        row.push('+');
                    }
                    if (coefficient.abs() - 1.0).abs() > DISPLAY_EPSILON {
                        row.push_str(&format!("{}*", coefficient.abs()));
                    }
                    row.push(*axis);
                }
                let shift = self.translation[i];
                if shift.abs() > DISPLAY_EPSILON {
                    if shift < 0.0 {
                        row.push('-');
                    } else if !row.is_empty() {
                        row.push('+');
                    }
                    row.push_str(&format_fraction(shift.abs()));
                }
                if row.is_empty() {
                    row.push('0');
                }
                row
            })
            .collect();
        write!(f, "{}", rows.join(","))
    }
}

fn format_fraction(value: f64) -> String {
    for denominator in [1.0, 2.0, 3.0, 4.0, 6.0] {
        let numerator = value * denominator;
        if (numerator - numerator.round()).abs() < DISPLAY_EPSILON {
            return if denominator == 1.0 {
                format!("{}", numerator.round())
            } else {
                format!("{}/{}", numerator.round(), denominator)
            };
        }
    }
    format!("{value:.4}")
}

/// The unit-cell operators of a crystallographic space group.
///
/// Operator 0 is always the identity; the asymmetric unit sits at that position.
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceGroup {
    name: String,
    operators: Vec<SymOp>,
}

impl SpaceGroup {
    pub fn new(name: impl Into<String>, operators: Vec<SymOp>) -> Result<Self, StructureError> {
        let name = name.into();
        let first = operators
            .first()
            .ok_or_else(|| StructureError::EmptySpaceGroup { name: name.clone() })?;
        if let Some(index) = operators.iter().position(|op| !op.is_finite()) {
            return Err(StructureError::NonFiniteOperator { name, index });
        }
        if !first.is_identity(SPACE_GROUP_TOLERANCE) {
            return Err(StructureError::MissingIdentityOperator { name });
        }
        for (i, op_i) in operators.iter().enumerate() {
            for (j, op_j) in operators.iter().enumerate().skip(i + 1) {
                if op_i.lattice_shift_to(op_j, SPACE_GROUP_TOLERANCE).is_some() {
                    return Err(StructureError::DuplicateOperator {
                        name,
                        first: i,
                        second: j,
                    });
                }
            }
        }
        Ok(Self { name, operators })
    }

    /// The triclinic space group with the identity as its only operator.
    pub fn p1() -> Self {
        Self {
            name: "P 1".to_string(),
            operators: vec![SymOp::identity()],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn operators(&self) -> &[SymOp] {
        &self.operators
    }

    pub fn operator(&self, index: usize) -> Option<&SymOp> {
        self.operators.get(index)
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Locates the unit-cell operator that `op` reduces to modulo lattice translations.
    ///
    /// Returns the operator index and the cell shift `s` with `op = Tr(s) ∘ operators[index]`.
    pub fn find_equivalent(&self, op: &SymOp, tolerance: f64) -> Option<(usize, Vector3<i32>)> {
        self.matching_operators(op, tolerance).next()
    }

    /// Every unit-cell operator that `op` matches within `tolerance`, in operator order.
    ///
    /// More than one match means the tolerance is too loose to tell apart operators
    /// that share a rotation, as in centred groups.
    pub fn matching_operators<'s>(
        &'s self,
        op: &'s SymOp,
        tolerance: f64,
    ) -> impl Iterator<Item = (usize, Vector3<i32>)> + 's {
        self.operators
            .iter()
            .enumerate()
            .filter_map(move |(index, candidate)| {
                op.lattice_shift_to(candidate, tolerance)
                    .map(|shift| (index, shift))
            })
    }
}

impl Default for SpaceGroup {
    fn default() -> Self {
        Self::p1()
    }
}
