//! Small synthetic crystals with hand-checked assembly content, shared by tests.

use super::config::EnumerationConfig;
use super::context::AssemblyContext;
use crate::core::models::interface::{Interface, InterfaceList};
use crate::core::models::structure::{CrystalStructure, CrystalStructureBuilder, Entity};
use crate::core::models::symmetry::{SpaceGroup, SymOp};
use nalgebra::Vector3;

pub(crate) fn diagonal(x: f64, y: f64, z: f64, translation: [f64; 3]) -> SymOp {
    SymOp::from_rows([[x, 0.0, 0.0], [0.0, y, 0.0], [0.0, 0.0, z]], translation)
}

pub(crate) fn three_fold_z(translation: [f64; 3]) -> SymOp {
    SymOp::from_rows(
        [[0.0, -1.0, 0.0], [1.0, -1.0, 0.0], [0.0, 0.0, 1.0]],
        translation,
    )
}

pub(crate) fn three_fold_z_squared(translation: [f64; 3]) -> SymOp {
    SymOp::from_rows(
        [[-1.0, 1.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
        translation,
    )
}

pub(crate) fn translation(x: i32, y: i32, z: i32) -> SymOp {
    SymOp::from_cell_translation(Vector3::new(x, y, z))
}

pub(crate) fn single_entity_structure(space_group: SpaceGroup) -> CrystalStructure {
    let mut builder = CrystalStructureBuilder::new();
    builder
        .add_entity(Entity::new("A"))
        .add_chain("A", 0)
        .space_group(space_group);
    builder.build().unwrap()
}

pub(crate) fn context(
    structure: CrystalStructure,
    interfaces: Vec<Interface>,
    num_clusters: usize,
) -> AssemblyContext {
    AssemblyContext::new(
        structure,
        InterfaceList::new(interfaces, num_clusters).unwrap(),
        EnumerationConfig::default(),
    )
    .unwrap()
}

/// P1 heterodimer crystal: chains A and B of different entities.
///
/// Cluster 0 pairs A with B inside the asymmetric unit (a finite 1:1 dimer);
/// cluster 1 stacks A onto its own copy one cell along a (an infinite fiber).
pub(crate) fn dimer_and_fiber() -> AssemblyContext {
    let mut builder = CrystalStructureBuilder::new();
    builder
        .add_entity(Entity::new("A"))
        .add_entity(Entity::new("B"))
        .add_chain("A", 0)
        .add_chain("B", 1);
    let structure = builder.build().unwrap();
    context(
        structure,
        vec![
            Interface::new(1, "A", "B", SymOp::identity(), 0).with_area(900.0),
            Interface::new(2, "A", "A", translation(1, 0, 0), 1).with_area(300.0),
        ],
        2,
    )
}

/// P2 crystal with two distinct two-fold dimers that together form an infinite chain.
pub(crate) fn p2_dimers() -> AssemblyContext {
    let group = SpaceGroup::new(
        "P 1 2 1",
        vec![SymOp::identity(), diagonal(-1.0, 1.0, -1.0, [0.0; 3])],
    )
    .unwrap();
    context(
        single_entity_structure(group),
        vec![
            Interface::new(1, "A", "A", diagonal(-1.0, 1.0, -1.0, [0.0; 3]), 0),
            Interface::new(2, "A", "A", diagonal(-1.0, 1.0, -1.0, [1.0, 0.0, 0.0]), 1),
        ],
        2,
    )
}

/// P3 crystal with two different three-fold trimers and a translational contact.
///
/// Cluster 0 is the three-fold through the origin, cluster 1 a pure translation
/// along c, cluster 2 the three-fold through (1, 0, 0). Combining the two
/// three-folds generates lattice translations.
pub(crate) fn p3_trimers() -> AssemblyContext {
    let group = SpaceGroup::new(
        "P 3",
        vec![
            SymOp::identity(),
            three_fold_z([0.0; 3]),
            three_fold_z_squared([0.0; 3]),
        ],
    )
    .unwrap();
    context(
        single_entity_structure(group),
        vec![
            Interface::new(1, "A", "A", three_fold_z([0.0; 3]), 0),
            Interface::new(2, "A", "A", translation(0, 0, 1), 1),
            Interface::new(3, "A", "A", three_fold_z([1.0, 0.0, 0.0]), 2),
        ],
        3,
    )
}

/// P222 crystal whose three two-folds through the origin pair up into one D2 tetramer.
pub(crate) fn p222_tetramer() -> AssemblyContext {
    let two_z = diagonal(-1.0, -1.0, 1.0, [0.0; 3]);
    let two_y = diagonal(-1.0, 1.0, -1.0, [0.0; 3]);
    let two_x = diagonal(1.0, -1.0, -1.0, [0.0; 3]);
    let group = SpaceGroup::new("P 2 2 2", vec![SymOp::identity(), two_z, two_y, two_x]).unwrap();
    context(
        single_entity_structure(group),
        vec![
            Interface::new(1, "A", "A", two_z, 0),
            Interface::new(2, "A", "A", two_y, 1),
            Interface::new(3, "A", "A", two_x, 2),
        ],
        3,
    )
}

/// P1 crystal with three chains in the asymmetric unit contacting each other pairwise.
pub(crate) fn p1_triangle() -> AssemblyContext {
    let mut builder = CrystalStructureBuilder::new();
    builder
        .add_entity(Entity::new("A"))
        .add_chain("A", 0)
        .add_chain("B", 0)
        .add_chain("C", 0);
    let structure = builder.build().unwrap();
    context(
        structure,
        vec![
            Interface::new(1, "A", "B", SymOp::identity(), 0),
            Interface::new(2, "B", "C", SymOp::identity(), 1),
            Interface::new(3, "A", "C", SymOp::identity(), 2),
        ],
        3,
    )
}
