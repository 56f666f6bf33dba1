use super::assembly::Assembly;
use super::config::EnumerationConfig;
use super::engaged::EngagedSet;
use super::error::AssemblyError;
use crate::core::lattice::LatticeGraph;
use crate::core::models::interface::InterfaceList;
use crate::core::models::structure::CrystalStructure;
use tracing::{info, instrument};

/// Read-only inputs shared by every assembly of one crystal.
///
/// Owns the structure, the interface catalog and the deduplicated lattice graph;
/// assemblies only borrow it.
#[derive(Debug)]
pub struct AssemblyContext {
    structure: CrystalStructure,
    interfaces: InterfaceList,
    graph: LatticeGraph,
    config: EnumerationConfig,
}

impl AssemblyContext {
    #[instrument(skip_all, name = "assembly_context")]
    pub fn new(
        structure: CrystalStructure,
        interfaces: InterfaceList,
        config: EnumerationConfig,
    ) -> Result<Self, AssemblyError> {
        config.validate()?;

        let num_clusters = interfaces.num_clusters();
        if let Some(limit) = config
            .max_interface_clusters
            .filter(|&limit| num_clusters > limit)
        {
            return Err(AssemblyError::TooManyInterfaceClusters {
                found: num_clusters,
                limit,
            });
        }

        let mut graph = LatticeGraph::build(&structure, &interfaces, config.operator_tolerance)?;
        let duplicates = graph.remove_duplicate_edges();

        info!(
            chains = structure.chains().len(),
            operators = structure.space_group().len(),
            interfaces = interfaces.len(),
            clusters = num_clusters,
            edges = graph.num_edges(),
            duplicates,
            "Lattice graph ready for assembly enumeration."
        );

        Ok(Self {
            structure,
            interfaces,
            graph,
            config,
        })
    }

    pub fn structure(&self) -> &CrystalStructure {
        &self.structure
    }

    pub fn interfaces(&self) -> &InterfaceList {
        &self.interfaces
    }

    pub fn lattice_graph(&self) -> &LatticeGraph {
        &self.graph
    }

    pub fn config(&self) -> &EnumerationConfig {
        &self.config
    }

    pub fn num_clusters(&self) -> usize {
        self.interfaces.num_clusters()
    }

    /// # Panics
    ///
    /// Panics if `engaged` is not sized to this crystal's interface clusters.
    pub fn assembly(&self, engaged: EngagedSet) -> Assembly<'_> {
        assert_eq!(
            engaged.size(),
            self.num_clusters(),
            "engaged set size does not match the number of interface clusters"
        );
        Assembly::new(self, engaged)
    }

    /// The asymmetric unit alone, with no interface engaged.
    pub fn empty_assembly(&self) -> Assembly<'_> {
        Assembly::new(self, EngagedSet::new(self.num_clusters()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lattice::LatticeError;
    use crate::core::models::interface::Interface;
    use crate::core::models::structure::StructureError;
    use crate::core::models::symmetry::SymOp;
    use crate::engine::config::EnumerationConfigBuilder;
    use crate::engine::fixtures;

    #[test]
    fn new_removes_duplicate_edges() {
        let context = fixtures::p2_dimers();
        assert_eq!(context.lattice_graph().num_edges(), 2);
        assert_eq!(context.num_clusters(), 2);
    }

    #[test]
    fn new_rejects_too_many_clusters() {
        let structure = fixtures::single_entity_structure(Default::default());
        let interfaces = InterfaceList::new(
            vec![
                Interface::new(1, "A", "A", fixtures::translation(1, 0, 0), 0),
                Interface::new(2, "A", "A", fixtures::translation(0, 1, 0), 1),
            ],
            2,
        )
        .unwrap();
        let config = EnumerationConfigBuilder::new()
            .max_interface_clusters(1)
            .build()
            .unwrap();
        let err = AssemblyContext::new(structure, interfaces, config).unwrap_err();
        assert!(matches!(
            err,
            AssemblyError::TooManyInterfaceClusters { found: 2, limit: 1 }
        ));
    }

    #[test]
    fn new_propagates_lattice_errors() {
        let structure = fixtures::single_entity_structure(Default::default());
        let interfaces =
            InterfaceList::new(vec![Interface::new(1, "A", "Q", SymOp::identity(), 0)], 1)
                .unwrap();
        let err =
            AssemblyContext::new(structure, interfaces, EnumerationConfig::default()).unwrap_err();
        assert!(matches!(err, AssemblyError::Lattice { .. }));
    }

    #[test]
    fn new_rejects_non_finite_interface_operator() {
        let structure = fixtures::single_entity_structure(Default::default());
        let broken = SymOp::from_rows([[f64::NAN; 3]; 3], [f64::NAN; 3]);
        let interfaces = InterfaceList::new(vec![Interface::new(1, "A", "A", broken, 0)], 1).unwrap();
        let err =
            AssemblyContext::new(structure, interfaces, EnumerationConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            AssemblyError::Lattice {
                source: LatticeError::NonFiniteOperator { interface_id: 1 }
            }
        ));
    }

    #[test]
    fn structure_errors_convert_into_assembly_errors() {
        let err: AssemblyError = StructureError::DuplicateInterface { interface_id: 4 }.into();
        assert!(err.to_string().contains("Interface 4"));
    }

    #[test]
    fn new_rejects_invalid_config() {
        let structure = fixtures::single_entity_structure(Default::default());
        let config = EnumerationConfig {
            operator_tolerance: -1.0,
            max_interface_clusters: None,
        };
        let err = AssemblyContext::new(structure, InterfaceList::default(), config).unwrap_err();
        assert!(matches!(err, AssemblyError::Config { .. }));
    }

    #[test]
    #[should_panic(expected = "engaged set size")]
    fn assembly_rejects_mismatched_engaged_set() {
        let context = fixtures::dimer_and_fiber();
        let _ = context.assembly(EngagedSet::new(5));
    }
}
