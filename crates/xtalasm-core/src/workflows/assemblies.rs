use crate::core::lattice::LatticeGraph;
use crate::core::models::interface::InterfaceCluster;
use crate::core::models::structure::CrystalStructure;
use crate::engine::assembly::Assembly;
use crate::engine::context::AssemblyContext;
use crate::engine::engaged::EngagedSet;
use crate::engine::enumeration::{self, Enumeration};
use crate::engine::grouping::{self, AssemblyEquivalence, AssemblyGroup, GroupKey, SameComponents};
use crate::engine::progress::{Progress, ProgressReporter};
use std::collections::BTreeMap;
use tracing::{info, instrument};

/// The unique assemblies of one crystal.
///
/// Construction enumerates every valid combination of interface clusters, groups
/// the results by size and collapses equivalent solutions into clusters. The
/// cluster order is deterministic: increasing size, then the non-covering
/// assemblies one by one.
#[derive(Debug)]
pub struct CrystalAssemblies<'a> {
    context: &'a AssemblyContext,
    enumeration: Enumeration<'a>,
    groups: BTreeMap<GroupKey, AssemblyGroup<'a>>,
    clusters: Vec<AssemblyGroup<'a>>,
}

impl<'a> CrystalAssemblies<'a> {
    pub fn new(context: &'a AssemblyContext, reporter: &ProgressReporter) -> Self {
        Self::with_equivalence(context, reporter, &SameComponents)
    }

    #[instrument(skip_all, name = "crystal_assemblies_workflow")]
    pub fn with_equivalence(
        context: &'a AssemblyContext,
        reporter: &ProgressReporter,
        equivalence: &dyn AssemblyEquivalence,
    ) -> Self {
        // === Phase 1: Pruned enumeration of engaged sets ===
        let enumeration = enumeration::run(context, reporter);

        // === Phase 2: Grouping and clustering ===
        reporter.report(Progress::PhaseStart { name: "Clustering" });
        let groups = grouping::group(&enumeration.valid);
        let clusters = grouping::cluster(&groups, equivalence);
        reporter.report(Progress::PhaseFinish);

        info!(
            valid = enumeration.valid.len(),
            groups = groups.len(),
            clusters = clusters.len(),
            "Assembly clustering finished."
        );
        reporter.report(Progress::Message(format!(
            "Found {} unique assemblies among {} valid ones.",
            clusters.len(),
            enumeration.valid.len()
        )));

        Self {
            context,
            enumeration,
            groups,
            clusters,
        }
    }

    /// Number of assembly clusters.
    pub fn size(&self) -> usize {
        self.clusters.len()
    }

    /// One representative per cluster, in cluster order.
    pub fn unique_assemblies(&self) -> Vec<&Assembly<'a>> {
        self.clusters
            .iter()
            .filter_map(AssemblyGroup::representative)
            .collect()
    }

    /// Every valid assembly, unclustered, in engaged-set order.
    pub fn all_assemblies(&self) -> &[Assembly<'a>] {
        &self.enumeration.valid
    }

    pub fn clusters(&self) -> &[AssemblyGroup<'a>] {
        &self.clusters
    }

    pub fn groups(&self) -> &BTreeMap<GroupKey, AssemblyGroup<'a>> {
        &self.groups
    }

    /// Assemblies found invalid during enumeration.
    pub fn invalid_assemblies(&self) -> &[Assembly<'a>] {
        &self.enumeration.invalid
    }

    /// Number of non-empty engaged sets that were evaluated.
    pub fn evaluated_count(&self) -> usize {
        self.enumeration.evaluated
    }

    /// The assembly engaging only `cluster`, whether or not it was enumerated.
    ///
    /// # Panics
    ///
    /// Panics if `cluster` is not a valid interface cluster index.
    pub fn generate_assembly(&self, cluster: usize) -> Assembly<'a> {
        self.generate_assembly_from(&[cluster])
    }

    /// # Panics
    ///
    /// Panics if any index is not a valid interface cluster index.
    pub fn generate_assembly_from(&self, clusters: &[usize]) -> Assembly<'a> {
        let engaged = EngagedSet::from_indices(self.context.num_clusters(), clusters.iter().copied());
        self.context.assembly(engaged)
    }

    /// Apparent rotational order generated by a single interface cluster.
    ///
    /// Counts the cluster's edges in the first component of the assembly engaging
    /// only that cluster; an edge merged with its own reverse (a two-fold contact)
    /// counts twice.
    pub fn edge_multiplicity(&self, cluster: usize) -> usize {
        let assembly = self.generate_assembly(cluster);
        assembly
            .edges_in_first_component(cluster)
            .map(|edge| if edge.involution { 2 } else { 1 })
            .sum()
    }

    pub fn context(&self) -> &'a AssemblyContext {
        self.context
    }

    pub fn lattice_graph(&self) -> &'a LatticeGraph {
        self.context.lattice_graph()
    }

    pub fn interface_clusters(&self) -> &'a [InterfaceCluster] {
        self.context.interfaces().clusters()
    }

    pub fn structure(&self) -> &'a CrystalStructure {
        self.context.structure()
    }

    /// Representatives in cluster order.
    pub fn iter(&self) -> impl Iterator<Item = &Assembly<'a>> + '_ {
        self.clusters.iter().filter_map(AssemblyGroup::representative)
    }
}

impl<'s, 'a> IntoIterator for &'s CrystalAssemblies<'a> {
    type Item = &'s Assembly<'a>;
    type IntoIter = std::vec::IntoIter<&'s Assembly<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.unique_assemblies().into_iter()
    }
}
