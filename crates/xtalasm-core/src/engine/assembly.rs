use super::context::AssemblyContext;
use super::engaged::EngagedSet;
use super::stoichiometry::{Stoichiometry, StoichiometrySet};
use crate::core::lattice::LatticeEdge;
use crate::core::models::ids::NodeId;
use nalgebra::Vector3;
use slotmap::SecondaryMap;
use std::cmp::Ordering;
use std::collections::{BTreeSet, VecDeque};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;
use tracing::trace;

/// One connected piece of the lattice graph restricted to the engaged edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    /// Member nodes in canonical order, each with its lattice position relative
    /// to the first member.
    placements: Vec<(NodeId, Vector3<i32>)>,
    edges: Vec<usize>,
    finite: bool,
    stoichiometry: Stoichiometry,
}

impl Component {
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.placements.iter().map(|(node, _)| *node)
    }

    pub fn placements(&self) -> &[(NodeId, Vector3<i32>)] {
        &self.placements
    }

    /// Indices into the lattice graph's edge list.
    pub fn edges(&self) -> &[usize] {
        &self.edges
    }

    /// Whether the component is a closed complex rather than an aggregate that
    /// repeats through the whole crystal.
    pub fn is_finite(&self) -> bool {
        self.finite
    }

    pub fn stoichiometry(&self) -> &Stoichiometry {
        &self.stoichiometry
    }

    /// Number of chain copies.
    pub fn size(&self) -> usize {
        self.placements.len()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.placements.iter().any(|(member, _)| *member == node)
    }
}

#[derive(Debug, Clone)]
struct Topology {
    components: Vec<Component>,
    stoichiometry: StoichiometrySet,
}

/// A candidate assembly: the complexes obtained by engaging a set of interface clusters.
///
/// Connectivity, validity and stoichiometry are derived from the lattice graph on
/// first use and cached. Two assemblies are equal when they engage the same clusters.
#[derive(Clone)]
pub struct Assembly<'a> {
    context: &'a AssemblyContext,
    engaged: EngagedSet,
    topology: OnceLock<Topology>,
}

impl<'a> Assembly<'a> {
    pub fn new(context: &'a AssemblyContext, engaged: EngagedSet) -> Self {
        Self {
            context,
            engaged,
            topology: OnceLock::new(),
        }
    }

    pub fn context(&self) -> &'a AssemblyContext {
        self.context
    }

    pub fn engaged_set(&self) -> &EngagedSet {
        &self.engaged
    }

    pub fn into_engaged_set(self) -> EngagedSet {
        self.engaged
    }

    pub fn num_engaged(&self) -> usize {
        self.engaged.count()
    }

    pub fn engaged_clusters(&self) -> Vec<usize> {
        self.engaged.iter().collect()
    }

    pub fn is_superset_of(&self, other: &Assembly<'_>) -> bool {
        self.engaged.is_superset_of(&other.engaged)
    }

    /// Whether every connected component is finite.
    pub fn is_valid(&self) -> bool {
        self.topology()
            .components
            .iter()
            .all(Component::is_finite)
    }

    /// Child assemblies engaging one more cluster, skipping supersets of `invalid`.
    pub fn children(&self, invalid: &[EngagedSet]) -> Vec<Assembly<'a>> {
        self.engaged
            .children(invalid)
            .into_iter()
            .map(|engaged| Assembly::new(self.context, engaged))
            .collect()
    }

    /// Connected components, ordered by their first node; unengaged copies are
    /// single-node components.
    pub fn components(&self) -> &[Component] {
        &self.topology().components
    }

    /// The component holding the first asymmetric-unit chain at the identity position.
    pub fn first_component(&self) -> Option<&Component> {
        self.components().first()
    }

    pub fn stoichiometry_set(&self) -> &StoichiometrySet {
        &self.topology().stoichiometry
    }

    pub fn is_fully_covering(&self) -> bool {
        self.stoichiometry_set().is_fully_covering()
    }

    /// Number of chain copies in the first component.
    pub fn first_component_size(&self) -> usize {
        self.first_component().map_or(0, Component::size)
    }

    /// Edges of the given cluster inside the first component.
    ///
    /// # Panics
    ///
    /// Panics if `cluster` is not a valid interface cluster index.
    pub fn edges_in_first_component(
        &self,
        cluster: usize,
    ) -> impl Iterator<Item = &'a LatticeEdge> + '_ {
        assert!(
            cluster < self.engaged.size(),
            "interface cluster index {cluster} out of range for {} clusters",
            self.engaged.size()
        );
        let graph = self.context.lattice_graph();
        self.first_component()
            .into_iter()
            .flat_map(|component| component.edges().iter())
            .filter_map(move |&index| graph.edge(index))
            .filter(move |edge| edge.cluster == cluster)
    }

    pub fn edge_count_in_first_component(&self, cluster: usize) -> usize {
        self.edges_in_first_component(cluster).count()
    }

    /// Stoichiometry formula of the distinct components, e.g. `A2B2`.
    pub fn description(&self) -> String {
        self.stoichiometry_set()
            .formula(self.context.structure().entities())
    }

    fn topology(&self) -> &Topology {
        self.topology
            .get_or_init(|| compute_topology(self.context, &self.engaged))
    }
}

/// Breadth-first traversal of the engaged subgraph assigning integer lattice
/// positions. Reaching a node again at another position means a cycle of
/// operators adds up to a net lattice translation: the component is infinite.
fn compute_topology(context: &AssemblyContext, engaged: &EngagedSet) -> Topology {
    let graph = context.lattice_graph();
    let num_entities = context.structure().num_entities();

    let mut positions: SecondaryMap<NodeId, Vector3<i32>> = SecondaryMap::new();
    let mut components = Vec::new();

    for &root in graph.node_ids() {
        if positions.contains_key(root) {
            continue;
        }
        positions.insert(root, Vector3::zeros());

        let mut queue = VecDeque::from([root]);
        let mut placements = Vec::new();
        let mut edges = BTreeSet::new();
        let mut finite = true;

        while let Some(node) = queue.pop_front() {
            let position = positions[node];
            placements.push((node, position));

            for &index in graph.incident_edges(node) {
                let Some(edge) = graph.edge(index) else {
                    continue;
                };
                if !engaged.is_on(edge.cluster) {
                    continue;
                }
                edges.insert(index);
                let Some((neighbor, shift)) = edge.traverse_from(node) else {
                    continue;
                };
                let expected = position + shift;
                match positions.get(neighbor) {
                    Some(known) => {
                        if *known != expected {
                            finite = false;
                        }
                    }
                    None => {
                        positions.insert(neighbor, expected);
                        queue.push_back(neighbor);
                    }
                }
            }
        }

        placements.sort_by_key(|(node, _)| graph.node(*node).map(|n| n.key));
        let mut stoichiometry = Stoichiometry::new(num_entities);
        for (node, _) in &placements {
            if let Some(lattice_node) = graph.node(*node) {
                stoichiometry.add(lattice_node.entity);
            }
        }

        components.push(Component {
            placements,
            edges: edges.into_iter().collect(),
            finite,
            stoichiometry,
        });
    }

    trace!(
        engaged = %engaged,
        components = components.len(),
        infinite = components.iter().filter(|c| !c.finite).count(),
        "Computed assembly topology."
    );

    let stoichiometry = StoichiometrySet::new(
        components
            .iter()
            .map(|component| component.stoichiometry.clone())
            .collect(),
    );
    Topology {
        components,
        stoichiometry,
    }
}

impl PartialEq for Assembly<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.engaged == other.engaged
    }
}

impl Eq for Assembly<'_> {}

impl Hash for Assembly<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.engaged.hash(state);
    }
}

impl PartialOrd for Assembly<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Assembly<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.engaged.cmp(&other.engaged)
    }
}

impl fmt::Debug for Assembly<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assembly")
            .field("engaged", &self.engaged)
            .field("evaluated", &self.topology.get().is_some())
            .finish()
    }
}

impl fmt::Display for Assembly<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.engaged)
    }
}
