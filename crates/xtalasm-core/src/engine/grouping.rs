use super::assembly::{Assembly, Component};
use super::stoichiometry::Stoichiometry;
use crate::core::models::ids::NodeId;
use nalgebra::Vector3;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, instrument};

/// Coarse bucket of a valid assembly, used before equivalence clustering.
///
/// Fully covering assemblies are keyed by the number of chain copies in their
/// first component; all others share the `NonCovering` bucket, which sorts last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupKey {
    Size(usize),
    NonCovering,
}

impl GroupKey {
    pub fn of(assembly: &Assembly<'_>) -> Self {
        if assembly.is_fully_covering() {
            GroupKey::Size(assembly.first_component_size())
        } else {
            GroupKey::NonCovering
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Size(size) => write!(f, "size {size}"),
            GroupKey::NonCovering => f.write_str("non-covering"),
        }
    }
}

/// Decides whether two assemblies of the same group describe the same solution.
///
/// Implementations must be an equivalence relation; clustering only compares a
/// candidate against each cluster's representative.
pub trait AssemblyEquivalence: Send + Sync {
    fn equivalent(&self, a: &Assembly<'_>, b: &Assembly<'_>) -> bool;
}

/// Equivalent when both assemblies produce exactly the same complexes: equal
/// stoichiometry sets and identical components, node for node and cell for cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct SameComponents;

impl AssemblyEquivalence for SameComponents {
    fn equivalent(&self, a: &Assembly<'_>, b: &Assembly<'_>) -> bool {
        a.stoichiometry_set() == b.stoichiometry_set() && placements(a) == placements(b)
    }
}

fn placements<'s>(assembly: &'s Assembly<'_>) -> Vec<&'s [(NodeId, Vector3<i32>)]> {
    assembly
        .components()
        .iter()
        .map(Component::placements)
        .collect()
}

/// Coarser equivalence that ignores which interface types are used: equal
/// stoichiometries, component sizes, and sorted per-type edge counts of the
/// first component.
#[derive(Debug, Clone, Copy, Default)]
pub struct SameTopology;

impl SameTopology {
    fn signature(assembly: &Assembly<'_>) -> (Vec<Stoichiometry>, Vec<usize>, Vec<usize>) {
        let mut stoichiometries: Vec<Stoichiometry> = assembly
            .stoichiometry_set()
            .components()
            .to_vec();
        stoichiometries.sort();

        let mut sizes: Vec<usize> = assembly.components().iter().map(Component::size).collect();
        sizes.sort_unstable();

        let mut edge_counts: Vec<usize> = assembly
            .engaged_set()
            .iter()
            .map(|cluster| assembly.edge_count_in_first_component(cluster))
            .collect();
        edge_counts.sort_unstable();

        (stoichiometries, sizes, edge_counts)
    }
}

impl AssemblyEquivalence for SameTopology {
    fn equivalent(&self, a: &Assembly<'_>, b: &Assembly<'_>) -> bool {
        Self::signature(a) == Self::signature(b)
    }
}

/// An ordered list of assemblies.
///
/// Used both for a whole group sharing one [`GroupKey`] and for a cluster of
/// equivalent assemblies, whose representative is the first member.
#[derive(Debug, Clone, Default)]
pub struct AssemblyGroup<'a> {
    members: Vec<Assembly<'a>>,
}

impl<'a> AssemblyGroup<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, assembly: Assembly<'a>) {
        self.members.push(assembly);
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The first member; for a cluster, the assembly engaging the most interface types.
    pub fn representative(&self) -> Option<&Assembly<'a>> {
        self.members.first()
    }

    pub fn members(&self) -> &[Assembly<'a>] {
        &self.members
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Assembly<'a>> {
        self.members.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Assembly<'a>> {
        self.members.get(index)
    }

    /// Splits the group into clusters of equivalent assemblies.
    ///
    /// Members are visited by number of engaged types, most first, then in
    /// engaged-set order; each joins the first cluster whose representative it is
    /// equivalent to, or opens a new one.
    pub fn sort_into_clusters(&self, equivalence: &dyn AssemblyEquivalence) -> Vec<AssemblyGroup<'a>> {
        let mut ordered: Vec<&Assembly<'a>> = self.members.iter().collect();
        ordered.sort_by(|a, b| {
            Reverse(a.num_engaged())
                .cmp(&Reverse(b.num_engaged()))
                .then_with(|| a.engaged_set().cmp(b.engaged_set()))
        });

        let mut clusters: Vec<AssemblyGroup<'a>> = Vec::new();
        for assembly in ordered {
            let home = clusters.iter_mut().find(|cluster| {
                cluster
                    .representative()
                    .is_some_and(|rep| equivalence.equivalent(rep, assembly))
            });
            match home {
                Some(cluster) => cluster.push(assembly.clone()),
                None => clusters.push(AssemblyGroup {
                    members: vec![assembly.clone()],
                }),
            }
        }
        clusters
    }
}

impl<'a> FromIterator<Assembly<'a>> for AssemblyGroup<'a> {
    fn from_iter<I: IntoIterator<Item = Assembly<'a>>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}

impl<'g, 'a> IntoIterator for &'g AssemblyGroup<'a> {
    type Item = &'g Assembly<'a>;
    type IntoIter = std::slice::Iter<'g, Assembly<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for AssemblyGroup<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let members: Vec<String> = self.members.iter().map(|a| a.to_string()).collect();
        write!(f, "[{}]", members.join(", "))
    }
}

/// Buckets valid assemblies by [`GroupKey`], keeping their input order inside each group.
pub fn group<'a>(valid: &[Assembly<'a>]) -> BTreeMap<GroupKey, AssemblyGroup<'a>> {
    let mut groups: BTreeMap<GroupKey, AssemblyGroup<'a>> = BTreeMap::new();
    for assembly in valid {
        groups
            .entry(GroupKey::of(assembly))
            .or_default()
            .push(assembly.clone());
    }
    groups
}

/// Clusters every size group with `equivalence`, in increasing size order.
///
/// Non-covering assemblies are not compared: each becomes a cluster of its own,
/// appended after all size groups in engaged-set order.
#[instrument(skip_all, name = "clustering_task")]
pub fn cluster<'a>(
    groups: &BTreeMap<GroupKey, AssemblyGroup<'a>>,
    equivalence: &dyn AssemblyEquivalence,
) -> Vec<AssemblyGroup<'a>> {
    let mut clusters = Vec::new();
    for (key, group) in groups {
        match key {
            GroupKey::Size(_) => {
                let found = group.sort_into_clusters(equivalence);
                debug!(group = %key, members = group.len(), clusters = found.len(), "Clustered group.");
                clusters.extend(found);
            }
            GroupKey::NonCovering => {
                let mut singles: Vec<&Assembly<'a>> = group.iter().collect();
                singles.sort();
                clusters.extend(
                    singles
                        .into_iter()
                        .map(|assembly| std::iter::once(assembly.clone()).collect::<AssemblyGroup<'a>>()),
                );
            }
        }
    }
    clusters
}
