use super::structure::StructureError;
use super::symmetry::SymOp;
use std::collections::HashSet;

/// A pairwise contact between two chain copies of the crystal.
///
/// `chain1` sits in the asymmetric unit; `chain2` is the copy obtained by applying
/// `operator` to the asymmetric-unit chain with that identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Interface {
    pub id: usize,
    pub chain1: String,
    pub chain2: String,
    pub operator: SymOp,
    pub area: f64,   // Buried surface area in Å², reporting only
    pub cluster: usize,
}

impl Interface {
    pub fn new(
        id: usize,
        chain1: impl Into<String>,
        chain2: impl Into<String>,
        operator: SymOp,
        cluster: usize,
    ) -> Self {
        Self {
            id,
            chain1: chain1.into(),
            chain2: chain2.into(),
            operator,
            area: 0.0,
            cluster,
        }
    }

    pub fn with_area(mut self, area: f64) -> Self {
        self.area = area;
        self
    }

    /// Whether both partners are copies of the same asymmetric-unit chain.
    pub fn is_self_contact(&self) -> bool {
        self.chain1 == self.chain2
    }
}

/// A class of geometrically equivalent interfaces, i.e. one interface type.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceCluster {
    pub index: usize,
    pub members: Vec<usize>, // Interface ids, ascending
    pub total_area: f64,
}

impl InterfaceCluster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn mean_area(&self) -> f64 {
        if self.members.is_empty() {
            0.0
        } else {
            self.total_area / self.members.len() as f64
        }
    }
}

/// The interfaces of a crystal and their clustering into interface types.
#[derive(Debug, Clone, Default)]
pub struct InterfaceList {
    interfaces: Vec<Interface>,
    clusters: Vec<InterfaceCluster>,
}

impl InterfaceList {
    /// Creates the list with exactly `num_clusters` interface types.
    ///
    /// Interfaces are kept sorted by id so that downstream results do not depend
    /// on the order in which upstream detection produced them.
    pub fn new(
        mut interfaces: Vec<Interface>,
        num_clusters: usize,
    ) -> Result<Self, StructureError> {
        interfaces.sort_by_key(|interface| interface.id);

        let mut seen = HashSet::with_capacity(interfaces.len());
        let mut clusters: Vec<InterfaceCluster> = (0..num_clusters)
            .map(|index| InterfaceCluster {
                index,
                members: Vec::new(),
                total_area: 0.0,
            })
            .collect();

        for interface in &interfaces {
            if !seen.insert(interface.id) {
                return Err(StructureError::DuplicateInterface {
                    interface_id: interface.id,
                });
            }
            let cluster = clusters.get_mut(interface.cluster).ok_or(
                StructureError::InvalidClusterIndex {
                    interface_id: interface.id,
                    cluster: interface.cluster,
                    num_clusters,
                },
            )?;
            cluster.members.push(interface.id);
            cluster.total_area += interface.area;
        }

        Ok(Self {
            interfaces,
            clusters,
        })
    }

    /// Creates the list, inferring the number of clusters from the highest index used.
    pub fn from_interfaces(interfaces: Vec<Interface>) -> Result<Self, StructureError> {
        let num_clusters = interfaces
            .iter()
            .map(|interface| interface.cluster + 1)
            .max()
            .unwrap_or(0);
        Self::new(interfaces, num_clusters)
    }

    pub fn interfaces(&self) -> &[Interface] {
        &self.interfaces
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interface> {
        self.interfaces.iter()
    }

    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }

    pub fn clusters(&self) -> &[InterfaceCluster] {
        &self.clusters
    }

    pub fn cluster(&self, index: usize) -> Option<&InterfaceCluster> {
        self.clusters.get(index)
    }

    pub fn num_clusters(&self) -> usize {
        self.clusters.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interface(id: usize, cluster: usize, area: f64) -> Interface {
        Interface::new(id, "A", "A", SymOp::identity(), cluster).with_area(area)
    }

    #[test]
    fn new_groups_interfaces_into_clusters() {
        let list = InterfaceList::new(
            vec![interface(3, 1, 300.0), interface(1, 0, 800.0), interface(2, 1, 500.0)],
            2,
        )
        .unwrap();

        assert_eq!(list.len(), 3);
        assert_eq!(
            list.iter().map(|i| i.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(list.cluster(0).unwrap().members, vec![1]);
        assert_eq!(list.cluster(1).unwrap().members, vec![2, 3]);
        assert_eq!(list.cluster(1).unwrap().mean_area(), 400.0);
    }

    #[test]
    fn new_keeps_empty_clusters() {
        let list = InterfaceList::new(vec![interface(1, 0, 100.0)], 3).unwrap();
        assert_eq!(list.num_clusters(), 3);
        assert!(list.cluster(2).unwrap().is_empty());
    }

    #[test]
    fn new_rejects_out_of_range_cluster() {
        let err = InterfaceList::new(vec![interface(1, 4, 100.0)], 2).unwrap_err();
        assert_eq!(
            err,
            StructureError::InvalidClusterIndex {
                interface_id: 1,
                cluster: 4,
                num_clusters: 2
            }
        );
    }

    #[test]
    fn new_rejects_duplicate_ids() {
        let err = InterfaceList::new(vec![interface(1, 0, 1.0), interface(1, 0, 2.0)], 1)
            .unwrap_err();
        assert!(matches!(err, StructureError::DuplicateInterface { interface_id: 1 }));
    }

    #[test]
    fn from_interfaces_infers_cluster_count() {
        let list =
            InterfaceList::from_interfaces(vec![interface(1, 0, 1.0), interface(2, 2, 1.0)])
                .unwrap();
        assert_eq!(list.num_clusters(), 3);
        assert_eq!(InterfaceList::from_interfaces(vec![]).unwrap().num_clusters(), 0);
    }
}
