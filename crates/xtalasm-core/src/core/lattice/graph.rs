use crate::core::models::ids::NodeId;
use crate::core::models::interface::InterfaceList;
use crate::core::models::structure::CrystalStructure;
use crate::core::models::symmetry::SymOp;
use nalgebra::Vector3;
use slotmap::{SecondaryMap, SlotMap};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LatticeError {
    #[error("Interface {interface_id} references unknown chain '{chain_id}'")]
    UnknownChain {
        interface_id: usize,
        chain_id: String,
    },

    #[error(
        "Operator of interface {interface_id} composed with space-group operator {operator_index} matches no operator of the space group"
    )]
    UnmatchedOperator {
        interface_id: usize,
        operator_index: usize,
    },

    #[error("Operator of interface {interface_id} has non-finite entries")]
    NonFiniteOperator { interface_id: usize },

    #[error(
        "Operator of interface {interface_id} composed with space-group operator {operator_index} matches both operator {first} and operator {second}; the tolerance is too loose"
    )]
    AmbiguousOperator {
        interface_id: usize,
        operator_index: usize,
        first: usize,
        second: usize,
    },
}

/// Identity of a chain copy in the unit cell: the asymmetric-unit chain and the
/// space-group operator that places it. Ordering of keys is the canonical node order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey {
    pub chain: usize,
    pub operator: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatticeNode {
    pub key: NodeKey,
    pub entity: usize,
}

/// One interface instance between two chain copies.
///
/// The copy of `target` in contact with `source` is the canonical `target` copy
/// translated by `cell_shift` unit cells, seen from the canonical `source` copy.
#[derive(Debug, Clone, PartialEq)]
pub struct LatticeEdge {
    pub interface_id: usize,
    pub cluster: usize,
    pub source: NodeId,
    pub target: NodeId,
    pub operator: SymOp,
    pub cell_shift: Vector3<i32>,
    /// Set when the edge was merged with its own reverse, as for a two-fold axis.
    pub involution: bool,
}

impl LatticeEdge {
    /// The node across the edge from `node` and the cell shift to reach it.
    pub fn traverse_from(&self, node: NodeId) -> Option<(NodeId, Vector3<i32>)> {
        if node == self.source {
            Some((self.target, self.cell_shift))
        } else if node == self.target {
            Some((self.source, -self.cell_shift))
        } else {
            None
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

type EdgeKey = (NodeKey, NodeKey, [i32; 3]);

#[derive(Debug, Clone, Default)]
pub struct LatticeGraph {
    nodes: SlotMap<NodeId, LatticeNode>,
    node_order: Vec<NodeId>,
    node_index: HashMap<NodeKey, NodeId>,
    edges: Vec<LatticeEdge>,
    adjacency: SecondaryMap<NodeId, Vec<usize>>,
}

impl LatticeGraph {
    /// Builds the lattice graph of a crystal from its interfaces.
    ///
    /// Every interface contributes one edge per space-group operator. Fails without
    /// producing a graph when an interface references an unknown chain or its
    /// operator cannot be reduced to a unit-cell operator within `tolerance`.
    #[instrument(skip_all, name = "lattice_graph_build")]
    pub fn build(
        structure: &CrystalStructure,
        interfaces: &InterfaceList,
        tolerance: f64,
    ) -> Result<Self, LatticeError> {
        let mut graph = Self::with_nodes(structure);
        let space_group = structure.space_group();

        for interface in interfaces.iter() {
            let resolve = |chain_id: &str| {
                structure
                    .find_chain(chain_id)
                    .ok_or_else(|| LatticeError::UnknownChain {
                        interface_id: interface.id,
                        chain_id: chain_id.to_string(),
                    })
            };
            let chain1 = resolve(&interface.chain1)?;
            let chain2 = resolve(&interface.chain2)?;
            if !interface.operator.is_finite() {
                return Err(LatticeError::NonFiniteOperator {
                    interface_id: interface.id,
                });
            }

            for (k, op_k) in space_group.operators().iter().enumerate() {
                let composed = op_k.compose(&interface.operator);
                let matches: Vec<(usize, Vector3<i32>)> = space_group
                    .matching_operators(&composed, tolerance)
                    .take(2)
                    .collect();
                let (m, cell_shift) = match matches.as_slice() {
                    [] => {
                        return Err(LatticeError::UnmatchedOperator {
                            interface_id: interface.id,
                            operator_index: k,
                        });
                    }
                    [single] => *single,
                    [(first, _), (second, _), ..] => {
                        return Err(LatticeError::AmbiguousOperator {
                            interface_id: interface.id,
                            operator_index: k,
                            first: *first,
                            second: *second,
                        });
                    }
                };
                let source = graph.node_index[&NodeKey {
                    chain: chain1,
                    operator: k,
                }];
                let target = graph.node_index[&NodeKey {
                    chain: chain2,
                    operator: m,
                }];
                graph.edges.push(LatticeEdge {
                    interface_id: interface.id,
                    cluster: interface.cluster,
                    source,
                    target,
                    operator: composed,
                    cell_shift,
                    involution: false,
                });
            }
        }

        graph.sort_edges();
        graph.rebuild_adjacency();
        debug!(
            nodes = graph.num_nodes(),
            edges = graph.num_edges(),
            "Lattice graph built."
        );
        Ok(graph)
    }

    fn with_nodes(structure: &CrystalStructure) -> Self {
        let mut graph = Self::default();
        for (chain, chain_data) in structure.chains().iter().enumerate() {
            for operator in 0..structure.space_group().len() {
                let key = NodeKey { chain, operator };
                let id = graph.nodes.insert(LatticeNode {
                    key,
                    entity: chain_data.entity,
                });
                graph.node_order.push(id);
                graph.node_index.insert(key, id);
            }
        }
        graph
    }

    /// Merges edges that describe the same contact, returning how many were removed.
    ///
    /// Two edges are duplicates when they join the same pair of nodes with the same
    /// operator, whichever direction they were generated in. The instance with the
    /// lowest interface id survives. Only an interface that meets its own reverse
    /// marks the survivor as an involution; the same contact reported again under
    /// another interface id does not. Idempotent.
    pub fn remove_duplicate_edges(&mut self) -> usize {
        let mut edges = std::mem::take(&mut self.edges);
        let before = edges.len();
        edges.sort_by_key(|edge| (edge.interface_id, self.sort_key(edge)));

        let mut kept: BTreeMap<EdgeKey, (usize, bool)> = BTreeMap::new();
        let mut unique: Vec<LatticeEdge> = Vec::with_capacity(edges.len());
        for edge in edges {
            let (key, forward) = self.canonical_key(&edge);
            match kept.get(&key) {
                Some(&(index, survivor_forward)) => {
                    if survivor_forward != forward && unique[index].interface_id == edge.interface_id {
                        unique[index].involution = true;
                    }
                }
                None => {
                    kept.insert(key, (unique.len(), forward));
                    unique.push(edge);
                }
            }
        }

        self.edges = unique;
        self.sort_edges();
        self.rebuild_adjacency();

        let removed = before - self.edges.len();
        if removed > 0 {
            debug!(removed, remaining = self.edges.len(), "Removed duplicate lattice edges.");
        }
        removed
    }

    /// Key under which an edge and its reverse coincide, plus whether `edge` is
    /// stored in the key's orientation.
    fn canonical_key(&self, edge: &LatticeEdge) -> (EdgeKey, bool) {
        let source = self.nodes[edge.source].key;
        let target = self.nodes[edge.target].key;
        let shift = shift_array(&edge.cell_shift);
        let reversed = shift_array(&(-edge.cell_shift));
        let forward = match source.cmp(&target) {
            std::cmp::Ordering::Less => true,
            std::cmp::Ordering::Greater => false,
            std::cmp::Ordering::Equal => shift >= reversed,
        };
        if forward {
            ((source, target, shift), true)
        } else {
            ((target, source, reversed), false)
        }
    }

    fn sort_key(&self, edge: &LatticeEdge) -> (NodeKey, NodeKey, [i32; 3], usize) {
        (
            self.nodes[edge.source].key,
            self.nodes[edge.target].key,
            shift_array(&edge.cell_shift),
            edge.cluster,
        )
    }

    fn sort_edges(&mut self) {
        let mut edges = std::mem::take(&mut self.edges);
        edges.sort_by_key(|edge| (self.sort_key(edge), edge.interface_id));
        self.edges = edges;
    }

    fn rebuild_adjacency(&mut self) {
        self.adjacency = self
            .node_order
            .iter()
            .map(|&id| (id, Vec::new()))
            .collect();
        for (index, edge) in self.edges.iter().enumerate() {
            self.adjacency[edge.source].push(index);
            if edge.target != edge.source {
                self.adjacency[edge.target].push(index);
            }
        }
    }

    /// Nodes in canonical order: by chain, then by operator.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &LatticeNode)> + '_ {
        self.node_order.iter().map(|&id| (id, &self.nodes[id]))
    }

    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_order
    }

    pub fn node(&self, id: NodeId) -> Option<&LatticeNode> {
        self.nodes.get(id)
    }

    pub fn node_id(&self, chain: usize, operator: usize) -> Option<NodeId> {
        self.node_index.get(&NodeKey { chain, operator }).copied()
    }

    pub fn edges(&self) -> &[LatticeEdge] {
        &self.edges
    }

    pub fn edge(&self, index: usize) -> Option<&LatticeEdge> {
        self.edges.get(index)
    }

    /// Indices of the edges touching `node`; a self-loop is listed once.
    pub fn incident_edges(&self, node: NodeId) -> &[usize] {
        self.adjacency.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edges_of_cluster(&self, cluster: usize) -> impl Iterator<Item = &LatticeEdge> + '_ {
        self.edges.iter().filter(move |edge| edge.cluster == cluster)
    }

    pub fn num_nodes(&self) -> usize {
        self.node_order.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }
}

fn shift_array(shift: &Vector3<i32>) -> [i32; 3] {
    [shift.x, shift.y, shift.z]
}
