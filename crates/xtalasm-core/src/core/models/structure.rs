use super::symmetry::SpaceGroup;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StructureError {
    #[error("Space group '{name}' has no operators")]
    EmptySpaceGroup { name: String },

    #[error("The first operator of space group '{name}' must be the identity")]
    MissingIdentityOperator { name: String },

    #[error("Operators {first} and {second} of space group '{name}' are equal modulo lattice translations")]
    DuplicateOperator {
        name: String,
        first: usize,
        second: usize,
    },

    #[error("Operator {index} of space group '{name}' has non-finite entries")]
    NonFiniteOperator { name: String, index: usize },

    #[error("Chain '{chain_id}' is defined more than once")]
    DuplicateChain { chain_id: String },

    #[error("Chain '{chain_id}' references unknown entity {entity}")]
    UnknownEntity { chain_id: String, entity: usize },

    #[error("Interface {interface_id} is defined more than once")]
    DuplicateInterface { interface_id: usize },

    #[error("Interface {interface_id} belongs to cluster {cluster}, but only {num_clusters} clusters exist")]
    InvalidClusterIndex {
        interface_id: usize,
        cluster: usize,
        num_clusters: usize,
    },
}

/// A distinct molecular entity; chains with the same sequence share an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub label: String,
    pub description: Option<String>,
}

impl Entity {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: None,
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// A chain of the asymmetric unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub id: String,  // Author chain identifier (e.g., "A", "AA")
    pub entity: usize, // Index into the structure's entity list
}

/// The asymmetric unit of a crystal together with its space group.
#[derive(Debug, Clone)]
pub struct CrystalStructure {
    entities: Vec<Entity>,
    chains: Vec<Chain>,
    chain_index: HashMap<String, usize>,
    space_group: SpaceGroup,
}

impl CrystalStructure {
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    pub fn num_entities(&self) -> usize {
        self.entities.len()
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    pub fn chain(&self, index: usize) -> Option<&Chain> {
        self.chains.get(index)
    }

    /// Finds the index of a chain by its identifier.
    pub fn find_chain(&self, id: &str) -> Option<usize> {
        self.chain_index.get(id).copied()
    }

    pub fn space_group(&self) -> &SpaceGroup {
        &self.space_group
    }
}

/// Incremental construction of a [`CrystalStructure`].
///
/// The space group defaults to P1 when none is given.
#[derive(Debug, Default)]
pub struct CrystalStructureBuilder {
    entities: Vec<Entity>,
    chains: Vec<Chain>,
    space_group: Option<SpaceGroup>,
}

impl CrystalStructureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entity(&mut self, entity: Entity) -> &mut Self {
        self.entities.push(entity);
        self
    }

    pub fn add_chain(&mut self, id: impl Into<String>, entity: usize) -> &mut Self {
        self.chains.push(Chain {
            id: id.into(),
            entity,
        });
        self
    }

    pub fn space_group(&mut self, space_group: SpaceGroup) -> &mut Self {
        self.space_group = Some(space_group);
        self
    }

    pub fn build(self) -> Result<CrystalStructure, StructureError> {
        let mut chain_index = HashMap::with_capacity(self.chains.len());
        for (index, chain) in self.chains.iter().enumerate() {
            if chain.entity >= self.entities.len() {
                return Err(StructureError::UnknownEntity {
                    chain_id: chain.id.clone(),
                    entity: chain.entity,
                });
            }
            if chain_index.insert(chain.id.clone(), index).is_some() {
                return Err(StructureError::DuplicateChain {
                    chain_id: chain.id.clone(),
                });
            }
        }
        Ok(CrystalStructure {
            entities: self.entities,
            chains: self.chains,
            chain_index,
            space_group: self.space_group.unwrap_or_default(),
        })
    }
}
