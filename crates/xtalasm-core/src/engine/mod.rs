//! # Engine Module
//!
//! The assembly enumeration engine: which combinations of interface clusters
//! produce finite complexes, and how those solutions collapse into clusters.
//!
//! ## Architecture
//!
//! - **Context** ([`context`]) - Structure, interfaces and the deduplicated lattice graph,
//!   shared read-only by every assembly
//! - **Engaged Sets** ([`engaged`]) - Bit vectors over interface clusters and their
//!   one-step children and parents
//! - **Assemblies** ([`assembly`]) - Lazily evaluated components, validity and
//!   stoichiometry of one engaged set
//! - **Enumeration** ([`enumeration`]) - Level-by-level traversal of the engaged-set
//!   lattice with monotonic pruning of invalid supersets
//! - **Grouping** ([`grouping`]) - Size groups and equivalence clusters of valid assemblies
//! - **Configuration** ([`config`]) - Operator tolerance and enumeration limits
//! - **Progress Monitoring** ([`progress`]) - Callback-based phase and task reporting
//! - **Error Handling** ([`error`]) - Failures raised while preparing a crystal
//!
//! ## Key Capabilities
//!
//! - **Exact finiteness test** on integer lattice positions
//! - **Parallel evaluation** of each enumeration level behind the `parallel` feature
//! - **Pluggable equivalence** through [`grouping::AssemblyEquivalence`]

pub mod assembly;
pub mod config;
pub mod context;
pub mod engaged;
pub mod enumeration;
pub mod error;
pub mod grouping;
pub mod progress;
pub mod stoichiometry;

#[cfg(test)]
pub(crate) mod fixtures;
