//! # Lattice Module
//!
//! The symmetry lattice graph: one node per chain copy in the unit cell and one
//! edge per interface instance, annotated with the interface cluster and the
//! lattice translation relating the endpoints.
//!
//! Reducing every interface operator to an integer cell shift at build time lets
//! the engine decide whether a connected piece of the crystal is finite with exact
//! integer arithmetic; the only numerical tolerance is the one used for that reduction.

pub mod graph;

pub use graph::{LatticeEdge, LatticeError, LatticeGraph, LatticeNode, NodeKey};
