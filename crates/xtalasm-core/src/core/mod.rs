//! # Core Module
//!
//! Fundamental crystallographic building blocks for assembly enumeration.
//!
//! ## Architecture
//!
//! - **Crystal Representation** ([`models`]) - Symmetry operators, space groups, chains,
//!   entities, and the interfaces (with their clusters) detected between chain copies
//! - **Lattice Connectivity** ([`lattice`]) - The graph of chain copies in the unit cell,
//!   connected by interface edges that carry the lattice translation between endpoints
//!
//! Everything in this module is immutable once built; the [`engine`](crate::engine)
//! only ever borrows it.

pub mod lattice;
pub mod models;
