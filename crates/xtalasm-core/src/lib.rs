//! # xtalasm Core Library
//!
//! Enumeration of the valid macromolecular assemblies that a crystal lattice can
//! contain, given the pairwise interfaces detected between symmetry-related chains.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless crystallographic data models
//!   (`CrystalStructure`, `SpaceGroup`, `InterfaceList`) and the symmetry
//!   [`LatticeGraph`](core::lattice::LatticeGraph) built from them.
//!
//! - **[`engine`]: The Logic Core.** Engaged sets over interface clusters, lazily
//!   evaluated `Assembly` candidates, the pruned power-set enumeration and the
//!   grouping of valid assemblies into clusters of equivalent solutions.
//!
//! - **[`workflows`]: The Public API.** [`CrystalAssemblies`](workflows::assemblies::CrystalAssemblies)
//!   ties everything together and exposes the unique assemblies found in a crystal.

pub mod core;
pub mod engine;
pub mod workflows;
