//! # Workflows Module
//!
//! Top-level entry points of xtalasm.
//!
//! - **Crystal Assemblies** ([`assemblies`]) - Enumerates, groups and clusters the valid
//!   assemblies of a crystal and answers ad hoc queries about single interface clusters.

pub mod assemblies;
