pub mod ids;
pub mod interface;
pub mod structure;
pub mod symmetry;
