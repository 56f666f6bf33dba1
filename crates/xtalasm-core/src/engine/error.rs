use thiserror::Error;

use super::config::ConfigError;
use crate::core::lattice::LatticeError;
use crate::core::models::structure::StructureError;

#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("Invalid crystal input: {source}")]
    Structure {
        #[from]
        source: StructureError,
    },

    #[error("Lattice graph construction failed: {source}")]
    Lattice {
        #[from]
        source: LatticeError,
    },

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Crystal has {found} interface clusters, more than the configured limit of {limit}")]
    TooManyInterfaceClusters { found: usize, limit: usize },
}
