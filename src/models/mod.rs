pub mod agent;
pub mod chunk;
pub mod enrichment;
pub mod metadata;

pub use agent::*;
pub use chunk::*;
pub use enrichment::*;
pub use metadata::*;
