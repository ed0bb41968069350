pub mod assemble;
pub mod context;
pub mod pipeline;
pub mod realtime;

pub use assemble::*;
pub use context::*;
pub use pipeline::*;
pub use realtime::*;
