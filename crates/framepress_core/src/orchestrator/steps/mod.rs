//! The four standard pipeline steps, in execution order.

mod assemble;
mod extract;
mod probe;
mod recompress;

pub use assemble::AssembleStep;
pub use extract::ExtractStep;
pub use probe::ProbeStep;
pub use recompress::RecompressStep;
