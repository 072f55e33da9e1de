mod entry;
mod grouping;

pub use entry::*;
pub use grouping::*;
