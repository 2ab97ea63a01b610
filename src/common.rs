pub mod names;
pub mod traversal;

pub use names::*;
pub use traversal::*;
