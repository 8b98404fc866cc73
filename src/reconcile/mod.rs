pub mod delta;

pub use delta::*;
