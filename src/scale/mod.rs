pub mod linear;
pub mod ticks;

pub use linear::*;
pub use ticks::*;
