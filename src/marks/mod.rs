pub mod legend;
pub mod palette;
pub mod scene;

pub use legend::*;
pub use palette::*;
pub use scene::*;
