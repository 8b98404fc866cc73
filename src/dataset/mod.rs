pub mod error;
pub mod loader;
pub mod record;

pub use error::*;
pub use loader::*;
pub use record::*;
