pub mod config;
pub mod engine;
pub mod selection;
pub mod timeline;
pub mod wasm;

pub use config::*;
pub use engine::*;
pub use selection::*;
pub use timeline::*;
pub use wasm::*;
